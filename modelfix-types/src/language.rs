use serde::{Deserialize, Serialize};
use std::fmt;

/// Language family tag.
///
/// One applier serves every language; the tag selects the language profile
/// and is recorded in apply artifacts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageFamily {
    Ruby,
    JavaScript,
    TypeScript,
    Python,
    Java,
    Php,
    DotNet,
    Go,
    Rust,
    /// YAML/JSON configuration files.
    Data,
    #[default]
    Unknown,
}

impl LanguageFamily {
    pub const ALL: &'static [LanguageFamily] = &[
        LanguageFamily::Ruby,
        LanguageFamily::JavaScript,
        LanguageFamily::TypeScript,
        LanguageFamily::Python,
        LanguageFamily::Java,
        LanguageFamily::Php,
        LanguageFamily::DotNet,
        LanguageFamily::Go,
        LanguageFamily::Rust,
        LanguageFamily::Data,
    ];

    pub fn id(self) -> &'static str {
        match self {
            LanguageFamily::Ruby => "ruby",
            LanguageFamily::JavaScript => "javascript",
            LanguageFamily::TypeScript => "typescript",
            LanguageFamily::Python => "python",
            LanguageFamily::Java => "java",
            LanguageFamily::Php => "php",
            LanguageFamily::DotNet => "dotnet",
            LanguageFamily::Go => "go",
            LanguageFamily::Rust => "rust",
            LanguageFamily::Data => "data",
            LanguageFamily::Unknown => "unknown",
        }
    }

    /// Parse a language identifier as used on the command line.
    ///
    /// Unrecognised identifiers map to `Unknown` rather than failing.
    pub fn from_id(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "ruby" | "rails" => LanguageFamily::Ruby,
            "javascript" | "js" | "node" => LanguageFamily::JavaScript,
            "typescript" | "ts" => LanguageFamily::TypeScript,
            "python" | "py" => LanguageFamily::Python,
            "java" => LanguageFamily::Java,
            "php" => LanguageFamily::Php,
            "dotnet" | "csharp" | "cs" | ".net" => LanguageFamily::DotNet,
            "go" | "golang" => LanguageFamily::Go,
            "rust" | "rs" => LanguageFamily::Rust,
            "yaml" | "json" | "data" => LanguageFamily::Data,
            _ => LanguageFamily::Unknown,
        }
    }

    /// Map a file extension (without the dot) to a family.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "rb" => LanguageFamily::Ruby,
            "js" | "jsx" | "mjs" => LanguageFamily::JavaScript,
            "ts" | "tsx" => LanguageFamily::TypeScript,
            "py" => LanguageFamily::Python,
            "java" => LanguageFamily::Java,
            "php" => LanguageFamily::Php,
            "cs" => LanguageFamily::DotNet,
            "go" => LanguageFamily::Go,
            "rs" => LanguageFamily::Rust,
            "yml" | "yaml" | "json" => LanguageFamily::Data,
            _ => LanguageFamily::Unknown,
        }
    }

    /// Family for a file path, judged by its extension.
    pub fn from_path(path: &str) -> Self {
        let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Self::from_extension(ext),
            _ => LanguageFamily::Unknown,
        }
    }

    pub fn is_unknown(self) -> bool {
        matches!(self, LanguageFamily::Unknown)
    }
}

impl fmt::Display for LanguageFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
