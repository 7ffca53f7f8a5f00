//! Clap-free settings for the apply and ask pipelines.

use camino::Utf8PathBuf;
use modelfix_extract::ExtractOptions;
use modelfix_llm::ModelSettings;
use modelfix_types::LanguageFamily;

/// Settings for the apply pipeline.
#[derive(Debug, Clone)]
pub struct ApplySettings {
    pub repo_root: Utf8PathBuf,
    /// Where `apply.json`, `apply.md` and `patch.diff` go, if anywhere.
    pub out_dir: Option<Utf8PathBuf>,
    pub dry_run: bool,
    /// `Unknown` means infer from the first recognisable target path.
    pub language: LanguageFamily,
    pub extract: ExtractOptions,
}

impl Default for ApplySettings {
    fn default() -> Self {
        Self {
            repo_root: Utf8PathBuf::from("."),
            out_dir: None,
            dry_run: false,
            language: LanguageFamily::Unknown,
            extract: ExtractOptions::default(),
        }
    }
}

/// Settings for the ask pipeline.
#[derive(Debug, Clone, Default)]
pub struct AskSettings {
    pub model: ModelSettings,
    /// Save the reply here as well as returning it.
    pub output: Option<Utf8PathBuf>,
}
