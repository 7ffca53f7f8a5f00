use serde::{Deserialize, Serialize};
use std::fmt;

/// How a fix body should be applied to its target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// The body is the complete new file.
    FullReplacement,
    /// The body carries literal before/after sections.
    DiffReplacement,
    Addition,
    Deletion,
    /// The body is placed as a unit at a heuristic location.
    BlockReplacement,
}

impl ChangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::FullReplacement => "full_replacement",
            ChangeKind::DiffReplacement => "diff_replacement",
            ChangeKind::Addition => "addition",
            ChangeKind::Deletion => "deletion",
            ChangeKind::BlockReplacement => "block_replacement",
        }
    }

    /// Kinds that insert the body into an existing file.
    pub fn is_insertion(self) -> bool {
        matches!(
            self,
            ChangeKind::Addition | ChangeKind::Deletion | ChangeKind::BlockReplacement
        )
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The textual label shape that announced a fix block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelShape {
    /// `### FIX: path`
    Heading,
    /// `FIX_FILE: path`
    Flat,
    /// A line mentioning `` `path` `` right before a fence.
    Backtick,
    /// A `[path]` line right before a fence.
    Bracket,
}

impl LabelShape {
    pub fn as_str(self) -> &'static str {
        match self {
            LabelShape::Heading => "heading",
            LabelShape::Flat => "flat",
            LabelShape::Backtick => "backtick",
            LabelShape::Bracket => "bracket",
        }
    }

    /// Heading and flat labels are only ever emitted with the complete new file.
    pub fn implies_full_file(self) -> bool {
        matches!(self, LabelShape::Heading | LabelShape::Flat)
    }
}

impl fmt::Display for LabelShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extracted fix: a target path, the raw payload and how to apply it.
///
/// Records are built once by the extractor and consumed by the applier; the
/// fields are read-only after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixRecord {
    target_path: String,
    body: String,
    kind: ChangeKind,
    shape: LabelShape,
}

impl FixRecord {
    pub fn new(
        target_path: impl Into<String>,
        body: impl Into<String>,
        kind: ChangeKind,
        shape: LabelShape,
    ) -> Self {
        Self {
            target_path: target_path.into(),
            body: body.into(),
            kind,
            shape,
        }
    }

    /// Path as written by the model, not yet validated.
    pub fn target_path(&self) -> &str {
        &self.target_path
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn shape(&self) -> LabelShape {
        self.shape
    }
}
