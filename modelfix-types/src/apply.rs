use crate::fix::{ChangeKind, LabelShape};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Apply artifact (`apply.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelfixApply {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: RunInfo,
    pub repo_root: String,

    #[serde(default)]
    pub dry_run: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    pub extraction: ExtractionInfo,

    #[serde(default)]
    pub results: Vec<ApplicationResult>,

    pub summary: ApplySummary,
}

impl ModelfixApply {
    pub fn new(tool: ToolInfo, repo_root: impl Into<String>, extraction: ExtractionInfo) -> Self {
        Self {
            schema: crate::schema::MODELFIX_APPLY_V1.to_string(),
            tool,
            run: RunInfo::start(),
            repo_root: repo_root.into(),
            dry_run: false,
            language: None,
            extraction,
            results: vec![],
            summary: ApplySummary::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl RunInfo {
    pub fn start() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            ended_at: None,
        }
    }
}

/// How extraction over a model reply ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    /// The reply carried the no-op marker. Success.
    NoFixNeeded,
    /// At least one fix block was recognised.
    Found,
    /// Nothing recognisable. A warning, not a failure.
    Empty,
}

impl ExtractionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractionStatus::NoFixNeeded => "no_fix_needed",
            ExtractionStatus::Found => "found",
            ExtractionStatus::Empty => "empty",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionInfo {
    pub status: ExtractionStatus,

    /// Name of the matcher strategy that produced the records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,

    pub records: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

/// Per-record outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    /// Absolute or traversing target path; the filesystem was not touched.
    SkippedUnsafe,
    /// The change needs an existing file and there was none.
    NotFound,
    /// The before-text was missing, or reading/writing failed.
    ParseFailed,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Applied => "applied",
            Outcome::SkippedUnsafe => "skipped_unsafe",
            Outcome::NotFound => "not_found",
            Outcome::ParseFailed => "parse_failed",
        }
    }

    /// Whether the record counts toward a successful run.
    pub fn is_applied(self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationResult {
    pub target_path: String,
    pub kind: ChangeKind,
    pub shape: LabelShape,
    pub outcome: Outcome,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,

    /// Absent when the file was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_before: Option<String>,

    pub sha256_after: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplySummary {
    pub attempted: u64,
    pub applied: u64,
    pub skipped_unsafe: u64,
    pub not_found: u64,
    pub parse_failed: u64,
    pub files_modified: u64,
}

impl ApplySummary {
    pub fn record(&mut self, result: &ApplicationResult) {
        self.attempted += 1;
        match result.outcome {
            Outcome::Applied => self.applied += 1,
            Outcome::SkippedUnsafe => self.skipped_unsafe += 1,
            Outcome::NotFound => self.not_found += 1,
            Outcome::ParseFailed => self.parse_failed += 1,
        }
    }
}
