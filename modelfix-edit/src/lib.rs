//! Apply engine for modelfix fix records.
//!
//! Responsibilities:
//! - Refuse unsafe target paths before touching the filesystem.
//! - Apply full, diff and insertion changes (in-memory or to disk).
//! - Fold every failure into a per-record outcome.
//! - Generate a unified diff preview of everything that changed.

pub mod error;
pub mod heuristic;
pub mod path;

pub use error::{MutateError, UnsafePathError};
pub use path::validate_target;

use camino::{Utf8Path, Utf8PathBuf};
use diffy::PatchFormatter;
use fs_err as fs;
use modelfix_extract::split_diff;
use modelfix_types::apply::{ApplicationResult, FileChange, Outcome};
use modelfix_types::{ChangeKind, FixRecord, LanguageFamily};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Compute outcomes against an in-memory overlay; write nothing.
    pub dry_run: bool,

    /// Language tag for the run. Recorded in logs; placement rules are shared.
    pub language: LanguageFamily,
}

/// Content of a touched file when it was first read.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Original {
    Missing,
    Text(String),
    /// Existed but could not be read as UTF-8. Digest of the raw bytes when readable.
    Opaque(Option<String>),
}

impl Original {
    fn text(&self) -> Option<&str> {
        match self {
            Original::Text(s) => Some(s),
            Original::Missing | Original::Opaque(_) => None,
        }
    }

    fn sha256(&self) -> Option<String> {
        match self {
            Original::Missing => None,
            Original::Text(s) => Some(sha256_hex(s.as_bytes())),
            Original::Opaque(digest) => digest.clone(),
        }
    }
}

/// Applies records one at a time against a repository root.
///
/// Content is tracked in an overlay so later records see earlier edits, in
/// dry-run mode as well.
#[derive(Debug)]
pub struct Applier {
    repo_root: Utf8PathBuf,
    opts: ApplyOptions,
    before: BTreeMap<Utf8PathBuf, Original>,
    current: BTreeMap<Utf8PathBuf, String>,
}

impl Applier {
    pub fn new(repo_root: impl Into<Utf8PathBuf>, opts: ApplyOptions) -> Self {
        Self {
            repo_root: repo_root.into(),
            opts,
            before: BTreeMap::new(),
            current: BTreeMap::new(),
        }
    }

    /// Apply one record. Never fails; errors become the result's outcome.
    pub fn apply_record(&mut self, record: &FixRecord) -> ApplicationResult {
        let mut result = ApplicationResult {
            target_path: record.target_path().to_string(),
            kind: record.kind(),
            shape: record.shape(),
            outcome: Outcome::Applied,
            message: None,
            file: None,
        };

        let outcome = validate_target(record.target_path())
            .map_err(MutateError::from)
            .and_then(|rel| self.mutate(&rel, record));

        match outcome {
            Ok(change) => {
                info!(
                    path = %change.path,
                    kind = %record.kind(),
                    language = self.opts.language.id(),
                    heuristic = record.kind().is_insertion(),
                    dry_run = self.opts.dry_run,
                    "applied fix"
                );
                result.file = Some(change);
            }
            Err(err) => {
                warn!(path = record.target_path(), kind = %record.kind(), error = %err, "fix not applied");
                result.outcome = err.outcome();
                result.message = Some(err.to_string());
            }
        }
        result
    }

    /// Number of files whose content differs from what was first read.
    pub fn files_modified(&self) -> u64 {
        self.current
            .iter()
            .filter(|(path, new)| {
                self.before
                    .get(*path)
                    .and_then(Original::text)
                    .is_none_or(|old| old != new.as_str())
            })
            .count() as u64
    }

    /// Unified diff of every change made so far.
    pub fn patch(&self) -> String {
        render_patch(&self.before, &self.current)
    }

    fn mutate(&mut self, rel: &Utf8Path, record: &FixRecord) -> Result<FileChange, MutateError> {
        let body = record.body();
        // Only an overwrite may proceed without knowing the old content.
        let original = match record.kind() {
            ChangeKind::FullReplacement => self.read_for_overwrite(rel),
            _ => self.read(rel)?,
        };

        let new = match record.kind() {
            ChangeKind::FullReplacement => format!("{}\n", body.trim_end_matches(['\n', '\r'])),
            ChangeKind::DiffReplacement => {
                let Some(old) = original.text() else {
                    return Err(MutateError::DiffTargetMissing {
                        path: rel.to_string(),
                    });
                };
                let sections = split_diff(body).ok_or(MutateError::NoSeparator)?;
                if sections.before.is_empty() {
                    return Err(MutateError::EmptyBefore);
                }
                if !old.contains(&sections.before) {
                    return Err(MutateError::BeforeTextMissing {
                        path: rel.to_string(),
                    });
                }
                old.replace(&sections.before, &sections.after)
            }
            ChangeKind::Addition | ChangeKind::Deletion | ChangeKind::BlockReplacement => {
                let Some(old) = original.text() else {
                    return Err(MutateError::NotFound {
                        path: rel.to_string(),
                    });
                };
                heuristic::insert_block(old, body)
            }
        };

        self.write(rel, &new)?;
        Ok(FileChange {
            path: rel.to_string(),
            sha256_before: original.sha256(),
            sha256_after: sha256_hex(new.as_bytes()),
        })
    }

    /// Current content of `rel`, from the overlay or disk.
    ///
    /// Returns `Missing` or `Text`; a file that is not UTF-8 is an error.
    fn read(&mut self, rel: &Utf8Path) -> Result<Original, MutateError> {
        if let Some(contents) = self.current.get(rel) {
            return Ok(Original::Text(contents.clone()));
        }
        match self.before.get(rel) {
            Some(Original::Opaque(_)) | None => {}
            Some(original) => return Ok(original.clone()),
        }

        let abs = self.repo_root.join(rel);
        let original = match fs::read_to_string(&abs) {
            Ok(s) => Original::Text(s),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Original::Missing,
            Err(e) => return Err(e.into()),
        };
        debug!(path = %rel, exists = original != Original::Missing, "read target");
        self.before
            .entry(rel.to_path_buf())
            .or_insert_with(|| original.clone());
        Ok(original)
    }

    /// Like `read`, but never fails: unreadable or non-UTF-8 files become `Opaque`.
    fn read_for_overwrite(&mut self, rel: &Utf8Path) -> Original {
        if let Some(contents) = self.current.get(rel) {
            return Original::Text(contents.clone());
        }
        if let Some(original) = self.before.get(rel) {
            return original.clone();
        }

        let abs = self.repo_root.join(rel);
        let original = match fs::read(&abs) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(s) => Original::Text(s),
                Err(e) => {
                    debug!(path = %rel, "target is not UTF-8; overwriting");
                    Original::Opaque(Some(sha256_hex(e.as_bytes())))
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Original::Missing,
            Err(e) => {
                warn!(path = %rel, error = %e, "cannot read target; overwriting");
                Original::Opaque(None)
            }
        };
        self.before.insert(rel.to_path_buf(), original.clone());
        original
    }

    fn write(&mut self, rel: &Utf8Path, contents: &str) -> Result<(), MutateError> {
        if !self.opts.dry_run {
            let abs = self.repo_root.join(rel);
            if let Some(parent) = abs.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&abs, contents)?;
        }
        self.current.insert(rel.to_path_buf(), contents.to_string());
        Ok(())
    }
}

/// Apply every record in order. Returns the results and the unified diff.
pub fn apply_records(
    repo_root: &Utf8Path,
    records: &[FixRecord],
    opts: &ApplyOptions,
) -> (Vec<ApplicationResult>, String) {
    let mut applier = Applier::new(repo_root.to_path_buf(), opts.clone());
    let results = records.iter().map(|r| applier.apply_record(r)).collect();
    (results, applier.patch())
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn render_patch(
    before: &BTreeMap<Utf8PathBuf, Original>,
    after: &BTreeMap<Utf8PathBuf, String>,
) -> String {
    let mut out = String::new();
    let formatter = PatchFormatter::new();

    for (path, new) in after {
        let original = before.get(path).cloned().unwrap_or(Original::Missing);
        if original.text() == Some(new.as_str()) {
            continue;
        }

        out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
        let old = match &original {
            Original::Text(old) => {
                out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));
                old.as_str()
            }
            Original::Missing => {
                out.push_str("new file mode 100644\n");
                out.push_str(&format!("--- /dev/null\n+++ b/{0}\n", path));
                ""
            }
            Original::Opaque(_) => {
                out.push_str(&format!("Binary files a/{0} and b/{0} differ\n", path));
                continue;
            }
        };

        let patch = diffy::create_patch(old, new);
        let body = formatter.fmt_patch(&patch).to_string();
        // diffy emits its own `---`/`+++` header; keep only the hunks.
        let hunks = body.find("@@").map_or("", |at| &body[at..]);
        out.push_str(hunks);
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }

    out
}
