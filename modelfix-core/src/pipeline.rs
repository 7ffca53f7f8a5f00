//! Core apply and ask pipelines, extracted from the CLI.
//!
//! These entry points are I/O-agnostic: inputs, artifact writes and the model
//! call all go through the port traits. Target files are edited by the
//! applier against `repo_root`.

use crate::ports::{CompletionPort, TextSource, WritePort};
use crate::settings::{ApplySettings, AskSettings};
use anyhow::Context;
use camino::Utf8Path;
use chrono::Utc;
use modelfix_edit::{Applier, ApplyOptions};
use modelfix_extract::Extractor;
use modelfix_render::render_apply_md;
use modelfix_types::apply::{ExtractionStatus, ModelfixApply, ToolInfo};
use modelfix_types::{FixRecord, LanguageFamily};
use tracing::{info, warn};

/// Error type for pipeline results. Every variant exits 1.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// A required input could not be read.
    #[error("missing input: {0:#}")]
    MissingInput(anyhow::Error),
    #[error("{0:#}")]
    Internal(anyhow::Error),
}

// Not `#[from]`: the chain is already in the message, so no `source()`.
impl From<anyhow::Error> for ToolError {
    fn from(e: anyhow::Error) -> Self {
        ToolError::Internal(e)
    }
}

impl ToolError {
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// How an apply run ended, as far as the exit status is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every record was applied.
    Applied,
    NoFixNeeded,
    /// No recognisable fix block. A warning, still success.
    NothingFound,
    /// At least one record was skipped or failed.
    Failed,
}

impl Verdict {
    pub fn from_apply(apply: &ModelfixApply) -> Self {
        match apply.extraction.status {
            ExtractionStatus::NoFixNeeded => Verdict::NoFixNeeded,
            ExtractionStatus::Empty => Verdict::NothingFound,
            ExtractionStatus::Found if apply.results.iter().all(|r| r.outcome.is_applied()) => {
                Verdict::Applied
            }
            ExtractionStatus::Found => Verdict::Failed,
        }
    }

    pub fn exit_code(self) -> u8 {
        match self {
            Verdict::Applied | Verdict::NoFixNeeded | Verdict::NothingFound => 0,
            Verdict::Failed => 1,
        }
    }
}

/// Outcome of `run_apply`.
#[derive(Debug)]
pub struct ApplyOutcome {
    pub apply: ModelfixApply,
    pub patch: String,
    pub verdict: Verdict,
}

/// Run the extract/apply pipeline over one model reply.
///
/// Only an unreadable reply is an error; every per-record failure is
/// recorded in the returned apply and reflected in the verdict.
pub fn run_apply(
    settings: &ApplySettings,
    source: &dyn TextSource,
    tool: ToolInfo,
) -> Result<ApplyOutcome, ToolError> {
    let text = source.load().map_err(ToolError::MissingInput)?;
    info!(source = %source.describe(), bytes = text.len(), "loaded model reply");

    let extraction = Extractor::new(settings.extract.clone()).extract(&text);
    match extraction.status {
        ExtractionStatus::NoFixNeeded => info!("no fix needed"),
        ExtractionStatus::Empty => warn!("no fix blocks found in the reply"),
        ExtractionStatus::Found => info!(
            records = extraction.records.len(),
            strategy = extraction.strategy.unwrap_or("-"),
            "found fix blocks"
        ),
    }
    if let Some(msg) = &extraction.commit_message {
        info!(commit_message = %msg, "reply carries a commit message");
    }

    let language = resolve_language(settings.language, &extraction.records);

    let mut apply = ModelfixApply::new(tool, settings.repo_root.to_string(), extraction.info());
    apply.dry_run = settings.dry_run;
    apply.language = (!language.is_unknown()).then(|| language.id().to_string());

    let mut applier = Applier::new(
        settings.repo_root.clone(),
        ApplyOptions {
            dry_run: settings.dry_run,
            language,
        },
    );
    for record in &extraction.records {
        let result = applier.apply_record(record);
        apply.summary.record(&result);
        apply.results.push(result);
    }
    apply.summary.files_modified = applier.files_modified();
    apply.run.ended_at = Some(Utc::now());

    let verdict = Verdict::from_apply(&apply);
    Ok(ApplyOutcome {
        apply,
        patch: applier.patch(),
        verdict,
    })
}

/// Explicit language wins; otherwise the first target path with a known extension.
fn resolve_language(explicit: LanguageFamily, records: &[FixRecord]) -> LanguageFamily {
    if !explicit.is_unknown() {
        return explicit;
    }
    records
        .iter()
        .map(|r| LanguageFamily::from_path(r.target_path()))
        .find(|f| !f.is_unknown())
        .unwrap_or(LanguageFamily::Unknown)
}

/// Write all apply artifacts to the output directory.
pub fn write_apply_artifacts(
    outcome: &ApplyOutcome,
    out_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let apply_json = serde_json::to_string_pretty(&outcome.apply).context("serialize apply")?;
    writer.write_file(&out_dir.join("apply.json"), apply_json.as_bytes())?;

    let apply_md = render_apply_md(&outcome.apply);
    writer.write_file(&out_dir.join("apply.md"), apply_md.as_bytes())?;

    writer.write_file(&out_dir.join("patch.diff"), outcome.patch.as_bytes())?;

    Ok(())
}

/// Send the prompt to the model and return its reply.
///
/// When `settings.output` is set the reply is also written there.
pub fn run_ask(
    settings: &AskSettings,
    prompt: &dyn TextSource,
    completion: &dyn CompletionPort,
    writer: &dyn WritePort,
) -> Result<String, ToolError> {
    let text = prompt.load().map_err(ToolError::MissingInput)?;
    if text.trim().is_empty() {
        return Err(anyhow::anyhow!("empty prompt in {}", prompt.describe()).into());
    }

    info!(
        source = %prompt.describe(),
        model = %settings.model.model,
        endpoint = %settings.model.endpoint,
        "asking model"
    );
    let reply = completion.complete(&text).context("model call failed")?;

    if let Some(path) = &settings.output {
        writer.write_file(path, reply.as_bytes())?;
        info!(path = %path, "saved reply");
    }
    Ok(reply)
}
