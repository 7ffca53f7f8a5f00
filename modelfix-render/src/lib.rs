//! Rendering helpers for human-readable apply output.

use modelfix_types::apply::{
    ApplicationResult, ApplySummary, ExtractionStatus, ModelfixApply, Outcome,
};

/// One console line for a record.
pub fn render_result_line(r: &ApplicationResult) -> String {
    let mut line = format!("{} {}: {} [{}]", marker(r.outcome), r.outcome, r.target_path, r.kind);
    if let Some(msg) = &r.message {
        line.push_str(&format!(" - {}", msg));
    }
    line
}

/// Final console line: the applied count and every other outcome.
pub fn render_summary_line(s: &ApplySummary) -> String {
    format!(
        "Summary: {} applied, {} skipped_unsafe, {} not_found, {} parse_failed ({} attempted)",
        s.applied, s.skipped_unsafe, s.not_found, s.parse_failed, s.attempted
    )
}

pub fn render_apply_md(apply: &ModelfixApply) -> String {
    let mut out = String::new();
    out.push_str("# modelfix apply\n\n");
    if apply.dry_run {
        out.push_str("_Dry run: no files were written._\n\n");
    }
    out.push_str(&format!(
        "- Extraction: `{}`",
        apply.extraction.status.as_str()
    ));
    if let Some(strategy) = &apply.extraction.strategy {
        out.push_str(&format!(" via `{}`", strategy));
    }
    out.push('\n');
    if let Some(lang) = &apply.language {
        out.push_str(&format!("- Language: `{}`\n", lang));
    }
    out.push_str(&format!(
        "- Attempted: {}\n- Applied: {}\n- Skipped (unsafe): {}\n- Not found: {}\n- Parse failed: {}\n- Files modified: {}\n\n",
        apply.summary.attempted,
        apply.summary.applied,
        apply.summary.skipped_unsafe,
        apply.summary.not_found,
        apply.summary.parse_failed,
        apply.summary.files_modified
    ));

    if let Some(msg) = &apply.extraction.commit_message {
        out.push_str(&format!("**Commit message:** {}\n\n", msg));
    }
    if let Some(analysis) = &apply.extraction.analysis {
        out.push_str("## Analysis\n\n");
        out.push_str(analysis.trim());
        out.push_str("\n\n");
    }

    out.push_str("## Results\n\n");
    if apply.results.is_empty() {
        let note = match apply.extraction.status {
            ExtractionStatus::NoFixNeeded => "_No fix needed._\n",
            _ => "_No results._\n",
        };
        out.push_str(note);
        return out;
    }

    for (i, r) in apply.results.iter().enumerate() {
        out.push_str(&format!("### {}. {}\n\n", i + 1, r.target_path));
        out.push_str(&format!("- Outcome: `{}`\n", r.outcome));
        out.push_str(&format!("- Kind: `{}`\n", r.kind));
        out.push_str(&format!("- Label: `{}`\n", r.shape));
        if let Some(msg) = &r.message {
            out.push_str(&format!("- Message: {}\n", msg));
        }
        if let Some(fc) = &r.file {
            let before = fc.sha256_before.as_deref().unwrap_or("-");
            out.push_str(&format!(
                "- File: `{}` {} → {}\n",
                fc.path, before, fc.sha256_after
            ));
        }
        out.push('\n');
    }

    out
}

fn marker(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Applied => "✅",
        Outcome::SkippedUnsafe => "⛔",
        Outcome::NotFound => "⚠️",
        Outcome::ParseFailed => "❌",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelfix_types::apply::{ExtractionInfo, FileChange, ToolInfo};
    use modelfix_types::{ChangeKind, LabelShape};
    use pretty_assertions::assert_eq;

    fn result(outcome: Outcome, message: Option<&str>) -> ApplicationResult {
        ApplicationResult {
            target_path: "app/models/user.rb".to_string(),
            kind: ChangeKind::FullReplacement,
            shape: LabelShape::Heading,
            outcome,
            message: message.map(str::to_string),
            file: None,
        }
    }

    fn apply(status: ExtractionStatus) -> ModelfixApply {
        ModelfixApply::new(
            ToolInfo {
                name: "modelfix".to_string(),
                version: None,
                commit: None,
            },
            ".",
            ExtractionInfo {
                status,
                strategy: None,
                records: 0,
                commit_message: None,
                analysis: None,
            },
        )
    }

    #[test]
    fn result_line_includes_outcome_path_and_kind() {
        assert_eq!(
            render_result_line(&result(Outcome::Applied, None)),
            "✅ applied: app/models/user.rb [full_replacement]"
        );
        assert_eq!(
            render_result_line(&result(Outcome::ParseFailed, Some("before-text not found"))),
            "❌ parse_failed: app/models/user.rb [full_replacement] - before-text not found"
        );
    }

    #[test]
    fn summary_line_counts_every_outcome() {
        let summary = ApplySummary {
            attempted: 4,
            applied: 1,
            skipped_unsafe: 1,
            not_found: 1,
            parse_failed: 1,
            files_modified: 1,
        };
        assert_eq!(
            render_summary_line(&summary),
            "Summary: 1 applied, 1 skipped_unsafe, 1 not_found, 1 parse_failed (4 attempted)"
        );
    }

    #[test]
    fn no_op_markdown_says_no_fix_needed() {
        let md = render_apply_md(&apply(ExtractionStatus::NoFixNeeded));
        assert!(md.starts_with("# modelfix apply\n\n"));
        assert!(md.contains("- Extraction: `no_fix_needed`\n"));
        assert!(md.ends_with("_No fix needed._\n"));
    }

    #[test]
    fn markdown_lists_results_with_digests() {
        let mut apply = apply(ExtractionStatus::Found);
        apply.dry_run = true;
        apply.extraction.strategy = Some("fix-label".to_string());
        apply.extraction.commit_message = Some("Fix model".to_string());
        let mut r = result(Outcome::Applied, None);
        r.file = Some(FileChange {
            path: "app/models/user.rb".to_string(),
            sha256_before: None,
            sha256_after: "abc".to_string(),
        });
        apply.results.push(r);

        let md = render_apply_md(&apply);
        assert!(md.contains("_Dry run: no files were written._"));
        assert!(md.contains("via `fix-label`"));
        assert!(md.contains("**Commit message:** Fix model"));
        assert!(md.contains("### 1. app/models/user.rb\n"));
        assert!(md.contains("- File: `app/models/user.rb` - → abc\n"));
    }
}
