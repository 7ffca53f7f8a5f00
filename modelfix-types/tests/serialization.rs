use modelfix_types::apply::{
    ApplicationResult, ApplySummary, ExtractionInfo, ExtractionStatus, FileChange, ModelfixApply,
    Outcome, ToolInfo,
};
use modelfix_types::{ChangeKind, FixRecord, LabelShape};
use pretty_assertions::assert_eq;

fn tool() -> ToolInfo {
    ToolInfo {
        name: "modelfix".to_string(),
        version: Some("0.1.0".to_string()),
        commit: None,
    }
}

fn extraction() -> ExtractionInfo {
    ExtractionInfo {
        status: ExtractionStatus::Found,
        strategy: Some("fix-label".to_string()),
        records: 1,
        commit_message: Some("Fix user model".to_string()),
        analysis: None,
    }
}

#[test]
fn apply_new_sets_schema_and_defaults() {
    let apply = ModelfixApply::new(tool(), "/repo", extraction());

    assert_eq!(apply.schema, modelfix_types::schema::MODELFIX_APPLY_V1);
    assert_eq!(apply.repo_root, "/repo");
    assert!(!apply.dry_run);
    assert!(apply.results.is_empty());
    assert_eq!(apply.summary, ApplySummary::default());
    assert!(apply.run.ended_at.is_none());
}

#[test]
fn apply_json_omits_empty_optionals() {
    let mut apply = ModelfixApply::new(tool(), ".", extraction());
    apply.results.push(ApplicationResult {
        target_path: "app/models/user.rb".to_string(),
        kind: ChangeKind::FullReplacement,
        shape: LabelShape::Heading,
        outcome: Outcome::Applied,
        message: None,
        file: Some(FileChange {
            path: "app/models/user.rb".to_string(),
            sha256_before: None,
            sha256_after: "ab".repeat(32),
        }),
    });

    let value = serde_json::to_value(&apply).unwrap();
    assert_eq!(value["schema"], "modelfix.apply.v1");
    assert_eq!(value["extraction"]["status"], "found");
    assert!(value["extraction"].get("analysis").is_none());
    assert!(value.get("language").is_none());

    let result = &value["results"][0];
    assert_eq!(result["outcome"], "applied");
    assert_eq!(result["kind"], "full_replacement");
    assert!(result.get("message").is_none());
    assert!(result["file"].get("sha256_before").is_none());
}

#[test]
fn apply_roundtrips_through_json() {
    let mut apply = ModelfixApply::new(tool(), ".", extraction());
    apply.language = Some("ruby".to_string());
    apply.summary.attempted = 2;
    apply.summary.parse_failed = 1;

    let json = serde_json::to_string_pretty(&apply).unwrap();
    let back: ModelfixApply = serde_json::from_str(&json).unwrap();

    assert_eq!(back.language.as_deref(), Some("ruby"));
    assert_eq!(back.summary, apply.summary);
    assert_eq!(back.run.run_id, apply.run.run_id);
}

#[test]
fn fix_record_serializes_all_fields() {
    let record = FixRecord::new(
        "lib/a.py",
        "import os",
        ChangeKind::BlockReplacement,
        LabelShape::Backtick,
    );
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["target_path"], "lib/a.py");
    assert_eq!(value["kind"], "block_replacement");
    assert_eq!(value["shape"], "backtick");
}
