#![no_main]

//! Fuzz target for applying one record in dry-run mode.
//!
//! Dry runs never touch disk, so arbitrary paths are safe to try; unsafe
//! ones must come back as `skipped_unsafe`.

use arbitrary::Arbitrary;
use camino::Utf8PathBuf;
use libfuzzer_sys::fuzz_target;
use modelfix_edit::{Applier, ApplyOptions};
use modelfix_types::apply::Outcome;
use modelfix_types::{ChangeKind, FixRecord, LabelShape};

#[derive(Debug, Arbitrary)]
struct Input {
    path: String,
    body: String,
    kind: u8,
}

fuzz_target!(|input: Input| {
    let Ok(temp) = tempfile::tempdir() else {
        return;
    };
    let Ok(root) = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()) else {
        return;
    };

    let kind = match input.kind % 5 {
        0 => ChangeKind::FullReplacement,
        1 => ChangeKind::DiffReplacement,
        2 => ChangeKind::Addition,
        3 => ChangeKind::Deletion,
        _ => ChangeKind::BlockReplacement,
    };
    let record = FixRecord::new(input.path.clone(), input.body, kind, LabelShape::Heading);

    let mut applier = Applier::new(
        root,
        ApplyOptions {
            dry_run: true,
            ..ApplyOptions::default()
        },
    );
    let result = applier.apply_record(&record);
    if input.path.contains("..") || input.path.trim_start().starts_with('/') {
        assert_eq!(result.outcome, Outcome::SkippedUnsafe);
    }
    let _ = applier.patch();
});
