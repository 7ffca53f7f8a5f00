#![no_main]

use libfuzzer_sys::fuzz_target;
use modelfix_extract::{classify, split_diff};
use modelfix_types::ChangeKind;

fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };

    // A body classified as a diff always splits.
    let kind = classify(body);
    let sections = split_diff(body);
    if kind == ChangeKind::DiffReplacement {
        assert!(sections.is_some());
    }
});
