#![no_main]

//! Fuzz target for reply extraction.
//!
//! Arbitrary text must never panic the extractor, and every record it
//! returns must carry a non-empty path.

use libfuzzer_sys::fuzz_target;
use modelfix_extract::{ExtractOptions, Extractor};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let extraction = Extractor::new(ExtractOptions::default()).extract(s);
    for record in &extraction.records {
        assert!(!record.target_path().is_empty());
    }
    let _ = extraction.info();

    let strict = Extractor::new(ExtractOptions {
        fallback: false,
        labels_imply_full_file: false,
        ..ExtractOptions::default()
    });
    let _ = strict.extract(s);
});
