//! Fix-block extraction.
//!
//! Model replies are free text. Extraction is tolerant: it recognises a small
//! set of label shapes followed by a fenced code block, ignores everything
//! else, and never fails. An empty result is reported as a status, not an
//! error, so callers can tell "nothing to do" from "no-op requested".

mod classify;
mod extract;
mod strategy;

pub use classify::{DiffSections, classify, split_diff};
pub use extract::{DEFAULT_NO_FIX_MARKER, ExtractOptions, Extraction, Extractor};
pub use strategy::{LabelPattern, Strategy};
