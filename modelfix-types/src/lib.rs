//! Shared DTOs (schemas-as-code) for the modelfix workspace.
//!
//! # Design constraints
//! - Apply artifacts are serialized to disk and read by CI tooling.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod apply;
pub mod fix;
pub mod language;

/// Schema identifiers.
pub mod schema {
    pub const MODELFIX_APPLY_V1: &str = "modelfix.apply.v1";
}

pub use fix::{ChangeKind, FixRecord, LabelShape};
pub use language::LanguageFamily;
