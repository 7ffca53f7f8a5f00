//! Body-shape classification.

use modelfix_types::ChangeKind;

/// Lines that split a body into before/after sections.
const SEPARATORS: &[&str] = &["---", "!!!"];

/// Literal before/after sections of a diff-style body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSections {
    pub before: String,
    pub after: String,
}

fn is_separator(line: &str) -> bool {
    SEPARATORS.contains(&line.trim())
}

/// Decide the change kind from the body text alone.
pub fn classify(body: &str) -> ChangeKind {
    if body.lines().any(is_separator) {
        return ChangeKind::DiffReplacement;
    }

    let first = body.lines().map(str::trim_start).find(|l| !l.is_empty());
    match first {
        Some(line) if line.starts_with('-') => ChangeKind::Deletion,
        Some(line) if line.starts_with('+') => ChangeKind::Addition,
        _ => ChangeKind::BlockReplacement,
    }
}

/// Split a diff-style body at its first separator line.
///
/// `after` stops at the next separator line, if any. Both sections are
/// trimmed. Returns `None` when the body has no separator.
pub fn split_diff(body: &str) -> Option<DiffSections> {
    let lines: Vec<&str> = body.lines().collect();
    let sep = lines.iter().position(|l| is_separator(l))?;
    let rest = &lines[sep + 1..];
    let end = rest
        .iter()
        .position(|l| is_separator(l))
        .unwrap_or(rest.len());

    Some(DiffSections {
        before: lines[..sep].join("\n").trim().to_string(),
        after: rest[..end].join("\n").trim().to_string(),
    })
}
