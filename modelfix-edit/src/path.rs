use crate::error::UnsafePathError;
use camino::Utf8PathBuf;

/// Validate a model-supplied target path and make it repo-relative.
///
/// Refuses leading `/` or `\`, drive prefixes such as `C:` and any `..`.
/// A leading `./` is stripped only after the checks pass.
pub fn validate_target(raw: &str) -> Result<Utf8PathBuf, UnsafePathError> {
    let path = raw.trim();
    if path.is_empty() {
        return Err(UnsafePathError::Empty);
    }
    if path.starts_with('/') || path.starts_with('\\') {
        return Err(UnsafePathError::Absolute(path.to_string()));
    }
    if has_drive_prefix(path) {
        return Err(UnsafePathError::DrivePrefix(path.to_string()));
    }
    if path.contains("..") {
        return Err(UnsafePathError::Traversal(path.to_string()));
    }

    let mut rel = path;
    while let Some(rest) = rel.strip_prefix("./") {
        rel = rest;
    }
    if rel.is_empty() {
        return Err(UnsafePathError::Empty);
    }
    Ok(Utf8PathBuf::from(rel))
}

fn has_drive_prefix(path: &str) -> bool {
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic()
    )
}
