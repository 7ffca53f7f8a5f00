//! Matcher strategies for fix announcements.
//!
//! A strategy is a set of label patterns tried together; the extractor walks
//! an ordered chain of strategies and stops at the first one that matches.

use modelfix_types::LabelShape;
use regex::Regex;
use std::sync::OnceLock;

/// Fence opening line (with optional info string) and the lazily matched body.
const FENCE: &str = r"\n\s*```[^\n]*\n(?s:(.*?))```";

/// One label shape and the regex that recognises it.
///
/// The regex must capture the path in group 1 and the fenced body in group 2.
#[derive(Debug, Clone)]
pub struct LabelPattern {
    shape: LabelShape,
    regex: Regex,
}

impl LabelPattern {
    pub fn new(shape: LabelShape, regex: Regex) -> Self {
        Self { shape, regex }
    }

    pub fn shape(&self) -> LabelShape {
        self.shape
    }
}

/// A fix block located in the text, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawMatch {
    pub start: usize,
    pub end: usize,
    pub shape: LabelShape,
    pub path: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct Strategy {
    name: &'static str,
    patterns: Vec<LabelPattern>,
    min_body_chars: usize,
}

impl Strategy {
    pub fn new(name: &'static str, patterns: Vec<LabelPattern>) -> Self {
        Self {
            name,
            patterns,
            min_body_chars: 0,
        }
    }

    /// Drop matches whose trimmed body has fewer characters than `n`.
    pub fn with_min_body_chars(mut self, n: usize) -> Self {
        self.min_body_chars = n;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All non-overlapping matches of every pattern, in text order.
    pub(crate) fn find(&self, text: &str) -> Vec<RawMatch> {
        let mut found = Vec::new();
        for pattern in &self.patterns {
            for caps in pattern.regex.captures_iter(text) {
                let (Some(whole), Some(path), Some(body)) = (caps.get(0), caps.get(1), caps.get(2))
                else {
                    continue;
                };
                let path = clean_path(path.as_str());
                let body = body.as_str().trim();
                if path.is_empty() || body.chars().count() < self.min_body_chars {
                    continue;
                }
                found.push(RawMatch {
                    start: whole.start(),
                    end: whole.end(),
                    shape: pattern.shape(),
                    path: path.to_string(),
                    body: body.to_string(),
                });
            }
        }

        found.sort_by_key(|m| m.start);

        let mut kept: Vec<RawMatch> = Vec::with_capacity(found.len());
        for m in found {
            if kept.last().is_some_and(|prev| m.start < prev.end) {
                continue;
            }
            kept.push(m);
        }
        kept
    }
}

/// Trim the label text and any markdown emphasis or quoting around the path.
fn clean_path(raw: &str) -> &str {
    raw.trim()
        .trim_matches(|c: char| matches!(c, '`' | '*' | '"' | '\''))
        .trim()
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in fix pattern compiles")
}

/// Heading and flat labels, both of which announce a complete file.
pub(crate) fn fix_label() -> &'static Strategy {
    static S: OnceLock<Strategy> = OnceLock::new();
    S.get_or_init(|| {
        Strategy::new(
            "fix-label",
            vec![
                LabelPattern::new(
                    LabelShape::Heading,
                    compile(&format!(r"(?m)^[ \t]*#{{1,6}}[ \t]*FIX:[ \t]*([^\n]+){FENCE}")),
                ),
                LabelPattern::new(
                    LabelShape::Flat,
                    compile(&format!(r"(?m)^[ \t]*FIX_FILE:[ \t]*([^\n]+){FENCE}")),
                ),
            ],
        )
    })
}

/// ``Update `path/file.ext`:`` followed by a fence.
pub(crate) fn backtick_mention() -> &'static Strategy {
    static S: OnceLock<Strategy> = OnceLock::new();
    S.get_or_init(|| {
        Strategy::new(
            "backtick-mention",
            vec![LabelPattern::new(
                LabelShape::Backtick,
                compile(&format!(
                    r"(?m)^[^\n`]*`([^`\n]+\.[A-Za-z0-9]+)`[^\n]*{FENCE}"
                )),
            )],
        )
        .with_min_body_chars(5)
    })
}

/// `[path/file.ext]` on its own line followed by a fence.
pub(crate) fn bracket_mention() -> &'static Strategy {
    static S: OnceLock<Strategy> = OnceLock::new();
    S.get_or_init(|| {
        Strategy::new(
            "bracket-mention",
            vec![LabelPattern::new(
                LabelShape::Bracket,
                compile(&format!(
                    r"(?m)^[ \t]*\[([^\]\n]+\.[A-Za-z0-9]+)\][ \t]*{FENCE}"
                )),
            )],
        )
        .with_min_body_chars(5)
    })
}
