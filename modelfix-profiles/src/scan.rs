use crate::LanguageProfile;
use regex::Regex;
use serde::Serialize;

/// One build-log line recognised by a profile's error pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogMatch {
    pub pattern: &'static str,
    /// 1-based.
    pub line_number: usize,
    pub line: String,
    /// Capture groups of the pattern, in order; unmatched groups are omitted.
    pub captures: Vec<String>,
}

/// Report every line of `log` that matches one of the profile's error patterns.
///
/// A line matching several patterns yields one match per pattern.
pub fn scan_log(profile: &LanguageProfile, log: &str) -> Result<Vec<LogMatch>, regex::Error> {
    let compiled = profile
        .error_patterns
        .iter()
        .map(|p| Regex::new(p.pattern).map(|re| (p.name, re)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut found = Vec::new();
    for (idx, line) in log.lines().enumerate() {
        for (name, re) in &compiled {
            let Some(caps) = re.captures(line) else {
                continue;
            };
            found.push(LogMatch {
                pattern: *name,
                line_number: idx + 1,
                line: line.trim_end().to_string(),
                captures: caps
                    .iter()
                    .skip(1)
                    .flatten()
                    .map(|m| m.as_str().to_string())
                    .collect(),
            });
        }
    }
    Ok(found)
}
