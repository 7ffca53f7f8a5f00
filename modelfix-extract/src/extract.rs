use crate::classify::classify;
use crate::strategy::{self, Strategy};
use modelfix_types::apply::{ExtractionInfo, ExtractionStatus};
use modelfix_types::{ChangeKind, FixRecord, LabelShape};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{debug, info};

/// Literal token a model emits when the build needs no change.
pub const DEFAULT_NO_FIX_MARKER: &str = "NO_FIX_NEEDED";

const PREVIEW_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Token that suppresses all extraction when present anywhere in the text.
    pub no_fix_marker: String,

    /// Treat heading/flat labelled blocks as complete files regardless of body shape.
    pub labels_imply_full_file: bool,

    /// Try the mention-style shapes when no labelled block is found.
    pub fallback: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            no_fix_marker: DEFAULT_NO_FIX_MARKER.to_string(),
            labels_imply_full_file: true,
            fallback: true,
        }
    }
}

/// Result of scanning one model reply.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub status: ExtractionStatus,
    /// Strategy that produced `records`, if any did.
    pub strategy: Option<&'static str>,
    pub records: Vec<FixRecord>,
    pub commit_message: Option<String>,
    pub analysis: Option<String>,
}

impl Extraction {
    fn no_fix_needed() -> Self {
        Self {
            status: ExtractionStatus::NoFixNeeded,
            strategy: None,
            records: vec![],
            commit_message: None,
            analysis: None,
        }
    }

    pub fn is_no_op(&self) -> bool {
        self.status == ExtractionStatus::NoFixNeeded
    }

    pub fn info(&self) -> ExtractionInfo {
        ExtractionInfo {
            status: self.status,
            strategy: self.strategy.map(str::to_string),
            records: self.records.len() as u64,
            commit_message: self.commit_message.clone(),
            analysis: self.analysis.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Extractor {
    options: ExtractOptions,
    chain: Vec<Strategy>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}

impl Extractor {
    /// Built-in chain: labelled blocks first, then the mention fallbacks.
    pub fn new(options: ExtractOptions) -> Self {
        let mut chain = vec![strategy::fix_label().clone()];
        if options.fallback {
            chain.push(strategy::backtick_mention().clone());
            chain.push(strategy::bracket_mention().clone());
        }
        Self { options, chain }
    }

    /// Use a caller-supplied chain; strategies are tried in order.
    pub fn with_chain(options: ExtractOptions, chain: Vec<Strategy>) -> Self {
        Self { options, chain }
    }

    pub fn extract(&self, text: &str) -> Extraction {
        let marker = self.options.no_fix_marker.as_str();
        if !marker.is_empty() && text.contains(marker) {
            info!(marker, "reply says no fix is needed");
            return Extraction::no_fix_needed();
        }

        let preview: String = text.chars().take(PREVIEW_CHARS).collect();
        debug!(len = text.len(), %preview, "scanning model reply");

        let commit_message = capture_trimmed(commit_message_re(), text);
        let analysis = capture_trimmed(analysis_re(), text);

        for strategy in &self.chain {
            let found = strategy.find(text);
            if found.is_empty() {
                debug!(strategy = strategy.name(), "no matches");
                continue;
            }

            let records: Vec<FixRecord> = found
                .into_iter()
                .map(|m| {
                    let kind = self.kind_for(m.shape, &m.body);
                    info!(path = %m.path, %kind, shape = %m.shape, "parsed fix");
                    FixRecord::new(m.path, m.body, kind, m.shape)
                })
                .collect();

            return Extraction {
                status: ExtractionStatus::Found,
                strategy: Some(strategy.name()),
                records,
                commit_message,
                analysis,
            };
        }

        Extraction {
            status: ExtractionStatus::Empty,
            strategy: None,
            records: vec![],
            commit_message,
            analysis,
        }
    }

    fn kind_for(&self, shape: LabelShape, body: &str) -> ChangeKind {
        if self.options.labels_imply_full_file && shape.implies_full_file() {
            ChangeKind::FullReplacement
        } else {
            classify(body)
        }
    }
}

fn capture_trimmed(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn commit_message_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"COMMIT_MESSAGE:[ \t]*([^\n]+)").expect("commit regex compiles"))
}

fn analysis_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)###\s*ANALYSIS:\s*(.+?)(?:###|\z)").expect("analysis regex compiles")
    })
}
