//! Port traits abstracting all I/O away from the pipeline.

use camino::Utf8Path;

/// Source of one text input (a model reply or a prompt).
pub trait TextSource {
    /// Short human-readable name for logs, e.g. the file path.
    fn describe(&self) -> String;
    fn load(&self) -> anyhow::Result<String>;
}

/// File-system write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}

/// A single chat-completion call.
pub trait CompletionPort {
    fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}
