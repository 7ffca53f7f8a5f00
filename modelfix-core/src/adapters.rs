//! Default filesystem- and HTTP-backed port implementations.

use crate::ports::{CompletionPort, TextSource, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use modelfix_llm::{ChatClient, ModelSettings};
use tracing::debug;

/// Reads the whole file as UTF-8.
#[derive(Debug, Clone)]
pub struct FsTextSource {
    pub path: Utf8PathBuf,
}

impl FsTextSource {
    pub fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }
}

impl TextSource for FsTextSource {
    fn describe(&self) -> String {
        self.path.to_string()
    }

    fn load(&self) -> anyhow::Result<String> {
        let text = fs::read_to_string(&self.path).with_context(|| format!("read {}", self.path))?;
        debug!(path = %self.path, bytes = text.len(), "loaded input");
        Ok(text)
    }
}

/// In-memory text for embedding and testing.
#[derive(Debug, Clone)]
pub struct InMemoryTextSource {
    name: String,
    text: String,
}

impl InMemoryTextSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl TextSource for InMemoryTextSource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn load(&self) -> anyhow::Result<String> {
        Ok(self.text.clone())
    }
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}

/// Blocking wrapper over [`ChatClient`].
///
/// Each call runs on its own current-thread runtime; the pipeline makes at
/// most one request per process.
#[derive(Debug, Clone)]
pub struct HttpCompletion {
    client: ChatClient,
}

impl HttpCompletion {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }

    /// Build a client whose bearer token comes from `settings.token_env`.
    pub fn from_settings(settings: ModelSettings) -> anyhow::Result<Self> {
        let client = ChatClient::from_env(settings)?;
        Ok(Self::new(client))
    }
}

impl CompletionPort for HttpCompletion {
    fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let settings = self.client.settings();
        debug!(
            model = %settings.model,
            timeout_secs = settings.timeout_secs,
            "starting model call"
        );
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("build async runtime")?;
        let reply = runtime.block_on(self.client.complete(prompt))?;
        Ok(reply)
    }
}
