//! End-to-end pipeline runs against temp repositories.

use camino::{Utf8Path, Utf8PathBuf};
use modelfix_core::adapters::{FsWritePort, InMemoryTextSource};
use modelfix_core::pipeline::{ToolError, Verdict, run_apply, run_ask, write_apply_artifacts};
use modelfix_core::ports::{CompletionPort, TextSource};
use modelfix_core::settings::{ApplySettings, AskSettings};
use modelfix_types::LanguageFamily;
use modelfix_types::apply::{ExtractionStatus, Outcome, ToolInfo};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::fs;
use tempfile::TempDir;

fn repo() -> (TempDir, Utf8PathBuf) {
    let temp = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8 path");
    (temp, root)
}

fn tool() -> ToolInfo {
    ToolInfo {
        name: "modelfix".into(),
        version: Some("0.1.0".into()),
        commit: None,
    }
}

fn settings(root: &Utf8Path) -> ApplySettings {
    ApplySettings {
        repo_root: root.to_path_buf(),
        ..ApplySettings::default()
    }
}

fn reply(text: &str) -> InMemoryTextSource {
    InMemoryTextSource::new("reply.md", text)
}

#[test]
fn full_file_fix_is_applied_and_reported() {
    let (_temp, root) = repo();
    fs::write(root.join("Gemfile"), "gem 'rails', '6.1'\n").unwrap();

    let text = "### FIX: Gemfile\n```ruby\ngem 'rails', '7.1'\n```\nCOMMIT_MESSAGE: Bump rails\n";
    let outcome = run_apply(&settings(&root), &reply(text), tool()).unwrap();

    assert_eq!(outcome.verdict, Verdict::Applied);
    assert_eq!(outcome.apply.summary.applied, 1);
    assert_eq!(outcome.apply.summary.files_modified, 1);
    assert_eq!(outcome.apply.language.as_deref(), None);
    assert_eq!(
        outcome.apply.extraction.commit_message.as_deref(),
        Some("Bump rails")
    );
    assert!(outcome.apply.run.ended_at.is_some());
    assert_eq!(
        fs::read_to_string(root.join("Gemfile")).unwrap(),
        "gem 'rails', '7.1'\n"
    );
    assert!(outcome.patch.contains("-gem 'rails', '6.1'"));
    assert!(outcome.patch.contains("+gem 'rails', '7.1'"));
}

#[test]
fn no_fix_marker_touches_nothing() {
    let (_temp, root) = repo();
    fs::write(root.join("a.py"), "x = 1\n").unwrap();

    let text = "The build looks fine. NO_FIX_NEEDED\n### FIX: a.py\n```\nx = 2\n```\n";
    let outcome = run_apply(&settings(&root), &reply(text), tool()).unwrap();

    assert_eq!(outcome.verdict, Verdict::NoFixNeeded);
    assert_eq!(outcome.verdict.exit_code(), 0);
    assert!(outcome.apply.results.is_empty());
    assert_eq!(fs::read_to_string(root.join("a.py")).unwrap(), "x = 1\n");
    assert_eq!(outcome.patch, "");
}

#[test]
fn prose_only_reply_is_nothing_found() {
    let (_temp, root) = repo();
    let outcome = run_apply(
        &settings(&root),
        &reply("I could not determine the cause of the failure."),
        tool(),
    )
    .unwrap();

    assert_eq!(outcome.apply.extraction.status, ExtractionStatus::Empty);
    assert_eq!(outcome.verdict, Verdict::NothingFound);
    assert_eq!(outcome.verdict.exit_code(), 0);
}

#[test]
fn unsafe_path_fails_the_run_but_later_records_apply() {
    let (_temp, root) = repo();
    let text = concat!(
        "### FIX: ../outside.rb\n```ruby\nputs 'escape'\n```\n",
        "### FIX: lib/inside.rb\n```ruby\nputs 'inside'\n```\n",
    );
    let outcome = run_apply(&settings(&root), &reply(text), tool()).unwrap();

    let outcomes: Vec<_> = outcome.apply.results.iter().map(|r| r.outcome).collect();
    assert_eq!(outcomes, vec![Outcome::SkippedUnsafe, Outcome::Applied]);
    assert_eq!(outcome.verdict, Verdict::Failed);
    assert_eq!(outcome.verdict.exit_code(), 1);
    assert!(root.join("lib/inside.rb").exists());
    assert_eq!(outcome.apply.language.as_deref(), Some("ruby"));
}

#[test]
fn diff_fix_from_backtick_mention() {
    let (_temp, root) = repo();
    fs::write(
        root.join("settings.py"),
        "DEBUG = True\nALLOWED_HOSTS = []\n",
    )
    .unwrap();

    let text = "Update `settings.py`:\n```python\nDEBUG = True\n---\nDEBUG = False\n```\n";
    let outcome = run_apply(&settings(&root), &reply(text), tool()).unwrap();

    assert_eq!(outcome.verdict, Verdict::Applied);
    assert_eq!(
        outcome.apply.extraction.strategy.as_deref(),
        Some("backtick-mention")
    );
    assert_eq!(
        fs::read_to_string(root.join("settings.py")).unwrap(),
        "DEBUG = False\nALLOWED_HOSTS = []\n"
    );
}

#[test]
fn dry_run_leaves_disk_alone_but_produces_patch() {
    let (_temp, root) = repo();
    fs::write(root.join("index.js"), "module.exports = 1;\n").unwrap();

    let mut settings = settings(&root);
    settings.dry_run = true;
    settings.language = LanguageFamily::JavaScript;

    let text = "### FIX: index.js\n```js\nmodule.exports = 2;\n```\n";
    let outcome = run_apply(&settings, &reply(text), tool()).unwrap();

    assert!(outcome.apply.dry_run);
    assert_eq!(outcome.apply.language.as_deref(), Some("javascript"));
    assert_eq!(outcome.apply.summary.applied, 1);
    assert_eq!(
        fs::read_to_string(root.join("index.js")).unwrap(),
        "module.exports = 1;\n"
    );
    assert!(outcome.patch.contains("+module.exports = 2;"));
}

#[test]
fn artifacts_are_written_to_out_dir() {
    let (_temp, root) = repo();
    let text = "FIX_FILE: README.md\n```\nhello\n```\n";
    let outcome = run_apply(&settings(&root), &reply(text), tool()).unwrap();

    let out_dir = root.join("artifacts/modelfix");
    write_apply_artifacts(&outcome, &out_dir, &FsWritePort).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("apply.json")).unwrap()).unwrap();
    assert_eq!(json["schema"], "modelfix.apply.v1");
    assert_eq!(json["summary"]["applied"], 1);
    assert!(
        fs::read_to_string(out_dir.join("apply.md"))
            .unwrap()
            .starts_with("# modelfix apply")
    );
    assert!(out_dir.join("patch.diff").exists());
}

struct FailingSource;

impl TextSource for FailingSource {
    fn describe(&self) -> String {
        "missing.md".into()
    }

    fn load(&self) -> anyhow::Result<String> {
        anyhow::bail!("read missing.md: No such file or directory")
    }
}

#[test]
fn unreadable_reply_is_missing_input() {
    let (_temp, root) = repo();
    let err = run_apply(&settings(&root), &FailingSource, tool()).unwrap_err();
    assert!(matches!(err, ToolError::MissingInput(_)));
    assert_eq!(err.exit_code(), 1);
}

struct FakeModel {
    reply: Result<String, String>,
    seen: RefCell<Vec<String>>,
}

impl FakeModel {
    fn answering(reply: &str) -> Self {
        Self {
            reply: Ok(reply.into()),
            seen: RefCell::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.into()),
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl CompletionPort for FakeModel {
    fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        self.seen.borrow_mut().push(prompt.to_string());
        self.reply.clone().map_err(anyhow::Error::msg)
    }
}

#[test]
fn ask_returns_reply_and_saves_it() {
    let (_temp, root) = repo();
    let output = root.join("out/reply.md");
    let settings = AskSettings {
        output: Some(output.clone()),
        ..AskSettings::default()
    };
    let model = FakeModel::answering("NO_FIX_NEEDED");

    let reply = run_ask(
        &settings,
        &InMemoryTextSource::new("prompt.txt", "Why does the build fail?"),
        &model,
        &FsWritePort,
    )
    .unwrap();

    assert_eq!(reply, "NO_FIX_NEEDED");
    assert_eq!(*model.seen.borrow(), vec!["Why does the build fail?"]);
    assert_eq!(fs::read_to_string(output).unwrap(), "NO_FIX_NEEDED");
}

#[test]
fn ask_surfaces_model_errors() {
    let model = FakeModel::failing("HTTP 401 - Bad credentials");
    let err = run_ask(
        &AskSettings::default(),
        &InMemoryTextSource::new("prompt.txt", "hello"),
        &model,
        &FsWritePort,
    )
    .unwrap_err();

    assert!(matches!(err, ToolError::Internal(_)));
    assert!(err.to_string().contains("HTTP 401 - Bad credentials"));
}

#[test]
fn ask_rejects_blank_prompt_without_calling_model() {
    let model = FakeModel::failing("unreachable");
    let err = run_ask(
        &AskSettings::default(),
        &InMemoryTextSource::new("prompt.txt", "  \n"),
        &model,
        &FsWritePort,
    )
    .unwrap_err();

    assert!(err.to_string().contains("empty prompt"));
    assert!(model.seen.borrow().is_empty());
}
