use cucumber::gherkin::Step;
use cucumber::{World, given, then, when};
use modelfix_bdd::ScratchRepo;
use modelfix_core::adapters::InMemoryTextSource;
use modelfix_core::pipeline::{ApplyOutcome, run_apply};
use modelfix_core::reporter::Reporter;
use modelfix_core::settings::ApplySettings;
use modelfix_types::apply::{Outcome, ToolInfo};
use modelfix_types::ChangeKind;

#[derive(Debug, Default, World)]
pub struct ModelfixWorld {
    repo: Option<ScratchRepo>,
    reply: Option<String>,
    outcome: Option<ApplyOutcome>,
    report: Option<String>,
}

fn repo(world: &ModelfixWorld) -> &ScratchRepo {
    world.repo.as_ref().expect("repo set")
}

fn outcome(world: &ModelfixWorld) -> &ApplyOutcome {
    world.outcome.as_ref().expect("apply ran")
}

/// Step arguments spell newlines as `\n`.
fn unescape(s: &str) -> String {
    s.replace("\\n", "\n")
}

fn parse_outcome(s: &str) -> Outcome {
    match s {
        "applied" => Outcome::Applied,
        "skipped_unsafe" => Outcome::SkippedUnsafe,
        "not_found" => Outcome::NotFound,
        "parse_failed" => Outcome::ParseFailed,
        other => panic!("unknown outcome {other}"),
    }
}

fn apply_reply(world: &mut ModelfixWorld) {
    let text = world.reply.clone().expect("reply set");
    let settings = ApplySettings {
        repo_root: repo(world).root().to_path_buf(),
        ..ApplySettings::default()
    };
    let tool = ToolInfo {
        name: "modelfix".into(),
        version: None,
        commit: None,
    };
    let outcome = run_apply(&settings, &InMemoryTextSource::new("reply", text), tool)
        .expect("apply pipeline");

    let mut reporter = Reporter::new(Vec::new());
    reporter.report(&outcome.apply).expect("report");
    world.report = Some(String::from_utf8(reporter.into_inner()).expect("utf8 report"));
    world.outcome = Some(outcome);
}

#[given("an empty repository")]
async fn empty_repo(world: &mut ModelfixWorld) {
    world.repo = Some(ScratchRepo::new().expect("scratch repo"));
}

#[given(expr = "a repository with file {string} containing {string}")]
async fn repo_with_file(world: &mut ModelfixWorld, path: String, contents: String) {
    let repo = ScratchRepo::new().expect("scratch repo");
    repo.write(&path, &unescape(&contents)).expect("write fixture");
    world.repo = Some(repo);
}

#[when("the model replies:")]
async fn model_replies(world: &mut ModelfixWorld, step: &Step) {
    let text = step.docstring.clone().expect("reply docstring");
    world.reply = Some(text.trim_start_matches('\n').to_string());
    apply_reply(world);
}

#[when("the same reply is applied again")]
async fn apply_again(world: &mut ModelfixWorld) {
    apply_reply(world);
}

#[then(expr = "{int} record(s) is/are extracted")]
async fn records_extracted(world: &mut ModelfixWorld, n: usize) {
    assert_eq!(outcome(world).apply.extraction.records, n as u64);
    assert_eq!(outcome(world).apply.results.len(), n);
}

#[then(expr = "record {int} targets {string} as {word}")]
async fn record_targets(world: &mut ModelfixWorld, idx: usize, path: String, kind: String) {
    let result = &outcome(world).apply.results[idx - 1];
    assert_eq!(result.target_path, path);
    let expected = match kind.as_str() {
        "full_replacement" => ChangeKind::FullReplacement,
        "diff_replacement" => ChangeKind::DiffReplacement,
        other => panic!("unexpected kind {other}"),
    };
    assert_eq!(result.kind, expected);
}

#[then(expr = "record {int} has outcome {word}")]
async fn record_outcome(world: &mut ModelfixWorld, idx: usize, expected: String) {
    let result = &outcome(world).apply.results[idx - 1];
    assert_eq!(result.outcome, parse_outcome(&expected), "{result:?}");
}

#[then(expr = "the file {string} contains exactly {string}")]
async fn file_contains(world: &mut ModelfixWorld, path: String, contents: String) {
    let actual = repo(world).read(&path).expect("read file");
    assert_eq!(actual.as_deref(), Some(unescape(&contents).as_str()));
}

#[then(expr = "the report says {string}")]
async fn report_says(world: &mut ModelfixWorld, text: String) {
    let report = world.report.as_deref().expect("report");
    assert!(report.contains(&text), "report was:\n{report}");
}

#[then(expr = "the run exits with code {int}")]
async fn exits_with(world: &mut ModelfixWorld, code: u8) {
    assert_eq!(outcome(world).verdict.exit_code(), code);
}

#[then("the last patch is empty")]
async fn patch_empty(world: &mut ModelfixWorld) {
    assert_eq!(outcome(world).patch, "");
}

#[tokio::main]
async fn main() {
    let features_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("features");
    ModelfixWorld::cucumber().run(features_path).await;
}
