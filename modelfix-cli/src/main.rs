mod config;
mod profile;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::ConfigMerger;
use fs_err as fs;
use modelfix_core::adapters::{FsTextSource, FsWritePort, HttpCompletion};
use modelfix_core::pipeline::{run_apply, run_ask, write_apply_artifacts};
use modelfix_core::reporter::Reporter;
use modelfix_core::settings::{ApplySettings, AskSettings};
use modelfix_types::apply::ToolInfo;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "modelfix",
    version,
    about = "Applies file fixes proposed by a language model to a CI working tree."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract fix blocks from a model reply and apply them to the repository.
    Apply(ApplyArgs),
    /// Send a prompt to the chat-completion endpoint and print or save the reply.
    Ask(AskArgs),
    /// Show a language profile, or the breaking-change notes for one upgrade.
    Profile(ProfileArgs),
    /// List all language profiles.
    ListLanguages(ListLanguagesArgs),
    /// Report known error patterns found in a build log.
    ScanLog(ScanLogArgs),
    /// List packages whose version changed between two lockfiles.
    DetectUpgrades(DetectUpgradesArgs),
    /// Find Rails migrations that declare the same class.
    CheckMigrations(CheckMigrationsArgs),
}

#[derive(Debug, Parser)]
struct ApplyArgs {
    /// File holding the model's reply.
    response_file: Utf8PathBuf,

    /// Language tag (ruby, python, ...). Inferred from target paths if omitted.
    #[arg(long)]
    language: Option<String>,

    /// Repository root that target paths are resolved against.
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Compute results and the patch without writing target files.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Write apply.json, apply.md and patch.diff here.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Only recognise labelled fix blocks.
    #[arg(long, default_value_t = false)]
    no_fallback: bool,
}

#[derive(Debug, Parser)]
struct AskArgs {
    /// File holding the prompt.
    prompt_file: Utf8PathBuf,

    /// Save the reply here instead of printing it.
    #[arg(long)]
    output: Option<Utf8PathBuf>,

    /// Model name (default from modelfix.toml, else openai/gpt-4o).
    #[arg(long)]
    model: Option<String>,

    /// Chat-completion endpoint URL.
    #[arg(long)]
    endpoint: Option<String>,
}

#[derive(Debug, Parser)]
struct ProfileArgs {
    /// Language id or alias (e.g. "ruby", "ts", "csharp").
    language: String,

    /// Package being upgraded.
    #[arg(long, requires = "major")]
    package: Option<String>,

    /// Target major version of the package.
    #[arg(long, requires = "package")]
    major: Option<u32>,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct ListLanguagesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct ScanLogArgs {
    /// Language id or alias.
    language: String,

    /// Build or test log to scan.
    log_file: Utf8PathBuf,
}

#[derive(Debug, Parser)]
struct DetectUpgradesArgs {
    /// Language id or alias; selects the lockfile format.
    language: String,

    /// Lockfile before the dependency update.
    old_lockfile: Utf8PathBuf,

    /// Lockfile after the dependency update.
    new_lockfile: Utf8PathBuf,

    /// Also write one `package|old|new` line per upgrade here.
    #[arg(long)]
    output: Option<Utf8PathBuf>,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct CheckMigrationsArgs {
    /// Repository root holding db/migrate.
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not errors.
            return ExitCode::from(if e.use_stderr() { 1 } else { 0 });
        }
    };

    match real_main(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:?}", e);
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn real_main(cli: Cli) -> anyhow::Result<u8> {
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Ask(args) => cmd_ask(args),
        Command::Profile(args) => cmd_profile(args),
        Command::ListLanguages(args) => cmd_list_languages(args),
        Command::ScanLog(args) => cmd_scan_log(args),
        Command::DetectUpgrades(args) => cmd_detect_upgrades(args),
        Command::CheckMigrations(args) => cmd_check_migrations(args),
    }
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<u8> {
    let file_config =
        config::load_or_default(&args.repo_root).context("load modelfix.toml config")?;
    let merged = ConfigMerger::new(file_config).merge_apply_args(
        args.language.as_deref(),
        args.dry_run,
        args.no_fallback,
    );
    debug!(
        "merged config: dry_run={}, language={}, extract={:?}",
        merged.dry_run, merged.language, merged.extract
    );

    let settings = ApplySettings {
        repo_root: args.repo_root,
        out_dir: args.out_dir,
        dry_run: merged.dry_run,
        language: merged.language,
        extract: merged.extract,
    };

    let source = FsTextSource::new(args.response_file);
    let outcome = run_apply(&settings, &source, tool_info())?;

    Reporter::new(std::io::stdout().lock())
        .report(&outcome.apply)
        .context("write report")?;

    if let Some(out_dir) = &settings.out_dir {
        write_apply_artifacts(&outcome, out_dir, &FsWritePort)?;
        info!("wrote apply artifacts to {}", out_dir);
    }

    Ok(outcome.verdict.exit_code())
}

fn cmd_ask(args: AskArgs) -> anyhow::Result<u8> {
    let file_config = config::load_or_default(&Utf8PathBuf::from("."))
        .context("load modelfix.toml config")?;
    let model = ConfigMerger::new(file_config).merge_ask_args(args.model, args.endpoint);

    let settings = AskSettings {
        model,
        output: args.output,
    };
    let completion = HttpCompletion::from_settings(settings.model.clone())?;
    let reply = run_ask(
        &settings,
        &FsTextSource::new(args.prompt_file),
        &completion,
        &FsWritePort,
    )?;

    if settings.output.is_none() {
        println!("{reply}");
    }
    Ok(0)
}

fn cmd_profile(args: ProfileArgs) -> anyhow::Result<u8> {
    let p = lookup_profile(&args.language)?;

    match (args.package, args.major) {
        (Some(package), Some(major)) => {
            let notes = p.breaking_changes(&package, major);
            match args.format {
                OutputFormat::Text => {
                    print!("{}", profile::render_breaking_text(p, &package, major, notes))
                }
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&profile::breaking_json(p, &package, major, notes))?
                ),
            }
        }
        _ => match args.format {
            OutputFormat::Text => print!("{}", profile::render_profile_text(p)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(p)?),
        },
    }
    Ok(0)
}

fn cmd_list_languages(args: ListLanguagesArgs) -> anyhow::Result<u8> {
    match args.format {
        OutputFormat::Text => print!("{}", profile::render_language_list_text()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&profile::language_list_json())?
        ),
    }
    Ok(0)
}

fn cmd_scan_log(args: ScanLogArgs) -> anyhow::Result<u8> {
    let p = lookup_profile(&args.language)?;
    let log = fs::read_to_string(&args.log_file)
        .with_context(|| format!("read {}", args.log_file))?;
    let matches = modelfix_profiles::scan_log(p, &log)
        .with_context(|| format!("compile {} error patterns", p.id()))?;
    print!("{}", profile::render_log_matches(p, &matches));
    Ok(0)
}

fn cmd_detect_upgrades(args: DetectUpgradesArgs) -> anyhow::Result<u8> {
    let p = lookup_profile(&args.language)?;
    let read_versions = |path: &Utf8PathBuf| -> anyhow::Result<modelfix_profiles::Versions> {
        let text = fs::read_to_string(path).with_context(|| format!("read {path}"))?;
        p.parse_lockfile(&text).with_context(|| format!("parse {path}"))
    };
    let old = read_versions(&args.old_lockfile)?;
    let new = read_versions(&args.new_lockfile)?;

    let upgrades = modelfix_profiles::detect_upgrades(p, &old, &new);
    info!(
        language = p.id(),
        packages = new.len(),
        upgrades = upgrades.len(),
        "compared lockfiles"
    );

    if let Some(output) = &args.output {
        fs::write(output, profile::render_upgrade_lines(&upgrades))
            .with_context(|| format!("write {output}"))?;
    }
    match args.format {
        OutputFormat::Text => print!("{}", profile::render_upgrades_text(p, &upgrades)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&upgrades)?),
    }
    Ok(0)
}

fn cmd_check_migrations(args: CheckMigrationsArgs) -> anyhow::Result<u8> {
    let files = read_migrations(&args.repo_root)?;
    let duplicates = modelfix_profiles::find_duplicate_migrations(
        files.iter().map(|(path, source)| (path.as_str(), source.as_str())),
    );

    match args.format {
        OutputFormat::Text => print!(
            "{}",
            profile::render_duplicate_migrations(files.len(), &duplicates)
        ),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&duplicates)?),
    }
    Ok(if duplicates.is_empty() { 0 } else { 1 })
}

/// `(relative path, source)` of every `db/migrate/*.rb`, sorted by file name.
fn read_migrations(repo_root: &Utf8Path) -> anyhow::Result<Vec<(String, String)>> {
    let dir = repo_root.join(modelfix_profiles::MIGRATION_DIR);
    if !dir.is_dir() {
        debug!("no migration directory at {}", dir);
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.ends_with(".rb") && entry.file_type()?.is_file() {
            names.push(name.to_string());
        }
    }
    names.sort();

    names
        .into_iter()
        .map(|name| -> anyhow::Result<(String, String)> {
            let source = fs::read_to_string(dir.join(&name))?;
            Ok((format!("{}/{name}", modelfix_profiles::MIGRATION_DIR), source))
        })
        .collect()
}

fn lookup_profile(language: &str) -> anyhow::Result<&'static modelfix_profiles::LanguageProfile> {
    modelfix_profiles::lookup(language).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown language: '{}'\n\nAvailable languages: {}",
            language,
            modelfix_profiles::list_ids().join(", ")
        )
    })
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "modelfix".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        commit: None,
    }
}
