//! Configuration file loading for modelfix.
//!
//! Discovers and loads `modelfix.toml` from the repository root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use modelfix_extract::ExtractOptions;
use modelfix_llm::ModelSettings;
use modelfix_types::LanguageFamily;
use serde::Deserialize;
use tracing::{debug, warn};

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "modelfix.toml";

/// Top-level configuration from modelfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelfixConfig {
    /// How fix blocks are recognised in a reply.
    pub extract: ExtractOptions,

    /// Defaults for `modelfix apply`.
    pub apply: ApplyConfig,

    /// Chat-completion endpoint used by `modelfix ask`.
    pub model: ModelSettings,
}

/// Apply section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplyConfig {
    /// Compute results and the patch without writing target files.
    pub dry_run: bool,

    /// Default language tag when `--language` is not given.
    pub language: Option<String>,
}

/// Discover the modelfix.toml config file.
///
/// Returns `None` if no config file is found in `repo_root`.
pub fn discover_config(repo_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = repo_root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a modelfix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<ModelfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<ModelfixConfig> {
    let config: ModelfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from repo root, or return default if not found.
pub fn load_or_default(repo_root: &Utf8Path) -> anyhow::Result<ModelfixConfig> {
    match discover_config(repo_root) {
        Some(path) => load_config(&path),
        None => Ok(ModelfixConfig::default()),
    }
}

/// Merged apply configuration.
#[derive(Debug, Clone, Default)]
pub struct MergedApply {
    pub dry_run: bool,
    /// `Unknown` means infer from the target paths.
    pub language: LanguageFamily,
    pub extract: ExtractOptions,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: ModelfixConfig,
}

impl ConfigMerger {
    pub fn new(config: ModelfixConfig) -> Self {
        Self { config }
    }

    /// Merge with apply command CLI arguments.
    ///
    /// `--dry-run` and `--no-fallback` can only switch behaviour on; an explicit
    /// `--language` replaces the configured one.
    pub fn merge_apply_args(
        self,
        cli_language: Option<&str>,
        cli_dry_run: bool,
        cli_no_fallback: bool,
    ) -> MergedApply {
        let tag = cli_language.or(self.config.apply.language.as_deref());
        let language = match tag {
            Some(tag) => {
                let family = LanguageFamily::from_id(tag);
                if family.is_unknown() {
                    warn!(language = tag, "unknown language tag; inferring from file paths");
                }
                family
            }
            None => LanguageFamily::Unknown,
        };

        let mut extract = self.config.extract;
        if cli_no_fallback {
            extract.fallback = false;
        }

        MergedApply {
            dry_run: cli_dry_run || self.config.apply.dry_run,
            language,
            extract,
        }
    }

    /// Merge with ask command CLI arguments.
    pub fn merge_ask_args(
        self,
        cli_model: Option<String>,
        cli_endpoint: Option<String>,
    ) -> ModelSettings {
        let mut model = self.config.model;
        if let Some(name) = cli_model {
            model.model = name;
        }
        if let Some(endpoint) = cli_endpoint {
            model.endpoint = endpoint;
        }
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelfix_llm::{DEFAULT_MODEL, GITHUB_MODELS_URL};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let contents = r#"
[extract]
no_fix_marker = "NOTHING_TO_DO"
labels_imply_full_file = false
fallback = false

[apply]
dry_run = true
language = "rails"

[model]
endpoint = "https://models.inference.ai.azure.com/chat/completions"
model = "gpt-4o-mini"
token_env = "MODELS_TOKEN"
timeout_secs = 60
temperature = 0.0
top_p = 0.9
max_tokens = 2048
system_prompt = "Answer with fixes only."
"#;

        let config = parse_config(contents).unwrap();
        assert_eq!(config.extract.no_fix_marker, "NOTHING_TO_DO");
        assert!(!config.extract.labels_imply_full_file);
        assert!(!config.extract.fallback);
        assert!(config.apply.dry_run);
        assert_eq!(config.apply.language.as_deref(), Some("rails"));
        assert_eq!(config.model.model, "gpt-4o-mini");
        assert_eq!(config.model.token_env, "MODELS_TOKEN");
        assert_eq!(config.model.timeout_secs, 60);
        assert_eq!(config.model.max_tokens, 2048);
        assert_eq!(
            config.model.system_prompt.as_deref(),
            Some("Answer with fixes only.")
        );
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert_eq!(config.extract, ExtractOptions::default());
        assert!(!config.apply.dry_run);
        assert_eq!(config.apply.language, None);
        assert_eq!(config.model.endpoint, GITHUB_MODELS_URL);
        assert_eq!(config.model.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_parse_partial_section_keeps_defaults() {
        let config = parse_config("[model]\nmodel = \"openai/gpt-4.1\"\n").unwrap();
        assert_eq!(config.model.model, "openai/gpt-4.1");
        assert_eq!(config.model.endpoint, GITHUB_MODELS_URL);
        assert_eq!(config.model.timeout_secs, 30);
    }

    #[test]
    fn test_parse_invalid_toml() {
        let err = parse_config("[apply\ndry_run = true").unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn test_merge_apply_cli_language_wins() {
        let config = ModelfixConfig {
            apply: ApplyConfig {
                language: Some("python".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let merged = ConfigMerger::new(config).merge_apply_args(Some("ts"), false, false);
        assert_eq!(merged.language, LanguageFamily::TypeScript);
    }

    #[test]
    fn test_merge_apply_config_language_used_when_cli_absent() {
        let config = ModelfixConfig {
            apply: ApplyConfig {
                language: Some("python".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let merged = ConfigMerger::new(config).merge_apply_args(None, false, false);
        assert_eq!(merged.language, LanguageFamily::Python);
    }

    #[test]
    fn test_merge_apply_unknown_language_falls_back_to_inference() {
        let merged =
            ConfigMerger::new(ModelfixConfig::default()).merge_apply_args(Some("cobol"), false, false);
        assert_eq!(merged.language, LanguageFamily::Unknown);
    }

    #[test]
    fn test_merge_apply_flags_only_switch_on() {
        let config = ModelfixConfig {
            apply: ApplyConfig {
                dry_run: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let merged = ConfigMerger::new(config).merge_apply_args(None, false, true);
        assert!(merged.dry_run);
        assert!(!merged.extract.fallback);
    }

    #[test]
    fn test_merge_ask_overrides() {
        let merged = ConfigMerger::new(ModelfixConfig::default()).merge_ask_args(
            Some("openai/gpt-4.1".into()),
            Some("http://127.0.0.1:9/chat/completions".into()),
        );
        assert_eq!(merged.model, "openai/gpt-4.1");
        assert_eq!(merged.endpoint, "http://127.0.0.1:9/chat/completions");
        assert_eq!(merged.token_env, "GITHUB_TOKEN");
    }

    #[test]
    fn test_discover_config_some_and_none() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        assert!(discover_config(&root).is_none());

        std::fs::write(root.join(CONFIG_FILE_NAME), "").expect("write config");
        assert!(discover_config(&root).is_some());
    }

    #[test]
    fn test_load_or_default_returns_default_when_missing() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let cfg = load_or_default(&root).expect("load default");
        assert!(cfg.extract.fallback);
        assert!(cfg.apply.language.is_none());
    }
}
