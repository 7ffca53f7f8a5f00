//! Lockfile version parsing and upgrade detection.
//!
//! Two snapshots of a profile's lockfile (before and after a dependency bump)
//! are reduced to `package -> version` maps; every package present in both
//! with a different version is an [`Upgrade`]. Upgrades that cross a major
//! version carry the profile's breaking-change notes for the new major.

use crate::LanguageProfile;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Resolved versions by package name.
pub type Versions = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum LockfileError {
    #[error("no version parser for {lockfile} ({language})")]
    Unsupported {
        language: &'static str,
        lockfile: &'static str,
    },

    #[error("invalid {lockfile}: {source}")]
    Json {
        lockfile: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Lockfile formats with a version parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockfileFormat {
    /// Bundler's `Gemfile.lock`.
    GemfileLock,
    /// npm's `package-lock.json`, v1 through v3.
    PackageLock,
    /// pip's `requirements.txt` with pinned `name==version` lines.
    Requirements,
    /// Composer's `composer.lock`.
    ComposerLock,
}

impl LockfileFormat {
    pub fn from_file_name(name: &str) -> Option<Self> {
        match name {
            "Gemfile.lock" => Some(LockfileFormat::GemfileLock),
            "package-lock.json" => Some(LockfileFormat::PackageLock),
            "requirements.txt" => Some(LockfileFormat::Requirements),
            "composer.lock" => Some(LockfileFormat::ComposerLock),
            _ => None,
        }
    }
}

/// One package whose resolved version changed between two lockfiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Upgrade {
    pub package: String,
    pub old: String,
    pub new: String,
    /// Both versions have a numeric major and they differ.
    pub major_change: bool,
    /// Breaking-change notes for the new major; only set on a major change.
    pub notes: Option<&'static str>,
    pub problematic: bool,
}

impl Upgrade {
    /// The `package|old|new` line consumed by prompt builders.
    pub fn pipe_line(&self) -> String {
        format!("{}|{}|{}", self.package, self.old, self.new)
    }
}

impl LanguageProfile {
    pub fn lockfile_format(&self) -> Option<LockfileFormat> {
        LockfileFormat::from_file_name(self.lockfile)
    }

    /// Parse this profile's lockfile into resolved versions.
    pub fn parse_lockfile(&self, text: &str) -> Result<Versions, LockfileError> {
        let format = self.lockfile_format().ok_or(LockfileError::Unsupported {
            language: self.id(),
            lockfile: self.lockfile,
        })?;
        let json_err = |source: serde_json::Error| LockfileError::Json {
            lockfile: self.lockfile,
            source,
        };
        match format {
            LockfileFormat::GemfileLock => Ok(parse_gemfile_lock(text)),
            LockfileFormat::Requirements => Ok(parse_requirements(text)),
            LockfileFormat::PackageLock => parse_package_lock(text).map_err(json_err),
            LockfileFormat::ComposerLock => parse_composer_lock(text).map_err(json_err),
        }
    }
}

/// Every package in `new` that also appears in `old` with another version.
///
/// Packages that were added or removed are not upgrades. Output is sorted by
/// package name.
pub fn detect_upgrades(
    profile: &LanguageProfile,
    old: &Versions,
    new: &Versions,
) -> Vec<Upgrade> {
    new.iter()
        .filter_map(|(package, new_ver)| {
            let old_ver = old.get(package)?;
            if old_ver == new_ver {
                return None;
            }
            let new_major = major_version(new_ver);
            let major_change = match (major_version(old_ver), new_major) {
                (Some(a), Some(b)) => a != b,
                _ => false,
            };
            let notes = new_major
                .filter(|_| major_change)
                .and_then(|major| profile.breaking_changes(package, major));
            Some(Upgrade {
                package: package.clone(),
                old: old_ver.clone(),
                new: new_ver.clone(),
                major_change,
                notes,
                problematic: profile.is_problematic(package),
            })
        })
        .collect()
}

/// Leading numeric component, ignoring a `v` prefix (`v8.0.1` → 8).
pub fn major_version(version: &str) -> Option<u32> {
    let v = version.trim().trim_start_matches(['v', 'V']);
    let digits = v.find(|c: char| !c.is_ascii_digit()).map_or(v, |end| &v[..end]);
    digits.parse().ok()
}

fn gem_spec_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^ {4}(\S+) \(([^)]+)\)").expect("gem spec regex compiles"))
}

/// Top-level specs of a `Gemfile.lock` (four-space indent).
///
/// Nested dependency constraints are indented further and ignored. A
/// platform-qualified version keeps its suffix (`1.15.4-x86_64-linux`).
pub fn parse_gemfile_lock(text: &str) -> Versions {
    text.lines()
        .filter_map(|line| gem_spec_re().captures(line))
        .map(|caps| {
            let version = caps[2].split(',').next().unwrap_or_default().trim();
            (caps[1].to_string(), version.to_string())
        })
        .collect()
}

/// Pinned `name==version` lines; comments, options and unpinned lines are skipped.
pub fn parse_requirements(text: &str) -> Versions {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty() && !line.starts_with('-'))
        .filter_map(|line| {
            let (name, version) = line.split_once("==")?;
            let version = version.split(';').next().unwrap_or_default().trim();
            let name = name.split('[').next().unwrap_or_default().trim();
            (!name.is_empty() && !version.is_empty())
                .then(|| (name.to_ascii_lowercase(), version.to_string()))
        })
        .collect()
}

#[derive(Debug, Default, Deserialize)]
struct PackageLock {
    /// v2/v3: keyed by install path (`node_modules/a/node_modules/b`).
    #[serde(default)]
    packages: BTreeMap<String, VersionEntry>,
    /// v1: keyed by package name.
    #[serde(default)]
    dependencies: BTreeMap<String, VersionEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct VersionEntry {
    version: Option<String>,
}

/// Top-level packages of a `package-lock.json`.
///
/// Nested `node_modules` copies are ignored; the root project entry (`""`)
/// is not a dependency.
pub fn parse_package_lock(text: &str) -> Result<Versions, serde_json::Error> {
    let lock: PackageLock = serde_json::from_str(text)?;
    let mut versions = Versions::new();
    for (path, entry) in lock.packages {
        let Some(name) = path.strip_prefix("node_modules/") else {
            continue;
        };
        if name.contains("/node_modules/") {
            continue;
        }
        if let Some(version) = entry.version {
            versions.insert(name.to_string(), version);
        }
    }
    if versions.is_empty() {
        for (name, entry) in lock.dependencies {
            if let Some(version) = entry.version {
                versions.insert(name, version);
            }
        }
    }
    Ok(versions)
}

#[derive(Debug, Deserialize)]
struct ComposerLock {
    #[serde(default)]
    packages: Vec<ComposerPackage>,
    #[serde(default, rename = "packages-dev")]
    packages_dev: Vec<ComposerPackage>,
}

#[derive(Debug, Deserialize)]
struct ComposerPackage {
    name: String,
    version: String,
}

pub fn parse_composer_lock(text: &str) -> Result<Versions, serde_json::Error> {
    let lock: ComposerLock = serde_json::from_str(text)?;
    Ok(lock
        .packages
        .into_iter()
        .chain(lock.packages_dev)
        .map(|p| (p.name, p.version))
        .collect())
}
