//! Static language profiles.
//!
//! One immutable registry, keyed by [`LanguageFamily`], describing how each
//! supported ecosystem installs, tests and breaks across major upgrades.
//! Also home to the lockfile and migration checks that feed those notes.

mod lockfile;
mod migrations;
mod registry;
mod scan;

pub use lockfile::{
    LockfileError, LockfileFormat, Upgrade, Versions, detect_upgrades, major_version,
    parse_composer_lock, parse_gemfile_lock, parse_package_lock, parse_requirements,
};
pub use migrations::{
    DuplicateMigration, MIGRATION_DIR, find_duplicate_migrations, migration_class,
};
pub use registry::PROFILES;
pub use scan::{LogMatch, scan_log};

use modelfix_types::LanguageFamily;
use serde::Serialize;

/// Returned when a package has notes, but none for the requested major.
pub const NO_KNOWN_BREAKING_CHANGES: &str = "No known breaking changes";

/// Everything the pipeline knows about one language ecosystem.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageProfile {
    pub family: LanguageFamily,
    /// Display name (e.g. "Ruby/Rails").
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    pub manifest: &'static str,
    pub lockfile: &'static str,
    pub dependency_manager: &'static str,
    /// CI setup action for the toolchain.
    pub setup_action: &'static str,
    pub runtime_version: Option<&'static str>,
    pub install_commands: &'static [&'static str],
    pub test_commands: &'static [&'static str],
    pub test_framework: &'static str,
    /// Package → first major version treated as a major upgrade.
    pub major_version_indicators: &'static [(&'static str, u32)],
    pub breaking_changes: &'static [BreakingChange],
    pub upgrade_resources: &'static [&'static str],
    /// Dependencies that commonly break on upgrade.
    pub problematic_dependencies: &'static [&'static str],
    pub error_patterns: &'static [ErrorPattern],
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakingChange {
    pub package: &'static str,
    pub major: u32,
    pub notes: &'static str,
}

/// A named regex recognising one class of build-log failure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPattern {
    pub name: &'static str,
    pub pattern: &'static str,
}

impl LanguageProfile {
    pub fn id(&self) -> &'static str {
        self.family.id()
    }

    /// First test command, or `""` when the profile lists none.
    pub fn test_command(&self) -> &'static str {
        self.test_commands.first().copied().unwrap_or_default()
    }

    /// First install command, or `""` when the profile lists none.
    pub fn install_command(&self) -> &'static str {
        self.install_commands.first().copied().unwrap_or_default()
    }

    /// Notes for upgrading `package` to `major`.
    ///
    /// `None` when the package has no notes at all; the
    /// [`NO_KNOWN_BREAKING_CHANGES`] sentinel when it has notes for other
    /// majors only.
    pub fn breaking_changes(&self, package: &str, major: u32) -> Option<&'static str> {
        let package = package.trim().to_ascii_lowercase();
        let mut known = false;
        for change in self.breaking_changes {
            if change.package != package {
                continue;
            }
            known = true;
            if change.major == major {
                return Some(change.notes);
            }
        }
        known.then_some(NO_KNOWN_BREAKING_CHANGES)
    }

    pub fn is_problematic(&self, package: &str) -> bool {
        self.problematic_dependencies
            .iter()
            .any(|p| p.eq_ignore_ascii_case(package.trim()))
    }
}

/// Look up a profile by id or alias (`ruby`, `rails`, `ts`, `csharp`, ...).
pub fn lookup(query: &str) -> Option<&'static LanguageProfile> {
    for_family(LanguageFamily::from_id(query))
}

pub fn for_family(family: LanguageFamily) -> Option<&'static LanguageProfile> {
    PROFILES.iter().find(|p| p.family == family)
}

/// Ids of every registered profile, in registry order.
pub fn list_ids() -> Vec<&'static str> {
    PROFILES.iter().map(|p| p.id()).collect()
}
