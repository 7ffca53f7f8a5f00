//! Duplicate Rails migration class detection.
//!
//! Two migration files declaring the same class make `db:migrate` fail with
//! `ActiveRecord::DuplicateMigrationNameError`, a common result of a model
//! adding a migration instead of editing the existing one.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Directory, relative to the repository root, holding Rails migrations.
pub const MIGRATION_DIR: &str = "db/migrate";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateMigration {
    pub class_name: String,
    /// First file (in the given order) declaring the class.
    pub existing: String,
    pub duplicate: String,
}

fn migration_class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*class\s+(\w+)\s*<\s*ActiveRecord::Migration")
            .expect("migration class regex compiles")
    })
}

/// Class name declared by one migration file, if any.
pub fn migration_class(source: &str) -> Option<&str> {
    migration_class_re()
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Every file whose migration class was already declared by an earlier file.
///
/// `files` is `(path, source)` in the order to check, normally sorted by
/// file name so that timestamps decide which copy is "existing".
pub fn find_duplicate_migrations<'a, I>(files: I) -> Vec<DuplicateMigration>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
    let mut duplicates = Vec::new();
    for (path, source) in files {
        let Some(class_name) = migration_class(source) else {
            continue;
        };
        match seen.get(class_name) {
            Some(existing) => duplicates.push(DuplicateMigration {
                class_name: class_name.to_string(),
                existing: existing.to_string(),
                duplicate: path.to_string(),
            }),
            None => {
                seen.insert(class_name, path);
            }
        }
    }
    duplicates
}
