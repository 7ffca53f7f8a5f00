//! Text and JSON views of language profiles for the `profile`,
//! `list-languages`, `scan-log`, `detect-upgrades` and `check-migrations`
//! commands.

use modelfix_profiles::{DuplicateMigration, LanguageProfile, LogMatch, PROFILES, Upgrade};
use serde_json::{Value, json};
use std::fmt::Write;

const RULE: &str =
    "--------------------------------------------------------------------------------";

fn section(out: &mut String, title: &str, lines: &[&str]) {
    if lines.is_empty() {
        return;
    }
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{RULE}");
    for line in lines {
        let _ = writeln!(out, "  {line}");
    }
    let _ = writeln!(out);
}

pub fn render_profile_text(p: &LanguageProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", p.name, p.id());
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Manifest:            {}", p.manifest);
    let _ = writeln!(out, "Lockfile:            {}", p.lockfile);
    let _ = writeln!(out, "Dependency manager:  {}", p.dependency_manager);
    let _ = writeln!(out, "Setup action:        {}", p.setup_action);
    if let Some(v) = p.runtime_version {
        let _ = writeln!(out, "Runtime version:     {v}");
    }
    let _ = writeln!(out, "Test framework:      {}", p.test_framework);
    let _ = writeln!(out, "Extensions:          {}", p.extensions.join(" "));
    let _ = writeln!(out);

    section(&mut out, "INSTALL", p.install_commands);
    section(&mut out, "TEST", p.test_commands);

    let indicators: Vec<String> = p
        .major_version_indicators
        .iter()
        .map(|(pkg, major)| format!("{pkg} >= {major}"))
        .collect();
    let indicators: Vec<&str> = indicators.iter().map(String::as_str).collect();
    section(&mut out, "MAJOR VERSION INDICATORS", &indicators);

    let notes: Vec<String> = p
        .breaking_changes
        .iter()
        .map(|c| format!("{} {}", c.package, c.major))
        .collect();
    let notes: Vec<&str> = notes.iter().map(String::as_str).collect();
    section(&mut out, "BREAKING-CHANGE NOTES", &notes);

    section(&mut out, "PROBLEMATIC DEPENDENCIES", p.problematic_dependencies);

    let patterns: Vec<&str> = p.error_patterns.iter().map(|e| e.name).collect();
    section(&mut out, "ERROR PATTERNS", &patterns);

    section(&mut out, "UPGRADE RESOURCES", p.upgrade_resources);
    out
}

/// Notes for one upgrade; `notes` is `None` when the package is not tracked.
pub fn render_breaking_text(
    p: &LanguageProfile,
    package: &str,
    major: u32,
    notes: Option<&str>,
) -> String {
    match notes {
        Some(notes) => format!("{} {package} {major}\n{RULE}\n{notes}\n", p.name),
        None => format!(
            "No breaking-change notes tracked for {package} in {}.\n",
            p.id()
        ),
    }
}

pub fn breaking_json(p: &LanguageProfile, package: &str, major: u32, notes: Option<&str>) -> Value {
    json!({
        "language": p.id(),
        "package": package,
        "major": major,
        "notes": notes,
        "problematic": p.is_problematic(package),
    })
}

pub fn render_language_list_text() -> String {
    let mut out = String::from("Available languages:\n\n");
    let _ = writeln!(out, "  {:<12} {:<16} {:<14} TEST", "ID", "NAME", "MANAGER");
    let _ = writeln!(out, "  {:<12} {:<16} {:<14} ----", "--", "----", "-------");
    for p in PROFILES {
        let _ = writeln!(
            out,
            "  {:<12} {:<16} {:<14} {}",
            p.id(),
            p.name,
            p.dependency_manager,
            p.test_command()
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Use 'modelfix profile <id>' for details.");
    out
}

pub fn language_list_json() -> Value {
    PROFILES
        .iter()
        .map(|p| {
            json!({
                "id": p.id(),
                "name": p.name,
                "dependency_manager": p.dependency_manager,
                "test_command": p.test_command(),
                "install_command": p.install_command(),
            })
        })
        .collect()
}

pub fn render_log_matches(p: &LanguageProfile, matches: &[LogMatch]) -> String {
    if matches.is_empty() {
        return format!("No known {} error patterns found.\n", p.id());
    }
    let mut out = String::new();
    for m in matches {
        let _ = write!(out, "{}:{}: {}", m.pattern, m.line_number, m.line);
        if !m.captures.is_empty() {
            let _ = write!(out, " [{}]", m.captures.join(", "));
        }
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "{} match(es)", matches.len());
    out
}

/// One `package|old|new` line per upgrade.
pub fn render_upgrade_lines(upgrades: &[Upgrade]) -> String {
    upgrades.iter().map(|u| u.pipe_line() + "\n").collect()
}

pub fn render_upgrades_text(p: &LanguageProfile, upgrades: &[Upgrade]) -> String {
    if upgrades.is_empty() {
        return format!("No version changes detected in {}.\n", p.lockfile);
    }
    let mut out = String::new();
    let mut majors = 0;
    for u in upgrades {
        let _ = write!(out, "{}", u.pipe_line());
        if u.major_change {
            majors += 1;
            let _ = write!(out, " [major]");
        }
        if u.problematic {
            let _ = write!(out, " [problematic]");
        }
        let _ = writeln!(out);
        if let Some(notes) = u.notes {
            for line in notes.lines() {
                let _ = writeln!(out, "    {line}");
            }
        }
    }
    let _ = writeln!(out, "{} upgrade(s), {majors} major", upgrades.len());
    out
}

pub fn render_duplicate_migrations(checked: usize, duplicates: &[DuplicateMigration]) -> String {
    if duplicates.is_empty() {
        return format!("No duplicate migrations found ({checked} checked).\n");
    }
    let mut out = String::new();
    for d in duplicates {
        let _ = writeln!(out, "Duplicate migration class {}", d.class_name);
        let _ = writeln!(out, "  existing:  {}", d.existing);
        let _ = writeln!(out, "  duplicate: {}", d.duplicate);
    }
    let _ = writeln!(out, "{} duplicate migration(s)", duplicates.len());
    out
}
