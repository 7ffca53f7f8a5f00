//! Insertion-point heuristic for addition, deletion and block bodies.
//!
//! Best effort only: the body lands after the last import-style line, else
//! before the first declaration line, else at the end of the file.

const IMPORT_PREFIXES: &[&str] = &[
    "import ",
    "from ",
    "require ",
    "require_relative ",
    "include ",
    "#include ",
    "using ",
    "use ",
    "load ",
];

const DECLARATION_PREFIXES: &[&str] = &[
    "def ",
    "class ",
    "module ",
    "function ",
    "function(",
    "async function",
    "fn ",
    "pub fn ",
    "func ",
    "public ",
    "private ",
    "protected ",
    "export function",
    "export class",
    "export default",
];

fn is_import(line: &str) -> bool {
    let line = line.trim_start();
    IMPORT_PREFIXES.iter().any(|p| line.starts_with(p)) || line.contains("require(")
}

fn is_declaration(line: &str) -> bool {
    let line = line.trim_start();
    DECLARATION_PREFIXES.iter().any(|p| line.starts_with(p))
}

/// Index into `lines` at which the inserted block should start.
pub fn insertion_index(lines: &[&str]) -> usize {
    if let Some(last_import) = lines.iter().rposition(|l| is_import(l)) {
        return last_import + 1;
    }
    lines
        .iter()
        .position(|l| is_declaration(l))
        .unwrap_or(lines.len())
}

/// Insert a blank line and then `body` into `content`.
///
/// A trailing newline on `content` is preserved.
pub fn insert_block(content: &str, body: &str) -> String {
    let mut lines: Vec<&str> = content.lines().collect();
    let at = insertion_index(&lines);

    let block = std::iter::once("").chain(body.lines());
    lines.splice(at..at, block);

    let mut out = lines.join("\n");
    if content.is_empty() || content.ends_with('\n') {
        out.push('\n');
    }
    out
}
