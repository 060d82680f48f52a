//! Lexical scan of the import paths a single Go file declares.

use regex::Regex;
use std::sync::LazyLock;

/// One import spec: optional name (`_`, `.` or an identifier) then the path literal
static IMPORT_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:(?:[A-Za-z_][A-Za-z0-9_]*|\.)\s+)?(?:"([^"]+)"|`([^`]+)`)"#)
        .expect("valid import spec regex")
});

/// Top-level declarations that end the import section
static DECL_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:func|type|var|const)\b").expect("valid declaration regex"));

fn spec_path(spec: &str) -> Option<&str> {
    let caps = IMPORT_SPEC.captures(spec)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// Drop a trailing `//` comment that is not inside a string literal.
fn strip_line_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut prev = '\0';
    for (index, c) in line.char_indices() {
        match quote {
            Some(q) if c == q && !(q == '"' && prev == '\\') => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '`' => quote = Some(c),
                '/' if prev == '/' => return &line[..index - 1],
                _ => {}
            },
        }
        prev = c;
    }
    line
}

/// Split a closing `)` off a block line, returning the spec part and whether
/// the block ends here.
fn split_block_close(line: &str) -> (&str, bool) {
    match line.strip_suffix(')') {
        Some(spec) => (spec.trim_end(), true),
        None => (line, false),
    }
}

/// Import paths declared by `source`, in declaration order.
///
/// Understands single-line, aliased, blank, dot and parenthesized imports.
/// Scanning stops at the first top-level `func`, `type`, `var` or `const`,
/// even inside an unterminated import block.
pub fn declared_imports(source: &str) -> Vec<String> {
    let mut imports = Vec::new();
    let mut in_block = false;

    for raw in source.lines() {
        if DECL_START.is_match(raw) {
            break;
        }
        let line = strip_line_comment(raw).trim();

        if in_block {
            let (spec, closes) = split_block_close(line);
            if let Some(path) = spec_path(spec) {
                imports.push(path.to_string());
            }
            in_block = !closes;
            continue;
        }

        if let Some(rest) = line.strip_prefix("import") {
            let rest = rest.trim_start();
            if let Some(inner) = rest.strip_prefix('(') {
                let (spec, closes) = split_block_close(inner.trim());
                if let Some(path) = spec_path(spec) {
                    imports.push(path.to_string());
                }
                in_block = !closes;
            } else if rest.len() < line.len() - "import".len() || rest.starts_with(['"', '`']) {
                if let Some(path) = spec_path(rest) {
                    imports.push(path.to_string());
                }
            }
        }
    }

    imports
}
