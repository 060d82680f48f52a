//! Import declaration shapes and where to anchor a new import.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static PACKAGE_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^package\s+(\w+)\s*(?://.*)?$").expect("valid package clause regex")
});

static IMPORT_BLOCK_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^import\s*\(\s*$").expect("valid import block regex"));

static IMPORT_SINGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^import\s+(".+")\s*$"#).expect("valid single import regex"));

/// Syntactic form of the import section at the insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportShape<'a> {
    /// No import declaration; insert after the package clause
    None,
    /// `import "path"`, with the quoted literal as written
    Single { literal: &'a str },
    /// `import (` opening a parenthesized block
    Block,
}

impl ImportShape<'_> {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::None => ShapeKind::None,
            Self::Single { .. } => ShapeKind::Single,
            Self::Block => ShapeKind::Block,
        }
    }
}

/// Shape without borrowed data, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    None,
    Single,
    Block,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "no import declaration",
            Self::Single => "single-line import",
            Self::Block => "import block",
        };
        f.write_str(name)
    }
}

/// Line index and shape selected for an insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor<'a> {
    pub line: usize,
    pub shape: ImportShape<'a>,
}

/// Classify a single line (without its terminator) as an import declaration.
pub fn import_shape(line: &str) -> Option<ImportShape<'_>> {
    if let Some(caps) = IMPORT_SINGLE.captures(line) {
        let literal = caps.get(1)?.as_str();
        return Some(ImportShape::Single { literal });
    }
    if IMPORT_BLOCK_OPEN.is_match(line) {
        return Some(ImportShape::Block);
    }
    None
}

pub fn is_package_clause(line: &str) -> bool {
    PACKAGE_CLAUSE.is_match(line)
}

/// Pick the line to edit.
///
/// Import declarations anywhere in the file take precedence over the package
/// clause; among them the first one from the top wins.
pub fn locate_anchor<'a>(lines: &[&'a str]) -> Option<Anchor<'a>> {
    lines
        .iter()
        .copied()
        .enumerate()
        .find_map(|(line, text)| import_shape(text).map(|shape| Anchor { line, shape }))
        .or_else(|| {
            lines
                .iter()
                .position(|text| is_package_clause(text))
                .map(|line| Anchor {
                    line,
                    shape: ImportShape::None,
                })
        })
}
