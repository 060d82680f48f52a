//! Blank import insertion.
//!
//! Rewrites a Go source file so that it carries `_ "<path>"`, editing exactly
//! one place:
//!
//! - `import "fmt"` becomes a parenthesized block holding the blank import
//!   followed by the original literal
//! - `import (` gets the blank import as its first entry
//! - otherwise `import _ "<path>"` is added right after the package clause
//!
//! Every other byte of the file is preserved, including line endings. The
//! engine does not check whether the import is already present; callers
//! filter with [`crate::detect`] first.

pub mod scan;
pub mod shape;

use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{InsertionError, InsertionResult};
pub use shape::{Anchor, ImportShape, ShapeKind, locate_anchor};

/// What an insertion did to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum InsertOutcome {
    Inserted { shape: ShapeKind },
    /// No anchor found and strict mode is off; the file was not touched
    Unchanged,
}

/// A line split from its terminator (`"\n"`, `"\r\n"` or `""` at EOF).
struct Line<'a> {
    body: &'a str,
    ending: &'a str,
}

fn split_lines(source: &str) -> Vec<Line<'_>> {
    source
        .split_inclusive('\n')
        .map(|chunk| {
            let body = match chunk.strip_suffix('\n') {
                Some(b) => b.strip_suffix('\r').unwrap_or(b),
                None => chunk,
            };
            Line {
                body,
                ending: &chunk[body.len()..],
            }
        })
        .collect()
}

/// Insert a blank import for `import_path` into Go source text.
///
/// Returns the rewritten text and the shape that was edited, or `None` when
/// the source has neither an import declaration nor a package clause.
pub fn insert_into_source(source: &str, import_path: &str) -> Option<(String, ShapeKind)> {
    let lines = split_lines(source);
    let bodies: Vec<&str> = lines.iter().map(|l| l.body).collect();
    let anchor = locate_anchor(&bodies)?;

    let fallback_eol = lines
        .iter()
        .map(|l| l.ending)
        .find(|e| !e.is_empty())
        .unwrap_or("\n");

    let mut out = String::with_capacity(source.len() + import_path.len() + 16);
    for (index, line) in lines.iter().enumerate() {
        if index != anchor.line {
            out.push_str(line.body);
            out.push_str(line.ending);
            continue;
        }

        let eol = if line.ending.is_empty() {
            fallback_eol
        } else {
            line.ending
        };
        match anchor.shape {
            ImportShape::Single { literal } => {
                out.push_str("import (");
                out.push_str(eol);
                out.push_str(&format!("\t_ \"{import_path}\""));
                out.push_str(eol);
                out.push('\t');
                out.push_str(literal);
                out.push_str(eol);
                out.push(')');
            }
            ImportShape::Block => {
                out.push_str(line.body);
                out.push_str(eol);
                out.push_str(&format!("\t_ \"{import_path}\""));
            }
            ImportShape::None => {
                out.push_str(line.body);
                out.push_str(eol);
                out.push_str(&format!("import _ \"{import_path}\""));
            }
        }
        out.push_str(line.ending);
    }

    Some((out, anchor.shape.kind()))
}

/// Rewrites files on disk with [`insert_into_source`].
#[derive(Debug, Clone, Copy)]
pub struct ImportInserter {
    strict: bool,
}

impl Default for ImportInserter {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl ImportInserter {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.insertion.strict)
    }

    /// Add `import_path` as a blank import to the file at `path`.
    ///
    /// The new contents replace the file through a rename, so an interrupted
    /// run never leaves a partially written source file behind.
    pub fn insert(&self, path: &Path, import_path: &str) -> InsertionResult<InsertOutcome> {
        let source = fs::read_to_string(path).map_err(|source| InsertionError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let Some((rewritten, shape)) = insert_into_source(&source, import_path) else {
            if self.strict {
                return Err(InsertionError::NoImportAnchor {
                    path: path.to_path_buf(),
                });
            }
            debug!(path = %path.display(), "no import anchor, leaving file unchanged");
            return Ok(InsertOutcome::Unchanged);
        };

        debug!(path = %path.display(), %shape, "selected insertion point");
        write_atomically(path, &rewritten)?;
        info!(path = %path.display(), import = import_path, "inserted blank import");
        Ok(InsertOutcome::Inserted { shape })
    }
}

/// Write `contents` next to the file `path` resolves to and rename it into
/// place, keeping the original permissions. Symlinks stay links; their
/// target is rewritten.
fn write_atomically(path: &Path, contents: &str) -> InsertionResult<()> {
    let write_err = |source: std::io::Error| InsertionError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    let target = fs::canonicalize(path).map_err(write_err)?;
    let dir = target.parent().unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
    temp.write_all(contents.as_bytes()).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;

    let metadata = fs::metadata(&target).map_err(write_err)?;
    fs::set_permissions(temp.path(), metadata.permissions()).map_err(write_err)?;

    temp.persist(&target).map_err(|e| write_err(e.error))?;
    Ok(())
}
