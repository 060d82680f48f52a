//! Package inventory: which files exist and what they import.
//!
//! The inventory is the only place the toolchain is consulted. Everything
//! downstream works on plain `SourceFileRecord` values.

pub mod go_list;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ToolingResult;

pub use go_list::GoListInventory;

/// One source file of a package together with its declared imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFileRecord {
    pub path: PathBuf,
    /// Import paths in the order the inventory emitted them
    #[serde(default)]
    pub imports: Vec<String>,
}

impl SourceFileRecord {
    pub fn new(path: impl Into<PathBuf>, imports: Vec<String>) -> Self {
        Self {
            path: path.into(),
            imports,
        }
    }

    /// Directory holding the file, `""` for a bare file name
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Base name of the file, `None` if the path ends in `..`
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    /// Exact string membership, no alias or normalization
    pub fn imports_path(&self, import: &str) -> bool {
        self.imports.iter().any(|i| i == import)
    }
}

/// Source of package records for a given entry file name.
///
/// Implementations list every file of every package whose entry matches
/// `entry_name` across the module. Failures are fatal to the run and are
/// never retried.
pub trait InventorySource {
    fn list(&self, entry_name: &str) -> ToolingResult<Vec<SourceFileRecord>>;
}
