//! One representative file per package directory.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::inventory::SourceFileRecord;

/// Directory to representative file mapping.
///
/// Holds at most one record per directory. A record whose base name equals
/// the canonical file name always wins over other files of its directory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CanonicalFileSet {
    files: BTreeMap<PathBuf, SourceFileRecord>,
}

impl CanonicalFileSet {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, dir: &Path) -> Option<&SourceFileRecord> {
        self.files.get(dir)
    }

    /// Records ordered by directory
    pub fn records(&self) -> impl Iterator<Item = &SourceFileRecord> {
        self.files.values()
    }
}

/// Fold the raw inventory into one record per directory.
///
/// The first record seen for a directory is kept unless a later record is
/// named `canonical_name` (e.g. `main.go`), which replaces it. A non-canonical
/// record never replaces a stored canonical one.
pub fn canonicalize<I>(records: I, canonical_name: &str) -> CanonicalFileSet
where
    I: IntoIterator<Item = SourceFileRecord>,
{
    let mut files: BTreeMap<PathBuf, SourceFileRecord> = BTreeMap::new();

    for record in records {
        let dir = record.dir().to_path_buf();
        let is_canonical = record.file_name() == Some(canonical_name);

        match files.get(&dir) {
            None => {
                files.insert(dir, record);
            }
            Some(stored) if is_canonical && stored.file_name() != Some(canonical_name) => {
                files.insert(dir, record);
            }
            Some(_) => {}
        }
    }

    CanonicalFileSet { files }
}
