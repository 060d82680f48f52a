//! Which canonical files lack which required imports.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::inventory::SourceFileRecord;

/// Required import path to the files that do not import it.
///
/// Entries follow the order of the required import list; imports that every
/// file already has are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MissingImportIndex {
    entries: Vec<MissingImport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingImport {
    pub import: String,
    pub files: Vec<PathBuf>,
}

impl MissingImportIndex {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Files missing `import`, empty when none are
    pub fn files_missing(&self, import: &str) -> &[PathBuf] {
        self.entries
            .iter()
            .find(|e| e.import == import)
            .map(|e| e.files.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &MissingImport> {
        self.entries.iter()
    }

    /// Number of (file, import) pairs to fix
    pub fn total_missing(&self) -> usize {
        self.entries.iter().map(|e| e.files.len()).sum()
    }

    fn push(&mut self, import: &str, file: &Path) {
        match self.entries.iter_mut().find(|e| e.import == import) {
            Some(entry) => entry.files.push(file.to_path_buf()),
            None => self.entries.push(MissingImport {
                import: import.to_string(),
                files: vec![file.to_path_buf()],
            }),
        }
    }
}

/// Check every file against every required import.
///
/// Membership is exact string comparison; an import spelled differently is
/// treated as missing.
pub fn find_missing_imports<'a, I, S>(files: I, required: &[S]) -> MissingImportIndex
where
    I: IntoIterator<Item = &'a SourceFileRecord>,
    S: AsRef<str>,
{
    let files: Vec<&SourceFileRecord> = files.into_iter().collect();
    let mut index = MissingImportIndex::default();

    for import in required.iter().map(AsRef::as_ref) {
        for file in &files {
            if !file.imports_path(import) {
                index.push(import, &file.path);
            }
        }
    }
    index
}
