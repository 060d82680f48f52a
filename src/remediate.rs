//! The remediation run: list, canonicalize, detect, insert, report.
//!
//! A run is sequential. Inventory failures abort it; insertion failures are
//! recorded per file and the run moves on to the next file.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::canonical::canonicalize;
use crate::config::Settings;
use crate::detect::{MissingImportIndex, find_missing_imports};
use crate::display::THEME;
use crate::error::{ToolingError, ToolingResult};
use crate::insertion::{ImportInserter, InsertOutcome, ShapeKind};
use crate::inventory::{InventorySource, SourceFileRecord};
use crate::io::OutputManager;

/// Per-run switches that do not belong in the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Report only, never write
    pub dry_run: bool,
    /// Dump the inventory before and after canonicalization
    pub verbose: bool,
}

/// Result for one (file, import) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileResult {
    pub import: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Added { shape: ShapeKind },
    Unchanged,
    Failed { code: String, error: String },
    /// Dry run
    Skipped,
}

/// Everything a run found and did.
#[derive(Debug, Clone, Serialize)]
pub struct RemediationReport {
    pub entry_file: String,
    pub dry_run: bool,
    pub listed_files: usize,
    pub canonical_files: usize,
    pub missing: MissingImportIndex,
    pub results: Vec<FileResult>,
}

impl RemediationReport {
    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.status)).count()
    }

    pub fn added(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Added { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Unchanged))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Skipped))
    }
}

impl fmt::Display for RemediationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Summary: {} added, {} failed, {} unchanged, {} skipped ({} of {} files checked)",
            self.added(),
            self.failed(),
            self.unchanged(),
            self.skipped(),
            self.canonical_files,
            self.listed_files
        )
    }
}

/// Drives a remediation run over an inventory source.
pub struct Remediator<S> {
    source: S,
    inserter: ImportInserter,
    entry_file: String,
    canonical_name: String,
    packages: Vec<String>,
    tidy_command: String,
}

impl<S: InventorySource> Remediator<S> {
    pub fn new(settings: &Settings, source: S) -> Self {
        Self {
            source,
            inserter: ImportInserter::from_settings(settings),
            entry_file: settings.entry_file.clone(),
            canonical_name: settings.canonical_file_name(),
            packages: settings.packages.clone(),
            tidy_command: format!("{} mod tidy", settings.toolchain.program),
        }
    }

    pub fn run(&self, options: RunOptions, out: &mut OutputManager) -> ToolingResult<RemediationReport> {
        let records = self.source.list(&self.entry_file)?;
        let listed_files = records.len();
        if options.verbose {
            self.dump(out, "", &records)?;
        }

        let canonical = canonicalize(records, &self.canonical_name);
        let canonical_files = canonical.len();
        if canonical.is_empty() {
            debug!(entry = %self.canonical_name, "no package matches the entry name");
        }
        if options.verbose {
            let records: Vec<SourceFileRecord> = canonical.records().cloned().collect();
            self.dump(out, " after filtering", &records)?;
        }

        let missing = find_missing_imports(canonical.records(), self.packages.as_slice());
        info!(
            listed_files,
            canonical_files,
            missing = missing.total_missing(),
            dry_run = options.dry_run,
            "detected missing imports"
        );

        let mut results = Vec::new();
        for entry in missing.iter() {
            emit(
                out,
                &format!(
                    "package {} is missing in the following files:",
                    THEME.apply(&THEME.code, &entry.import)
                ),
            )?;
            for file in &entry.files {
                emit(out, &format!(" - {}", THEME.apply(&THEME.path, file.display())))?;
            }

            for file in &entry.files {
                let status = if options.dry_run {
                    FileStatus::Skipped
                } else {
                    self.insert_one(out, file, &entry.import)?
                };
                results.push(FileResult {
                    import: entry.import.clone(),
                    path: file.clone(),
                    status,
                });
            }
        }

        emit(
            out,
            &format!(
                "goautoimports completed, please run '{}' to clean up the imports.",
                self.tidy_command
            ),
        )?;

        Ok(RemediationReport {
            entry_file: self.entry_file.clone(),
            dry_run: options.dry_run,
            listed_files,
            canonical_files,
            missing,
            results,
        })
    }

    fn insert_one(
        &self,
        out: &mut OutputManager,
        file: &std::path::Path,
        import: &str,
    ) -> ToolingResult<FileStatus> {
        let status = match self.inserter.insert(file, import) {
            Ok(InsertOutcome::Inserted { shape }) => {
                emit(
                    out,
                    &format!(
                        "{} {import} to {}",
                        THEME.apply(&THEME.success, "added"),
                        file.display()
                    ),
                )?;
                FileStatus::Added { shape }
            }
            Ok(InsertOutcome::Unchanged) => {
                emit(
                    out,
                    &format!(
                        "{} {}: no import declaration or package clause found",
                        THEME.apply(&THEME.warning, "left unchanged"),
                        file.display()
                    ),
                )?;
                FileStatus::Unchanged
            }
            Err(e) => {
                warn!(path = %e.path().display(), import, error = %e, "failed to insert import");
                emit(
                    out,
                    &format!(
                        "{} {import} to {}: {e}",
                        THEME.apply(&THEME.error, "failed to add"),
                        file.display()
                    ),
                )?;
                for suggestion in e.recovery_suggestions() {
                    emit(out, &format!("  Suggestion: {suggestion}"))?;
                }
                FileStatus::Failed {
                    code: e.status_code(),
                    error: e.to_string(),
                }
            }
        };
        Ok(status)
    }

    fn dump(
        &self,
        out: &mut OutputManager,
        suffix: &str,
        records: &[SourceFileRecord],
    ) -> ToolingResult<()> {
        debug!(files = records.len(), "dumping inventory{suffix}");
        emit(
            out,
            &format!(
                "module '{}' has {} go files{suffix}",
                self.entry_file,
                records.len()
            ),
        )?;
        for record in records {
            emit(out, &format!(" - path: {}", record.path.display()))?;
            emit(out, "   imports:")?;
            for import in &record.imports {
                emit(out, &format!("    - {import}"))?;
            }
        }
        Ok(())
    }
}

fn emit(out: &mut OutputManager, line: &str) -> ToolingResult<()> {
    out.info(line)
        .map_err(|source| ToolingError::ReportWrite { source })
}
