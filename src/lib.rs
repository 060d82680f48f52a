/// Blank import remediation for Go modules
pub mod canonical;
pub mod config;
pub mod detect;
pub mod display;
pub mod error;
pub mod insertion;
pub mod inventory;
pub mod io;
pub mod remediate;

// Explicit exports for better API clarity
pub use canonical::{CanonicalFileSet, canonicalize};
pub use config::Settings;
pub use detect::{MissingImport, MissingImportIndex, find_missing_imports};
pub use error::{InsertionError, InsertionResult, ToolingError, ToolingResult};
pub use insertion::{ImportInserter, InsertOutcome, ShapeKind, insert_into_source};
pub use inventory::{GoListInventory, InventorySource, SourceFileRecord};
pub use remediate::{FileResult, FileStatus, RemediationReport, Remediator, RunOptions};
