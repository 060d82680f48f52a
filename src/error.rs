//! Error types for import remediation
//!
//! This module provides structured error types using thiserror. Two families
//! exist: `ToolingError` is fatal and aborts a run, `InsertionError` is scoped
//! to a single file and is recovered by the remediation driver.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while building the package inventory.
#[derive(Error, Debug)]
pub enum ToolingError {
    /// The toolchain binary could not be started
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("'{command}' exited with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Toolchain output is not valid UTF-8")]
    InvalidUtf8,

    #[error("Failed to parse package listing: {reason}")]
    MalformedOutput { reason: String },

    /// Entry names are spliced into the listing template, so only identifiers are accepted
    #[error("Invalid entry file name '{name}': expected a Go identifier")]
    InvalidEntryName { name: String },

    #[error("Failed to read listed file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Failed to write report: {source}")]
    ReportWrite { source: std::io::Error },
}

impl ToolingError {
    /// Stable status code for JSON responses
    pub fn status_code(&self) -> String {
        match self {
            Self::Spawn { .. } => "TOOLCHAIN_NOT_FOUND",
            Self::CommandFailed { .. } => "TOOLCHAIN_FAILED",
            Self::InvalidUtf8 => "INVALID_UTF8",
            Self::MalformedOutput { .. } => "MALFORMED_OUTPUT",
            Self::InvalidEntryName { .. } => "INVALID_ENTRY_NAME",
            Self::FileRead { .. } => "FILE_READ_ERROR",
            Self::Config { .. } => "CONFIG_ERROR",
            Self::ReportWrite { .. } => "REPORT_WRITE_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Spawn { .. } => vec![
                "Check that the Go toolchain is installed and on PATH",
                "Set toolchain.program in .goautoimports.toml to the go binary to use",
            ],
            Self::CommandFailed { .. } => vec![
                "Run the command from the module root (the directory holding go.mod)",
                "Make sure the module builds with 'go list ./...'",
            ],
            Self::MalformedOutput { .. } | Self::InvalidUtf8 => {
                vec!["Check for unusual characters in package directories or import paths"]
            }
            Self::InvalidEntryName { .. } => {
                vec!["Pass the package/file base name without extension, e.g. --module main"]
            }
            Self::FileRead { .. } => vec![
                "Check that the file exists and you have read permissions",
                "Set toolchain.per_file_imports = false to use package-level imports",
            ],
            Self::Config { .. } => vec!["Check .goautoimports.toml and GOAUTOIMPORTS_* variables"],
            Self::ReportWrite { .. } => vec!["Check that standard output is still open"],
        }
    }
}

/// Failures while inserting an import into one file.
#[derive(Error, Debug)]
pub enum InsertionError {
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Neither an import declaration nor a package clause was recognized
    #[error("No import declaration or package clause found in '{path}'")]
    NoImportAnchor { path: PathBuf },
}

impl InsertionError {
    pub fn status_code(&self) -> String {
        match self {
            Self::FileRead { .. } => "FILE_READ_ERROR",
            Self::FileWrite { .. } => "FILE_WRITE_ERROR",
            Self::NoImportAnchor { .. } => "NO_IMPORT_ANCHOR",
        }
        .to_string()
    }

    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::FileRead { .. } => vec!["Check that the file still exists and is readable"],
            Self::FileWrite { .. } => {
                vec!["Check write permissions on the file and its directory"]
            }
            Self::NoImportAnchor { .. } => vec![
                "Add a package clause to the file",
                "Set insertion.strict = false to leave such files untouched",
            ],
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::FileRead { path, .. }
            | Self::FileWrite { path, .. }
            | Self::NoImportAnchor { path } => path,
        }
    }
}

/// Result type alias for inventory operations
pub type ToolingResult<T> = Result<T, ToolingError>;

/// Result type alias for insertion operations
pub type InsertionResult<T> = Result<T, InsertionError>;
