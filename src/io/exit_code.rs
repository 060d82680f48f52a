//! Exit codes for CLI runs following Unix conventions.
//!
//! # Exit Code Semantics
//!
//! - `0`: Success - the run completed, including runs where some files failed
//! - `5-7`: Fatal errors that aborted the run
//! - `126-255`: Reserved by shell

use crate::error::ToolingError;

/// Standard exit codes for CLI runs.
///
/// Per-file insertion failures never change the exit code; only errors that
/// abort the whole run map to a non-zero value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Run completed (code 0)
    Success = 0,

    /// File I/O error (code 5)
    IoError = 5,

    /// Configuration error (code 6)
    ConfigError = 6,

    /// Package listing failed (code 7)
    ToolingFailed = 7,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl ExitCode {
    /// Convert a `ToolingError` to the appropriate exit code.
    pub fn from_error(error: &ToolingError) -> Self {
        match error {
            ToolingError::Spawn { .. }
            | ToolingError::CommandFailed { .. }
            | ToolingError::InvalidUtf8
            | ToolingError::MalformedOutput { .. } => ExitCode::ToolingFailed,
            ToolingError::InvalidEntryName { .. } | ToolingError::Config { .. } => {
                ExitCode::ConfigError
            }
            ToolingError::FileRead { .. } | ToolingError::ReportWrite { .. } => ExitCode::IoError,
        }
    }
}
