//! Configuration for import remediation runs.
//!
//! Settings are layered:
//! - Default values
//! - `.goautoimports.toml`, found by walking up from the working directory
//! - Environment variable overrides
//! - CLI argument overrides (applied by the binary)
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `GOAUTOIMPORTS_` and use double
//! underscores to separate nested levels:
//! - `GOAUTOIMPORTS_ENTRY_FILE=app` sets `entry_file`
//! - `GOAUTOIMPORTS_TOOLCHAIN__PROGRAM=go1.22` sets `toolchain.program`
//! - `GOAUTOIMPORTS_INSERTION__STRICT=false` sets `insertion.strict`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the per-project configuration file
pub const CONFIG_FILE_NAME: &str = ".goautoimports.toml";

const ENV_PREFIX: &str = "GOAUTOIMPORTS_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Base name (without extension) of each package's canonical file
    #[serde(default = "default_entry_file")]
    pub entry_file: String,

    /// Import paths every canonical file must carry as blank imports
    #[serde(default = "default_packages")]
    pub packages: Vec<String>,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Package listing settings
    #[serde(default)]
    pub toolchain: ToolchainConfig,

    /// Import insertion settings
    #[serde(default)]
    pub insertion: InsertionConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ToolchainConfig {
    /// Toolchain binary used for `list`
    #[serde(default = "default_program")]
    pub program: String,

    /// Package pattern handed to `go list`
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Source file extension, used to build the canonical file name
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Re-read each listed file and use the imports it declares itself
    /// instead of the package-wide import list
    #[serde(default = "default_true")]
    pub per_file_imports: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InsertionConfig {
    /// Report a file with no recognizable import anchor as a failure
    /// instead of leaving it untouched silently
    #[serde(default = "default_true")]
    pub strict: bool,
}

// Default value functions
fn default_entry_file() -> String {
    "main".to_string()
}
fn default_packages() -> Vec<String> {
    vec![
        "go.uber.org/automaxprocs".to_string(),
        "github.com/KimMachineGun/automemlimit".to_string(),
    ]
}
fn default_program() -> String {
    "go".to_string()
}
fn default_pattern() -> String {
    "./...".to_string()
}
fn default_extension() -> String {
    "go".to_string()
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            entry_file: default_entry_file(),
            packages: default_packages(),
            debug: false,
            toolchain: ToolchainConfig::default(),
            insertion: InsertionConfig::default(),
        }
    }
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            pattern: default_pattern(),
            extension: default_extension(),
            per_file_imports: true,
        }
    }
}

impl Default for InsertionConfig {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl Settings {
    /// Load configuration, searching for the config file from `start` upwards
    pub fn load_in(start: &Path) -> Result<Self, Box<figment::Error>> {
        // Relative starts like "." have no ancestors to walk
        let start = start
            .canonicalize()
            .unwrap_or_else(|_| start.to_path_buf());
        let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));
        if let Some(config_path) = Self::find_config_file(&start) {
            figment = figment.merge(Toml::file(config_path));
        }
        Self::extract(figment)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path));
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self, Box<figment::Error>> {
        figment
            // Double underscore (__) separates nested levels, single underscore stays
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract::<Self>()
            .map(Self::normalized)
            .map_err(Box::new)
    }

    /// Drop repeated required imports, keeping the first occurrence
    fn normalized(mut self) -> Self {
        self.packages = dedup_packages(self.packages.iter().map(String::as_str));
        self
    }

    /// Find `.goautoimports.toml` in `start` or one of its ancestors
    pub fn find_config_file(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// File name that marks the canonical file of a package, e.g. `main.go`
    pub fn canonical_file_name(&self) -> String {
        format!("{}.{}", self.entry_file, self.toolchain.extension)
    }
}

/// Split a comma-separated import list.
///
/// Entries are trimmed, empty entries dropped and duplicates removed while
/// keeping the first occurrence.
pub fn parse_package_list(raw: &str) -> Vec<String> {
    dedup_packages(raw.split(','))
}

fn dedup_packages<'a>(entries: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut packages: Vec<String> = Vec::new();
    for entry in entries.into_iter().map(str::trim).filter(|s| !s.is_empty()) {
        if !packages.iter().any(|p| p == entry) {
            packages.push(entry.to_string());
        }
    }
    packages
}
