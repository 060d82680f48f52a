//! Inventory backed by `go list`.
//!
//! A Go template turns every file of every matching package into a YAML
//! record:
//!
//! ```yaml
//! - path: "/repo/cmd/api/main.go"
//!   imports:
//!     - "fmt"
//! ```

use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;
use tracing::debug;

use super::{InventorySource, SourceFileRecord};
use crate::config::Settings;
use crate::error::{ToolingError, ToolingResult};
use crate::insertion::scan::declared_imports;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Lists package files through the Go toolchain.
#[derive(Debug, Clone)]
pub struct GoListInventory {
    program: String,
    pattern: String,
    working_dir: PathBuf,
    per_file_imports: bool,
}

/// Raw record as printed by the template; `imports` is null for packages
/// without imports.
#[derive(Debug, Deserialize)]
struct ListedFile {
    path: PathBuf,
    imports: Option<Vec<String>>,
}

impl GoListInventory {
    pub fn from_settings(settings: &Settings, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: settings.toolchain.program.clone(),
            pattern: settings.toolchain.pattern.clone(),
            working_dir: working_dir.into(),
            per_file_imports: settings.toolchain.per_file_imports,
        }
    }

    fn run_listing(&self, template: &str) -> ToolingResult<String> {
        let command_line = format!("{} list -f <template> {}", self.program, self.pattern);
        debug!(
            command = %command_line,
            dir = %self.working_dir.display(),
            "listing packages"
        );

        let output = Command::new(&self.program)
            .args(["list", "-f", template, &self.pattern])
            .current_dir(&self.working_dir)
            .output()
            .map_err(|source| ToolingError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ToolingError::CommandFailed {
                command: command_line,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| ToolingError::InvalidUtf8)
    }
}

impl InventorySource for GoListInventory {
    fn list(&self, entry_name: &str) -> ToolingResult<Vec<SourceFileRecord>> {
        let template = listing_template(entry_name)?;
        let stdout = self.run_listing(&template)?;
        let mut records = parse_listing(&stdout)?;
        debug!(files = records.len(), "parsed package listing");

        if self.per_file_imports {
            refine_declared_imports(&mut records)?;
        }
        Ok(records)
    }
}

/// Build the `go list -f` template selecting packages named `entry_name`.
pub fn listing_template(entry_name: &str) -> ToolingResult<String> {
    if !IDENTIFIER.is_match(entry_name) {
        return Err(ToolingError::InvalidEntryName {
            name: entry_name.to_string(),
        });
    }

    let mut tmpl = String::new();
    tmpl.push_str("{{ range .GoFiles }}");
    tmpl.push_str(&format!("{{{{ if eq $.Name \"{entry_name}\" }}}}"));
    tmpl.push_str(r#"{{ printf "- path: %q\n" (printf "%s/%s" $.Dir .) }}"#);
    tmpl.push_str(r#"{{ printf "  imports:\n" }}"#);
    tmpl.push_str("{{ range $.Imports }}");
    tmpl.push_str(r#"{{ printf "    - %q\n" . }}"#);
    tmpl.push_str("{{ end }}");
    tmpl.push_str("{{ end }}");
    tmpl.push_str("{{ end }}");
    Ok(tmpl)
}

/// Parse the YAML document printed by the listing template.
pub fn parse_listing(output: &str) -> ToolingResult<Vec<SourceFileRecord>> {
    if output.trim().is_empty() {
        return Ok(Vec::new());
    }

    let listed: Option<Vec<ListedFile>> =
        serde_yaml::from_str(output).map_err(|e| ToolingError::MalformedOutput {
            reason: e.to_string(),
        })?;

    Ok(listed
        .unwrap_or_default()
        .into_iter()
        .map(|file| SourceFileRecord::new(file.path, file.imports.unwrap_or_default()))
        .collect())
}

/// Replace package-level imports with the ones each file declares itself.
pub fn refine_declared_imports(records: &mut [SourceFileRecord]) -> ToolingResult<()> {
    for record in records.iter_mut() {
        record.imports = read_declared_imports(&record.path)?;
    }
    Ok(())
}

fn read_declared_imports(path: &Path) -> ToolingResult<Vec<String>> {
    let source = std::fs::read_to_string(path).map_err(|source| ToolingError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(declared_imports(&source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_template_embeds_entry_name() {
        let tmpl = listing_template("main").unwrap();
        assert!(tmpl.starts_with("{{ range .GoFiles }}"));
        assert!(tmpl.contains(r#"{{ if eq $.Name "main" }}"#));
        assert!(tmpl.contains("{{ range $.Imports }}"));
        assert_eq!(tmpl.matches("{{ end }}").count(), 3);
    }

    #[test]
    fn test_template_rejects_non_identifier() {
        for bad in ["", "main\" }}", "cmd/main", "1main", "ma in"] {
            let err = listing_template(bad).unwrap_err();
            assert!(matches!(err, ToolingError::InvalidEntryName { .. }), "{bad}");
        }
    }

    #[test]
    fn test_parse_listing() {
        let output = r#"- path: "/repo/cmd/api/main.go"
  imports:
    - "fmt"
    - "go.uber.org/automaxprocs"
- path: "/repo/cmd/api/routes.go"
  imports:
- path: "/repo/cmd/worker/main.go"
  imports:
    - "github.com/KimMachineGun/automemlimit"
"#;
        let records = parse_listing(output).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].path, PathBuf::from("/repo/cmd/api/main.go"));
        assert_eq!(records[0].imports, vec!["fmt", "go.uber.org/automaxprocs"]);
        assert!(records[1].imports.is_empty());
        assert_eq!(
            records[2].imports,
            vec!["github.com/KimMachineGun/automemlimit"]
        );
    }

    #[test]
    fn test_parse_empty_listing() {
        assert!(parse_listing("").unwrap().is_empty());
        assert!(parse_listing("\n  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed_listing() {
        let err = parse_listing("- path: [unterminated\n").unwrap_err();
        assert!(matches!(err, ToolingError::MalformedOutput { .. }));
    }

    #[test]
    fn test_missing_toolchain_is_spawn_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.toolchain.program = "goautoimports-no-such-toolchain".to_string();
        let inventory = GoListInventory::from_settings(&settings, temp_dir.path());
        let err = inventory.list("main").unwrap_err();
        assert!(matches!(err, ToolingError::Spawn { .. }));
        assert_eq!(err.status_code(), "TOOLCHAIN_NOT_FOUND");
    }

    #[test]
    fn test_refine_uses_file_declared_imports() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("main.go");
        std::fs::write(
            &path,
            "package main\n\nimport (\n\t\"fmt\"\n\tlog \"github.com/sirupsen/logrus\"\n)\n",
        )
        .unwrap();

        let mut records = vec![SourceFileRecord::new(
            &path,
            vec!["fmt".to_string(), "go.uber.org/automaxprocs".to_string()],
        )];
        refine_declared_imports(&mut records).unwrap();
        assert_eq!(records[0].imports, vec!["fmt", "github.com/sirupsen/logrus"]);
    }

    #[test]
    fn test_refine_unreadable_file_is_tooling_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut records = vec![SourceFileRecord::new(
            temp_dir.path().join("gone.go"),
            vec![],
        )];
        let err = refine_declared_imports(&mut records).unwrap_err();
        assert!(matches!(err, ToolingError::FileRead { .. }));
    }
}
