//! End-to-end remediation runs over real files
//!
//! Key validations:
//! - Every import shape is rewritten in place, other files stay untouched
//! - A second run finds nothing to do and leaves files byte-identical
//! - Dry runs never write

mod common;

use anyhow::Result;
use common::{AUTOMAXPROCS, AUTOMEMLIMIT, DiskInventory, SharedBuf, TestProject};
use goautoimports::io::{OutputFormat, OutputManager};
use goautoimports::{FileStatus, Remediator, RunOptions, Settings};

const API_MAIN: &str = "package main\n\nimport \"fmt\"\n\nfunc main() { fmt.Println(\"api\") }\n";
const API_ROUTES: &str = "package main\n\nfunc routes() {}\n";
const WORKER_MAIN: &str = "package main\n\nimport (\n\t\"os\"\n\t_ \"go.uber.org/automaxprocs\"\n)\n\nfunc main() { os.Exit(0) }\n";
const GEN: &str = "// Command gen generates code.\npackage main\n\nfunc main() {}\n";
const LIB: &str = "package lib\n\nfunc Helper() {}\n";

fn sample_project() -> TestProject {
    let project = TestProject::new();
    project.add_file("cmd/api/main.go", API_MAIN);
    project.add_file("cmd/api/routes.go", API_ROUTES);
    project.add_file("cmd/worker/main.go", WORKER_MAIN);
    project.add_file("tools/gen/gen.go", GEN);
    project.add_file("internal/lib/lib.go", LIB);
    project
}

fn settings() -> Settings {
    Settings {
        packages: vec![AUTOMAXPROCS.to_string(), AUTOMEMLIMIT.to_string()],
        ..Settings::default()
    }
}

fn quiet() -> OutputManager {
    OutputManager::new_with_writers(
        OutputFormat::Text,
        Box::new(std::io::sink()),
        Box::new(std::io::sink()),
    )
}

#[test]
fn test_full_run_rewrites_each_shape() -> Result<()> {
    let project = sample_project();
    let remediator = Remediator::new(&settings(), DiskInventory::new(project.path()));

    let report = remediator.run(RunOptions::default(), &mut quiet())?;

    assert_eq!(report.listed_files, 4);
    assert_eq!(report.canonical_files, 3);
    assert_eq!(report.added(), 5);
    assert_eq!(report.failed(), 0);

    assert_eq!(
        project.read("cmd/api/main.go"),
        "package main\n\nimport (\n\t_ \"github.com/KimMachineGun/automemlimit\"\n\t_ \"go.uber.org/automaxprocs\"\n\t\"fmt\"\n)\n\nfunc main() { fmt.Println(\"api\") }\n"
    );
    assert_eq!(
        project.read("cmd/worker/main.go"),
        "package main\n\nimport (\n\t_ \"github.com/KimMachineGun/automemlimit\"\n\t\"os\"\n\t_ \"go.uber.org/automaxprocs\"\n)\n\nfunc main() { os.Exit(0) }\n"
    );
    assert_eq!(
        project.read("tools/gen/gen.go"),
        "// Command gen generates code.\npackage main\nimport _ \"github.com/KimMachineGun/automemlimit\"\nimport _ \"go.uber.org/automaxprocs\"\n\nfunc main() {}\n"
    );

    // Non-canonical files and other packages are never edited
    assert_eq!(project.read("cmd/api/routes.go"), API_ROUTES);
    assert_eq!(project.read("internal/lib/lib.go"), LIB);
    Ok(())
}

#[test]
fn test_second_run_is_a_no_op() -> Result<()> {
    let project = sample_project();
    let remediator = Remediator::new(&settings(), DiskInventory::new(project.path()));

    remediator.run(RunOptions::default(), &mut quiet())?;
    let after_first = project.snapshot();

    let second = remediator.run(RunOptions::default(), &mut quiet())?;
    assert!(second.missing.is_empty());
    assert!(second.results.is_empty());
    assert_eq!(project.snapshot(), after_first);
    Ok(())
}

#[test]
fn test_dry_run_never_writes() -> Result<()> {
    let project = sample_project();
    let before = project.snapshot();
    let remediator = Remediator::new(&settings(), DiskInventory::new(project.path()));

    let options = RunOptions {
        dry_run: true,
        verbose: false,
    };
    let report = remediator.run(options, &mut quiet())?;

    assert_eq!(report.missing.total_missing(), 5);
    assert_eq!(report.skipped(), 5);
    assert!(
        report
            .results
            .iter()
            .all(|r| r.status == FileStatus::Skipped)
    );
    assert_eq!(project.snapshot(), before);
    Ok(())
}

#[test]
fn test_text_report_lines() -> Result<()> {
    let project = sample_project();
    let remediator = Remediator::new(&settings(), DiskInventory::new(project.path()));

    let stdout = SharedBuf::default();
    let mut out = OutputManager::new_with_writers(
        OutputFormat::Text,
        Box::new(stdout.clone()),
        Box::new(std::io::sink()),
    );
    let options = RunOptions {
        dry_run: false,
        verbose: true,
    };
    remediator.run(options, &mut out)?;

    let text = stdout.plain_contents();
    let api = project.path().join("cmd/api/main.go");
    assert!(text.contains("module 'main' has 4 go files\n"));
    assert!(text.contains("module 'main' has 3 go files after filtering\n"));
    assert!(text.contains(&format!(
        "package {AUTOMAXPROCS} is missing in the following files:\n"
    )));
    assert!(text.contains(&format!(" - {}\n", api.display())));
    assert!(text.contains(&format!("added {AUTOMEMLIMIT} to {}\n", api.display())));
    assert!(text.ends_with(
        "goautoimports completed, please run 'go mod tidy' to clean up the imports.\n"
    ));
    Ok(())
}

#[test]
fn test_json_mode_prints_only_the_response() -> Result<()> {
    let project = sample_project();
    let remediator = Remediator::new(&settings(), DiskInventory::new(project.path()));

    let stdout = SharedBuf::default();
    let mut out = OutputManager::new_with_writers(
        OutputFormat::Json,
        Box::new(stdout.clone()),
        Box::new(std::io::sink()),
    );
    let report = remediator.run(RunOptions::default(), &mut out)?;
    out.success(&report)?;

    let json: serde_json::Value = serde_json::from_str(&stdout.contents())?;
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["canonical_files"], 3);
    assert_eq!(json["data"]["results"].as_array().map(Vec::len), Some(5));
    assert_eq!(json["data"]["results"][0]["status"], "added");
    Ok(())
}

#[test]
fn test_custom_entry_file() -> Result<()> {
    let project = TestProject::new();
    project.add_file("svc/app.go", "package app\n\nimport \"net/http\"\n");
    project.add_file("svc/handlers.go", "package app\n");

    let settings = Settings {
        entry_file: "app".to_string(),
        packages: vec![AUTOMAXPROCS.to_string()],
        ..Settings::default()
    };
    let remediator = Remediator::new(&settings, DiskInventory::new(project.path()));
    let report = remediator.run(RunOptions::default(), &mut quiet())?;

    assert_eq!(report.added(), 1);
    assert_eq!(
        project.read("svc/app.go"),
        "package app\n\nimport (\n\t_ \"go.uber.org/automaxprocs\"\n\t\"net/http\"\n)\n"
    );
    assert_eq!(project.read("svc/handlers.go"), "package app\n");
    Ok(())
}

#[test]
fn test_repeated_configured_package_is_inserted_once() -> Result<()> {
    let project = TestProject::new();
    let config = project.add_file(
        "goautoimports.toml",
        &format!("packages = [\"{AUTOMAXPROCS}\", \"{AUTOMAXPROCS}\"]\n"),
    );
    project.add_file("cmd/main.go", "package main\n\nimport \"fmt\"\n");

    let settings = Settings::load_from(&config)?;
    let remediator = Remediator::new(&settings, DiskInventory::new(project.path()));
    let report = remediator.run(RunOptions::default(), &mut quiet())?;

    assert_eq!(report.missing.iter().count(), 1);
    assert_eq!(report.added(), 1);
    assert_eq!(
        project.read("cmd/main.go"),
        "package main\n\nimport (\n\t_ \"go.uber.org/automaxprocs\"\n\t\"fmt\"\n)\n"
    );
    Ok(())
}
