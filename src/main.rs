//! CLI entry point for goautoimports.
//!
//! Lists the module's packages, finds entry files missing the required blank
//! imports and inserts them. Per-file failures are reported and do not change
//! the exit status; a failed package listing does.

use clap::{
    Parser,
    builder::styling::{AnsiColor, Effects, Styles},
};
use goautoimports::config::parse_package_list;
use goautoimports::io::{ExitCode, OutputFormat, OutputManager};
use goautoimports::{GoListInventory, Remediator, RunOptions, Settings, ToolingError, ToolingResult};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Automatically add blank imports to Go entry files
#[derive(Parser)]
#[command(
    name = "goautoimports",
    version = env!("CARGO_PKG_VERSION"),
    about = "Automatically add blank imports to Go entry files",
    long_about = "Finds the entry file of every package named after --module and adds the \
                  --pkg imports as blank imports where they are missing.",
    next_line_help = true,
    styles = clap_cargo_style(),
    after_help = "Examples:\n  goautoimports --dryrun\n  goautoimports -m main -p go.uber.org/automaxprocs\n  goautoimports -C ./services --json\n\nAfter a run, resolve new module requirements with 'go mod tidy'."
)]
struct Cli {
    /// Entry file base name and package name [default: main]
    #[arg(short, long)]
    module: Option<String>,

    /// Comma-separated import paths to require
    /// [default: go.uber.org/automaxprocs,github.com/KimMachineGun/automemlimit]
    #[arg(short, long)]
    pkg: Option<String>,

    /// Report missing imports without modifying any file
    #[arg(long)]
    dryrun: bool,

    /// Dump the package inventory before and after filtering
    #[arg(long)]
    verbose: bool,

    /// Directory to list packages from
    #[arg(short = 'C', long, default_value = ".")]
    dir: PathBuf,

    /// Path to a custom .goautoimports.toml file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output the run report in JSON format
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    let mut out = OutputManager::new(OutputFormat::from_json_flag(cli.json));

    let code = match run(&cli, &mut out) {
        Ok(code) => code,
        Err(e) => out.error(&e).unwrap_or_else(|_| ExitCode::from_error(&e)),
    };
    std::process::exit(code.into());
}

fn run(cli: &Cli, out: &mut OutputManager) -> ToolingResult<ExitCode> {
    let settings = load_settings(cli)?;
    init_tracing(cli.verbose || settings.debug);

    let options = RunOptions {
        dry_run: cli.dryrun,
        verbose: cli.verbose,
    };
    let inventory = GoListInventory::from_settings(&settings, cli.dir.clone());
    let report = Remediator::new(&settings, inventory).run(options, out)?;

    out.success(&report)
        .map_err(|source| ToolingError::ReportWrite { source })
}

/// Layered settings with CLI flags applied last
fn load_settings(cli: &Cli) -> ToolingResult<Settings> {
    let loaded = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load_in(&cli.dir),
    };
    let mut settings = loaded.map_err(|e| ToolingError::Config {
        reason: e.to_string(),
    })?;

    if let Some(module) = &cli.module {
        settings.entry_file = module.clone();
    }
    if let Some(pkg) = &cli.pkg {
        settings.packages = parse_package_list(pkg);
    }
    Ok(settings)
}

/// Initialize stderr logging; `RUST_LOG` refines the default level
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
