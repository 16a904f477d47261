//! xlsxport - export spreadsheet config tables

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use xlsxport::config::Config;
use xlsxport::{logging, BatchExporter};

/// Export spreadsheet config tables to txt, JSON, Lua, MessagePack and TypeScript
#[derive(Parser, Debug)]
#[command(name = "xlsxport")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON config file
    #[arg(short = 'C', long, default_value = "./config.json")]
    config: PathBuf,

    /// Workbook root directory, overrides the configured root
    #[arg(long)]
    root: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let started = Instant::now();

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;
    if let Some(root) = cli.root {
        config = config.with_root(root);
    }
    config.validate()?;

    for (format, dir) in config.enabled_outputs() {
        std::fs::create_dir_all(dir).with_context(|| {
            format!("Failed to create {} output directory: {}", format, dir.display())
        })?;
    }

    let exporter = BatchExporter::new(config);
    let report = exporter.export().context("Export failed")?;

    info!(
        tables = report.tables.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "done"
    );
    Ok(())
}
