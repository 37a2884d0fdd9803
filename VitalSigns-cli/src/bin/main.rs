use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use tracing::{debug, info};
use vital_signs_cli::console::render;
use vital_signs_cli::{dispatch, logging, Cli, Command};
use vital_signs_data::repository::FileVisitLog;
use vital_signs_domain::services::PatientRecordService;

/// Entry point for the vital-signs console
///
/// Loads `.env`, parses the command line, sets up tracing, ingests the data
/// file and runs the requested command (the interactive menu by default).
fn main() -> anyhow::Result<()> {
    let dotenv_loaded = dotenv().is_ok();

    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);
    if !dotenv_loaded {
        debug!(".env file not found, using process environment only");
    }

    let config = cli.storage_config().context("Invalid storage configuration")?;
    info!("Using data file {}", config.data_file.display());

    let log = FileVisitLog::from_config(&config);
    let (mut service, summary) = PatientRecordService::load(log)
        .with_context(|| format!("Failed to load visits from {}", config.data_file.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render::write_load_summary(&mut out, &summary)?;

    let command = cli.command.unwrap_or(Command::Menu);
    dispatch(&mut service, command, io::stdin().lock(), &mut out)?;

    out.flush()?;
    Ok(())
}
