// src/main.rs

//! Main entry point for `tprl`.

use std::fs::OpenOptions;
use std::io::stdout;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use tprl::config::CONFIG;
use tprl::controller::Controller;
use tprl::platform::ConsolePlatform;
use tprl::registry::Registry;

/// Shows a TPRL page in the terminal.
///
/// Keys: R reloads the page, X or Escape exits. Both ask for confirmation.
#[derive(Debug, Parser)]
#[command(name = "tprl", version, about)]
struct Args {
    /// Page to show. Defaults to main_page.tprl in the working directory.
    document: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Log to a file; anything on stdout or stderr would land in the page.
    let log_path = CONFIG.logging.file_path();
    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    info!("Starting tprl...");

    let registry = Registry::builtin().context("Failed to build the element registry")?;
    let platform = ConsolePlatform::new().context("Failed to initialize ConsolePlatform")?;

    // The controller, and with it the platform, is dropped before returning so
    // the terminal is restored before any error is printed.
    let result = {
        let mut controller =
            Controller::new(platform, stdout(), registry, CONFIG.clone(), args.document);
        controller.run()
    };

    info!("tprl exited.");
    result
}
