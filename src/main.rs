// SPDX-License-Identifier: MIT OR Apache-2.0

//! lbsearch - Interactive fuzzy search over LaunchBox game catalogs

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lbsearch::app::App;
use lbsearch::catalog;
use lbsearch::cli::Cli;
use lbsearch::config::Config;
use lbsearch::errors::exit;

fn main() -> ExitCode {
    // Logs go to stderr so frames on stdout stay intact.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => ExitCode::from(code.clamp(0, exit::MAX_ENTRY_CODE) as u8),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit::ERROR as u8)
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = Config::load();

    let entries = catalog::xml::load(&cli.catalog)
        .with_context(|| format!("failed to load catalog {}", cli.catalog.display()))?;
    info!(entries = entries.len(), catalog = %cli.catalog.display(), "catalog loaded");

    let app = App::new(
        entries,
        config.merge_max_results(cli.max_results),
        config.merge_preview_length(),
        cli.query.unwrap_or_default(),
    );
    app.run()
}
