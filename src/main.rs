//! `scansinglefile` — scan one file with the ScanCode toolkit and print a reduced JSON report.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load scanner config ([`config::load_config`]).
//! 3. Run the requested scans in order: copyrights, licenses, emails, urls ([`processor`]).
//! 4. Reshape each category's findings ([`projector`]).
//! 5. Print one line of JSON with the keys `licenses`, `copyrights`, `holders`,
//!    `emails` and `urls` to stdout.
//!
//! Any failure prints an error on stderr, nothing on stdout, and exits `1`.

mod cli;
mod config;
mod models;
mod processor;
mod projector;
mod scanner;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use cli::Cli;
use config::load_config;
use models::ScanSelection;
use processor::process_file;
use scanner::ScancodeCli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let work_dir = std::env::current_dir()?;
    let mut config = load_config(&work_dir, cli.config.as_deref())?;
    if let Some(program) = &cli.scancode {
        config.scancode.program = program.clone();
    }

    let scanner = ScancodeCli::new(config.scancode)
        .verbose(cli.verbose)
        .quiet(cli.quiet);

    let selection = ScanSelection::from(&cli);
    if selection.is_empty() && cli.verbose {
        eprintln!("  {} no scan requested", "→".cyan());
    }

    let result = process_file(&scanner, &cli.file_location, &selection)?;

    println!("{}", serde_json::to_string(&result)?);

    Ok(())
}
