//! Propkit CLI entry point.

use clap::Parser;
use propkit::cli::args::{Cli, Commands};
use propkit::cli::output::Output;
use propkit::cli::{apply, reorder, scan, show};
use propkit::config::Config;
use propkit::error::{ExitCode as PropExitCode, PropError};
use propkit::store::VaultStore;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => ExitCode::from(code.code() as u8),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(cli: &Cli) -> Result<PropExitCode, PropError> {
    // Load config
    let config = Config::load()?;

    // Resolve vault path
    let vault_path = config.resolve_vault_path(cli.vault.as_deref())?;
    let mut store = VaultStore::open(vault_path)?;

    // Create output helper
    let output = Output::new(cli.output_format(), cli.quiet);

    // Dispatch command
    match &cli.command {
        Commands::Show(args) => show::run(&store, args, &output),
        Commands::Apply(args) => apply::run(&mut store, args, &output),
        Commands::Scan(args) => scan::run(&store, args, &output),
        Commands::Reorder(args) => reorder::run(&mut store, args, &output),
    }
}
