//! Main entry point for the photomesh CLI

use clap::Parser;
use std::process::ExitCode;

use photomesh::capability::Capabilities;
use photomesh::cli::Cli;
use photomesh::config::StageConfig;
use photomesh::pipeline;
use photomesh::utils::logging;

fn main() -> ExitCode {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logger
    logging::init(cli.verbose, cli.quiet);

    let config = StageConfig::from_cli(&cli);
    let caps = Capabilities::detect();

    // The caller applies its own fallbacks, so anything past input
    // validation exits 0
    match pipeline::run(&config, &caps) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
