//! swagrag CLI
//!
//! Entry point for the `swagrag` command-line tool.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use swagrag::{Cli, MergeConfig, telemetry};

fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    let config = match MergeConfig::try_from(cli) {
        Ok(config) => config,
        Err(err) => Cli::command().error(ErrorKind::TooFewValues, err).exit(),
    };

    let mut stdout = std::io::stdout().lock();
    match swagrag::run(&config, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
