//! datastd CLI.

use clap::Parser;

use datastd_cli::cli::{Cli, Command};
use datastd_cli::commands::{run_check, run_standardize};
use datastd_cli::logging::{init_logging, log_config_from_cli};
use datastd_cli::summary::{print_checks, print_report};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let outcome = match &cli.command {
        Command::Run(args) => run_standardize(args)
            .and_then(|report| print_report(&report, args.format, args.dry_run)),
        Command::Check(args) => run_check(args).and_then(|checks| print_checks(&checks, args.format)),
    };
    let exit_code = match outcome {
        Ok(()) => 0,
        Err(error) => {
            tracing::error!(error = %error, "command failed");
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}
