//! Partner revenue pipeline CLI.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};

use revpipe_cli::commands::{run_partner, RunOptions};
use revpipe_cli::logging::{init_logging, LogConfig, LogFormat};
use revpipe_cli::summary::print_summary;
use revpipe_model::Partner;

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, RunArgs};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    init_logging(&log_config_from_cli(&cli));

    let exit_code = match &cli.command {
        Command::Hearst(args) => run(Partner::Hearst, args),
        Command::Boston(args) => run(Partner::Boston, args),
        Command::Houston(args) => run(Partner::Houston, args),
        Command::Pittsburgh(args) => run(Partner::Pittsburgh, args),
        Command::Partners => {
            for partner in Partner::ALL {
                println!("{partner}");
            }
            0
        }
    };
    std::process::exit(exit_code);
}

fn run(partner: Partner, args: &RunArgs) -> i32 {
    let options = RunOptions {
        data_dir: args.data_dir.clone(),
        lookup_dir: args.lookup_dir.clone(),
        output_dir: args.output_dir.clone(),
        dry_run: args.dry_run,
    };
    match run_partner(partner, &options) {
        Ok(result) => {
            print_summary(&result);
            0
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !cli.verbosity.is_present();
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stderr().is_terminal(),
    };
    config
}
