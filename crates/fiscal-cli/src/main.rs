//! Fiscal reference resolvers CLI.

use clap::{ColorChoice, Parser};
use fiscal_cli::config::FileConfig;
use fiscal_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_clean, run_enrich, run_lookup};
use crate::summary::{print_clean_summary, print_enrich_summary, print_lookup};

/// Exit code for a lookup that completed without finding a variable.
const EXIT_NOT_FOUND: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let config = match FileConfig::load_optional(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    };
    let exit_code = match &cli.command {
        Command::Enrich(args) => match run_enrich(args, &config) {
            Ok(result) => {
                print_enrich_summary(&result);
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Lookup(args) => match run_lookup(args, &config) {
            Ok(result) => {
                if args.json {
                    match serde_json::to_string_pretty(&result.resolved) {
                        Ok(json) => println!("{json}"),
                        Err(error) => eprintln!("error: {error}"),
                    }
                } else {
                    print_lookup(&result);
                }
                if result.resolved.is_some() { 0 } else { EXIT_NOT_FOUND }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Clean(args) => match run_clean(args) {
            Ok(result) => {
                print_clean_summary(&result);
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
