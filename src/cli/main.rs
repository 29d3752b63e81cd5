//! Command-line interface entry point for `CohortAnalytics`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use cohort_analytics::config::Config;
use logger::{enable_debug, enable_verbose, info, init_file_logging, set_level, warn, Level};

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag wins over config logging.level; unparsable config falls back to warn
    let effective_level = args
        .log_level
        .map(Level::from)
        .or_else(|| parse_level(&config.logging.level))
        .unwrap_or(Level::Warn);

    let mut level = effective_level;
    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // File logging: CLI flag wins, otherwise config logging.file if set
    let config_log_path: Option<std::path::PathBuf> = if config.logging.file.is_empty() {
        None
    } else {
        Some(std::path::PathBuf::from(&config.logging.file))
    };

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults);
        }
        Command::Dashboard {
            input_file,
            output,
            format,
            filters,
        } => {
            commands::dashboard::run(&input_file, output.as_deref(), &format, &filters, &config);
        }
        Command::Export {
            input_file,
            output,
            filters,
        } => {
            commands::export::run(&input_file, output.as_deref(), &filters, &config);
        }
    }
}

fn parse_level(val: &str) -> Option<Level> {
    match val.parse::<Level>() {
        Ok(level) => Some(level),
        Err(e) => {
            warn!("{e} in config logging.level");
            None
        }
    }
}
