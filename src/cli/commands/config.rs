//! Config command handler

use crate::args::ConfigSubcommand;
use cohort_analytics::config::Config;
use cohort_analytics::{info, warn};
use std::io::{self, Write};

/// Dispatch config subcommands
pub fn run(subcommand: Option<ConfigSubcommand>, config: &mut Config, defaults: &Config) {
    match subcommand {
        None => show_config(config, None),
        Some(ConfigSubcommand::Get { key }) => show_config(config, key.as_deref()),
        Some(ConfigSubcommand::Set { key, value }) => set_value(config, &key, &value),
        Some(ConfigSubcommand::Unset { key }) => unset_value(config, defaults, &key),
        Some(ConfigSubcommand::Reset) => reset_config(),
    }
}

/// Print one value, or the whole configuration with its file location
fn show_config(config: &Config, key: Option<&str>) {
    if let Some(k) = key {
        match config.get(k) {
            Some(value) if value.is_empty() && k.starts_with("columns.") => {
                println!("(built-in header names)");
            }
            Some(value) => println!("{value}"),
            None => {
                eprintln!("✗ Unknown config key: '{k}'");
                std::process::exit(1);
            }
        }
    } else {
        println!("\n=== Configuration ===");
        println!("File: {}\n", Config::get_config_file_path().display());
        print!("{config}");
    }
}

fn save_or_exit(config: &Config) {
    if let Err(e) = config.save() {
        eprintln!("✗ Failed to save config: {e}");
        std::process::exit(1);
    }
}

fn set_value(config: &mut Config, key: &str, value: &str) {
    if let Err(e) = config.set(key, value) {
        eprintln!("✗ {e}");
        std::process::exit(1);
    }

    // Mapping problems would otherwise only show up on the next load
    if let Err(e) = config.load_options() {
        warn!("Configuration saved with an unusable value: {e}");
    }

    save_or_exit(config);
    info!("Config key '{key}' set to '{value}'");
    println!("✓ Set {key} = {value}");
}

fn unset_value(config: &mut Config, defaults: &Config, key: &str) {
    if let Err(e) = config.unset(key, defaults) {
        eprintln!("✗ {e}");
        std::process::exit(1);
    }

    save_or_exit(config);
    println!("✓ Reset {key} to default");
}

fn reset_config() {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return;
    }

    print!("Reset configuration to defaults? (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();

    let answer = response.trim();
    if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
        if let Err(e) = Config::reset() {
            eprintln!("✗ Failed to remove config file: {e}");
            std::process::exit(1);
        }
        println!("✓ Config reset to defaults");
    } else {
        println!("✗ Reset cancelled");
    }
}
