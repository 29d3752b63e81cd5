//! CLI argument definitions for `CohortAnalytics`

use clap::{builder::BoolishValueParser, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use cohort_analytics::config::ConfigOverrides;
use cohort_analytics::core::filter::Selection;
use cohort_analytics::core::models::{Status, Table};
use cohort_analytics::Result;
use logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

/// Status vocabulary argument
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum VocabularyArg {
    /// Detect from the status labels in the file
    Auto,
    /// Active / Dropped
    Dropout,
    /// Active / Graduated / Withdrawn
    Completion,
}

impl std::fmt::Display for VocabularyArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Auto => "auto",
            Self::Dropout => "dropout",
            Self::Completion => "completion",
        };
        write!(f, "{as_str}")
    }
}

/// Category filters shared by `dashboard` and `export`.
///
/// Omitting a flag keeps every value of that category. Passing the flag
/// without values keeps none.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Programs to include
    #[arg(long = "program", value_name = "PROGRAM", num_args = 0..)]
    pub programs: Option<Vec<String>>,

    /// Entry years to include
    #[arg(long = "year", value_name = "YEAR", num_args = 0..)]
    pub years: Option<Vec<i32>>,

    /// Statuses to include (e.g. Active, Graduated, Withdrawn, Dropped)
    #[arg(long = "status", value_name = "STATUS", num_args = 0..)]
    pub statuses: Option<Vec<String>>,
}

impl FilterArgs {
    /// Build the selection for `table`, starting from every value present.
    ///
    /// # Errors
    /// Returns `UnknownStatus` if a status label names no status
    pub fn selection(&self, table: &Table) -> Result<Selection> {
        let mut selection = Selection::all(table);
        if let Some(programs) = &self.programs {
            selection = selection.with_programs(programs.iter().cloned());
        }
        if let Some(years) = &self.years {
            selection = selection.with_years(years.iter().copied());
        }
        if let Some(labels) = &self.statuses {
            let statuses = labels
                .iter()
                .map(|label| label.parse::<Status>())
                .collect::<Result<Vec<_>>>()?;
            selection = selection.with_statuses(statuses);
        }
        Ok(selection)
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `min_year`, `columns.program`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Build the cohort dashboard from an enrollment CSV file.
    ///
    /// Writes an HTML page with interactive charts, or a Markdown report.
    Dashboard {
        /// Path to the enrollment CSV file
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Output file path (optional; defaults to `<reports_dir>/<name>_dashboard.<ext>`)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Dashboard format: html or markdown (md)
        #[arg(short, long, value_name = "FORMAT", default_value = "html")]
        format: String,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Export every aggregate and the filtered rows as CSV files.
    Export {
        /// Path to the enrollment CSV file
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Output directory (optional; defaults to config `exports_dir`)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "cohortanalytics",
    about = "CohortAnalytics command-line interface",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug", global = true)]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config reports directory
    #[arg(long = "config-reports-dir", value_name = "DIR")]
    pub config_reports_dir: Option<PathBuf>,

    /// Override config reports directory (short form)
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Override config exports directory
    #[arg(long = "exports-dir", value_name = "DIR")]
    pub exports_dir: Option<PathBuf>,

    /// Override the status vocabulary for this run
    #[arg(long, value_enum)]
    pub vocabulary: Option<VocabularyArg>,

    /// First entry year of the yearly status panel (0 shows every year)
    #[arg(long = "min-year", value_name = "YEAR")]
    pub min_year: Option<i32>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Short-form flags (e.g., `--reports-dir`) take precedence over
    /// long-form flags (e.g., `--config-reports-dir`) when both are provided.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string().to_lowercase()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            reports_dir: self
                .reports_dir
                .as_ref()
                .or(self.config_reports_dir.as_ref())
                .map(|p| p.to_string_lossy().to_string()),
            exports_dir: self
                .exports_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            vocabulary: self.vocabulary.map(|v| v.to_string()),
            min_year: self.min_year,
        }
    }
}
