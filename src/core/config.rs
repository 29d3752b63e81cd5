//! Configuration module for `CohortAnalytics`

use crate::core::dataset::{ColumnMapping, LoadOptions, PeriodPolicy};
use crate::core::error::CohortError;
use crate::core::models::{Column, VocabularyChoice};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Placeholder expanded to [`Config::get_cohort_analytics_dir`]
const DIR_VARIABLE: &str = "$COHORT_ANALYTICS";

/// First entry year shown by the yearly evolution panel when unset
const DEFAULT_MIN_YEAR: i32 = 2014;

const fn default_min_year() -> i32 {
    DEFAULT_MIN_YEAR
}

fn default_vocabulary() -> String {
    "auto".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for dashboard output files
    #[serde(default)]
    pub reports_dir: String,
    /// Directory for CSV exports
    #[serde(default)]
    pub exports_dir: String,
}

/// Dataset interpretation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Status vocabulary: `auto`, `dropout` or `completion`
    #[serde(default = "default_vocabulary")]
    pub vocabulary: String,
    /// First entry year of the yearly evolution panel; 0 disables the cutoff
    #[serde(default = "default_min_year")]
    pub min_year: i32,
    /// Treat malformed periods as absent instead of failing the load
    #[serde(default)]
    pub lenient_periods: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            vocabulary: default_vocabulary(),
            min_year: DEFAULT_MIN_YEAR,
            lenient_periods: false,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Dataset settings
    #[serde(default)]
    pub dataset: DatasetConfig,
    /// Header overrides keyed by canonical column name; empty means default
    #[serde(default)]
    pub columns: BTreeMap<String, String>,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override dashboard output directory
    pub reports_dir: Option<String>,
    /// Override CSV export directory
    pub exports_dir: Option<String>,
    /// Override status vocabulary
    pub vocabulary: Option<String>,
    /// Override yearly evolution cutoff
    pub min_year: Option<i32>,
}

/// Split `columns.<name>` into the column name
fn column_key(key: &str) -> Option<&str> {
    key.strip_prefix("columns.")
}

impl Config {
    /// Get the `$COHORT_ANALYTICS` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/cohortanalytics`
    /// - macOS: `~/Library/Application Support/cohortanalytics`
    /// - Windows: `%APPDATA%\cohortanalytics`
    #[must_use]
    pub fn get_cohort_analytics_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cohortanalytics")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Newly added string fields and column entries are filled from the
    /// defaults when they are empty or absent. Existing user values are kept.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }
        if self.logging.file.is_empty() && !defaults.logging.file.is_empty() {
            self.logging.file.clone_from(&defaults.logging.file);
            changed = true;
        }

        if self.paths.reports_dir.is_empty() && !defaults.paths.reports_dir.is_empty() {
            self.paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir);
            changed = true;
        }
        if self.paths.exports_dir.is_empty() && !defaults.paths.exports_dir.is_empty() {
            self.paths
                .exports_dir
                .clone_from(&defaults.paths.exports_dir);
            changed = true;
        }

        if self.dataset.vocabulary.is_empty() && !defaults.dataset.vocabulary.is_empty() {
            self.dataset
                .vocabulary
                .clone_from(&defaults.dataset.vocabulary);
            changed = true;
        }

        for (name, header) in &defaults.columns {
            if !self.columns.contains_key(name) {
                self.columns.insert(name.clone(), header.clone());
                changed = true;
            }
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Command-line arguments override configuration file values without
    /// modifying the persistent file. Only `Some` values are applied.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(reports_dir);
        }
        if let Some(exports_dir) = &overrides.exports_dir {
            self.paths.exports_dir.clone_from(exports_dir);
        }

        if let Some(vocabulary) = &overrides.vocabulary {
            self.dataset.vocabulary.clone_from(vocabulary);
        }
        if let Some(min_year) = overrides.min_year {
            self.dataset.min_year = min_year;
        }
    }

    /// Get the user config file path
    ///
    /// - `config.toml` for release builds
    /// - `dconfig.toml` for debug builds (allows separate debug config)
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_cohort_analytics_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$COHORT_ANALYTICS` in a string to the config directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_cohort_analytics_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Path values have `$COHORT_ANALYTICS` expanded. Missing fields use
    /// their serde defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);
        config.paths.exports_dir = Self::expand_variables(&config.paths.exports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// - Debug: Uses `DefaultCLIConfigDebug.toml`
    /// - Release: Uses `DefaultCLIConfigRelease.toml`
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The
    /// defaults are compiled into the binary and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If the config file exists: loads it, merges missing fields from
    ///   defaults and saves the result if anything was added
    /// - On first run: creates the config directory and saves the defaults
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to the platform config file
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized, the directory
    /// cannot be created, or the file cannot be written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys:
    /// - `level`, `file`, `verbose` (logging)
    /// - `reports_dir`, `exports_dir` (paths)
    /// - `vocabulary`, `min_year`, `lenient_periods` (dataset)
    /// - `columns.<name>` for a column header override, e.g. `columns.program`
    ///
    /// Keys may also be written with their section, e.g. `logging.level`.
    ///
    /// # Returns
    /// `None` if the key is not recognized
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(name) = column_key(key) {
            let column = Column::from_name(name)?;
            return Some(self.columns.get(column.name()).cloned().unwrap_or_default());
        }
        match key {
            "level" | "logging.level" => Some(self.logging.level.clone()),
            "file" | "logging.file" => Some(self.logging.file.clone()),
            "verbose" | "logging.verbose" => Some(self.logging.verbose.to_string()),
            "reports_dir" | "reports-dir" | "paths.reports_dir" => {
                Some(self.paths.reports_dir.clone())
            }
            "exports_dir" | "exports-dir" | "paths.exports_dir" => {
                Some(self.paths.exports_dir.clone())
            }
            "vocabulary" | "dataset.vocabulary" => Some(self.dataset.vocabulary.clone()),
            "min_year" | "min-year" | "dataset.min_year" => Some(self.dataset.min_year.to_string()),
            "lenient_periods" | "lenient-periods" | "dataset.lenient_periods" => {
                Some(self.dataset.lenient_periods.to_string())
            }
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Values are validated: `verbose` and `lenient_periods` take booleans,
    /// `min_year` an integer, `vocabulary` one of `auto`, `dropout`,
    /// `completion`. Call [`save()`](Config::save) to persist changes.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value cannot be parsed
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        if let Some(name) = column_key(key) {
            let column =
                Column::from_name(name).ok_or_else(|| format!("Unknown column: '{name}'"))?;
            self.columns
                .insert(column.name().to_string(), value.trim().to_string());
            return Ok(());
        }
        match key {
            "level" | "logging.level" => self.logging.level = value.to_string(),
            "file" | "logging.file" => self.logging.file = value.to_string(),
            "verbose" | "logging.verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "reports_dir" | "reports-dir" | "paths.reports_dir" => {
                self.paths.reports_dir = value.to_string();
            }
            "exports_dir" | "exports-dir" | "paths.exports_dir" => {
                self.paths.exports_dir = value.to_string();
            }
            "vocabulary" | "dataset.vocabulary" => {
                value.parse::<VocabularyChoice>()?;
                self.dataset.vocabulary = value.trim().to_lowercase();
            }
            "min_year" | "min-year" | "dataset.min_year" => {
                self.dataset.min_year = value
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| format!("Invalid year for 'min_year': '{value}'"))?;
            }
            "lenient_periods" | "lenient-periods" | "dataset.lenient_periods" => {
                self.dataset.lenient_periods = value.parse::<bool>().map_err(|_| {
                    format!("Invalid boolean value for 'lenient_periods': '{value}'")
                })?;
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// Call [`save()`](Config::save) to persist changes.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        if let Some(name) = column_key(key) {
            let column =
                Column::from_name(name).ok_or_else(|| format!("Unknown column: '{name}'"))?;
            let header = defaults
                .columns
                .get(column.name())
                .cloned()
                .unwrap_or_default();
            self.columns.insert(column.name().to_string(), header);
            return Ok(());
        }
        match key {
            "level" | "logging.level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" | "logging.file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" | "logging.verbose" => self.logging.verbose = defaults.logging.verbose,
            "reports_dir" | "reports-dir" | "paths.reports_dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            "exports_dir" | "exports-dir" | "paths.exports_dir" => self
                .paths
                .exports_dir
                .clone_from(&defaults.paths.exports_dir),
            "vocabulary" | "dataset.vocabulary" => self
                .dataset
                .vocabulary
                .clone_from(&defaults.dataset.vocabulary),
            "min_year" | "min-year" | "dataset.min_year" => {
                self.dataset.min_year = defaults.dataset.min_year;
            }
            "lenient_periods" | "lenient-periods" | "dataset.lenient_periods" => {
                self.dataset.lenient_periods = defaults.dataset.lenient_periods;
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load)
    /// recreates it. Succeeds if the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be deleted
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }

    /// Loader options described by the `[dataset]` and `[columns]` sections
    ///
    /// # Errors
    /// Returns `Config` for an unknown vocabulary or column name
    pub fn load_options(&self) -> Result<LoadOptions, CohortError> {
        let vocabulary = self
            .dataset
            .vocabulary
            .parse::<VocabularyChoice>()
            .map_err(CohortError::Config)?;

        let mut columns = ColumnMapping::default();
        for (name, header) in &self.columns {
            let column = Column::from_name(name)
                .ok_or_else(|| CohortError::Config(format!("Unknown column '{name}' in [columns]")))?;
            columns.set(column, header);
        }

        let period_policy = if self.dataset.lenient_periods {
            PeriodPolicy::Lenient
        } else {
            PeriodPolicy::Strict
        };

        Ok(LoadOptions {
            columns,
            vocabulary,
            period_policy,
        })
    }

    /// Yearly evolution cutoff; `None` when `min_year` is 0 or negative
    #[must_use]
    pub const fn min_year(&self) -> Option<i32> {
        if self.dataset.min_year > 0 {
            Some(self.dataset.min_year)
        } else {
            None
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;
        writeln!(f, "  exports_dir = \"{}\"", self.paths.exports_dir)?;

        writeln!(f, "\n[dataset]")?;
        writeln!(f, "  vocabulary = \"{}\"", self.dataset.vocabulary)?;
        writeln!(f, "  min_year = {}", self.dataset.min_year)?;
        writeln!(f, "  lenient_periods = {}", self.dataset.lenient_periods)?;

        writeln!(f, "\n[columns]")?;
        for column in Column::ALL {
            let header = self
                .columns
                .get(column.name())
                .map_or("", String::as_str);
            writeln!(f, "  {} = \"{header}\"", column.name())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Vocabulary;

    #[test]
    fn compiled_defaults_parse() {
        let config = Config::from_defaults();
        assert!(!config.logging.level.is_empty());
        assert_eq!(config.dataset.vocabulary, "auto");
        assert_eq!(config.min_year(), Some(2014));
        assert_eq!(config.columns.len(), Column::ALL.len());
    }

    #[test]
    fn load_options_follow_dataset_section() {
        let mut config = Config::from_defaults();
        config.set("vocabulary", "dropout").expect("vocabulary");
        config.set("lenient_periods", "true").expect("lenient");
        config.set("columns.program", "Curso").expect("column");

        let options = config.load_options().expect("options");
        assert_eq!(options.vocabulary, VocabularyChoice::Fixed(Vocabulary::Dropout));
        assert_eq!(options.period_policy, PeriodPolicy::Lenient);
        assert_eq!(options.columns.candidates(Column::Program)[0], "Curso");
    }

    #[test]
    fn zero_min_year_disables_cutoff() {
        let mut config = Config::from_defaults();
        config.set("min_year", "0").expect("min_year");
        assert_eq!(config.min_year(), None);
    }

    #[test]
    fn rejects_invalid_dataset_values() {
        let mut config = Config::from_defaults();
        assert!(config.set("vocabulary", "mixed").is_err());
        assert!(config.set("min_year", "soon").is_err());
        assert!(config.set("columns.nickname", "x").is_err());
        assert_eq!(config.get("columns.nickname"), None);
    }

    #[test]
    fn unknown_column_section_entry_fails_load_options() {
        let mut config = Config::from_defaults();
        config.columns.insert("nickname".to_string(), "x".to_string());
        assert!(matches!(
            config.load_options(),
            Err(CohortError::Config(_))
        ));
    }
}
