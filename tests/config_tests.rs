//! Integration tests for configuration management

use cohort_analytics::config::{Config, ConfigOverrides};
use cohort_analytics::core::dataset::PeriodPolicy;
use cohort_analytics::core::models::{Vocabulary, VocabularyChoice};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a temporary config directory
fn setup_temp_config() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("config.toml");
    (temp_dir, config_file)
}

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    assert!(
        !config.logging.level.is_empty(),
        "Default log level should not be empty"
    );
    assert!(
        !config.paths.reports_dir.is_empty(),
        "Default reports_dir should not be empty"
    );
    assert!(
        !config.paths.exports_dir.is_empty(),
        "Default exports_dir should not be empty"
    );
    assert_eq!(config.dataset.vocabulary, "auto");
    assert_eq!(config.dataset.min_year, 2014);
    assert!(!config.dataset.lenient_periods);
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[paths]
reports_dir = "./reports"
exports_dir = "./exports"

[dataset]
vocabulary = "completion"
min_year = 2010
lenient_periods = true

[columns]
program = "Curso"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.reports_dir, "./reports");
    assert_eq!(config.paths.exports_dir, "./exports");
    assert_eq!(config.dataset.vocabulary, "completion");
    assert_eq!(config.dataset.min_year, 2010);
    assert!(config.dataset.lenient_periods);
    assert_eq!(config.columns.get("program").map(String::as_str), Some("Curso"));
}

#[test]
fn test_config_from_toml_partial() {
    // Missing sections and fields use defaults
    let toml_str = r#"
[logging]
level = "error"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.verbose);
    assert_eq!(config.paths.reports_dir, "");
    assert_eq!(config.dataset.vocabulary, "auto");
    assert_eq!(config.dataset.min_year, 2014);
    assert!(config.columns.is_empty());
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$COHORT_ANALYTICS/test.log"

[paths]
reports_dir = "$COHORT_ANALYTICS/reports"
exports_dir = "$COHORT_ANALYTICS/exports"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    assert!(config.logging.file.contains("cohortanalytics"));
    assert!(!config.logging.file.contains("$COHORT_ANALYTICS"));
    assert!(config.paths.reports_dir.ends_with("reports"));
    assert!(!config.paths.reports_dir.contains("$COHORT_ANALYTICS"));
    assert!(config.paths.exports_dir.contains("cohortanalytics"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    assert!(config.get("level").is_some());

    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").as_deref(), Some("debug"));

    config.set("verbose", "true").expect("Failed to set verbose");
    assert_eq!(config.get("verbose").as_deref(), Some("true"));
    assert!(config.logging.verbose);

    // Section-qualified and dashed spellings address the same value
    config.set("dataset.min_year", "2016").expect("Failed to set min_year");
    assert_eq!(config.get("min-year").as_deref(), Some("2016"));

    config
        .set("columns.entry_period", "Periodo Ingresso")
        .expect("Failed to set column");
    assert_eq!(
        config.get("columns.entry_period").as_deref(),
        Some("Periodo Ingresso")
    );

    assert!(config.get("unknown_key").is_none());
    assert!(config.set("unknown_key", "value").is_err());
    assert!(config.get("columns.nickname").is_none());
}

#[test]
fn test_config_set_validates_values() {
    let mut config = Config::from_defaults();

    assert!(config.set("verbose", "maybe").is_err());
    assert!(config.set("min_year", "twenty").is_err());
    assert!(config.set("vocabulary", "legacy").is_err());
    assert!(config.set("columns.nickname", "Apelido").is_err());

    // Rejected values leave the config unchanged
    assert_eq!(config.dataset.vocabulary, "auto");
    assert_eq!(config.dataset.min_year, 2014);
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config.set("level", "debug").expect("Failed to set level");
    config.set("vocabulary", "dropout").expect("Failed to set vocabulary");
    config.set("columns.status", "Situacao").expect("Failed to set column");

    config.unset("level", &defaults).expect("Failed to unset level");
    config
        .unset("dataset.vocabulary", &defaults)
        .expect("Failed to unset vocabulary");
    config
        .unset("columns.status", &defaults)
        .expect("Failed to unset column");

    assert_eq!(config.logging.level, defaults.logging.level);
    assert_eq!(config.dataset.vocabulary, "auto");
    assert_eq!(config.get("columns.status").as_deref(), Some(""));
    assert!(config.unset("unknown_key", &defaults).is_err());
}

#[test]
fn test_config_save_and_load() {
    let (_temp_dir, config_file) = setup_temp_config();

    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");
    config.set("columns.program", "Curso").expect("Failed to set column");

    let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
    fs::write(&config_file, toml_str).expect("Failed to write config");

    let content = fs::read_to_string(&config_file).expect("Failed to read config");
    let loaded_config = Config::from_toml(&content).expect("Failed to parse loaded config");

    assert_eq!(loaded_config.logging.level, "info");
    assert_eq!(
        loaded_config.columns.get("program").map(String::as_str),
        Some("Curso")
    );
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        verbose: Some(true),
        reports_dir: Some("./custom_reports".to_string()),
        exports_dir: Some("./custom_exports".to_string()),
        vocabulary: Some("completion".to_string()),
        min_year: Some(0),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.reports_dir, "./custom_reports");
    assert_eq!(config.paths.exports_dir, "./custom_exports");
    assert_eq!(config.dataset.vocabulary, "completion");
    assert_eq!(config.min_year(), None, "0 disables the cutoff");
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();
    let reports_dir = config.paths.reports_dir.clone();

    let overrides = ConfigOverrides {
        level: Some("debug".to_string()),
        ..ConfigOverrides::default()
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.paths.reports_dir, reports_dir);
    assert_eq!(config.min_year(), Some(2014));
}

#[test]
fn test_load_options_from_config() {
    let toml_str = r#"
[logging]
level = "warn"

[dataset]
vocabulary = "dropout"
lenient_periods = true

[columns]
student_id = "Matricula"
program = ""
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");
    let options = config.load_options().expect("valid load options");

    assert_eq!(options.vocabulary, VocabularyChoice::Fixed(Vocabulary::Dropout));
    assert_eq!(options.period_policy, PeriodPolicy::Lenient);
}

#[test]
fn test_load_options_rejects_unknown_column() {
    let toml_str = r#"
[logging]
level = "warn"

[columns]
nickname = "Apelido"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");
    let err = config.load_options().expect_err("unknown column should fail");
    assert!(err.to_string().contains("nickname"));
}

#[test]
fn test_config_display_format() {
    let config = Config::from_defaults();
    let display_str = format!("{config}");

    assert!(display_str.contains("[logging]"));
    assert!(display_str.contains("[paths]"));
    assert!(display_str.contains("[dataset]"));
    assert!(display_str.contains("[columns]"));

    assert!(display_str.contains("level"));
    assert!(display_str.contains("exports_dir"));
    assert!(display_str.contains("min_year = 2014"));
    assert!(display_str.contains("time_to_exit = \"\""));
}

#[test]
fn test_merge_defaults_adds_missing_fields() {
    let toml_str = r#"
[logging]
level = "error"
file = ""
verbose = false

[paths]
reports_dir = ""
exports_dir = ""
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse minimal config");
    let defaults = Config::from_defaults();

    let changed = config.merge_defaults(&defaults);

    assert!(
        changed,
        "merge_defaults should return true when fields are added"
    );
    assert_eq!(config.paths.exports_dir, defaults.paths.exports_dir);
    assert_eq!(config.columns.len(), defaults.columns.len());
}

#[test]
fn test_merge_defaults_preserves_existing() {
    let toml_str = r#"
[logging]
level = "error"
file = "/my/custom/path.log"
verbose = false

[paths]
reports_dir = "/my/reports"
exports_dir = "/my/exports"

[columns]
program = "Curso"
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse config");
    let defaults = Config::from_defaults();

    config.merge_defaults(&defaults);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/my/custom/path.log");
    assert_eq!(config.paths.reports_dir, "/my/reports");
    assert_eq!(config.columns.get("program").map(String::as_str), Some("Curso"));
}

#[test]
fn test_get_cohort_analytics_dir() {
    let dir = Config::get_cohort_analytics_dir();

    assert!(dir.to_string_lossy().contains("cohortanalytics"));
    assert_ne!(dir, PathBuf::from("."));
}

#[test]
fn test_get_config_file_path() {
    let path = Config::get_config_file_path();

    let path_str = path.to_string_lossy();
    assert!(path_str.ends_with("config.toml") || path_str.ends_with("dconfig.toml"));
}
