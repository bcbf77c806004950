use std::path::PathBuf;

use fintrack_config::{Config, ConfigError, ConfigManager};
use fintrack_domain::Period;
use tempfile::tempdir;

#[test]
fn default_config_has_sensible_values() {
    let cfg = Config::default();

    assert!(cfg.data_dir.is_none());
    assert_eq!(cfg.data_file, "finances.json");
    assert_eq!(cfg.backup_retention, 5);
    assert!(cfg.cascade_expenses_into_budgets);
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, Config::default());
    assert!(!manager.config_path().exists(), "loading must not create the file");
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let cfg = Config {
        data_dir: Some(PathBuf::from("/tmp/finances")),
        backup_retention: 2,
        cascade_expenses_into_budgets: false,
        default_period: Period::Quarter,
        ..Config::default()
    };

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(manager.config_path().ends_with("config/config.json"));
}

#[test]
fn malformed_config_is_a_serde_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "[1, 2").expect("write");

    let err = ConfigManager::new(path).load().expect_err("malformed");
    assert!(matches!(err, ConfigError::Serde(_)));
}
