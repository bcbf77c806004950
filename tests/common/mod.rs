#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use finance_store::{Config, ConfigManager, FinanceApp};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a fresh directory that outlives the calling test.
pub fn test_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Configuration pointing all data at `base`.
pub fn config_in(base: &PathBuf) -> Config {
    Config {
        data_dir: Some(base.join("data")),
        backup_retention: 3,
        ..Config::default()
    }
}

/// Creates an isolated app and config manager backed by a unique directory.
pub fn setup_test_env() -> (FinanceApp, ConfigManager) {
    let base = test_dir();
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    config_manager
        .save(&config_in(&base))
        .expect("save test config");
    let app = FinanceApp::from_manager(&config_manager).expect("open app");
    (app, config_manager)
}
