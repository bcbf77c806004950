use std::path::PathBuf;

use fintrack_domain::Period;
use serde::{Deserialize, Serialize};

const APP_DIR_NAME: &str = "fintrack";

/// Where finance data lives and how the store behaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Custom data directory. Defaults to the platform data dir plus `fintrack`.
    pub data_dir: Option<PathBuf>,

    #[serde(default = "Config::default_data_file")]
    pub data_file: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Custom backup directory. Defaults to `<data_dir>/backups`.
    pub backup_dir: Option<PathBuf>,

    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,

    #[serde(default = "Config::default_cascade")]
    pub cascade_expenses_into_budgets: bool,

    /// Period used for summaries when the caller does not pick one.
    #[serde(default)]
    pub default_period: Period,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            data_file: Self::default_data_file(),
            backup_dir: None,
            backup_retention: Self::default_backup_retention(),
            cascade_expenses_into_budgets: Self::default_cascade(),
            default_period: Period::default(),
        }
    }
}

impl Config {
    /// Configured data directory, or the platform default.
    pub fn resolved_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .or_else(dirs::home_dir)
            .map(|base| base.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(APP_DIR_NAME))
    }

    pub fn data_path(&self) -> PathBuf {
        self.resolved_data_dir().join(&self.data_file)
    }

    pub fn resolved_backup_dir(&self) -> PathBuf {
        self.backup_dir
            .clone()
            .unwrap_or_else(|| self.resolved_data_dir().join("backups"))
    }

    fn default_data_file() -> String {
        "finances.json".into()
    }

    fn default_backup_retention() -> usize {
        5
    }

    fn default_cascade() -> bool {
        true
    }
}
