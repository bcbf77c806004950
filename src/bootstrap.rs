//! Wiring from configuration to a ready-to-use store.

use std::sync::Arc;

use fintrack_config::{Config, ConfigManager};
use fintrack_core::{
    FinanceStore, FinancialSummary, LoadReport, RandomIds, StoreOptions, SystemClock,
};
use fintrack_storage_json::{BackupInfo, JsonSnapshotStorage, StoragePaths};
use tracing::info;

use crate::FinanceError;

/// Builds the JSON storage described by `config`, creating its directories.
pub fn storage_for(config: &Config) -> Result<JsonSnapshotStorage, FinanceError> {
    let paths = StoragePaths {
        data_file: config.data_path(),
        backup_root: config.resolved_backup_dir(),
    };
    Ok(JsonSnapshotStorage::with_retention(
        paths,
        config.backup_retention,
    )?)
}

/// Opens a store backed by the JSON file named in `config`.
pub fn open_store(config: &Config) -> Result<FinanceStore, FinanceError> {
    Ok(build_store(storage_for(config)?, config))
}

fn build_store(storage: JsonSnapshotStorage, config: &Config) -> FinanceStore {
    let options = StoreOptions {
        cascade_expenses_into_budgets: config.cascade_expenses_into_budgets,
    };
    FinanceStore::with_parts(
        Box::new(storage),
        Arc::new(SystemClock),
        Box::new(RandomIds),
        options,
    )
}

/// A store together with the storage handle and configuration it was opened with.
pub struct FinanceApp {
    config: Config,
    storage: JsonSnapshotStorage,
    store: FinanceStore,
}

impl FinanceApp {
    pub fn open(config: Config) -> Result<Self, FinanceError> {
        let storage = storage_for(&config)?;
        let store = build_store(storage.clone(), &config);
        info!(
            data_file = %storage.data_path().display(),
            source = ?store.load_report().source,
            "finance store opened"
        );
        Ok(Self {
            config,
            storage,
            store,
        })
    }

    /// Opens with an explicit store, e.g. one built with a fixed clock.
    pub fn with_store(config: Config, storage: JsonSnapshotStorage, store: FinanceStore) -> Self {
        Self {
            config,
            storage,
            store,
        }
    }

    /// Loads configuration through `manager` and opens the store it describes.
    pub fn from_manager(manager: &ConfigManager) -> Result<Self, FinanceError> {
        Self::open(manager.load()?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &JsonSnapshotStorage {
        &self.storage
    }

    pub fn store(&self) -> &FinanceStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut FinanceStore {
        &mut self.store
    }

    /// Summary over the configured default period.
    pub fn summary(&self) -> FinancialSummary {
        self.store
            .financial_summary(Some(self.config.default_period))
    }

    /// Flushes the current state and copies it into a new backup.
    pub fn backup(&self, note: Option<&str>) -> Result<BackupInfo, FinanceError> {
        self.store.save()?;
        Ok(self.storage.backup(note)?)
    }

    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, FinanceError> {
        Ok(self.storage.list_backups()?)
    }

    /// Restores the backup named `id` and reloads the store from it.
    pub fn restore_backup(&mut self, id: &str) -> Result<LoadReport, FinanceError> {
        let info = self.storage.restore_backup(id)?;
        let report = self.store.reload().clone();
        info!(backup = %info.id, source = ?report.source, "store reloaded from backup");
        Ok(report)
    }
}
