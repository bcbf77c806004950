#![doc(test(attr(deny(warnings))))]

//! Finance Store keeps a personal-finance snapshot (transactions, budgets,
//! goals, categories and the user profile) in memory, derives summary figures
//! from it and persists it as one JSON document after every change.

pub mod bootstrap;
pub mod errors;
pub mod utils;

pub use bootstrap::{open_store, storage_for, FinanceApp};
pub use errors::FinanceError;
pub use fintrack_config::{Config, ConfigManager};
pub use fintrack_core::{
    BudgetComparison, CategorySpending, Clock, CsvExporter, FinanceStore, FinancialSummary,
    FixedClock, GoalProgress, IdGenerator, Language, LoadReport, LoadSource, MemoryStorage,
    PeriodTotals, RandomIds, SequentialIds, SnapshotStorage, StoreOptions, SystemClock,
    TrendStats,
};
pub use fintrack_domain as domain;
pub use fintrack_storage_json::{BackupInfo, JsonSnapshotStorage, StoragePaths};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and logs the build this process runs.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        let build = utils::build_info::current();
        tracing::info!(build = %build.summary(), "Finance Store tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }

    #[test]
    fn build_metadata_is_populated() {
        let build = super::utils::build_info::current();
        assert_eq!(build.version, env!("CARGO_PKG_VERSION"));
        assert!(build.summary().starts_with(build.version));
    }

    #[test]
    fn build_summary_lists_known_details_only() {
        use super::utils::build_info::BuildMetadata;

        let bare = BuildMetadata {
            version: "1.2.3",
            commit: None,
            profile: None,
        };
        assert_eq!(bare.summary(), "1.2.3");

        let full = BuildMetadata {
            commit: Some("abc1234"),
            profile: Some("release"),
            ..bare
        };
        assert_eq!(full.summary(), "1.2.3 (abc1234, release)");
    }
}
