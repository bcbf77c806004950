//! fintrack-core
//!
//! Business logic for the personal finance store.
//! Depends on fintrack-domain. Persistence goes through the [`SnapshotStorage`] trait.

pub mod budget_service;
pub mod category_service;
pub mod error;
pub mod export;
pub mod format;
pub mod goal_service;
pub mod ids;
pub mod storage;
pub mod store;
pub mod summary_service;
pub mod time;
pub mod transaction_service;
pub mod user_service;

pub use budget_service::*;
pub use category_service::*;
pub use error::CoreError;
pub use export::CsvExporter;
pub use format::{CurrencyFormatter, DateFormatter, Language, LocaleFormatter};
pub use goal_service::*;
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use storage::{snapshot_warnings, MemoryStorage, SnapshotStorage};
pub use store::{FinanceStore, LoadReport, LoadSource, StoreOptions};
pub use summary_service::*;
pub use time::{Clock, FixedClock, SystemClock};
pub use transaction_service::*;
pub use user_service::*;

use fintrack_domain::Identifiable;
use uuid::Uuid;

pub(crate) fn position_of<T: Identifiable>(items: &[T], id: Uuid) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}
