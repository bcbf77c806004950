//! fintrack-domain
//!
//! Pure domain models (Transaction, Budget, Goal, Category, UserProfile, snapshot).
//! No I/O, no storage. Only data types, partial-update records and core enums.

pub mod budget;
pub mod category;
pub mod common;
pub mod goal;
pub mod seed;
pub mod snapshot;
pub mod transaction;
pub mod user;

pub use budget::*;
pub use category::*;
pub use common::*;
pub use goal::*;
pub use snapshot::*;
pub use transaction::*;
pub use user::*;
