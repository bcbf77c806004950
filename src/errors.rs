use fintrack_config::ConfigError;
use fintrack_core::CoreError;
use thiserror::Error;

/// Error type covering storage, export and configuration failures.
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
