//! Unified error handling for the storefront core.
//!
//! Each concern keeps its own `thiserror` enum; `AppError` is the union the
//! UI callers see. Transport failures are propagated as-is - the core never
//! retries, and a failed write leaves all in-memory state untouched.

use thiserror::Error;

use crate::config::ConfigError;
use crate::ledger::LedgerError;
use crate::local::LocalStoreError;
use crate::store::StoreError;

/// Application-level error type for the storefront core.
#[derive(Debug, Error)]
pub enum AppError {
    /// Remote object store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Points-ledger operation failed.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Client-local persistence failed.
    #[error("Local storage error: {0}")]
    Local(#[from] LocalStoreError),

    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
