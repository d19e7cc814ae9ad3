//! Core error types for tally-core.
//!
//! Every failure in this subsystem is recoverable: callers downgrade read
//! failures to empty aggregates and log-and-drop write failures. The enums
//! here exist so that the degradation sites know what they are swallowing.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tally-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Ledger/persistence errors
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Local fallback store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Rate-lookup errors
    #[error("Rate lookup error: {0}")]
    Rate(#[from] RateError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence-backend errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The backend could not be reached or opened. Readers must treat this
    /// as "zero activity", never as a blocking error.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A query or write against the backend failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// An event category string did not match any known category.
    #[error("Unknown event category: {0}")]
    UnknownCategory(String),
}

/// Local fallback store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read the store file
    #[error("Failed to read store at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the store file
    #[error("Failed to write store at {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored JSON failed to parse. Callers treat the store as empty.
    #[error("Malformed snapshot in {path}: {message}")]
    MalformedSnapshot { path: PathBuf, message: String },
}

/// Rate-lookup collaborator errors.
///
/// These are the "unavailable" outcome of a rate lookup: the cache returns
/// them instead of serving stale values, and UI layers decide the fallback
/// display.
#[derive(Error, Debug)]
pub enum RateError {
    /// Transport-level failure reaching the rate service
    #[error("Network error: {0}")]
    Network(String),

    /// The rate service answered with something unusable
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The service does not quote this pair
    #[error("Unsupported currency pair {from}/{to}")]
    UnsupportedPair { from: String, to: String },
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Could not determine or create the data directory
    #[error("Failed to prepare data directory {path}: {message}")]
    DataDirFailed { path: PathBuf, message: String },
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        LedgerError::QueryFailed(err.to_string())
    }
}

impl From<reqwest::Error> for RateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RateError::InvalidResponse(err.to_string())
        } else {
            RateError::Network(err.to_string())
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
