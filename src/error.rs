//! Error types for mtg_list_sorter

use thiserror::Error;

/// Unified error type for list sorter operations
#[derive(Debug, Error)]
pub enum SorterError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to parse a JSON payload
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// HTTP error status code
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The bulk data manifest had no default_cards entry
    #[error("No default_cards entry in bulk data manifest")]
    BulkDataNotFound,

    /// A refresh cycle is already running
    #[error("A bulk data refresh is already in progress")]
    RefreshInProgress,
}

/// Result alias for list sorter operations
pub type Result<T> = std::result::Result<T, SorterError>;
