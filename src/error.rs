//! Error types for the remuneration model

use thiserror::Error;

/// Result alias used throughout the crate
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while loading, validating or exporting a portfolio
///
/// Degenerate arithmetic (zero VNR, zero useful life during the recurrence)
/// is not an error: those divisions resolve to 0.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Malformed year-0 input row
    #[error("Data quality error in row {row} ({asset}): {reason}")]
    DataQuality {
        /// 0-based row index in input order
        row: usize,
        /// Asset name as read (may be empty)
        asset: String,
        reason: String,
    },

    /// Invalid projection parameter
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig {
        field: String,
        reason: String,
    },

    /// Required input column absent after header normalization
    #[error("Missing input column: {column}")]
    MissingColumn {
        column: String,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    pub(crate) fn data_quality(row: usize, asset: &str, reason: impl Into<String>) -> Self {
        ModelError::DataQuality {
            row,
            asset: asset.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(field: &str, reason: impl Into<String>) -> Self {
        ModelError::InvalidConfig {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
