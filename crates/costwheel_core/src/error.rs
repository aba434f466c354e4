//! Error types for the chart core.

use crate::record::RecordId;
use thiserror::Error;

/// Result type for chart operations.
pub type ChartResult<T> = Result<T, ChartError>;

/// Errors that can occur in chart operations.
///
/// Malformed feed events are not errors: the record store recovers from
/// them locally and only logs. What remains here is what the caller must
/// act on.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The rendering surface could not draw.
    #[error("rendering surface error: {message}")]
    Surface {
        /// Description of the failure.
        message: String,
    },

    /// Chart configuration is unusable.
    #[error("invalid chart configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// An interaction targeted an id with no rendered element.
    #[error("no rendered element for record {id}")]
    ElementNotFound {
        /// The record id that was targeted.
        id: RecordId,
    },
}

impl ChartError {
    /// Creates a surface error.
    pub fn surface(message: impl Into<String>) -> Self {
        Self::Surface {
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates an element-not-found error.
    pub fn element_not_found(id: &RecordId) -> Self {
        Self::ElementNotFound { id: id.clone() }
    }

    /// Returns true if the error came from the rendering surface.
    pub fn is_surface(&self) -> bool {
        matches!(self, ChartError::Surface { .. })
    }
}
