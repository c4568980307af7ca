//! Error types for the budget screen
//!
//! A single error hierarchy shared by the storage layer, the local backend and
//! the screen. Errors that carry a message meant for the user (rejections,
//! authorization and validation failures) are distinguished from opaque
//! infrastructure failures so the screen can decide what to surface.

use thiserror::Error;

/// Message shown when a category delete fails without a usable reason
pub const GENERIC_DELETE_FAILURE: &str =
    "This category may have transactions or assignments associated with it.";

/// The main error type for budget operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BudgetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for input and data models
    #[error("{0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// The current user does not own the entity
    #[error("{0}")]
    Forbidden(String),

    /// The backend refused the operation and said why
    #[error("{0}")]
    Rejected(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// TUI errors
    #[error("TUI error: {0}")]
    Tui(String),
}

impl BudgetError {
    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for category groups
    pub fn group_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category group",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The message a user should see, if the error carries one
    ///
    /// Infrastructure failures return `None`; callers substitute their own
    /// generic wording.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Validation(_)
            | Self::NotFound { .. }
            | Self::Forbidden(_)
            | Self::Rejected(_) => {
                let message = self.to_string();
                if message.trim().is_empty() {
                    None
                } else {
                    Some(message)
                }
            }
            _ => None,
        }
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for budget operations
pub type BudgetResult<T> = Result<T, BudgetError>;
