//! # Cart Error Types
//!
//! Typed error handling for the cart, checkout and listing operations.
//! Every error is request-scoped; none of them should take the process down.

use thiserror::Error;

/// Core error type for all cart operations
#[derive(Debug, Error)]
pub enum CartError {
    /// Malformed identifier, missing field, unknown action
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown product, order or cart line
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Product is already in the cart
    #[error("{name} already exists in cart")]
    Conflict { product_id: String, name: String },

    /// Storage collaborator failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration errors (unreadable catalog, bad currency)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CartError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        CartError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Returns true if retrying the same request may succeed.
    ///
    /// A failed checkout leaves the cart intact, so it is always safe to retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CartError::Persistence(_))
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CartError::Validation(_) => 400,
            CartError::NotFound { .. } => 404,
            CartError::Conflict { .. } => 409,
            CartError::Persistence(_) => 502,
            CartError::Configuration(_) => 500,
        }
    }

    /// Text for a user-facing message: validation problems are shown as
    /// written, everything else with its kind prefix.
    pub fn user_message(&self) -> String {
        match self {
            CartError::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// Alert class shown next to the message in the cart view
    pub fn alert_type(&self) -> &'static str {
        match self {
            CartError::Conflict { .. } => "danger",
            CartError::Validation(_) | CartError::NotFound { .. } => "warning",
            CartError::Persistence(_) | CartError::Configuration(_) => "error",
        }
    }
}

/// Result type alias for cart operations
pub type CartResult<T> = Result<T, CartError>;
