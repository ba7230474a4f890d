//! Domain error model.

use thiserror::Error;

use crate::id::Sku;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant except `Persistence` is a business outcome that leaves state
/// untouched. `Persistence` reports that the durable store could not be read
/// or written; mutating operations that fail with it are not applied in memory.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The role lacks permission for the requested operation.
    #[error("access denied: role '{role}' may not perform '{operation}'")]
    Unauthorized { role: String, operation: String },

    /// The SKU does not exist in the catalog.
    #[error("item '{0}' not found")]
    NotFound(Sku),

    /// The SKU is already taken.
    #[error("item '{0}' already exists")]
    DuplicateSku(Sku),

    /// A field violates its non-negativity/positivity constraint, or a
    /// required text field is empty.
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// A sale asked for more units than are on hand.
    #[error("insufficient stock for '{sku}': requested {requested}, available {available}")]
    InsufficientStock {
        sku: Sku,
        requested: i64,
        available: i64,
    },

    /// The durable store failed.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl DomainError {
    pub fn unauthorized(role: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::Unauthorized {
            role: role.into(),
            operation: operation.into(),
        }
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Unauthorized { .. } => "unauthorized",
            DomainError::NotFound(_) => "not_found",
            DomainError::DuplicateSku(_) => "duplicate_sku",
            DomainError::InvalidField { .. } => "invalid_field",
            DomainError::InsufficientStock { .. } => "insufficient_stock",
            DomainError::Persistence(_) => "persistence_error",
        }
    }
}
