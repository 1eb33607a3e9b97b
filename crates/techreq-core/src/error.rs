//! # Error Module
//!
//! Errors raised by catalog operations. Field-level validation findings are
//! not errors in this sense; see [`crate::validation::ValidationError`].

use thiserror::Error;

use crate::{CharacteristicId, ProductId, SetId};

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Recoverable failures of catalog mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A product may hold only one universal characteristic.
    #[error("a universal criterion characteristic already exists")]
    DuplicateUniversalCriterion,

    /// A reorder index fell outside the sequence.
    #[error("index {index} out of range for sequence of length {len}")]
    InvalidIndex { index: usize, len: usize },

    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("characteristic not found: {0}")]
    CharacteristicNotFound(CharacteristicId),

    #[error("set not found: {0}")]
    SetNotFound(SetId),
}
