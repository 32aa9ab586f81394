//! Domain error types

use thiserror::Error;

/// Errors raised by the quantity model and the mutation resolver.
///
/// All of these are resolved before any network call and surfaced
/// synchronously to the presentation layer; they never reach the backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Sale amount is non-positive or not a finite number
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Variation name not found on the product (case-sensitive exact match)
    #[error("unknown variation: {name}")]
    UnknownVariation { name: String },

    /// Intent shape does not match the product's variant
    #[error("{intent} does not apply to a {variant} product")]
    VariantMismatch {
        intent: &'static str,
        variant: &'static str,
    },

    /// Create/replace draft failed validation
    #[error("invalid draft: {0}")]
    InvalidDraft(String),

    /// Product has no backend-assigned id yet
    #[error("product has no id")]
    MissingId,
}
