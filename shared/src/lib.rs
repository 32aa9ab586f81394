//! Shared types for the estoque stock manager
//!
//! Domain model and mutation logic used by the sync client and the
//! presentation layer. Pure data and validation, no I/O.

pub mod error;
pub mod intent;
pub mod models;

// Re-exports
pub use error::DomainError;
pub use intent::{SaleIntent, resolve};
pub use models::{
    MutationPayload, MutationRequest, Product, ProductDraft, ProductVariant, Unit, Variation,
};
