//! Data models
//!
//! Wire shapes follow the backend JSON contract, which uses Portuguese
//! field names (`_id`, `nome`, `quantidade`, `unidadeDeMedida`,
//! `variacoes`). Rust-side names are English; serde renames bridge them.

pub mod mutation;
pub mod product;

// Re-exports
pub use mutation::*;
pub use product::*;
