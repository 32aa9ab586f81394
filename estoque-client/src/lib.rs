//! Estoque Client - HTTP client for the stock backend
//!
//! Provides the sync client used by the presentation layer: REST round
//! trips to the `/produtos` API plus an owned read cache of the product
//! list.

pub mod config;
pub mod error;
pub mod http;
pub mod store;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use store::{CacheState, Snapshot, StockStore};

// Re-export shared types for convenience
pub use shared::{DomainError, MutationRequest, Product, ProductDraft, SaleIntent};
