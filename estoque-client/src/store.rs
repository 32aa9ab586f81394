//! Stock store - sync client plus the owned read cache
//!
//! The cache is a stale snapshot of the backend, rebuilt wholesale after
//! every mutating operation. It must never be trusted for
//! concurrent-write decisions; the backend is the single source of
//! truth, and interleaved round trips converge on the next refresh.

use crate::{ClientError, ClientResult, HttpClient};
use shared::{MutationRequest, Product, ProductDraft, SaleIntent, resolve};

/// Lifecycle of the read cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheState {
    /// Nothing fetched yet
    #[default]
    Empty,
    /// A list request is in flight
    Loading,
    /// Cache holds the last fetched product list
    Ready,
    /// The last list request failed; cache keeps its previous contents
    Error,
}

/// Read view handed to the presentation layer for rendering
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub products: &'a [Product],
    pub last_error: Option<&'a str>,
}

/// Sync client for the `/produtos` API with an owned read cache
#[derive(Debug)]
pub struct StockStore {
    http: HttpClient,
    cache: Vec<Product>,
    state: CacheState,
    last_error: Option<String>,
}

impl StockStore {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            cache: Vec::new(),
            state: CacheState::Empty,
            last_error: None,
        }
    }

    /// Fetch the full product list and replace the cache wholesale.
    ///
    /// An empty store is not an error. On transport failure the cache
    /// keeps its last known-good contents and the state moves to
    /// [`CacheState::Error`]; the caller retries by calling `refresh`
    /// again.
    pub async fn refresh(&mut self) -> ClientResult<()> {
        self.state = CacheState::Loading;
        match self.http.get::<Vec<Product>>("/produtos").await {
            Ok(products) => {
                tracing::info!(count = products.len(), "product list refreshed");
                self.cache = products;
                self.state = CacheState::Ready;
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                tracing::warn!("failed to refresh product list: {err}");
                self.state = CacheState::Error;
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Create a product. The draft is validated before any network call.
    pub async fn create(&mut self, draft: ProductDraft) -> ClientResult<Product> {
        let draft = draft.validate()?;
        tracing::info!(name = %draft.name, "creating product");
        let result = self.http.post::<Product, _>("/produtos", &draft).await;
        let created = self.record(result)?;
        self.refresh().await?;
        Ok(created)
    }

    /// Full-document update, used by the edit flow. Same draft
    /// validation as [`Self::create`].
    pub async fn replace(&mut self, id: &str, draft: ProductDraft) -> ClientResult<Product> {
        let draft = draft.validate()?;
        tracing::info!(%id, name = %draft.name, "replacing product");
        let result = self
            .http
            .put::<Product, _>(&format!("/produtos/{id}"), &draft)
            .await;
        let updated = self.record(result)?;
        self.refresh().await?;
        Ok(updated)
    }

    /// Apply a validated stock mutation. The backend performs the
    /// arithmetic; the cache is refreshed afterwards.
    pub async fn apply_mutation(&mut self, request: MutationRequest) -> ClientResult<Product> {
        tracing::info!(
            product_id = %request.product_id,
            kind = request.payload.kind(),
            "applying stock mutation"
        );
        let result = self
            .http
            .patch::<Product, _>(
                &format!("/produtos/{}", request.product_id),
                &request.payload,
            )
            .await;
        let updated = self.record(result)?;
        self.refresh().await?;
        Ok(updated)
    }

    /// Single entry point for sale gestures: look the product up in the
    /// cache, resolve the intent against its variant, then apply the
    /// mutation. Rejections happen before anything goes on the wire.
    pub async fn sell(&mut self, product_id: &str, intent: &SaleIntent) -> ClientResult<Product> {
        let product = self
            .find(product_id)
            .ok_or_else(|| ClientError::NotFound(format!("product {product_id}")))?;
        let request = resolve(product, intent)?;
        self.apply_mutation(request).await
    }

    /// Delete a product. A second delete of the same id surfaces as
    /// `NotFound`; callers treat that as non-fatal and the failed call
    /// leaves the cache untouched.
    pub async fn remove(&mut self, id: &str) -> ClientResult<()> {
        tracing::info!(%id, "deleting product");
        let result = self.http.delete(&format!("/produtos/{id}")).await;
        self.record(result)?;
        self.refresh().await
    }

    pub fn state(&self) -> CacheState {
        self.state
    }

    pub fn products(&self) -> &[Product] {
        &self.cache
    }

    /// Cache lookup by id, used for edit pre-fill and sale resolution.
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.cache.iter().find(|p| p.id.as_deref() == Some(id))
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            products: &self.cache,
            last_error: self.last_error.as_deref(),
        }
    }

    fn record<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(err) = &result {
            self.last_error = Some(err.to_string());
        }
        result
    }
}
