// estoque-client/tests/store_integration.rs
//
// Round trips against an in-process fake backend implementing the
// /produtos REST contract over an in-memory list. PATCH arithmetic is
// delegated to the shared quantity model so client and backend agree on
// the mutation semantics.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use estoque_client::{CacheState, ClientConfig, ClientError, StockStore};
use shared::{MutationPayload, Product, ProductDraft, SaleIntent, Variation};
use tokio::sync::oneshot;

#[derive(Default)]
struct Backend {
    products: Mutex<Vec<Product>>,
    next_id: AtomicUsize,
    requests: AtomicUsize,
}

impl Backend {
    fn hit(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

async fn list(State(backend): State<Arc<Backend>>) -> Json<Vec<Product>> {
    backend.hit();
    Json(backend.products.lock().unwrap().clone())
}

async fn create(
    State(backend): State<Arc<Backend>>,
    Json(draft): Json<ProductDraft>,
) -> Json<Product> {
    backend.hit();
    let id = backend.next_id.fetch_add(1, Ordering::SeqCst);
    let product = Product {
        id: Some(format!("p{id}")),
        name: draft.name,
        quantity: draft.quantity,
        unit: draft.unit,
        variations: draft.variations,
    };
    backend.products.lock().unwrap().push(product.clone());
    Json(product)
}

async fn replace(
    State(backend): State<Arc<Backend>>,
    Path(id): Path<String>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<Product>, StatusCode> {
    backend.hit();
    let mut products = backend.products.lock().unwrap();
    let product = products
        .iter_mut()
        .find(|p| p.id.as_deref() == Some(id.as_str()))
        .ok_or(StatusCode::NOT_FOUND)?;
    product.name = draft.name;
    product.quantity = draft.quantity;
    product.unit = draft.unit;
    product.variations = draft.variations;
    Ok(Json(product.clone()))
}

async fn apply(
    State(backend): State<Arc<Backend>>,
    Path(id): Path<String>,
    Json(payload): Json<MutationPayload>,
) -> Result<Json<Product>, StatusCode> {
    backend.hit();
    let mut products = backend.products.lock().unwrap();
    let product = products
        .iter_mut()
        .find(|p| p.id.as_deref() == Some(id.as_str()))
        .ok_or(StatusCode::NOT_FOUND)?;
    let quantity = payload
        .apply_to(product)
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    product.quantity = quantity;
    Ok(Json(product.clone()))
}

async fn remove(State(backend): State<Arc<Backend>>, Path(id): Path<String>) -> StatusCode {
    backend.hit();
    let mut products = backend.products.lock().unwrap();
    let before = products.len();
    products.retain(|p| p.id.as_deref() != Some(id.as_str()));
    if products.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

/// Serve the fake backend on a random port. The returned sender keeps
/// the server alive; dropping it shuts the server down.
async fn serve() -> (StockStore, Arc<Backend>, oneshot::Sender<()>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let backend = Arc::new(Backend::default());
    let app = Router::new()
        .route("/produtos", get(list).post(create))
        .route("/produtos/{id}", put(replace).patch(apply).delete(remove))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    let store = ClientConfig::new(format!("http://{addr}"))
        .with_timeout(5)
        .build_store();
    (store, backend, shutdown_tx)
}

#[tokio::test]
async fn test_create_and_list_round_trip() {
    let (mut store, _backend, _shutdown) = serve().await;
    assert_eq!(store.state(), CacheState::Empty);

    store.refresh().await.unwrap();
    assert_eq!(store.state(), CacheState::Ready);
    assert!(store.products().is_empty());

    store
        .create(ProductDraft::bulk_kg("Queijo", 7.5))
        .await
        .unwrap();

    let products = store.products();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Queijo");
    assert_eq!(products[0].quantity, 7.5);
    assert!(products[0].variations.is_empty());
}

#[tokio::test]
async fn test_unit_decrement_goes_past_zero() {
    let (mut store, _backend, _shutdown) = serve().await;
    let created = store.create(ProductDraft::unit("Pão", 3.0)).await.unwrap();
    let id = created.id.unwrap();

    for _ in 0..3 {
        store.sell(&id, &SaleIntent::Decrement).await.unwrap();
    }
    assert_eq!(store.find(&id).unwrap().quantity, 0.0);

    // No floor: a fourth decrement is accepted and yields -1.
    store.sell(&id, &SaleIntent::Decrement).await.unwrap();
    assert_eq!(store.find(&id).unwrap().quantity, -1.0);

    store.sell(&id, &SaleIntent::Increment).await.unwrap();
    assert_eq!(store.find(&id).unwrap().quantity, 0.0);
}

#[tokio::test]
async fn test_bulk_weight_sale() {
    let (mut store, backend, _shutdown) = serve().await;
    let created = store
        .create(ProductDraft::bulk_kg("Queijo", 7.5))
        .await
        .unwrap();
    let id = created.id.unwrap();

    store
        .sell(&id, &SaleIntent::SellWeight { amount_kg: 0.25 })
        .await
        .unwrap();
    assert!((store.find(&id).unwrap().quantity - 7.25).abs() < 1e-9);

    // A non-positive amount is rejected before anything goes on the wire.
    let before = backend.request_count();
    let err = store
        .sell(&id, &SaleIntent::SellWeight { amount_kg: 0.0 })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Domain(_)));
    assert_eq!(backend.request_count(), before);
    assert!((store.find(&id).unwrap().quantity - 7.25).abs() < 1e-9);
}

#[tokio::test]
async fn test_variation_sale() {
    let (mut store, backend, _shutdown) = serve().await;
    let created = store
        .create(ProductDraft::portioned_kg(
            "Açaí",
            1.0,
            vec![Variation::from_grams("Pote P", 100.0)],
        ))
        .await
        .unwrap();
    let id = created.id.unwrap();

    store
        .sell(&id, &SaleIntent::SellVariation { name: "Pote P".into() })
        .await
        .unwrap();
    assert!((store.find(&id).unwrap().quantity - 0.9).abs() < 1e-9);

    let before = backend.request_count();
    let err = store
        .sell(&id, &SaleIntent::SellVariation { name: "Pote M".into() })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Domain(_)));
    assert_eq!(backend.request_count(), before);
    assert!((store.find(&id).unwrap().quantity - 0.9).abs() < 1e-9);
}

#[tokio::test]
async fn test_portioned_create_rejected_before_any_request() {
    let (mut store, backend, _shutdown) = serve().await;
    store.refresh().await.unwrap();

    let before = backend.request_count();
    let draft = ProductDraft::portioned_kg(
        "Açaí",
        5.0,
        vec![Variation::new("", 0.1), Variation::new("Pote P", -0.1)],
    );
    let err = store.create(draft).await.unwrap_err();
    assert!(matches!(err, ClientError::Domain(_)));
    assert_eq!(backend.request_count(), before);
}

#[tokio::test]
async fn test_replace_updates_the_full_document() {
    let (mut store, _backend, _shutdown) = serve().await;
    let created = store.create(ProductDraft::unit("Pão", 10.0)).await.unwrap();
    let id = created.id.unwrap();

    store
        .replace(&id, ProductDraft::unit("Pão Francês", 12.0))
        .await
        .unwrap();

    let product = store.find(&id).unwrap();
    assert_eq!(product.name, "Pão Francês");
    assert_eq!(product.quantity, 12.0);
}

#[tokio::test]
async fn test_second_remove_is_not_found_and_cache_is_untouched() {
    let (mut store, _backend, _shutdown) = serve().await;
    let created = store.create(ProductDraft::unit("Pão", 1.0)).await.unwrap();
    let id = created.id.unwrap();

    store.remove(&id).await.unwrap();
    assert!(store.products().is_empty());
    assert_eq!(store.state(), CacheState::Ready);

    let err = store.remove(&id).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(store.products().is_empty());
    assert_eq!(store.state(), CacheState::Ready);
}

#[tokio::test]
async fn test_transport_failure_keeps_last_known_good_cache() {
    let (mut store, _backend, shutdown) = serve().await;
    store.create(ProductDraft::unit("Pão", 2.0)).await.unwrap();
    assert_eq!(store.products().len(), 1);

    drop(shutdown);
    // Wait for the listener to actually go away.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let err = store.refresh().await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
    assert_eq!(store.state(), CacheState::Error);
    assert_eq!(store.products().len(), 1);
    assert!(store.snapshot().last_error.is_some());
}

#[tokio::test]
async fn test_sell_on_unknown_id_is_not_found() {
    let (mut store, _backend, _shutdown) = serve().await;
    store.refresh().await.unwrap();

    let err = store
        .sell("missing", &SaleIntent::Increment)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
