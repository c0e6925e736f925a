//! HTTP API server with observability for the catalog service.
//!
//! Provides REST endpoints for category and product management, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, patch, post, put};
use messaging::{EventPublisher, InMemoryBroker};
use metrics_exporter_prometheus::PrometheusHandle;
use store::{CategoryRepository, ProductRepository};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<P, C>(state: Arc<AppState<P, C>>, metrics_handle: PrometheusHandle) -> Router
where
    P: ProductRepository + Clone + 'static,
    C: CategoryRepository + Clone + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/categories", post(routes::categories::create::<P, C>))
        .route("/categories", get(routes::categories::list::<P, C>))
        .route("/categories/{id}", get(routes::categories::get::<P, C>))
        .route("/categories/{id}", patch(routes::categories::update::<P, C>))
        .route("/products", post(routes::products::create::<P, C>))
        .route("/products", get(routes::products::list::<P, C>))
        .route("/products/{id}", get(routes::products::get::<P, C>))
        .route(
            "/products/{id}/activate",
            post(routes::products::activate::<P, C>),
        )
        .route(
            "/products/{id}/archive",
            post(routes::products::archive::<P, C>),
        )
        .route(
            "/products/{id}/description",
            patch(routes::products::update_description::<P, C>),
        )
        .route(
            "/products/{id}/categories/{category_id}",
            post(routes::products::add_category::<P, C>),
        )
        .route(
            "/products/{id}/categories/{category_id}",
            delete(routes::products::remove_category::<P, C>),
        )
        .route(
            "/products/{id}/attributes",
            post(routes::products::add_attribute::<P, C>),
        )
        .route(
            "/products/{id}/attributes/{key}",
            put(routes::products::update_attribute::<P, C>),
        )
        .route(
            "/products/{id}/attributes/{key}",
            delete(routes::products::remove_attribute::<P, C>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state backed by in-memory stores and an in-process
/// broker, for local development and tests.
///
/// The returned publisher starts disconnected; call
/// [`EventPublisher::connect`] with the broker to enable delivery.
pub fn create_default_state() -> (
    Arc<AppState<store::InMemoryProductRepository, store::InMemoryCategoryRepository>>,
    Arc<InMemoryBroker>,
    Arc<EventPublisher>,
) {
    use domain::{CategoryService, ProductService};

    let broker = Arc::new(InMemoryBroker::new());
    let publisher = Arc::new(EventPublisher::new());

    let categories = store::InMemoryCategoryRepository::new();
    let products = store::InMemoryProductRepository::new();

    let state = Arc::new(AppState {
        category_service: CategoryService::new(categories.clone(), publisher.clone()),
        product_service: ProductService::new(products, categories, publisher.clone()),
    });

    (state, broker, publisher)
}
