//! HTTP API server for author collections.
//!
//! Serves sorted, filtered, paged and shaped author lists, with structured
//! logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, options};
use catalog::{AuthorRepository, InMemoryAuthorRepository};
use metrics_exporter_prometheus::PrometheusHandle;
use query::PropertyMappingRegistry;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use url::Url;

use routes::authors::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<R: AuthorRepository + 'static>(
    state: Arc<AppState<R>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([axum::http::HeaderName::from_static(
            routes::authors::PAGINATION_HEADER,
        )]);

    // CorsLayer answers every OPTIONS request itself, so it wraps only the
    // GET routes and OPTIONS /authors reaches its own handler.
    Router::new()
        .route("/health", get(routes::health::check))
        .route("/authors", get(routes::authors::list::<R>).layer(cors.clone()))
        .route("/authors", options(routes::authors::options))
        .route(
            "/authors/{id}",
            get(routes::authors::get::<R>).layer(cors),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(TraceLayer::new_for_http())
}

/// Creates application state over `authors`, with every catalog mapping
/// registered.
pub fn create_state<R: AuthorRepository>(
    authors: R,
    base_url: Url,
) -> query::Result<Arc<AppState<R>>> {
    let registry: PropertyMappingRegistry = catalog::property_mapping_registry()?;
    for (view, model) in registry.pairs() {
        tracing::info!(view, model, "property mapping registered");
    }

    Ok(Arc::new(AppState {
        registry: Arc::new(registry),
        authors,
        base_url,
    }))
}

/// Creates the default application state: an in-memory store holding the
/// seed authors.
pub fn create_default_state(
    base_url: Url,
) -> query::Result<Arc<AppState<InMemoryAuthorRepository>>> {
    let authors = InMemoryAuthorRepository::with_authors(catalog::seed::authors());
    create_state(authors, base_url)
}
