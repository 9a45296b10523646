//! In-memory movie CRUD service.
//!
//! # Overview
//! Serves `/movies` and `/movies/{id}` over JSON. Records live in a
//! [`MovieStore`] that is handed to every handler as router state; nothing is
//! persisted.
//!
//! # Design
//! - [`app`] builds the router over a freshly seeded store with default
//!   settings. [`router`] takes an explicit store and config, which is what
//!   the binary and most tests use.
//! - Every request gets an `x-request-id` (propagated if the client sent one)
//!   and runs inside a trace span carrying it.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod store;
pub mod telemetry;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderName, Request},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub use config::{LogFormat, ServerConfig};
pub use error::{ApiError, ConfigError, ServerError, StoreError};
pub use model::{Director, Movie, MovieInput};
pub use store::MovieStore;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn app() -> Router {
    router(MovieStore::seeded(), &ServerConfig::default())
}

pub fn router(store: MovieStore, config: &ServerConfig) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(request_id));

    Router::new()
        .route(
            "/movies",
            get(handlers::list_movies).post(handlers::create_movie),
        )
        .route(
            "/movies/{id}",
            get(handlers::get_movie)
                .put(handlers::update_movie)
                .delete(handlers::delete_movie),
        )
        .fallback(handlers::fallback)
        .with_state(store)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(middleware)
}

/// Serves the seeded default app until the listener fails.
pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}
