//! Error types for the movie service.
//!
//! # Design
//! `ApiError` is what handlers and extractors return; it maps itself onto an
//! HTTP response. Store, config and startup failures get their own enums so
//! the binary can tell a bad environment variable from a port already in use.

use std::{io, net::SocketAddr};

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Body returned whenever a movie id is not in the store.
pub const NOT_FOUND_MESSAGE: &str = "Movie not found";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("movie not found")]
    NotFound,

    /// The request body was read but is not a valid movie payload.
    #[error("invalid movie payload: {0}")]
    MalformedBody(#[source] serde_json::Error),

    /// The request body could not be read, e.g. it exceeded the size limit.
    #[error(transparent)]
    BodyRead(#[from] BytesRejection),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into_response(),
            ApiError::MalformedBody(err) => {
                tracing::debug!(error = %err, "rejected movie payload");
                (
                    StatusCode::BAD_REQUEST,
                    format!("Invalid movie payload: {err}"),
                )
                    .into_response()
            }
            ApiError::BodyRead(rejection) => rejection.into_response(),
            ApiError::Store(err) => {
                tracing::error!(error = %err, "store operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no free movie id after {attempts} attempts")]
    IdSpaceExhausted { attempts: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(#[from] figment::Error),
}

/// Fatal errors raised while starting or running the server binary.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server terminated: {0}")]
    Serve(#[source] io::Error),
}
