//! Request handlers for the `/movies` routes.

use axum::{
    body::Bytes,
    extract::{FromRequest, Path, Request, State},
    http::StatusCode,
    Json,
};
use serde::de;
use serde_json::Value;

use crate::{
    error::ApiError,
    model::{Movie, MovieInput},
    store::MovieStore,
};

/// JSON body extractor for `MovieInput`.
///
/// Unlike `axum::Json` it does not require a `Content-Type` header, and any
/// decode failure becomes an `ApiError` so every client error is answered
/// in plain text. The body must be a JSON object; serde would otherwise
/// accept an array as a positional struct.
pub struct MovieJson(pub MovieInput);

impl<S> FromRequest<S> for MovieJson
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await?;
        match serde_json::from_slice(&body).map_err(ApiError::MalformedBody)? {
            Value::Object(fields) => serde_json::from_value(Value::Object(fields))
                .map(MovieJson)
                .map_err(ApiError::MalformedBody),
            _ => Err(ApiError::MalformedBody(de::Error::custom(
                "expected a JSON object",
            ))),
        }
    }
}

pub async fn list_movies(State(store): State<MovieStore>) -> Json<Vec<Movie>> {
    Json(store.list().await)
}

pub async fn get_movie(
    State(store): State<MovieStore>,
    Path(id): Path<String>,
) -> Result<Json<Movie>, ApiError> {
    match store.get(&id).await {
        Some(movie) => Ok(Json(movie)),
        None => {
            tracing::debug!(%id, "movie not found");
            Err(ApiError::NotFound)
        }
    }
}

pub async fn create_movie(
    State(store): State<MovieStore>,
    MovieJson(input): MovieJson,
) -> Result<Json<Movie>, ApiError> {
    let movie = store.create(input).await?;
    tracing::info!(id = %movie.id, title = %movie.title, "movie created");
    Ok(Json(movie))
}

pub async fn update_movie(
    State(store): State<MovieStore>,
    Path(id): Path<String>,
    MovieJson(input): MovieJson,
) -> Result<Json<Movie>, ApiError> {
    match store.update(&id, input).await {
        Some(movie) => {
            tracing::info!(%id, title = %movie.title, "movie updated");
            Ok(Json(movie))
        }
        None => {
            tracing::debug!(%id, "movie not found for update");
            Err(ApiError::NotFound)
        }
    }
}

pub async fn delete_movie(
    State(store): State<MovieStore>,
    Path(id): Path<String>,
) -> Result<String, ApiError> {
    match store.delete(&id).await {
        Some(_) => {
            tracing::info!(%id, "movie deleted");
            Ok(format!("Movie with ID {id} has been deleted"))
        }
        None => {
            tracing::debug!(%id, "movie not found for delete");
            Err(ApiError::NotFound)
        }
    }
}

/// Answers requests whose path matches no route.
pub async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "404 page not found")
}
