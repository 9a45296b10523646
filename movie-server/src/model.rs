//! Movie records and request payloads.
//!
//! # Design
//! `Movie` is the stored and returned record. `MovieInput` is what create and
//! update accept: every field is optional in the JSON and falls back to its
//! empty value, and any `id` the client sends is ignored because the server
//! owns identifiers.

use serde::{Deserialize, Serialize};

/// A movie held in the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub isbn: String,
    pub title: String,
    /// Serialized as `null` when absent.
    pub director: Option<Director>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Director {
    pub firstname: String,
    pub lastname: String,
}

/// Request payload for creating or replacing a movie.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MovieInput {
    pub isbn: String,
    pub title: String,
    pub director: Option<Director>,
}

impl MovieInput {
    /// Builds the stored record under the given identifier.
    pub fn into_movie(self, id: impl Into<String>) -> Movie {
        Movie {
            id: id.into(),
            isbn: self.isbn,
            title: self.title,
            director: self.director,
        }
    }
}

/// The two records every fresh store starts with.
pub fn seed_movies() -> Vec<Movie> {
    vec![
        Movie {
            id: "1".to_string(),
            isbn: "438227".to_string(),
            title: "Movie One".to_string(),
            director: Some(Director {
                firstname: "John".to_string(),
                lastname: "Doe".to_string(),
            }),
        },
        Movie {
            id: "2".to_string(),
            isbn: "454555".to_string(),
            title: "Movie Two".to_string(),
            director: Some(Director {
                firstname: "Steve".to_string(),
                lastname: "Smith".to_string(),
            }),
        },
    ]
}
