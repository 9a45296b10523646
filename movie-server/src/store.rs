//! In-memory movie store.
//!
//! # Design
//! `MovieStore` is a cheap, cloneable handle over one `RwLock`-guarded
//! vector. Reads share the lock; every mutation holds the write lock for its
//! whole scan-then-modify step, so the index found by a scan is still valid
//! when it is used.
//!
//! The vector keeps insertion order. Updates remove the old record and append
//! the replacement, so an updated movie moves to the end of the listing.
//!
//! New ids are drawn from `[0, ID_UPPER_BOUND)` by a generator owned by the
//! store and checked against the ids already present.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    error::StoreError,
    model::{seed_movies, Movie, MovieInput},
};

/// Exclusive upper bound of generated movie ids.
pub const ID_UPPER_BOUND: u32 = 1_000_000;

/// Draws attempted before create gives up on finding a free id.
pub const MAX_ID_ATTEMPTS: usize = 64;

#[derive(Clone)]
pub struct MovieStore {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    movies: Vec<Movie>,
    rng: fastrand::Rng,
}

impl Inner {
    fn position(&self, id: &str) -> Option<usize> {
        self.movies.iter().position(|movie| movie.id == id)
    }

    fn next_id(&mut self) -> Result<String, StoreError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = self.rng.u32(0..ID_UPPER_BOUND).to_string();
            if self.position(&candidate).is_none() {
                return Ok(candidate);
            }
            tracing::debug!(id = %candidate, "generated movie id already taken, retrying");
        }
        Err(StoreError::IdSpaceExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }
}

impl MovieStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::from_movies(Vec::new())
    }

    /// A store holding the two seed movies.
    pub fn seeded() -> Self {
        Self::from_movies(seed_movies())
    }

    pub fn from_movies(movies: Vec<Movie>) -> Self {
        Self::with_rng(movies, fastrand::Rng::new())
    }

    /// Uses the given generator for new ids. A seeded `Rng` makes ids
    /// reproducible.
    pub fn with_rng(movies: Vec<Movie>, rng: fastrand::Rng) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner { movies, rng })),
        }
    }

    /// All movies in store order.
    pub async fn list(&self) -> Vec<Movie> {
        self.inner.read().await.movies.clone()
    }

    /// The first movie with the given id.
    pub async fn get(&self, id: &str) -> Option<Movie> {
        let inner = self.inner.read().await;
        inner.position(id).map(|index| inner.movies[index].clone())
    }

    /// Stores a new movie under a freshly generated id and returns it.
    pub async fn create(&self, input: MovieInput) -> Result<Movie, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id()?;
        let movie = input.into_movie(id);
        inner.movies.push(movie.clone());
        Ok(movie)
    }

    /// Replaces the movie with the given id, moving it to the end of the
    /// store. Returns `None` if no movie has that id.
    pub async fn update(&self, id: &str, input: MovieInput) -> Option<Movie> {
        let mut inner = self.inner.write().await;
        let index = inner.position(id)?;
        inner.movies.remove(index);
        let movie = input.into_movie(id);
        inner.movies.push(movie.clone());
        Some(movie)
    }

    /// Removes and returns the movie with the given id.
    pub async fn delete(&self, id: &str) -> Option<Movie> {
        let mut inner = self.inner.write().await;
        let index = inner.position(id)?;
        Some(inner.movies.remove(index))
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.inner.read().await.movies.len()
    }
}

impl Default for MovieStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Director;

    fn input(title: &str) -> MovieInput {
        MovieInput {
            title: title.to_string(),
            ..MovieInput::default()
        }
    }

    fn ids(movies: &[Movie]) -> Vec<&str> {
        movies.iter().map(|m| m.id.as_str()).collect()
    }

    #[tokio::test]
    async fn new_store_is_empty() {
        let store = MovieStore::new();
        assert_eq!(store.len().await, 0);
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn seeded_store_lists_seeds_in_order() {
        let store = MovieStore::seeded();
        let movies = store.list().await;
        assert_eq!(ids(&movies), ["1", "2"]);
    }

    #[tokio::test]
    async fn create_appends_with_bounded_numeric_id() {
        let store = MovieStore::seeded();
        let created = store.create(input("Third")).await.unwrap();

        let n: u32 = created.id.parse().unwrap();
        assert!(n < ID_UPPER_BOUND);
        assert_ne!(created.id, "1");
        assert_ne!(created.id, "2");

        let movies = store.list().await;
        assert_eq!(movies.len(), 3);
        assert_eq!(movies[2], created);
    }

    #[tokio::test]
    async fn create_preserves_creation_order() {
        let store = MovieStore::seeded();
        let a = store.create(input("A")).await.unwrap();
        let b = store.create(input("B")).await.unwrap();

        let movies = store.list().await;
        assert_eq!(ids(&movies), ["1", "2", a.id.as_str(), b.id.as_str()]);
    }

    #[tokio::test]
    async fn create_skips_ids_already_taken() {
        let mut draws = fastrand::Rng::with_seed(7);
        let first_draw = draws.u32(0..ID_UPPER_BOUND).to_string();

        let taken = MovieInput::default().into_movie(first_draw.clone());
        let store = MovieStore::with_rng(vec![taken], fastrand::Rng::with_seed(7));

        let created = store.create(input("Fresh")).await.unwrap();
        assert_ne!(created.id, first_draw);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn create_fails_when_every_draw_is_taken() {
        let mut draws = fastrand::Rng::with_seed(11);
        let taken: Vec<Movie> = (0..MAX_ID_ATTEMPTS)
            .map(|_| MovieInput::default().into_movie(draws.u32(0..ID_UPPER_BOUND).to_string()))
            .collect();
        let store = MovieStore::with_rng(taken, fastrand::Rng::with_seed(11));

        let err = store.create(input("Crowded")).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::IdSpaceExhausted {
                attempts: MAX_ID_ATTEMPTS
            }
        ));
        assert_eq!(store.len().await, MAX_ID_ATTEMPTS);
    }

    #[tokio::test]
    async fn seeded_rng_gives_reproducible_ids() {
        let a = MovieStore::with_rng(Vec::new(), fastrand::Rng::with_seed(42));
        let b = MovieStore::with_rng(Vec::new(), fastrand::Rng::with_seed(42));
        let id_a = a.create(input("x")).await.unwrap().id;
        let id_b = b.create(input("y")).await.unwrap().id;
        assert_eq!(id_a, id_b);
    }

    #[tokio::test]
    async fn get_returns_first_match() {
        let dup = vec![
            input("first").into_movie("5"),
            input("second").into_movie("5"),
        ];
        let store = MovieStore::from_movies(dup);
        assert_eq!(store.get("5").await.unwrap().title, "first");
        assert!(store.get("6").await.is_none());
    }

    #[tokio::test]
    async fn update_replaces_and_moves_to_end() {
        let store = MovieStore::seeded();
        let updated = store.update("1", input("Renamed")).await.unwrap();

        assert_eq!(updated.id, "1");
        assert_eq!(updated.title, "Renamed");
        assert!(updated.isbn.is_empty());
        assert!(updated.director.is_none());

        let movies = store.list().await;
        assert_eq!(ids(&movies), ["2", "1"]);
        assert_eq!(movies[1], updated);
    }

    #[tokio::test]
    async fn update_keeps_supplied_director() {
        let store = MovieStore::seeded();
        let body = MovieInput {
            director: Some(Director {
                firstname: "Agnes".to_string(),
                lastname: "Varda".to_string(),
            }),
            ..input("Cleo")
        };
        let updated = store.update("2", body).await.unwrap();
        assert_eq!(updated.director.unwrap().lastname, "Varda");
    }

    #[tokio::test]
    async fn update_missing_id_leaves_store_untouched() {
        let store = MovieStore::seeded();
        assert!(store.update("99", input("Nope")).await.is_none());
        assert_eq!(store.list().await, seed_movies());
    }

    #[tokio::test]
    async fn delete_removes_once() {
        let store = MovieStore::seeded();
        let removed = store.delete("2").await.unwrap();
        assert_eq!(removed.title, "Movie Two");
        assert!(store.get("2").await.is_none());
        assert!(store.delete("2").await.is_none());
        assert_eq!(ids(&store.list().await), ["1"]);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = MovieStore::seeded();
        let handle = store.clone();
        handle.delete("1").await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_are_not_lost() {
        let store = MovieStore::new();
        let tasks: Vec<_> = (0..50)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create(input(&format!("m{i}"))).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let movies = store.list().await;
        assert_eq!(movies.len(), 50);
        let mut unique: Vec<&str> = ids(&movies);
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 50);
    }
}
