//! MovieService: CRUD, search, sorted listings, and random picks over a `MovieStore`.

use crate::error::AppError;
use crate::movie::{Movie, MoviePayload};
use crate::store::MovieStore;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use std::sync::{Arc, Mutex};

type SharedRng = Arc<Mutex<Box<dyn RngCore + Send>>>;

#[derive(Clone)]
pub struct MovieService {
    store: Arc<dyn MovieStore>,
    rng: SharedRng,
}

impl MovieService {
    pub fn new(store: Arc<dyn MovieStore>, rng: Box<dyn RngCore + Send>) -> Self {
        MovieService {
            store,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Service with a `StdRng` seeded from `seed`, or from entropy when `None`.
    pub fn with_seed(store: Arc<dyn MovieStore>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self::new(store, Box::new(rng))
    }

    pub fn store(&self) -> &Arc<dyn MovieStore> {
        &self.store
    }

    pub async fn list(&self) -> Result<Vec<Movie>, AppError> {
        self.store.fetch_all().await
    }

    pub async fn get(&self, id: i32) -> Result<Movie, AppError> {
        self.store
            .fetch_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("movie {}", id)))
    }

    pub async fn create(&self, payload: MoviePayload) -> Result<Movie, AppError> {
        let movie = self.store.insert(&payload).await?;
        tracing::info!(id = movie.id, title = %movie.title, "movie created");
        Ok(movie)
    }

    /// Full replace. The body id must equal the path id.
    pub async fn replace(&self, id: i32, payload: MoviePayload) -> Result<(), AppError> {
        if payload.id != Some(id) {
            return Err(AppError::BadRequest(format!(
                "body id {:?} does not match path id {}",
                payload.id, id
            )));
        }
        let movie = payload.into_movie(id);
        if self.store.update(&movie).await? {
            tracing::info!(id, "movie replaced");
            return Ok(());
        }
        // Nothing written: either gone, or changed underneath us.
        if !self.store.exists(id).await? {
            return Err(AppError::NotFound(format!("movie {}", id)));
        }
        tracing::warn!(id, "update matched no row but movie exists");
        Err(AppError::Concurrency(format!("movie {} was modified concurrently", id)))
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound(format!("movie {}", id)));
        }
        tracing::info!(id, "movie deleted");
        Ok(())
    }

    pub async fn search_by_title(&self, fragment: &str) -> Result<Vec<Movie>, AppError> {
        self.store.search_title(fragment).await
    }

    pub async fn search_by_genre(&self, fragment: &str) -> Result<Vec<Movie>, AppError> {
        self.store.search_genre(fragment).await
    }

    /// Every title, duplicates kept, in ordinal order.
    pub async fn titles_sorted(&self) -> Result<Vec<String>, AppError> {
        let mut titles: Vec<String> = self.list().await?.into_iter().map(|m| m.title).collect();
        titles.sort();
        Ok(titles)
    }

    /// Every genre, duplicates kept, in ordinal order.
    pub async fn genres_sorted(&self) -> Result<Vec<String>, AppError> {
        let mut genres: Vec<String> = self.list().await?.into_iter().map(|m| m.genre).collect();
        genres.sort();
        Ok(genres)
    }

    pub async fn random(&self) -> Result<Movie, AppError> {
        let movies = self.list().await?;
        self.pick(&movies)
            .cloned()
            .ok_or_else(|| AppError::NotFound("no movies stored".into()))
    }

    /// Picks a title among movies whose genre equals `genre`, then returns every movie whose title contains it.
    /// The second step matches by substring across all genres, so more than one movie may come back.
    pub async fn random_in_genre(&self, genre: &str) -> Result<Vec<Movie>, AppError> {
        let titles: Vec<String> = self
            .list()
            .await?
            .into_iter()
            .filter(|m| m.genre == genre)
            .map(|m| m.title)
            .collect();
        let title = self
            .pick(&titles)
            .ok_or_else(|| AppError::NotFound(format!("no movies in genre '{}'", genre)))?;
        tracing::debug!(genre = %genre, title = %title, "random genre pick");
        self.store.search_title(title).await
    }

    fn pick<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        items.choose(&mut **rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryMovieStore;
    use async_trait::async_trait;
    use rand::rngs::mock::StepRng;

    fn movie(id: i32, title: &str, genre: &str) -> Movie {
        Movie {
            id,
            title: title.into(),
            genre: genre.into(),
        }
    }

    fn payload(id: Option<i32>, title: &str, genre: &str) -> MoviePayload {
        MoviePayload {
            id,
            title: title.into(),
            genre: genre.into(),
        }
    }

    /// Always picks the first candidate.
    fn first_pick(movies: Vec<Movie>) -> MovieService {
        MovieService::new(
            Arc::new(MemoryMovieStore::with_movies(movies)),
            Box::new(StepRng::new(0, 0)),
        )
    }

    #[tokio::test]
    async fn create_then_get_returns_same_fields() {
        let svc = first_pick(vec![]);
        let created = svc.create(payload(None, "Alpha", "Drama")).await.unwrap();
        let fetched = svc.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.title, "Alpha");
        assert_eq!(fetched.genre, "Drama");
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let svc = first_pick(vec![movie(1, "Up", "Drama")]);
        svc.delete(1).await.unwrap();
        assert!(matches!(svc.get(1).await, Err(AppError::NotFound(_))));
        assert!(matches!(svc.delete(1).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn replace_with_mismatched_id_leaves_storage_unchanged() {
        let svc = first_pick(vec![movie(1, "Up", "Drama")]);
        let err = svc.replace(1, payload(Some(2), "Down", "Comedy")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        let err = svc.replace(1, payload(None, "Down", "Comedy")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(svc.get(1).await.unwrap(), movie(1, "Up", "Drama"));
    }

    #[tokio::test]
    async fn replace_overwrites_or_reports_missing() {
        let svc = first_pick(vec![movie(1, "Up", "Drama")]);
        svc.replace(1, payload(Some(1), "Down", "Comedy")).await.unwrap();
        assert_eq!(svc.get(1).await.unwrap(), movie(1, "Down", "Comedy"));
        let err = svc.replace(5, payload(Some(5), "X", "Y")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    /// Update never lands but the row always exists, as when another writer raced us.
    struct RacingStore(MemoryMovieStore);

    #[async_trait]
    impl MovieStore for RacingStore {
        async fn fetch_all(&self) -> Result<Vec<Movie>, AppError> {
            self.0.fetch_all().await
        }
        async fn fetch_by_id(&self, id: i32) -> Result<Option<Movie>, AppError> {
            self.0.fetch_by_id(id).await
        }
        async fn insert(&self, payload: &MoviePayload) -> Result<Movie, AppError> {
            self.0.insert(payload).await
        }
        async fn update(&self, _movie: &Movie) -> Result<bool, AppError> {
            Ok(false)
        }
        async fn delete(&self, id: i32) -> Result<bool, AppError> {
            self.0.delete(id).await
        }
        async fn search_title(&self, fragment: &str) -> Result<Vec<Movie>, AppError> {
            self.0.search_title(fragment).await
        }
        async fn search_genre(&self, fragment: &str) -> Result<Vec<Movie>, AppError> {
            self.0.search_genre(fragment).await
        }
        async fn exists(&self, id: i32) -> Result<bool, AppError> {
            self.0.exists(id).await
        }
        async fn ping(&self) -> Result<(), AppError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn lost_update_on_existing_row_is_a_concurrency_error() {
        let store = RacingStore(MemoryMovieStore::with_movies(vec![movie(1, "Up", "Drama")]));
        let svc = MovieService::with_seed(Arc::new(store), Some(1));
        let err = svc.replace(1, payload(Some(1), "Down", "Comedy")).await.unwrap_err();
        assert!(matches!(err, AppError::Concurrency(_)));
        let err = svc.replace(2, payload(Some(2), "Down", "Comedy")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn sorted_listings_keep_duplicates() {
        let svc = first_pick(vec![
            movie(1, "Zodiac", "Thriller"),
            movie(2, "Alien", "Horror"),
            movie(3, "alien", "Horror"),
            movie(4, "Alien", "Sci-Fi"),
        ]);
        let titles = svc.titles_sorted().await.unwrap();
        assert_eq!(titles, vec!["Alien", "Alien", "Zodiac", "alien"]);
        assert!(titles.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(titles.len(), svc.list().await.unwrap().len());
        assert_eq!(
            svc.genres_sorted().await.unwrap(),
            vec!["Horror", "Horror", "Sci-Fi", "Thriller"]
        );
    }

    #[tokio::test]
    async fn random_on_empty_store_is_not_found() {
        let svc = first_pick(vec![]);
        assert!(matches!(svc.random().await, Err(AppError::NotFound(_))));
        assert!(matches!(svc.random_in_genre("Drama").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn random_is_deterministic_for_a_seed() {
        let movies: Vec<Movie> = (1..=20).map(|i| movie(i, &format!("M{}", i), "Drama")).collect();
        let a = MovieService::with_seed(Arc::new(MemoryMovieStore::with_movies(movies.clone())), Some(7));
        let b = MovieService::with_seed(Arc::new(MemoryMovieStore::with_movies(movies)), Some(7));
        for _ in 0..5 {
            assert_eq!(a.random().await.unwrap(), b.random().await.unwrap());
        }
    }

    #[tokio::test]
    async fn random_in_genre_rechecks_by_title_substring() {
        let svc = first_pick(vec![movie(1, "Up", "Drama"), movie(2, "Upstream", "Drama")]);
        let found = svc.random_in_genre("Drama").await.unwrap();
        assert_eq!(found.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn random_in_genre_uses_exact_genre_then_crosses_genres() {
        let svc = first_pick(vec![
            movie(1, "Heat", "Crime Drama"),
            movie(2, "Up", "Animation"),
            movie(3, "Heat Wave", "Documentary"),
        ]);
        assert!(matches!(svc.random_in_genre("Drama").await, Err(AppError::NotFound(_))));
        let found = svc.random_in_genre("Crime Drama").await.unwrap();
        assert_eq!(found.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 3]);
    }
}
