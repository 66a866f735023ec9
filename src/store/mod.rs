//! Storage interface for movie rows, with PostgreSQL and in-memory implementations.

mod memory;
mod postgres;

pub use memory::MemoryMovieStore;
pub use postgres::PgMovieStore;

use crate::error::AppError;
use crate::movie::{Movie, MoviePayload};
use async_trait::async_trait;

/// Row-level operations; each call commits or fails on its own.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// All rows, ordered by id.
    async fn fetch_all(&self) -> Result<Vec<Movie>, AppError>;

    async fn fetch_by_id(&self, id: i32) -> Result<Option<Movie>, AppError>;

    /// Insert one row. Uses `payload.requested_id()` when present, otherwise storage assigns the id.
    async fn insert(&self, payload: &MoviePayload) -> Result<Movie, AppError>;

    /// Overwrite title and genre of `movie.id`. Returns false when no row was written.
    async fn update(&self, movie: &Movie) -> Result<bool, AppError>;

    /// Returns false when no row had that id.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;

    /// Rows whose title contains `fragment` (case-sensitive), ordered by id.
    async fn search_title(&self, fragment: &str) -> Result<Vec<Movie>, AppError>;

    /// Rows whose genre contains `fragment` (case-sensitive), ordered by id.
    async fn search_genre(&self, fragment: &str) -> Result<Vec<Movie>, AppError>;

    async fn exists(&self, id: i32) -> Result<bool, AppError>;

    /// Cheap round trip for readiness checks.
    async fn ping(&self) -> Result<(), AppError>;
}
