//! In-process movie store, kept in a `BTreeMap` so rows stay ordered by id.
//! Like the PostgreSQL identity column, generated ids only move forward.

use super::MovieStore;
use crate::error::AppError;
use crate::movie::{Movie, MoviePayload};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Table {
    rows: BTreeMap<i32, Movie>,
    /// Highest id handed out or inserted so far; generated ids continue from here.
    last_id: i32,
}

#[derive(Clone, Default)]
pub struct MemoryMovieStore {
    inner: Arc<RwLock<Table>>,
}

impl MemoryMovieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with rows; ids are taken as given.
    pub fn with_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        let mut table = Table::default();
        for m in movies {
            table.last_id = table.last_id.max(m.id);
            table.rows.insert(m.id, m);
        }
        MemoryMovieStore {
            inner: Arc::new(RwLock::new(table)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Table> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Table> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    fn filter<F>(&self, pred: F) -> Vec<Movie>
    where
        F: Fn(&Movie) -> bool,
    {
        self.read().rows.values().filter(|m| pred(m)).cloned().collect()
    }
}

#[async_trait]
impl MovieStore for MemoryMovieStore {
    async fn fetch_all(&self) -> Result<Vec<Movie>, AppError> {
        Ok(self.read().rows.values().cloned().collect())
    }

    async fn fetch_by_id(&self, id: i32) -> Result<Option<Movie>, AppError> {
        Ok(self.read().rows.get(&id).cloned())
    }

    async fn insert(&self, payload: &MoviePayload) -> Result<Movie, AppError> {
        let mut table = self.write();
        let id = match payload.requested_id() {
            Some(id) if table.rows.contains_key(&id) => {
                return Err(AppError::Conflict(format!("movie {} already exists", id)));
            }
            Some(id) => id,
            None => table
                .last_id
                .checked_add(1)
                .ok_or_else(|| AppError::Conflict("id space exhausted".into()))?,
        };
        table.last_id = table.last_id.max(id);
        let movie = payload.clone().into_movie(id);
        table.rows.insert(id, movie.clone());
        Ok(movie)
    }

    async fn update(&self, movie: &Movie) -> Result<bool, AppError> {
        let mut table = self.write();
        match table.rows.get_mut(&movie.id) {
            Some(row) => {
                *row = movie.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.write().rows.remove(&id).is_some())
    }

    async fn search_title(&self, fragment: &str) -> Result<Vec<Movie>, AppError> {
        Ok(self.filter(|m| m.title.contains(fragment)))
    }

    async fn search_genre(&self, fragment: &str) -> Result<Vec<Movie>, AppError> {
        Ok(self.filter(|m| m.genre.contains(fragment)))
    }

    async fn exists(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.read().rows.contains_key(&id))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
