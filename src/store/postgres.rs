//! PostgreSQL-backed movie store.

use super::MovieStore;
use crate::error::AppError;
use crate::movie::{Movie, MoviePayload};
use crate::sql::{MovieColumn, MovieTable};
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgMovieStore {
    pool: PgPool,
    table: MovieTable,
}

impl PgMovieStore {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        PgMovieStore {
            pool,
            table: MovieTable::new(schema),
        }
    }

    /// Create the schema and the movies table if they do not exist. Safe to run on every start.
    pub async fn ensure_table(&self) -> Result<(), AppError> {
        sqlx::query(&self.table.create_schema())
            .execute(&self.pool)
            .await?;
        sqlx::query(&self.table.create_table())
            .execute(&self.pool)
            .await?;
        tracing::info!(table = %self.table.qualified(), "movies table ready");
        Ok(())
    }

    async fn search(&self, column: MovieColumn, fragment: &str) -> Result<Vec<Movie>, AppError> {
        let sql = self.table.select_containing(column);
        tracing::debug!(sql = %sql, fragment = %fragment, "query");
        let rows = sqlx::query_as::<_, Movie>(&sql)
            .bind(fragment)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl MovieStore for PgMovieStore {
    async fn fetch_all(&self) -> Result<Vec<Movie>, AppError> {
        let sql = self.table.select_all();
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Movie>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn fetch_by_id(&self, id: i32) -> Result<Option<Movie>, AppError> {
        let sql = self.table.select_by_id();
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Movie>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, payload: &MoviePayload) -> Result<Movie, AppError> {
        let Some(id) = payload.requested_id() else {
            let sql = self.table.insert(false);
            tracing::debug!(sql = %sql, "query");
            let row = sqlx::query_as::<_, Movie>(&sql)
                .bind(&payload.title)
                .bind(&payload.genre)
                .fetch_one(&self.pool)
                .await?;
            return Ok(row);
        };

        // Explicit id: insert and advance the identity sequence together.
        let sql = self.table.insert(true);
        tracing::debug!(sql = %sql, id, "query (tx)");
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, Movie>(&sql)
            .bind(id)
            .bind(&payload.title)
            .bind(&payload.genre)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::from_insert(e, id))?;
        let sync = self.table.sync_identity();
        tracing::debug!(sql = %sync, "query (tx)");
        sqlx::query(&sync)
            .bind(self.table.qualified())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn update(&self, movie: &Movie) -> Result<bool, AppError> {
        let sql = self.table.update();
        tracing::debug!(sql = %sql, id = movie.id, "query");
        let result = sqlx::query(&sql)
            .bind(&movie.title)
            .bind(&movie.genre)
            .bind(movie.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let sql = self.table.delete();
        tracing::debug!(sql = %sql, id, "query");
        let row: Option<(i32,)> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn search_title(&self, fragment: &str) -> Result<Vec<Movie>, AppError> {
        self.search(MovieColumn::Title, fragment).await
    }

    async fn search_genre(&self, fragment: &str) -> Result<Vec<Movie>, AppError> {
        self.search(MovieColumn::Genre, fragment).await
    }

    async fn exists(&self, id: i32) -> Result<bool, AppError> {
        let sql = self.table.exists();
        tracing::debug!(sql = %sql, id, "query");
        let (found,): (bool,) = sqlx::query_as(&sql).bind(id).fetch_one(&self.pool).await?;
        Ok(found)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
