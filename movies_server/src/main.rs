//! Movies server: loads `.env`, connects to PostgreSQL, ensures the movies table, and serves the API.
//!
//! Run from repo root: `cargo run -p movies-server`

use movies_api::{app, AppState, MovieService, PgMovieStore, ServiceConfig};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("movies_api=info,tower_http=info")),
        )
        .init();

    let config = ServiceConfig::from_env()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    let store = PgMovieStore::new(pool, config.schema.clone());
    store.ensure_table().await?;

    if config.rng_seed.is_some() {
        tracing::info!(seed = ?config.rng_seed, "random picks use a fixed seed");
    }
    let movies = MovieService::with_seed(Arc::new(store), config.rng_seed);
    let state = AppState::new(movies, config.base_path.clone());
    let router = app(state, config.body_limit);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(base_path = %config.base_path, "listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
