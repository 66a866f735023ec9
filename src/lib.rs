//! Movies API: a movie catalogue REST backend over PostgreSQL.

pub mod config;
pub mod error;
pub mod handlers;
pub mod movie;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::ServiceConfig;
pub use error::{AppError, ConfigError};
pub use movie::{Movie, MoviePayload};
pub use response::{created_at, success_many, success_one_ok};
pub use routes::{app, common_routes_with_ready, movie_routes};
pub use service::MovieService;
pub use state::AppState;
pub use store::{MemoryMovieStore, MovieStore, PgMovieStore};
