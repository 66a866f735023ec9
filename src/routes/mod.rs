//! Routers: movie resource, common endpoints, and the assembled application.

mod common;
mod movies;

pub use common::common_routes_with_ready;
pub use movies::movie_routes;

use crate::error::AppError;
use crate::state::AppState;
use axum::{http::Uri, Router};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Full application: movie routes under `state.base_path`, common routes at the root,
/// JSON 404 fallback, request body limit, and request tracing.
pub fn app(state: AppState, body_limit: usize) -> Router {
    let movies = movie_routes(state.clone());
    let router = if state.base_path == "/" {
        Router::new().merge(movies)
    } else {
        Router::new().nest(&state.base_path, movies)
    };
    router
        .merge(common_routes_with_ready(state))
        .fallback(unknown_route)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
}

async fn unknown_route(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}
