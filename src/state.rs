//! Shared application state for all routes.

use crate::service::MovieService;

#[derive(Clone)]
pub struct AppState {
    pub movies: MovieService,
    /// Mount point of the movie routes, used to build `Location` headers.
    pub base_path: String,
}

impl AppState {
    pub fn new(movies: MovieService, base_path: impl Into<String>) -> Self {
        AppState {
            movies,
            base_path: base_path.into(),
        }
    }

    pub fn location_of(&self, id: i32) -> String {
        format!("{}/{}", self.base_path.trim_end_matches('/'), id)
    }
}
