//! MovieService: the movie operations behind the HTTP handlers.

mod movies;
pub use movies::MovieService;
