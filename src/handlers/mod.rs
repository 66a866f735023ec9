//! HTTP handlers for the movie resource.

pub mod movies;
