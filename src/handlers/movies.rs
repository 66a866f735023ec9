//! Movie handlers: CRUD, substring search, sorted listings, random picks.

use crate::error::AppError;
use crate::movie::MoviePayload;
use crate::response::{created_at, success_many, success_one_ok};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GenreQuery {
    pub genre: String,
}

fn parse_id(id_str: &str) -> Result<i32, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", id_str)))
}

fn path_segment(path: Result<Path<String>, PathRejection>) -> Result<String, AppError> {
    path.map(|Path(s)| s)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

fn body(body: Result<Json<MoviePayload>, JsonRejection>) -> Result<MoviePayload, AppError> {
    match body {
        Ok(Json(payload)) => Ok(payload),
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => Err(AppError::PayloadTooLarge(e.body_text())),
        Err(e) => Err(AppError::BadRequest(e.body_text())),
    }
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let movies = state.movies.list().await?;
    Ok(success_many(movies))
}

pub async fn read(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&path_segment(path)?)?;
    let movie = state.movies.get(id).await?;
    Ok(success_one_ok(movie))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<MoviePayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let movie = state.movies.create(body(payload)?).await?;
    let location = state.location_of(movie.id);
    Ok(created_at(&location, movie))
}

pub async fn replace(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<MoviePayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&path_segment(path)?)?;
    state.movies.replace(id, body(payload)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&path_segment(path)?)?;
    state.movies.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn search_by_title(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let movies = state.movies.search_by_title(&path_segment(path)?).await?;
    Ok(success_many(movies))
}

pub async fn search_by_genre(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let movies = state.movies.search_by_genre(&path_segment(path)?).await?;
    Ok(success_many(movies))
}

pub async fn titles(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(success_many(state.movies.titles_sorted().await?))
}

pub async fn genres(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(success_many(state.movies.genres_sorted().await?))
}

pub async fn random(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(success_one_ok(state.movies.random().await?))
}

pub async fn random_in_genre(
    State(state): State<AppState>,
    query: Result<Query<GenreQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let movies = state.movies.random_in_genre(&query.genre).await?;
    Ok(success_many(movies))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_rejects_non_integers() {
        assert_eq!(parse_id("42").ok(), Some(42));
        assert!(matches!(parse_id("abc"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_id("99999999999"), Err(AppError::BadRequest(_))));
    }
}
