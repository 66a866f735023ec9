//! Movie routes, mounted under the configured base path.
//! Static segments (`/GetTitles`, `/SearchByTitle/:title`, ...) take precedence over `/:id`.

use crate::handlers::movies::{
    create, delete as delete_handler, genres, list, random, random_in_genre, read, replace,
    search_by_genre, search_by_title, titles,
};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn movie_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/SearchByTitle/:title", get(search_by_title))
        .route("/SearchByGenre/:genre", get(search_by_genre))
        .route("/GetTitles", get(titles))
        .route("/GetGenres", get(genres))
        .route("/GetRandomMovie", get(random))
        .route("/GetRandomGenreMovie", get(random_in_genre))
        .route(
            "/:id",
            get(read).put(replace).delete(delete_handler),
        )
        .with_state(state)
}
