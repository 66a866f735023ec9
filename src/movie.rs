//! Movie record and request payload.

use serde::{Deserialize, Serialize};

/// One persisted movie row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub genre: String,
}

/// Request body for create and replace. `id` is optional on create.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoviePayload {
    #[serde(default)]
    pub id: Option<i32>,
    pub title: String,
    pub genre: String,
}

impl MoviePayload {
    /// Caller-supplied id worth honoring on insert; zero and negatives mean "let storage assign".
    pub fn requested_id(&self) -> Option<i32> {
        self.id.filter(|id| *id > 0)
    }

    pub fn into_movie(self, id: i32) -> Movie {
        Movie {
            id,
            title: self.title,
            genre: self.genre,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_without_id_deserializes() {
        let p: MoviePayload = serde_json::from_str(r#"{"title":"Alpha","genre":"Drama"}"#).unwrap();
        assert_eq!(p.id, None);
        assert_eq!(p.requested_id(), None);
    }

    #[test]
    fn zero_id_is_not_a_request() {
        let p: MoviePayload = serde_json::from_str(r#"{"id":0,"title":"Alpha","genre":"Drama"}"#).unwrap();
        assert_eq!(p.requested_id(), None);
        let p: MoviePayload = serde_json::from_str(r#"{"id":9,"title":"Alpha","genre":"Drama"}"#).unwrap();
        assert_eq!(p.requested_id(), Some(9));
    }

    #[test]
    fn movie_serializes_with_plain_field_names() {
        let m = Movie {
            id: 3,
            title: "Up".into(),
            genre: "Drama".into(),
        };
        assert_eq!(
            serde_json::to_value(&m).unwrap(),
            serde_json::json!({"id": 3, "title": "Up", "genre": "Drama"})
        );
    }
}
