//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for the movies table.

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

const COLUMNS: &str = "\"id\", \"title\", \"genre\"";

/// Location of the movies table. Identifiers come from configuration only; values are always bound.
#[derive(Clone, Debug)]
pub struct MovieTable {
    schema: String,
    name: String,
}

impl MovieTable {
    pub const DEFAULT_NAME: &'static str = "movies";

    pub fn new(schema: impl Into<String>) -> Self {
        MovieTable {
            schema: schema.into(),
            name: Self::DEFAULT_NAME.into(),
        }
    }

    pub fn qualified(&self) -> String {
        qualified_table(&self.schema, &self.name)
    }

    pub fn create_schema(&self) -> String {
        format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(&self.schema))
    }

    pub fn create_table(&self) -> String {
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                "id" INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
                "title" TEXT NOT NULL,
                "genre" TEXT NOT NULL
            )
            "#,
            self.qualified()
        )
    }

    /// All rows ordered by id.
    pub fn select_all(&self) -> String {
        format!("SELECT {} FROM {} ORDER BY \"id\"", COLUMNS, self.qualified())
    }

    /// One row by id; $1 = id.
    pub fn select_by_id(&self) -> String {
        format!("SELECT {} FROM {} WHERE \"id\" = $1", COLUMNS, self.qualified())
    }

    /// Rows whose `column` contains $1. `strpos` keeps the match case-sensitive and free of LIKE wildcards.
    pub fn select_containing(&self, column: MovieColumn) -> String {
        format!(
            "SELECT {} FROM {} WHERE strpos({}, $1) > 0 ORDER BY \"id\"",
            COLUMNS,
            self.qualified(),
            quoted(column.name())
        )
    }

    pub fn exists(&self) -> String {
        format!("SELECT EXISTS (SELECT 1 FROM {} WHERE \"id\" = $1)", self.qualified())
    }

    /// INSERT returning the stored row. With `with_id`: $1 = id, $2 = title, $3 = genre; otherwise $1 = title, $2 = genre.
    pub fn insert(&self, with_id: bool) -> String {
        if with_id {
            format!(
                "INSERT INTO {} (\"id\", \"title\", \"genre\") VALUES ($1, $2, $3) RETURNING {}",
                self.qualified(),
                COLUMNS
            )
        } else {
            format!(
                "INSERT INTO {} (\"title\", \"genre\") VALUES ($1, $2) RETURNING {}",
                self.qualified(),
                COLUMNS
            )
        }
    }

    /// Moves the identity sequence past the highest stored id after an explicit-id insert.
    /// Never moves it backwards, so ids freed by deletes are not handed out again.
    /// $1 = qualified table name as text.
    pub fn sync_identity(&self) -> String {
        format!(
            "WITH seq AS (SELECT pg_get_serial_sequence($1, 'id') AS name) \
             SELECT setval(seq.name::regclass, GREATEST((SELECT MAX(\"id\") FROM {}), \
             COALESCE(pg_sequence_last_value(seq.name::regclass), 0), 1)) FROM seq",
            self.qualified()
        )
    }

    /// Full replace by id; $1 = title, $2 = genre, $3 = id.
    pub fn update(&self) -> String {
        format!(
            "UPDATE {} SET \"title\" = $1, \"genre\" = $2 WHERE \"id\" = $3",
            self.qualified()
        )
    }

    /// DELETE by id, returning the id when a row was removed.
    pub fn delete(&self) -> String {
        format!("DELETE FROM {} WHERE \"id\" = $1 RETURNING \"id\"", self.qualified())
    }
}

/// Text columns that support substring search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovieColumn {
    Title,
    Genre,
}

impl MovieColumn {
    pub fn name(self) -> &'static str {
        match self {
            MovieColumn::Title => "title",
            MovieColumn::Genre => "genre",
        }
    }
}
