//! Data access: the store contract the generated SQL targets, plus the
//! domain objects rows map back into.

pub mod sqlite;

use chrono::NaiveDate;
use serde::Serialize;

use crate::cancel::CancelToken;
use crate::query::SqlArg;

/// Errors surfaced by a data source.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("database error: {0}")]
    Database(String),
    #[error("query cancelled")]
    Cancelled,
}

/// A weakly typed column value, as returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// The result of a raw query.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Executes SQL and resolves songs. The single shared resource of the
/// pipeline; implementations must support concurrent reads.
pub trait DataSource: Send + Sync {
    fn execute_query(
        &self,
        ctx: &CancelToken,
        sql: &str,
        args: &[SqlArg],
    ) -> Result<ResultSet, DataError>;

    /// Look up a song by exact name, case-insensitive name, alias, or
    /// trimmed-suffix match, in that order.
    fn get_song(&self, ctx: &CancelToken, name: &str) -> Result<Option<Song>, DataError>;

    fn get_song_by_id(&self, ctx: &CancelToken, id: i64) -> Result<Option<Song>, DataError>;

    /// LIKE-based fuzzy search over names and short names.
    fn search_songs(&self, ctx: &CancelToken, pattern: &str) -> Result<Vec<Song>, DataError>;
}

/// A show (one night, one venue).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Show {
    pub id: i64,
    pub date: Option<NaiveDate>,
    pub venue_id: i64,
    pub venue: String,
    pub city: String,
    pub state: String,
    pub notes: String,
    pub rating: f64,
}

/// A song in the catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Song {
    pub id: i64,
    pub name: String,
    pub short_name: String,
    pub writers: String,
    pub first_played: Option<NaiveDate>,
    pub last_played: Option<NaiveDate>,
    pub times_played: i64,
}

/// One song performed at one show. `song_name` is filled when the query
/// joins against songs (setlists) for display.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Performance {
    pub id: i64,
    pub show_id: i64,
    pub song_id: i64,
    pub set_number: i64,
    pub position: i64,
    pub segue_type: String,
    pub length_seconds: i64,
    pub song_name: String,
}
