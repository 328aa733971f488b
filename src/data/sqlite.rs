//! SQLite-backed [`DataSource`].
//!
//! Wraps a `rusqlite` connection behind a mutex so the store can be shared
//! across resolver and executor. Schema and sample catalog are embedded and
//! applied idempotently.

use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDate;
use rusqlite::types::{Value as SqliteValue, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row};

use crate::cancel::CancelToken;
use crate::query::SqlArg;

use super::{DataError, DataSource, ResultSet, Song, Value};

const SCHEMA_SQL: &str = include_str!("schema.sql");
const SEED_SQL: &str = include_str!("seed.sql");

const SONG_COLUMNS: &str = "id, name, short_name, writers, first_played, last_played, times_played";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a database file, creating it if missing. Ensures the alias
    /// table exists on databases created before it was introduced.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let conn = Connection::open(path).map_err(db_err)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS song_aliases (
                 alias TEXT PRIMARY KEY,
                 song_id INTEGER NOT NULL REFERENCES songs(id)
             )",
        )
        .map_err(db_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, DataError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Apply the schema (idempotent).
    pub fn init_schema(&self) -> Result<(), DataError> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA_SQL).map_err(db_err)
    }

    /// Apply the schema and the embedded sample catalog (idempotent).
    pub fn init(&self) -> Result<(), DataError> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA_SQL).map_err(db_err)?;
        conn.execute_batch(SEED_SQL).map_err(db_err)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, DataError> {
        self.conn
            .lock()
            .map_err(|_| DataError::Database("connection lock poisoned".to_string()))
    }

    fn query_song(
        &self,
        sql: &str,
        param: &str,
    ) -> Result<Option<Song>, DataError> {
        let conn = self.lock()?;
        conn.query_row(sql, [param], song_from_row)
            .optional()
            .map_err(db_err)
    }
}

/// Create a database at `path` with schema and sample catalog. Safe to call
/// on an existing database.
pub fn init<P: AsRef<Path>>(path: P) -> Result<(), DataError> {
    SqliteStore::open(path)?.init()
}

impl DataSource for SqliteStore {
    fn execute_query(
        &self,
        ctx: &CancelToken,
        sql: &str,
        args: &[SqlArg],
    ) -> Result<ResultSet, DataError> {
        if ctx.is_cancelled() {
            return Err(DataError::Cancelled);
        }
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql).map_err(db_err)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let count = columns.len();

        let params = rusqlite::params_from_iter(args.iter().map(|a| match a {
            SqlArg::Int(i) => SqliteValue::Integer(*i),
            SqlArg::Text(s) => SqliteValue::Text(s.clone()),
        }));

        let mut rows = stmt.query(params).map_err(db_err)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            let mut vals = Vec::with_capacity(count);
            for i in 0..count {
                vals.push(match row.get_ref(i).map_err(db_err)? {
                    ValueRef::Null => Value::Null,
                    ValueRef::Integer(v) => Value::Integer(v),
                    ValueRef::Real(v) => Value::Real(v),
                    ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
                    ValueRef::Blob(b) => Value::Blob(b.to_vec()),
                });
            }
            out.push(vals);
        }

        Ok(ResultSet {
            columns,
            rows: out,
        })
    }

    fn get_song(&self, ctx: &CancelToken, name: &str) -> Result<Option<Song>, DataError> {
        if ctx.is_cancelled() {
            return Err(DataError::Cancelled);
        }
        // Exact or case-insensitive name.
        if let Some(song) = self.query_song(
            &format!(
                "SELECT {SONG_COLUMNS} FROM songs \
                 WHERE name = ?1 OR LOWER(name) = LOWER(?1) LIMIT 1"
            ),
            name,
        )? {
            return Ok(Some(song));
        }
        // Explicit alias; the only fully accurate way to handle variants.
        if let Some(song) = self.query_song(
            "SELECT s.id, s.name, s.short_name, s.writers, s.first_played, s.last_played, \
             s.times_played FROM songs s JOIN song_aliases a ON s.id = a.song_id \
             WHERE a.alias = ?1 OR LOWER(a.alias) = LOWER(?1) LIMIT 1",
            name,
        )? {
            return Ok(Some(song));
        }
        // Best effort: upstream sources mark segued songs with a trailing
        // " -". Trailing only, so a leading dash stays significant.
        self.query_song(
            &format!(
                "SELECT {SONG_COLUMNS} FROM songs \
                 WHERE LOWER(RTRIM(RTRIM(name, ' -'), '-')) = \
                 LOWER(RTRIM(RTRIM(?1, ' -'), '-')) LIMIT 1"
            ),
            name,
        )
    }

    fn get_song_by_id(&self, ctx: &CancelToken, id: i64) -> Result<Option<Song>, DataError> {
        if ctx.is_cancelled() {
            return Err(DataError::Cancelled);
        }
        let conn = self.lock()?;
        conn.query_row(
            &format!("SELECT {SONG_COLUMNS} FROM songs WHERE id = ?1"),
            [id],
            song_from_row,
        )
        .optional()
        .map_err(db_err)
    }

    fn search_songs(&self, ctx: &CancelToken, pattern: &str) -> Result<Vec<Song>, DataError> {
        if ctx.is_cancelled() {
            return Err(DataError::Cancelled);
        }
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SONG_COLUMNS} FROM songs \
                 WHERE name LIKE ?1 OR short_name LIKE ?1 ORDER BY name"
            ))
            .map_err(db_err)?;
        let like = format!("%{pattern}%");
        let rows = stmt
            .query_map([like], song_from_row)
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(rows)
    }
}

fn song_from_row(row: &Row<'_>) -> rusqlite::Result<Song> {
    Ok(Song {
        id: row.get(0)?,
        name: row.get(1)?,
        short_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        writers: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        first_played: parse_date(row.get::<_, Option<String>>(4)?),
        last_played: parse_date(row.get::<_, Option<String>>(5)?),
        times_played: row.get::<_, Option<i64>>(6)?.unwrap_or_default(),
    })
}

fn parse_date(s: Option<String>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s?.as_str(), "%Y-%m-%d").ok()
}

fn db_err(e: rusqlite::Error) -> DataError {
    DataError::Database(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> SqliteStore {
        let store = SqliteStore::open_in_memory().expect("open");
        store.init().expect("init");
        store
    }

    #[test]
    fn init_is_idempotent() {
        let store = seeded();
        store.init().expect("second init");
    }

    #[test]
    fn execute_query_returns_columns_and_rows() {
        let store = seeded();
        let ctx = CancelToken::new();
        let rs = store
            .execute_query(
                &ctx,
                "SELECT id, date, rating FROM shows WHERE date >= ? ORDER BY date",
                &[SqlArg::Text("1977-01-01".into())],
            )
            .expect("query");
        assert_eq!(rs.columns, vec!["id", "date", "rating"]);
        assert_eq!(rs.rows.len(), 3);
        assert_eq!(rs.rows[0][1], Value::Text("1977-02-26".into()));
        assert!(matches!(rs.rows[0][2], Value::Real(_)));
    }

    #[test]
    fn execute_query_surfaces_nulls() {
        let store = seeded();
        let ctx = CancelToken::new();
        let rs = store
            .execute_query(&ctx, "SELECT notes FROM shows WHERE id = 2", &[])
            .expect("query");
        assert_eq!(rs.rows[0][0], Value::Null);
    }

    #[test]
    fn get_song_exact() {
        let store = seeded();
        let ctx = CancelToken::new();
        let song = store
            .get_song(&ctx, "Dark Star")
            .expect("lookup")
            .expect("some");
        assert_eq!(song.id, 10);
        assert_eq!(song.name, "Dark Star");
    }

    #[test]
    fn get_song_case_insensitive() {
        let store = seeded();
        let ctx = CancelToken::new();
        let song = store
            .get_song(&ctx, "dark star")
            .expect("lookup")
            .expect("some");
        assert_eq!(song.id, 10);
    }

    #[test]
    fn get_song_via_alias() {
        let store = seeded();
        let ctx = CancelToken::new();
        let song = store.get_song(&ctx, "Dew").expect("lookup").expect("some");
        assert_eq!(song.name, "Morning Dew");
    }

    #[test]
    fn get_song_trimmed_suffix() {
        let store = seeded();
        let ctx = CancelToken::new();
        let song = store
            .get_song(&ctx, "Dark Star -")
            .expect("lookup")
            .expect("some");
        assert_eq!(song.id, 10);
    }

    #[test]
    fn get_song_leading_dash_is_significant() {
        let store = seeded();
        let ctx = CancelToken::new();
        assert!(store
            .get_song(&ctx, "- Dark Star")
            .expect("lookup")
            .is_none());
    }

    #[test]
    fn get_song_missing_is_none() {
        let store = seeded();
        let ctx = CancelToken::new();
        assert!(store
            .get_song(&ctx, "Louie Louie")
            .expect("lookup")
            .is_none());
    }

    #[test]
    fn get_song_by_id() {
        let store = seeded();
        let ctx = CancelToken::new();
        let song = store
            .get_song_by_id(&ctx, 1)
            .expect("lookup")
            .expect("some");
        assert_eq!(song.name, "Scarlet Begonias");
        assert_eq!(
            song.first_played.expect("date").to_string(),
            "1974-03-23"
        );
    }

    #[test]
    fn search_songs_fuzzy() {
        let store = seeded();
        let ctx = CancelToken::new();
        let songs = store.search_songs(&ctx, "Scarlet").expect("search");
        assert!(songs.iter().any(|s| s.name == "Scarlet Begonias"));
    }

    #[test]
    fn cancelled_context_short_circuits() {
        let store = seeded();
        let ctx = CancelToken::new();
        ctx.cancel();
        let err = store
            .execute_query(&ctx, "SELECT 1", &[])
            .expect_err("should cancel");
        assert!(matches!(err, DataError::Cancelled));
    }
}
