//! Executor: runs a query end-to-end and maps rows to domain objects.
//!
//! parse → plan → generate → execute against the data source → map. The
//! single suspension point of a query is the data-source call; everything
//! before it is pure compilation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde::Serialize;

use crate::cancel::CancelToken;
use crate::data::{DataSource, Performance, ResultSet, Show, Song, Value};
use crate::error::GdqlError;
use crate::query::ast::OutputFormat;
use crate::query::ir::QueryType;
use crate::query::resolve::StoreResolver;
use crate::query::{Compiler, Query};

/// Rows of a result, tagged by query kind.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultRows {
    Shows(Vec<Show>),
    Songs(Vec<Song>),
    Performances(Vec<Performance>),
    Setlist(SetlistResult),
}

/// The ordered performances of one show.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SetlistResult {
    pub date: Option<NaiveDate>,
    pub show_id: i64,
    pub performances: Vec<Performance>,
}

/// The outcome of executing a query.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub rows: ResultRows,
    pub sql: String,
    pub output: OutputFormat,
    pub elapsed: Duration,
}

/// Runs GDQL queries against a data source.
pub struct Executor {
    compiler: Compiler,
    store: Arc<dyn DataSource>,
}

impl Executor {
    /// Build an executor whose song resolution goes through the same store
    /// that executes the generated SQL.
    pub fn new(store: Arc<dyn DataSource>) -> Self {
        let resolver = Arc::new(StoreResolver::new(Arc::clone(&store)));
        Self {
            compiler: Compiler::new(resolver),
            store,
        }
    }

    /// Parse and execute a query string.
    pub fn execute(&self, ctx: &CancelToken, source: &str) -> Result<QueryResult, GdqlError> {
        let query = Compiler::parse(source)?;
        self.execute_ast(ctx, &query)
    }

    /// Execute an already-parsed query.
    pub fn execute_ast(&self, ctx: &CancelToken, query: &Query) -> Result<QueryResult, GdqlError> {
        let start = Instant::now();
        let compiled = self.compiler.compile_ast(ctx, query)?;
        let rs = self
            .store
            .execute_query(ctx, &compiled.sql.sql, &compiled.sql.args)?;

        let rows = match compiled.ir.query_type {
            QueryType::Shows => ResultRows::Shows(map_shows(&rs)),
            QueryType::Songs => ResultRows::Songs(map_songs(&rs)),
            QueryType::Performances => ResultRows::Performances(map_performances(&rs)),
            QueryType::Setlist => ResultRows::Setlist(map_setlist(
                &rs,
                compiled.ir.single_date.map(|d| d.date_naive()),
            )),
        };

        Ok(QueryResult {
            rows,
            sql: compiled.sql.sql,
            output: compiled.ir.output,
            elapsed: start.elapsed(),
        })
    }
}

fn map_shows(rs: &ResultSet) -> Vec<Show> {
    rs.rows
        .iter()
        .filter(|row| row.len() >= 8)
        .map(|row| Show {
            id: int_val(&row[0]),
            date: date_val(&row[1]),
            venue_id: int_val(&row[2]),
            venue: str_val(&row[3]),
            city: str_val(&row[4]),
            state: str_val(&row[5]),
            notes: str_val(&row[6]),
            rating: float_val(&row[7]),
        })
        .collect()
}

fn map_songs(rs: &ResultSet) -> Vec<Song> {
    rs.rows
        .iter()
        .filter(|row| row.len() >= 7)
        .map(|row| Song {
            id: int_val(&row[0]),
            name: str_val(&row[1]),
            short_name: str_val(&row[2]),
            writers: str_val(&row[3]),
            first_played: date_val(&row[4]),
            last_played: date_val(&row[5]),
            times_played: int_val(&row[6]),
        })
        .collect()
}

fn map_performances(rs: &ResultSet) -> Vec<Performance> {
    rs.rows
        .iter()
        .filter(|row| row.len() >= 7)
        .map(|row| Performance {
            id: int_val(&row[0]),
            show_id: int_val(&row[1]),
            song_id: int_val(&row[2]),
            set_number: int_val(&row[3]),
            position: int_val(&row[4]),
            segue_type: str_val(&row[5]),
            length_seconds: int_val(&row[6]),
            song_name: row.get(7).map(str_val).unwrap_or_default(),
        })
        .collect()
}

fn map_setlist(rs: &ResultSet, date: Option<NaiveDate>) -> SetlistResult {
    let performances = map_performances(rs);
    let show_id = performances.first().map_or(0, |p| p.show_id);
    SetlistResult {
        date,
        show_id,
        performances,
    }
}

/// Integers are read tolerantly: floats truncate, everything else is zero.
fn int_val(v: &Value) -> i64 {
    match v {
        Value::Integer(i) => *i,
        Value::Real(f) => *f as i64,
        _ => 0,
    }
}

fn float_val(v: &Value) -> f64 {
    match v {
        Value::Real(f) => *f,
        Value::Integer(i) => *i as f64,
        _ => 0.0,
    }
}

/// Strings accept both native text and byte-string values.
fn str_val(v: &Value) -> String {
    match v {
        Value::Text(s) => s.clone(),
        Value::Blob(b) => String::from_utf8_lossy(b).into_owned(),
        _ => String::new(),
    }
}

/// Dates parse from YYYY-MM-DD; failures degrade to `None`.
fn date_val(v: &Value) -> Option<NaiveDate> {
    match v {
        Value::Text(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
        Value::Blob(b) => {
            NaiveDate::parse_from_str(&String::from_utf8_lossy(b), "%Y-%m-%d").ok()
        }
        _ => None,
    }
}
