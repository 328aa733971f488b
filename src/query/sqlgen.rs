//! SQL generation: a `QueryIR` becomes parameterized SQL plus a bound
//! argument vector.
//!
//! Safety invariant: no user-supplied text is ever interpolated into the
//! SQL string; every value rides in the argument vector as a `?` binding.

use chrono::{DateTime, Utc};

use crate::error::GenerationError;

use super::ast::{CompOp, LogicOp, PositionOp, SegueOp, SetPosition};
use super::ir::{ConditionIR, QueryIR, QueryType};
use super::segue;

/// A parameterized SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub args: Vec<SqlArg>,
}

/// A bound argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlArg {
    Int(i64),
    Text(String),
}

pub const SHOW_COLUMNS: &str =
    "s.id, s.date, s.venue_id, v.name AS venue, v.city, v.state, s.notes, s.rating";

/// Generate SQL for a resolved query.
pub fn generate(q: &QueryIR) -> Result<SqlQuery, GenerationError> {
    match q.query_type {
        QueryType::Shows => gen_shows(q),
        QueryType::Songs => gen_songs(q),
        QueryType::Performances => gen_performances(q),
        QueryType::Setlist => gen_setlist(q),
    }
}

fn gen_shows(q: &QueryIR) -> Result<SqlQuery, GenerationError> {
    if let Some(chain) = &q.segue_chain {
        return segue::build_segue_shows_sql(q, chain);
    }

    let mut sql = format!(
        "SELECT {SHOW_COLUMNS} FROM shows s LEFT JOIN venues v ON s.venue_id = v.id"
    );
    let mut args = Vec::new();

    let mut parts = Vec::new();
    if let Some(dr) = &q.date_range {
        parts.push("s.date >= ? AND s.date <= ?".to_string());
        args.push(SqlArg::Text(format_date(dr.start)));
        args.push(SqlArg::Text(format_date(dr.end)));
    }
    for cond in &q.conditions {
        push_show_condition(cond, "p", &mut parts, &mut args);
    }
    if !parts.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&parts.join(" AND "));
    }

    if let Some(order) = order_by(q, "s") {
        sql.push(' ');
        sql.push_str(&order);
    }
    if let Some(limit) = q.limit {
        sql.push_str(" LIMIT ?");
        args.push(SqlArg::Int(limit as i64));
    }

    Ok(SqlQuery { sql, args })
}

/// Append the WHERE fragment (and args) for one show-level condition.
/// Shared by the plain and segue-chain show queries, which differ only in
/// the alias used for the probing subqueries.
pub(super) fn push_show_condition(
    cond: &ConditionIR,
    alias: &str,
    parts: &mut Vec<String>,
    args: &mut Vec<SqlArg>,
) {
    match cond {
        ConditionIR::Position { set, op, song_id } => {
            let flag = match op {
                PositionOp::Opened => format!(" AND {alias}.is_opener = 1"),
                PositionOp::Closed => format!(" AND {alias}.is_closer = 1"),
                PositionOp::Equals => String::new(),
            };
            parts.push(format!(
                "EXISTS (SELECT 1 FROM performances {alias} WHERE {alias}.show_id = s.id \
                 AND {alias}.set_number = ? AND {alias}.song_id = ?{flag})"
            ));
            args.push(SqlArg::Int(set_number(*set)));
            args.push(SqlArg::Int(*song_id));
        }
        ConditionIR::Played { song_id, negated } => {
            let prefix = if *negated { "NOT " } else { "" };
            parts.push(format!(
                "{prefix}EXISTS (SELECT 1 FROM performances {alias} \
                 WHERE {alias}.show_id = s.id AND {alias}.song_id = ?)"
            ));
            args.push(SqlArg::Int(*song_id));
        }
        ConditionIR::Guest { name } => {
            parts.push(format!(
                "EXISTS (SELECT 1 FROM performances {alias} WHERE {alias}.show_id = s.id \
                 AND {alias}.guest IS NOT NULL AND {alias}.guest != '' \
                 AND ({alias}.guest = ? OR {alias}.guest LIKE ?))"
            ));
            args.push(SqlArg::Text(name.clone()));
            args.push(SqlArg::Text(format!("%{name}%")));
        }
        // Length and lyrics conditions have no meaning at show level.
        ConditionIR::Length { .. } | ConditionIR::Lyrics { .. } => {}
    }
}

fn gen_songs(q: &QueryIR) -> Result<SqlQuery, GenerationError> {
    let mut sql = "SELECT id, name, short_name, writers, first_played, last_played, \
                   times_played FROM songs"
        .to_string();
    let mut args = Vec::new();
    let mut parts = Vec::new();

    for cond in &q.conditions {
        if let ConditionIR::Lyrics { words, logic } = cond {
            if words.is_empty() {
                continue;
            }
            let connective = match logic {
                LogicOp::And => " AND ",
                LogicOp::Or => " OR ",
            };
            let likes = vec!["l.lyrics LIKE ?"; words.len()].join(connective);
            for word in words {
                args.push(SqlArg::Text(format!("%{word}%")));
            }
            parts.push(format!(
                "EXISTS (SELECT 1 FROM lyrics l WHERE l.song_id = songs.id AND ({likes}))"
            ));
        }
    }
    if let Some(dr) = &q.date_range {
        parts.push("first_played >= ? AND last_played <= ?".to_string());
        args.push(SqlArg::Text(format_date(dr.start)));
        args.push(SqlArg::Text(format_date(dr.end)));
    }
    if !parts.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&parts.join(" AND "));
    }

    if let Some(order) = order_by(q, "songs") {
        sql.push(' ');
        sql.push_str(&order);
    }
    if let Some(limit) = q.limit {
        sql.push_str(" LIMIT ?");
        args.push(SqlArg::Int(limit as i64));
    }

    Ok(SqlQuery { sql, args })
}

fn gen_performances(q: &QueryIR) -> Result<SqlQuery, GenerationError> {
    let Some(song_id) = q.song_id else {
        return Err(GenerationError::PerformancesMissingSong);
    };

    let mut sql = "SELECT p.id, p.show_id, p.song_id, p.set_number, p.position, \
                   p.segue_type, p.length_seconds FROM performances p \
                   JOIN shows s ON p.show_id = s.id WHERE p.song_id = ?"
        .to_string();
    let mut args = vec![SqlArg::Int(song_id)];

    if let Some(dr) = &q.date_range {
        sql.push_str(" AND s.date >= ? AND s.date <= ?");
        args.push(SqlArg::Text(format_date(dr.start)));
        args.push(SqlArg::Text(format_date(dr.end)));
    }
    for cond in &q.conditions {
        if let ConditionIR::Length { op, seconds, .. } = cond {
            sql.push_str(&format!(" AND p.length_seconds {} ?", comp_op_sql(*op)));
            args.push(SqlArg::Int(*seconds));
        }
    }

    if let Some(order) = order_by(q, "p") {
        sql.push(' ');
        sql.push_str(&order);
    }
    if let Some(limit) = q.limit {
        sql.push_str(" LIMIT ?");
        args.push(SqlArg::Int(limit as i64));
    }

    Ok(SqlQuery { sql, args })
}

fn gen_setlist(q: &QueryIR) -> Result<SqlQuery, GenerationError> {
    let Some(date) = q.single_date else {
        return Err(GenerationError::SetlistMissingDate);
    };
    let sql = "SELECT p.id, p.show_id, p.song_id, p.set_number, p.position, p.segue_type, \
               p.length_seconds, songs.name FROM performances p \
               JOIN shows s ON p.show_id = s.id JOIN songs ON p.song_id = songs.id \
               WHERE s.date = ? ORDER BY p.set_number, p.position"
        .to_string();
    Ok(SqlQuery {
        sql,
        args: vec![SqlArg::Text(format_date(date))],
    })
}

/// Map an order clause to `ORDER BY <column> <dir>`. Fields outside the
/// closed set fall back to the query kind's default column; user text is
/// never spliced into the statement.
fn order_by(q: &QueryIR, prefix: &str) -> Option<String> {
    let order = q.order_by.as_ref()?;
    let col = match (order.field.to_uppercase().as_str(), prefix) {
        ("DATE", "s") => "s.date",
        ("RATING", "s") => "s.rating",
        ("NAME", "songs") => "songs.name",
        ("TIMES_PLAYED", "songs") => "songs.times_played",
        ("LENGTH", "p") => "p.length_seconds",
        ("DATE", "p") => "s.date",
        (_, "songs") => "songs.name",
        (_, "p") => "s.date",
        _ => "s.date",
    };
    let dir = if order.desc { "DESC" } else { "ASC" };
    Some(format!("ORDER BY {col} {dir}"))
}

pub(super) fn set_number(set: SetPosition) -> i64 {
    match set {
        SetPosition::Any => 0,
        SetPosition::Set1 => 1,
        SetPosition::Set2 => 2,
        SetPosition::Set3 | SetPosition::Encore => 3,
    }
}

pub(super) fn comp_op_sql(op: CompOp) -> &'static str {
    match op {
        CompOp::Gt => ">",
        CompOp::Lt => "<",
        CompOp::Eq => "=",
        CompOp::GtEq => ">=",
        CompOp::LtEq => "<=",
        CompOp::NotEq => "!=",
    }
}

/// Segue symbols as stored in `performances.segue_type`.
pub(super) fn segue_symbol(op: SegueOp) -> &'static str {
    match op {
        SegueOp::Segue => ">",
        SegueOp::Break => ">>",
        SegueOp::Tease => "~>",
    }
}

pub(super) fn format_date(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d").to_string()
}
