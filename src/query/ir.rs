//! Intermediate representation: the resolved, lowered form of a query.
//!
//! Produced once by the planner and consumed once by the SQL generator.
//! Every song name has become a stable id, every date term an absolute UTC
//! interval, and every duration literal integer seconds.

use chrono::{DateTime, Utc};

use super::ast::{CompOp, LogicOp, OutputFormat, PositionOp, SegueOp, SetPosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Shows,
    Songs,
    Performances,
    Setlist,
}

/// A fully resolved query, ready for SQL generation.
#[derive(Debug, Clone)]
pub struct QueryIR {
    pub query_type: QueryType,
    pub date_range: Option<ResolvedDateRange>,
    /// Midnight UTC of the requested day, for SETLIST queries.
    pub single_date: Option<DateTime<Utc>>,
    /// The subject song, for PERFORMANCES queries.
    pub song_id: Option<i64>,
    pub segue_chain: Option<SegueChainIR>,
    pub conditions: Vec<ConditionIR>,
    pub order_by: Option<OrderByIR>,
    pub limit: Option<u32>,
    pub output: OutputFormat,
}

impl QueryIR {
    pub fn new(query_type: QueryType) -> Self {
        Self {
            query_type,
            date_range: None,
            single_date: None,
            song_id: None,
            segue_chain: None,
            conditions: Vec::new(),
            order_by: None,
            limit: None,
            output: OutputFormat::Default,
        }
    }
}

/// An absolute, inclusive date interval. `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A resolved segue chain: at least two song ids,
/// `operators.len() == song_ids.len() - 1` after padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegueChainIR {
    pub song_ids: Vec<i64>,
    pub operators: Vec<SegueOp>,
}

/// A resolved condition. Mirrors the AST conditions with names replaced by
/// ids and durations by seconds.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionIR {
    Position {
        set: SetPosition,
        op: PositionOp,
        song_id: i64,
    },
    Played {
        song_id: i64,
        negated: bool,
    },
    Length {
        song_id: Option<i64>,
        op: CompOp,
        seconds: i64,
    },
    Guest {
        name: String,
    },
    Lyrics {
        words: Vec<String>,
        logic: LogicOp,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByIR {
    pub field: String,
    pub desc: bool,
}
