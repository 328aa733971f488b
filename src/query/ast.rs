//! Abstract syntax tree for GDQL.
//!
//! Every query parses into one of four top-level shapes; conditions and
//! clauses are closed sums, matched exhaustively by the planner.

/// A parsed GDQL query.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Shows(ShowQuery),
    Songs(SongQuery),
    Performances(PerformanceQuery),
    Setlist(SetlistQuery),
}

/// `SHOWS [FROM range] [WHERE conditions] [ORDER BY ..] [LIMIT n] [AS fmt]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShowQuery {
    pub from: Option<DateRange>,
    pub r#where: Option<WhereClause>,
    pub order_by: Option<OrderClause>,
    pub limit: Option<u32>,
    pub output: OutputFormat,
}

/// `SONGS [WITH conditions] [WRITTEN range] [modifiers]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SongQuery {
    pub with: Option<WithClause>,
    pub written: Option<DateRange>,
    pub order_by: Option<OrderClause>,
    pub limit: Option<u32>,
    pub output: OutputFormat,
}

/// `PERFORMANCES OF song [FROM range] [WITH conditions] [modifiers]`
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceQuery {
    pub song: SongRef,
    pub from: Option<DateRange>,
    pub with: Option<WithClause>,
    pub order_by: Option<OrderClause>,
    pub limit: Option<u32>,
    pub output: OutputFormat,
}

/// `SETLIST FOR date`
#[derive(Debug, Clone, PartialEq)]
pub struct SetlistQuery {
    pub date: Date,
}

/// A date range: a year, a year span, or a named era.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DateRange {
    pub start: Option<Date>,
    pub end: Option<Date>,
    pub era: Option<EraAlias>,
}

/// A date with 1-based month/day; 0 means unspecified. `season` carries a
/// quoted pseudo-date literal (e.g. `SETLIST FOR "Cornell 1977"`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Date {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub season: String,
}

/// Named eras of the band's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraAlias {
    Primal,
    Europe72,
    WallOfSound,
    Hiatus,
    Brent,
    Vince,
}

/// WHERE conditions with the AND/OR sequence between them.
/// `operators.len() == conditions.len() - 1`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhereClause {
    pub conditions: Vec<Condition>,
    pub operators: Vec<LogicOp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogicOp {
    #[default]
    And,
    Or,
}

/// A WHERE condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `"Song A" > "Song B" [> "Song C" ...]` — at least two songs,
    /// `operators.len() == songs.len() - 1`.
    Segue {
        songs: Vec<SongRef>,
        operators: Vec<SegueOp>,
    },
    /// `SET1 OPENED "Song"`, `ENCORE = "Song"`
    Position {
        set: SetPosition,
        op: PositionOp,
        song: SongRef,
    },
    /// `PLAYED "Song"` (or `NOT "Song"`)
    Played { song: SongRef },
    /// `LENGTH("Song") > 20min` or `LENGTH > 20min`
    Length {
        song: Option<SongRef>,
        op: CompOp,
        duration: String,
    },
    /// `GUEST "Name"`
    Guest { name: String },
}

/// Transition between adjacent songs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegueOp {
    /// `>` (or INTO)
    Segue,
    /// `>>` (or THEN)
    Break,
    /// `~>` (or TEASE)
    Tease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetPosition {
    Any,
    Set1,
    Set2,
    Set3,
    Encore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionOp {
    Opened,
    Closed,
    Equals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompOp {
    Gt,
    Lt,
    Eq,
    GtEq,
    LtEq,
    NotEq,
}

/// A song referenced by name; resolution to an id happens in the planner.
#[derive(Debug, Clone, PartialEq)]
pub struct SongRef {
    pub name: String,
    pub negated: bool,
}

impl SongRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            negated: false,
        }
    }
}

/// WITH conditions for song and performance queries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WithClause {
    pub conditions: Vec<WithCondition>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WithCondition {
    /// `LYRICS("word1", "word2")`
    Lyrics { words: Vec<String>, logic: LogicOp },
    /// `LENGTH > 20min`
    Length { op: CompOp, duration: String },
    /// `GUEST "Name"`
    Guest { name: String },
}

/// `ORDER BY field [ASC|DESC]` — the field literal is kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderClause {
    pub field: String,
    pub desc: bool,
}

/// Requested output format (`AS json` etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Default,
    Json,
    Csv,
    Setlist,
    Calendar,
    Table,
}
