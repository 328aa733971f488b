//! Error taxonomy for the query pipeline.
//!
//! Parse and query errors carry enough context to print user-facing
//! diagnostics (caret lines, "did you mean" lists, hints), so their
//! `Display` impls are written by hand. [`GdqlError`] unifies them at the
//! crate boundary.

use std::fmt;

use crate::data::DataError;
use crate::query::token::Position;

/// A lexical or syntactic failure.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub pos: Position,
    pub message: String,
    pub query: String,
    pub hint: Option<String>,
}

impl ParseError {
    pub fn new(pos: Position, message: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            pos,
            message: message.into(),
            query: query.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parse error at line {}, column {}: {}",
            self.pos.line, self.pos.column, self.message
        )?;
        if !self.query.is_empty() {
            let pad = self.pos.offset.min(self.query.chars().count());
            write!(f, "\n  {}\n  {}^", self.query, " ".repeat(pad))?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "\n\nHint: {hint}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Kinds of planning and execution failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    SongNotFound,
    DateInvalid,
    VenueNotFound,
    AmbiguousSong,
    NoDatabase,
}

impl fmt::Display for QueryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QueryErrorKind::SongNotFound => "song not found",
            QueryErrorKind::DateInvalid => "invalid date",
            QueryErrorKind::VenueNotFound => "venue not found",
            QueryErrorKind::AmbiguousSong => "ambiguous song",
            QueryErrorKind::NoDatabase => "no database",
        };
        f.write_str(s)
    }
}

/// A planning/execution error with optional suggestions and hint.
#[derive(Debug)]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub message: String,
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub suggestions: Vec<String>,
    pub hint: Option<String>,
}

impl QueryError {
    pub fn new(kind: QueryErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
            suggestions: Vec::new(),
            hint: None,
        }
    }

    pub fn date_invalid(message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::DateInvalid, message)
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, " ({cause})")?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nDid you mean:")?;
            for s in &self.suggestions {
                write!(f, "\n  - {s}")?;
            }
        }
        if let Some(hint) = &self.hint {
            write!(f, "\n\nHint: {hint}")?;
        }
        Ok(())
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Structural invariant violations in SQL generation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("segue chain requires at least 2 songs")]
    SegueChainTooShort,
    #[error("setlist query requires a date")]
    SetlistMissingDate,
    #[error("performances query requires a resolved song")]
    PerformancesMissingSong,
}

/// Any failure the pipeline can surface to a caller.
#[derive(Debug, thiserror::Error)]
pub enum GdqlError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Data(DataError),
    #[error("format error: {0}")]
    Format(String),
    #[error("query cancelled")]
    Cancelled,
}

impl From<DataError> for GdqlError {
    fn from(e: DataError) -> Self {
        match e {
            DataError::Cancelled => GdqlError::Cancelled,
            other => GdqlError::Data(other),
        }
    }
}
