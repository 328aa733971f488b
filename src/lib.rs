//! GDQL — a query language for a crowd-sourced live-music catalog.
//!
//! The core is a one-shot compile-and-execute pipeline: source text runs
//! through the lexer, parser, planner, and SQL generator, then the executor
//! runs the parameterized statement against a data source and maps rows
//! back into domain objects.

pub mod cancel;
pub mod data;
pub mod error;
pub mod exec;
pub mod format;
pub mod query;

pub use cancel::CancelToken;
pub use error::{GdqlError, ParseError, QueryError, QueryErrorKind};
pub use exec::{Executor, QueryResult, ResultRows};
pub use query::Compiler;
