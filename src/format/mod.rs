//! Output formatting for query results.

mod csv;
mod json;
mod setlist;
mod table;

use crate::error::GdqlError;
use crate::exec::QueryResult;
use crate::query::ast::OutputFormat;

/// Output style selected on the command line or via `AS <format>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Table,
    Json,
    Csv,
    Setlist,
}

impl Format {
    /// Map the query's requested output format; the calendar format has no
    /// renderer yet and falls back to the table.
    pub fn from_output(o: OutputFormat) -> Self {
        match o {
            OutputFormat::Json => Format::Json,
            OutputFormat::Csv => Format::Csv,
            OutputFormat::Setlist => Format::Setlist,
            OutputFormat::Default | OutputFormat::Calendar | OutputFormat::Table => Format::Table,
        }
    }
}

/// Render a result in the given format.
pub fn format(result: &QueryResult, fmt: Format) -> Result<String, GdqlError> {
    match fmt {
        Format::Json => json::format_json(result),
        Format::Csv => csv::format_csv(result),
        Format::Setlist => Ok(setlist::format_setlist(result)),
        Format::Table => Ok(table::format_table(result)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{ResultRows, SetlistResult};
    use std::time::Duration;

    pub(super) fn result_of(rows: ResultRows) -> QueryResult {
        QueryResult {
            rows,
            sql: String::new(),
            output: OutputFormat::Default,
            elapsed: Duration::from_millis(1),
        }
    }

    #[test]
    fn calendar_falls_back_to_table() {
        assert_eq!(Format::from_output(OutputFormat::Calendar), Format::Table);
    }

    #[test]
    fn every_format_renders_an_empty_setlist() {
        let result = result_of(ResultRows::Setlist(SetlistResult::default()));
        for fmt in [Format::Table, Format::Json, Format::Csv, Format::Setlist] {
            format(&result, fmt).expect("render");
        }
    }
}
