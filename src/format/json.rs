//! JSON output.

use serde_json::{json, Map, Value};

use crate::error::GdqlError;
use crate::exec::{QueryResult, ResultRows};

pub fn format_json(result: &QueryResult) -> Result<String, GdqlError> {
    let (kind, rows) = match &result.rows {
        ResultRows::Shows(shows) => ("shows", serde_json::to_value(shows)),
        ResultRows::Songs(songs) => ("songs", serde_json::to_value(songs)),
        ResultRows::Performances(perfs) => ("performances", serde_json::to_value(perfs)),
        ResultRows::Setlist(sl) => ("setlist", serde_json::to_value(sl)),
    };
    let rows = rows.map_err(|e| GdqlError::Format(e.to_string()))?;

    let mut out = Map::new();
    out.insert("type".to_string(), json!(kind));
    out.insert(
        "duration_ms".to_string(),
        json!(result.elapsed.as_millis() as u64),
    );
    out.insert(kind.to_string(), rows);

    serde_json::to_string_pretty(&Value::Object(out)).map_err(|e| GdqlError::Format(e.to_string()))
}
