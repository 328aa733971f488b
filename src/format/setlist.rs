//! Setlist-shaped output: sets as sections, songs numbered by position,
//! segue symbols between adjacent entries.

use std::fmt::Write as _;

use crate::exec::{QueryResult, ResultRows};

use super::table;

pub fn format_setlist(result: &QueryResult) -> String {
    let ResultRows::Setlist(sl) = &result.rows else {
        // Setlist rendering only makes sense for setlist results.
        return table::format_table(result);
    };
    let mut b = String::new();
    let date = sl
        .date
        .map(|d| d.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_default();
    let _ = writeln!(b, "Setlist — {date}\n");
    let mut set = -1;
    for p in &sl.performances {
        if p.set_number != set {
            set = p.set_number;
            b.push_str(set_name(set));
            b.push('\n');
        }
        let seg = if p.segue_type.is_empty() {
            String::new()
        } else {
            format!(" {} ", p.segue_type)
        };
        let name = if p.song_name.is_empty() {
            "?"
        } else {
            &p.song_name
        };
        let length = if p.length_seconds > 0 {
            format!(" ({}m)", p.length_seconds / 60)
        } else {
            String::new()
        };
        let _ = writeln!(b, "  {}.{seg}{name}{length}", p.position);
    }
    b.trim_end_matches('\n').to_string()
}

fn set_name(set: i64) -> &'static str {
    match set {
        0 => "Soundcheck",
        1 => "Set 1",
        2 => "Set 2",
        3 => "Set 3 / Encore",
        _ => "Set",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Performance;
    use crate::exec::SetlistResult;
    use crate::query::ast::OutputFormat;
    use chrono::NaiveDate;
    use std::time::Duration;

    fn perf(set: i64, pos: i64, segue: &str, name: &str, len: i64) -> Performance {
        Performance {
            set_number: set,
            position: pos,
            segue_type: segue.into(),
            song_name: name.into(),
            length_seconds: len,
            ..Performance::default()
        }
    }

    #[test]
    fn groups_by_set_with_segues_and_lengths() {
        let result = QueryResult {
            rows: ResultRows::Setlist(SetlistResult {
                date: NaiveDate::from_ymd_opt(1977, 5, 8),
                show_id: 1,
                performances: vec![
                    perf(1, 1, "", "Bertha", 404),
                    perf(2, 1, ">", "Scarlet Begonias", 643),
                    perf(2, 2, "", "Fire on the Mountain", 917),
                ],
            }),
            sql: String::new(),
            output: OutputFormat::Setlist,
            elapsed: Duration::ZERO,
        };
        let out = format_setlist(&result);
        assert!(out.starts_with("Setlist — Sunday, May 8, 1977"));
        assert!(out.contains("Set 1\n  1.Bertha (6m)"));
        assert!(out.contains("Set 2\n  1. > Scarlet Begonias (10m)"));
        assert!(out.contains("  2.Fire on the Mountain (15m)"));
    }

    #[test]
    fn non_setlist_result_falls_back_to_table() {
        let result = QueryResult {
            rows: ResultRows::Shows(vec![]),
            sql: String::new(),
            output: OutputFormat::Setlist,
            elapsed: Duration::ZERO,
        };
        assert_eq!(format_setlist(&result), "No shows found.");
    }
}
