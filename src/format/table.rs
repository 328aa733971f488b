//! Fixed-width table output (the default).

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::data::{Performance, Show, Song};
use crate::exec::{QueryResult, ResultRows, SetlistResult};

pub fn format_table(result: &QueryResult) -> String {
    match &result.rows {
        ResultRows::Shows(shows) => table_shows(shows),
        ResultRows::Songs(songs) => table_songs(songs),
        ResultRows::Performances(perfs) => table_performances(perfs),
        ResultRows::Setlist(sl) => table_setlist(sl),
    }
}

fn table_shows(shows: &[Show]) -> String {
    if shows.is_empty() {
        return "No shows found.".to_string();
    }
    let mut b = String::new();
    b.push_str("DATE       | VENUE            | CITY         | STATE\n");
    b.push_str("-----------+------------------+--------------+-----\n");
    for s in shows {
        let _ = writeln!(
            b,
            "{:<10} | {:<16} | {:<12} | {}",
            date_str(s.date),
            truncate(&s.venue, 16),
            truncate(&s.city, 12),
            truncate(&s.state, 5),
        );
    }
    b
}

fn table_songs(songs: &[Song]) -> String {
    if songs.is_empty() {
        return "No songs found.".to_string();
    }
    let mut b = String::new();
    b.push_str("NAME                 | TIMES_PLAYED\n");
    b.push_str("---------------------+-------------\n");
    for s in songs {
        let _ = writeln!(b, "{:<20} | {}", truncate(&s.name, 19), s.times_played);
    }
    b
}

fn table_performances(perfs: &[Performance]) -> String {
    if perfs.is_empty() {
        return "No performances found.".to_string();
    }
    let mut b = String::new();
    b.push_str("SHOW_ID | SET | POS | SEGUE | LENGTH\n");
    b.push_str("--------+-----+-----+-------+-------\n");
    for p in perfs {
        let _ = writeln!(
            b,
            "{:>7} | {:>3} | {:>3} | {:<5} | {}",
            p.show_id,
            p.set_number,
            p.position,
            segue_str(&p.segue_type),
            p.length_seconds,
        );
    }
    b
}

fn table_setlist(sl: &SetlistResult) -> String {
    if sl.performances.is_empty() {
        return "No setlist.".to_string();
    }
    let mut b = String::new();
    let _ = writeln!(
        b,
        "Setlist for {} (show_id={})\n",
        date_str(sl.date),
        sl.show_id
    );
    b.push_str("SET | POS | SEGUE | SONG\n");
    b.push_str("----+-----+-------+----------------------------\n");
    for p in &sl.performances {
        let name = if p.song_name.is_empty() {
            "?"
        } else {
            &p.song_name
        };
        let _ = writeln!(
            b,
            "{:>3} | {:>3} | {:<5} | {}",
            p.set_number,
            p.position,
            segue_str(&p.segue_type),
            truncate(name, 28),
        );
    }
    b
}

fn date_str(d: Option<NaiveDate>) -> String {
    d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn segue_str(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_shows_message() {
        assert_eq!(table_shows(&[]), "No shows found.");
    }

    #[test]
    fn shows_rows_are_aligned() {
        let shows = vec![Show {
            id: 1,
            date: NaiveDate::from_ymd_opt(1977, 5, 8),
            venue: "Barton Hall, Cornell University".into(),
            city: "Ithaca".into(),
            state: "NY".into(),
            ..Show::default()
        }];
        let out = table_shows(&shows);
        assert!(out.contains("1977-05-08"));
        // Venue is truncated to the column width.
        assert!(out.contains("Barton Hall, Cor"));
        assert!(!out.contains("University"));
    }

    #[test]
    fn performances_null_segue_renders_dash() {
        let perfs = vec![Performance {
            show_id: 2,
            set_number: 2,
            position: 3,
            length_seconds: 1380,
            ..Performance::default()
        }];
        let out = table_performances(&perfs);
        assert!(out.contains("| -     |"));
    }

    #[test]
    fn setlist_header_carries_date_and_show() {
        let sl = SetlistResult {
            date: NaiveDate::from_ymd_opt(1977, 5, 8),
            show_id: 1,
            performances: vec![Performance {
                set_number: 2,
                position: 1,
                segue_type: ">".into(),
                song_name: "Scarlet Begonias".into(),
                ..Performance::default()
            }],
        };
        let out = table_setlist(&sl);
        assert!(out.starts_with("Setlist for 1977-05-08 (show_id=1)"));
        assert!(out.contains("Scarlet Begonias"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("Déjà vu all over", 4), "Déjà");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
