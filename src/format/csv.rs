//! CSV output.

use crate::error::GdqlError;
use crate::exec::{QueryResult, ResultRows};

pub fn format_csv(result: &QueryResult) -> Result<String, GdqlError> {
    let mut w = csv::Writer::from_writer(Vec::new());

    let write = |w: &mut csv::Writer<Vec<u8>>, record: &[String]| {
        w.write_record(record)
            .map_err(|e| GdqlError::Format(e.to_string()))
    };

    match &result.rows {
        ResultRows::Shows(shows) => {
            write(
                &mut w,
                &strings(&["id", "date", "venue_id", "venue", "city", "state", "notes", "rating"]),
            )?;
            for s in shows {
                write(
                    &mut w,
                    &[
                        s.id.to_string(),
                        s.date.map(|d| d.to_string()).unwrap_or_default(),
                        s.venue_id.to_string(),
                        s.venue.clone(),
                        s.city.clone(),
                        s.state.clone(),
                        s.notes.clone(),
                        s.rating.to_string(),
                    ],
                )?;
            }
        }
        ResultRows::Songs(songs) => {
            write(&mut w, &strings(&["id", "name", "short_name", "writers", "times_played"]))?;
            for s in songs {
                write(
                    &mut w,
                    &[
                        s.id.to_string(),
                        s.name.clone(),
                        s.short_name.clone(),
                        s.writers.clone(),
                        s.times_played.to_string(),
                    ],
                )?;
            }
        }
        ResultRows::Performances(perfs) => {
            write(
                &mut w,
                &strings(&[
                    "id", "show_id", "song_id", "set_number", "position", "segue_type",
                    "length_seconds",
                ]),
            )?;
            for p in perfs {
                write(
                    &mut w,
                    &[
                        p.id.to_string(),
                        p.show_id.to_string(),
                        p.song_id.to_string(),
                        p.set_number.to_string(),
                        p.position.to_string(),
                        p.segue_type.clone(),
                        p.length_seconds.to_string(),
                    ],
                )?;
            }
        }
        ResultRows::Setlist(sl) => {
            write(&mut w, &strings(&["set_number", "position", "segue_type", "length_seconds"]))?;
            for p in &sl.performances {
                write(
                    &mut w,
                    &[
                        p.set_number.to_string(),
                        p.position.to_string(),
                        p.segue_type.clone(),
                        p.length_seconds.to_string(),
                    ],
                )?;
            }
        }
    }

    let bytes = w
        .into_inner()
        .map_err(|e| GdqlError::Format(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| GdqlError::Format(e.to_string()))
}

fn strings(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|s| s.to_string()).collect()
}
