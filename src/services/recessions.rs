// src/services/recessions.rs
use chrono::NaiveDate;
use csv::Reader;
use log::info;
use std::fs::File;
use std::io;
use std::path::Path;

use crate::models::RecessionInterval;
use crate::BoxError;

pub type Result<T> = std::result::Result<T, BoxError>;

/// Load the static recession-date table from a local CSV file.
///
/// `open_end` is the fixed reference date substituted for a recession whose
/// trough has not yet been dated. It only affects display windows, not the
/// underlying table.
pub fn load_recessions(path: &Path, open_end: NaiveDate) -> Result<Vec<RecessionInterval>> {
    info!("Reading recession dates from {}", path.display());
    let file = File::open(path)?;
    parse_recessions(file, open_end)
}

/// Parse a CSV of `peak,trough` month pairs. An empty trough marks a
/// still-open recession and is clamped to `open_end`. Malformed rows are an
/// error rather than being dropped, since the table is small and curated.
pub fn parse_recessions<R: io::Read>(reader: R, open_end: NaiveDate) -> Result<Vec<RecessionInterval>> {
    let mut rdr = Reader::from_reader(reader);

    let headers = rdr.headers()?.clone();
    let idx_peak = headers
        .iter()
        .position(|h| h.trim() == "peak")
        .ok_or("No 'peak' column in recession CSV")?;
    let idx_trough = headers
        .iter()
        .position(|h| h.trim() == "trough")
        .ok_or("No 'trough' column in recession CSV")?;

    let mut intervals = Vec::new();
    for record in rdr.records() {
        let row = record?;
        let peak_cell = row.get(idx_peak).ok_or("Missing 'peak' field")?.trim();
        let trough_cell = row.get(idx_trough).unwrap_or("").trim();

        let start = NaiveDate::parse_from_str(peak_cell, "%Y-%m-%d")?;
        let end = if trough_cell.is_empty() {
            info!("Recession starting {} is still open, clamping to {}", start, open_end);
            open_end
        } else {
            NaiveDate::parse_from_str(trough_cell, "%Y-%m-%d")?
        };

        intervals.push(RecessionInterval { start, end });
    }

    intervals.sort_by_key(|r| r.start);
    info!("Loaded {} recession intervals", intervals.len());
    Ok(intervals)
}

/// The earliest recession end date falling on or after `date`, if any.
pub fn first_trough_at_or_after(
    recessions: &[RecessionInterval],
    date: NaiveDate,
) -> Option<NaiveDate> {
    recessions
        .iter()
        .map(|r| r.end)
        .filter(|end| *end >= date)
        .min()
}
