// src/services/prices.rs
use chrono::{Datelike, NaiveDate};
use csv::Reader;
use log::{info, warn};
use reqwest;
use std::io;

use crate::models::PriceTable;
use crate::BoxError;

pub type Result<T> = std::result::Result<T, BoxError>;

/// Fetch the monthly index-price CSV and build the price table.
///
/// An unreachable source is fatal; there is no retry.
pub async fn fetch_price_table(url: &str) -> Result<PriceTable> {
    info!("Fetching monthly index prices from URL: {}", url);

    let csv_text = reqwest::get(url).await?.text().await?;
    let table = parse_price_table(csv_text.as_bytes())?;

    info!(
        "Loaded {} monthly price rows ({} to {})",
        table.len(),
        table.first().date,
        table.last().date
    );
    Ok(table)
}

/// Parse a provider CSV with `Date` and `Real Price` columns.
///
/// Rows not aligned to a month boundary, or with a missing or non-positive
/// price, are dropped before the table is built.
pub fn parse_price_table<R: io::Read>(reader: R) -> Result<PriceTable> {
    let mut rdr = Reader::from_reader(reader);

    let headers = rdr.headers()?.clone();
    let idx_date = headers
        .iter()
        .position(|h| h.trim() == "Date")
        .ok_or("No 'Date' column in price CSV")?;
    let idx_price = headers
        .iter()
        .position(|h| h.trim() == "Real Price")
        .ok_or("No 'Real Price' column in price CSV")?;

    let mut values = Vec::new();
    let mut dropped = 0usize;

    for record in rdr.records() {
        let row = record?;
        let date_cell = row.get(idx_date).unwrap_or("").trim();
        let price_cell = row.get(idx_price).unwrap_or("").trim();

        let date = match parse_month(date_cell) {
            Some(d) => d,
            None => {
                warn!("Dropping price row with off-month date: {:?}", date_cell);
                dropped += 1;
                continue;
            }
        };

        match price_cell.parse::<f64>() {
            Ok(value) if value > 0.0 => values.push((date, value)),
            _ => {
                warn!("Dropping price row {} with bad value: {:?}", date, price_cell);
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        info!("Dropped {} malformed price rows", dropped);
    }

    values.sort_by_key(|(date, _)| *date);
    Ok(PriceTable::from_values(values)?)
}

/// Accepts `YYYY-MM-DD` (first of month only) or bare `YYYY-MM`.
fn parse_month(cell: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(cell, "%Y-%m-%d") {
        return (date.day() == 1).then_some(date);
    }
    let mut parts = cell.splitn(2, '-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}
