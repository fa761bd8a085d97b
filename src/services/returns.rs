// src/services/returns.rs
//
// Return models over the monthly price table. Every model resolves its start
// date to a row and grows a fixed principal by the ratio of real prices,
// optionally compounding a constant annual dividend on top.

use chrono::NaiveDate;

use crate::error::AnalysisError;
use crate::models::{InvestmentResult, PriceRow, PriceTable, RecessionInterval};
use crate::services::recessions::first_trough_at_or_after;

/// The long-term holding period: 40 years of monthly rows.
pub const HORIZON_MONTHS: u32 = 480;
pub const HORIZON_YEARS: i32 = 40;

type Result<T> = std::result::Result<T, AnalysisError>;

fn window<'a>(
    table: &'a PriceTable,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(&'a PriceRow, &'a PriceRow)> {
    let start_row = table
        .row_by_date(start)
        .ok_or(AnalysisError::DateNotFound(start))?;
    let end_row = table
        .row_by_date(end)
        .ok_or(AnalysisError::DateNotFound(end))?;
    if end_row.id < start_row.id {
        return Err(AnalysisError::InvertedWindow { start, end });
    }
    Ok((start_row, end_row))
}

fn horizon_end<'a>(table: &'a PriceTable, start_row: &PriceRow) -> Result<&'a PriceRow> {
    table
        .row_by_id(start_row.id + HORIZON_MONTHS)
        .ok_or(AnalysisError::HorizonOutOfRange {
            start: start_row.date,
            months: HORIZON_MONTHS,
        })
}

fn grow(start: &PriceRow, row: &PriceRow, amount: f64) -> f64 {
    amount * row.value / start.value
}

/// Buy and hold: the investment's value at every month from `start` to `end`
/// inclusive.
pub fn buy_and_hold(
    table: &PriceTable,
    start: NaiveDate,
    end: NaiveDate,
    amount: f64,
) -> Result<Vec<InvestmentResult>> {
    let (start_row, end_row) = window(table, start, end)?;
    let rows = table
        .range(start_row.id, end_row.id)
        .ok_or(AnalysisError::InvertedWindow { start, end })?;

    Ok(rows
        .iter()
        .map(|row| InvestmentResult {
            date: row.date,
            invested_value: grow(start_row, row, amount),
        })
        .collect())
}

/// Buy and hold, evaluated only at the start and end rows. Cheaper when only
/// the final value matters.
pub fn buy_and_hold_quick(
    table: &PriceTable,
    start: NaiveDate,
    end: NaiveDate,
    amount: f64,
) -> Result<Vec<InvestmentResult>> {
    let (start_row, end_row) = window(table, start, end)?;
    Ok(vec![
        InvestmentResult { date: start_row.date, invested_value: amount },
        InvestmentResult {
            date: end_row.date,
            invested_value: grow(start_row, end_row, amount),
        },
    ])
}

/// Buy and hold over the fixed 480-month horizon.
pub fn buy_and_hold_40y(
    table: &PriceTable,
    start: NaiveDate,
    amount: f64,
) -> Result<Vec<InvestmentResult>> {
    let start_row = table
        .row_by_date(start)
        .ok_or(AnalysisError::DateNotFound(start))?;
    let end_row = horizon_end(table, start_row)?;
    buy_and_hold(table, start_row.date, end_row.date, amount)
}

/// Buy and hold with a constant annual dividend reinvested: each row's value
/// is the raw price ratio times `(1 + dividend)` to the number of full years
/// elapsed since the start row.
pub fn compound(
    table: &PriceTable,
    start: NaiveDate,
    end: NaiveDate,
    amount: f64,
    dividend: f64,
) -> Result<Vec<InvestmentResult>> {
    let (start_row, end_row) = window(table, start, end)?;
    let rows = table
        .range(start_row.id, end_row.id)
        .ok_or(AnalysisError::InvertedWindow { start, end })?;

    Ok(rows
        .iter()
        .map(|row| {
            let years = ((row.id - start_row.id) / 12) as i32;
            InvestmentResult {
                date: row.date,
                invested_value: grow(start_row, row, amount) * (1.0 + dividend).powi(years),
            }
        })
        .collect())
}

/// Compounding model evaluated only at the start and end rows.
pub fn compound_quick(
    table: &PriceTable,
    start: NaiveDate,
    end: NaiveDate,
    amount: f64,
    dividend: f64,
) -> Result<Vec<InvestmentResult>> {
    let (start_row, end_row) = window(table, start, end)?;
    let years = ((end_row.id - start_row.id) / 12) as i32;
    Ok(vec![
        InvestmentResult { date: start_row.date, invested_value: amount },
        InvestmentResult {
            date: end_row.date,
            invested_value: grow(start_row, end_row, amount) * (1.0 + dividend).powi(years),
        },
    ])
}

/// Compounding over the fixed 480-month horizon, with the dividend exponent
/// pinned at 40 for every row.
///
/// Intermediate rows therefore do not show partial compounding; only the
/// final row is directly comparable to `compound`. The two models are kept
/// separate on purpose rather than unified.
pub fn compound_40y(
    table: &PriceTable,
    start: NaiveDate,
    amount: f64,
    dividend: f64,
) -> Result<Vec<InvestmentResult>> {
    let start_row = table
        .row_by_date(start)
        .ok_or(AnalysisError::DateNotFound(start))?;
    let end_row = horizon_end(table, start_row)?;
    let rows = table
        .range(start_row.id, end_row.id)
        .ok_or(AnalysisError::HorizonOutOfRange { start, months: HORIZON_MONTHS })?;

    let factor = (1.0 + dividend).powi(HORIZON_YEARS);
    Ok(rows
        .iter()
        .map(|row| InvestmentResult {
            date: row.date,
            invested_value: grow(start_row, row, amount) * factor,
        })
        .collect())
}

/// Wait out the downturn: entry is delayed to the end of the first recession
/// at or after `start`, while the horizon end stays anchored at 480 months
/// after the *requested* start. Compounds dividends from the delayed entry.
pub fn buy_the_dip(
    table: &PriceTable,
    recessions: &[RecessionInterval],
    start: NaiveDate,
    amount: f64,
    dividend: f64,
) -> Result<Vec<InvestmentResult>> {
    let input_row = table
        .row_by_date(start)
        .ok_or(AnalysisError::DateNotFound(start))?;
    let trough = first_trough_at_or_after(recessions, start)
        .ok_or(AnalysisError::NoRecessionEnd(start))?;
    let entry_row = table
        .row_by_date(trough)
        .ok_or(AnalysisError::DateNotFound(trough))?;
    let end_row = horizon_end(table, input_row)?;

    compound(table, entry_row.date, end_row.date, amount, dividend)
}

/// The invested value at the last row of a result series.
pub fn end_value(series: &[InvestmentResult]) -> Result<f64> {
    series
        .last()
        .map(|r| r.invested_value)
        .ok_or(AnalysisError::EmptySeries)
}
