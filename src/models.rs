// src/models.rs
use chrono::{Months, NaiveDate};
use serde::{Serialize, Deserialize};

use crate::error::AnalysisError;

/// One month of inflation-adjusted index history.
///
/// `id` is 1-based and contiguous, so "480 months after row N" is just
/// `id + 480`. The change columns are `None` for the first row, which has no
/// prior month to compare against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub value: f64,
    pub id: u32,
    pub change_factor: Option<f64>,
    pub pct_change: Option<f64>,
}

/// The immutable monthly price history every model reads from.
///
/// Rows are strictly ascending by date with exactly one row per calendar
/// month; construction rejects anything else.
#[derive(Debug, Clone)]
pub struct PriceTable {
    rows: Vec<PriceRow>,
}

impl PriceTable {
    /// Build a table from (first-of-month date, value) pairs, assigning ids.
    pub fn from_values(values: Vec<(NaiveDate, f64)>) -> Result<Self, AnalysisError> {
        if values.is_empty() {
            return Err(AnalysisError::EmptyTable);
        }

        for pair in values.windows(2) {
            let (prev, next) = (pair[0].0, pair[1].0);
            if next <= prev {
                return Err(AnalysisError::UnsortedDates { prev, next });
            }
            let expected = prev + Months::new(1);
            if next != expected {
                return Err(AnalysisError::MonthGap { expected, found: next });
            }
        }

        let rows = values
            .into_iter()
            .enumerate()
            .map(|(i, (date, value))| PriceRow {
                date,
                value,
                id: (i + 1) as u32,
                change_factor: None,
                pct_change: None,
            })
            .collect();

        Ok(PriceTable { rows })
    }

    pub fn row_by_date(&self, date: NaiveDate) -> Option<&PriceRow> {
        self.rows
            .binary_search_by_key(&date, |row| row.date)
            .ok()
            .map(|i| &self.rows[i])
    }

    pub fn row_by_id(&self, id: u32) -> Option<&PriceRow> {
        if id == 0 {
            return None;
        }
        self.rows.get((id - 1) as usize)
    }

    /// Rows with ids in `start_id..=end_id`. Both ids must be in range.
    pub fn range(&self, start_id: u32, end_id: u32) -> Option<&[PriceRow]> {
        if start_id == 0 || start_id > end_id || end_id as usize > self.rows.len() {
            return None;
        }
        Some(&self.rows[(start_id - 1) as usize..end_id as usize])
    }

    pub fn first(&self) -> &PriceRow {
        &self.rows[0]
    }

    pub fn last(&self) -> &PriceRow {
        &self.rows[self.rows.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriceRow> {
        self.rows.iter()
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [PriceRow] {
        &mut self.rows
    }
}

/// A recession, as a pair of first-of-month dates. An interval whose end is
/// still open is clamped to a fixed reference date when loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecessionInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// The value of an investment at one month. Computed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentResult {
    pub date: NaiveDate,
    pub invested_value: f64,
}
