// src/error.rs
use std::fmt;

use chrono::NaiveDate;

/// Errors surfaced by table construction and the return models.
///
/// Lookups fail loudly instead of yielding empty series, and horizon
/// arithmetic is bounds-checked instead of running off the end of the table.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    EmptyTable,
    UnsortedDates { prev: NaiveDate, next: NaiveDate },
    MonthGap { expected: NaiveDate, found: NaiveDate },
    DateNotFound(NaiveDate),
    HorizonOutOfRange { start: NaiveDate, months: u32 },
    InvertedWindow { start: NaiveDate, end: NaiveDate },
    NoRecessionEnd(NaiveDate),
    EmptySeries,
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AnalysisError::EmptyTable => write!(f, "price table has no rows"),
            AnalysisError::UnsortedDates { prev, next } => {
                write!(f, "price rows out of order: {} followed by {}", prev, next)
            }
            AnalysisError::MonthGap { expected, found } => {
                write!(f, "gap in monthly price data: expected {}, found {}", expected, found)
            }
            AnalysisError::DateNotFound(date) => {
                write!(f, "no price row for {}", date)
            }
            AnalysisError::HorizonOutOfRange { start, months } => {
                write!(f, "horizon of {} months from {} runs past the end of the data", months, start)
            }
            AnalysisError::InvertedWindow { start, end } => {
                write!(f, "window end {} precedes start {}", end, start)
            }
            AnalysisError::NoRecessionEnd(date) => {
                write!(f, "no recession ends at or after {}", date)
            }
            AnalysisError::EmptySeries => write!(f, "investment series is empty"),
        }
    }
}

impl std::error::Error for AnalysisError {}
