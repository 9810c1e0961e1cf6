//! Analysis window — an inclusive calendar date range.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive calendar date range selected for analysis.
///
/// Construction validates `start <= end`; a `DateRange` value is therefore
/// always safe to generate over. The date-range provider in the embedding
/// application may hold partial input (one bound picked, the other pending) —
/// that state never becomes a `DateRange`, so the generator can never be
/// called with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::StartAfterEnd { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build a range from possibly-missing picker bounds.
    ///
    /// A missing bound is the "still loading / still picking" state; callers
    /// surface it to the user instead of generating.
    pub fn from_bounds(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, RangeError> {
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end),
            _ => Err(RangeError::MissingBound),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days in the range, inclusive. Always >= 1.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Iterate every calendar day in the range, ascending.
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.num_days()).map(move |offset| start + Duration::days(offset))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("range start {start} is after end {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },

    #[error("date range is incomplete; both start and end are required")]
    MissingBound,
}
