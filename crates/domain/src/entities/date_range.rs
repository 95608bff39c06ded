use crate::errors::DomainError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive calendar-date range. Construction is the single validation
/// point: an inverted range is an input error, never a zero count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, DomainError> {
        if from > to {
            return Err(DomainError::InvalidRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// Single-day range.
    pub fn on(date: NaiveDate) -> Self {
        Self {
            from: date,
            to: date,
        }
    }

    /// First through last day of the month containing `date`.
    pub fn month_of(date: NaiveDate) -> Result<Self, DomainError> {
        let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
            .ok_or_else(|| DomainError::ValidationError(format!("Invalid date: {}", date)))?;
        let next_first = if date.month() == 12 {
            NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
        }
        .ok_or_else(|| DomainError::ValidationError(format!("Invalid date: {}", date)))?;
        let last = next_first
            .pred_opt()
            .ok_or_else(|| DomainError::ValidationError(format!("Invalid date: {}", date)))?;
        Self::new(first, last)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}
