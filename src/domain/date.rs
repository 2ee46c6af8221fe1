use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::error::RangeError;

const ISO_FORMAT: &str = "%Y-%m-%d";
const UPSTREAM_FORMAT: &str = "%d-%m-%Y";

/// A calendar day, written as `YYYY-MM-DD` on every public surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Strict `YYYY-MM-DD`; surrounding whitespace is rejected, not trimmed.
    pub fn parse(input: &str) -> Result<Self, RangeError> {
        let invalid = || RangeError::InvalidDateFormat {
            input: input.to_string(),
        };

        if input.trim() != input {
            return Err(invalid());
        }

        NaiveDate::parse_from_str(input, ISO_FORMAT)
            .map(Self)
            .map_err(|_| invalid())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Day-month-year encoding expected by the history endpoint.
    pub fn upstream(&self) -> String {
        self.0.format(UPSTREAM_FORMAT).to_string()
    }

    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(ISO_FORMAT))
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Inclusive day range whose span has already been checked against the cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: DateKey,
    end: DateKey,
}

impl DateRange {
    /// Parse both bounds and reject spans where `end - start` exceeds `max_span_days`.
    ///
    /// A reversed pair (`start > end`) is accepted and simply yields no days.
    pub fn parse(start: &str, end: &str, max_span_days: i64) -> Result<Self, RangeError> {
        let start_key = DateKey::parse(start)?;
        let end_key = DateKey::parse(end)?;

        let span_days = end_key
            .date()
            .signed_duration_since(start_key.date())
            .num_days();
        if span_days > max_span_days {
            return Err(RangeError::RangeTooLarge {
                start: start_key.to_string(),
                end: end_key.to_string(),
                days: span_days.saturating_add(1),
                max_days: max_span_days.saturating_add(1),
            });
        }

        Ok(Self {
            start: start_key,
            end: end_key,
        })
    }

    pub fn start(&self) -> DateKey {
        self.start
    }

    pub fn end(&self) -> DateKey {
        self.end
    }

    pub fn is_reversed(&self) -> bool {
        self.start > self.end
    }

    /// Number of days the walk will visit.
    pub fn len(&self) -> usize {
        if self.is_reversed() {
            0
        } else {
            (self.end.date() - self.start.date()).num_days() as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn days(&self) -> Days {
        Days {
            next: (!self.is_reversed()).then_some(self.start),
            end: self.end,
        }
    }
}

/// Chronological walk over a [`DateRange`].
pub struct Days {
    next: Option<DateKey>,
    end: DateKey,
}

impl Iterator for Days {
    type Item = DateKey;

    fn next(&mut self) -> Option<DateKey> {
        let current = self.next?;
        self.next = if current < self.end {
            current.succ()
        } else {
            None
        };
        Some(current)
    }
}
