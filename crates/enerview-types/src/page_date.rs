// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of EnerView.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use crate::report_dates::month_name;
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when a user- or URL-supplied date fails the format check
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid report date '{input}': expected YYYY-MM or YYYY-MM-DD (month 1-12, day 1-31)")]
pub struct DateSyntaxError {
    pub input: String,
}

/// Whether a page shows a single day or a whole month of reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    Day,
    Month,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Month => write!(f, "month"),
        }
    }
}

/// The date a report page is showing, in the `YYYY-MM` or `YYYY-MM-DD`
/// syntax accepted by the reporting API.
///
/// Only the field ranges are checked (month 1-12, day 1-31). Whether the day
/// exists in the calendar is not: availability is decided by the report
/// catalog, not by date arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageDate {
    pub year: i32,
    pub month: u32,
    pub day: Option<u32>,
}

impl PageDate {
    /// Today's date at day granularity
    pub fn today() -> Self {
        let now = Local::now().date_naive();
        Self {
            year: now.year(),
            month: now.month(),
            day: Some(now.day()),
        }
    }

    pub fn granularity(&self) -> Granularity {
        if self.day.is_some() {
            Granularity::Day
        } else {
            Granularity::Month
        }
    }

    /// The `"YYYY-MM"` key used by the dates catalog
    pub fn month_key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Human-readable page title, e.g. "22 July 2021" or "July 2021"
    pub fn title(&self) -> String {
        let name = month_name(self.month).unwrap_or("Unknown");
        match self.day {
            Some(day) => format!("{} {} {}", day, name, self.year),
            None => format!("{} {}", name, self.year),
        }
    }
}

impl fmt::Display for PageDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.day {
            Some(day) => write!(f, "{:04}-{:02}-{:02}", self.year, self.month, day),
            None => write!(f, "{:04}-{:02}", self.year, self.month),
        }
    }
}

/// Parse a fixed-width decimal field; rejects signs and whitespace that a
/// bare `str::parse` would let through
fn parse_digits(field: &str, width: usize) -> Option<u32> {
    if field.len() != width || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

impl FromStr for PageDate {
    type Err = DateSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DateSyntaxError {
            input: s.to_owned(),
        };

        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 2 && parts.len() != 3 {
            return Err(err());
        }

        let year = parse_digits(parts[0], 4).ok_or_else(err)? as i32;
        let month = parse_digits(parts[1], 2).ok_or_else(err)?;
        if !(1..=12).contains(&month) {
            return Err(err());
        }

        let day = match parts.get(2) {
            Some(field) => {
                let day = parse_digits(field, 2).ok_or_else(err)?;
                if !(1..=31).contains(&day) {
                    return Err(err());
                }
                Some(day)
            }
            None => None,
        };

        Ok(Self { year, month, day })
    }
}
