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

//! Resolution of a requested date against the report catalog.

use enerview_types::{Granularity, PageDate, ReportDay, ReportMonth};
use thiserror::Error;
use tracing::debug;

/// Raised when a requested period cannot be matched to the catalog.
/// No fallback exists in either case; the caller reports the period as
/// having no reports.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no reports available for {month}")]
    MonthNotFound { month: String },

    #[error("month {month} is in the catalog but lists no report days")]
    NoReportDays { month: String },
}

/// Outcome of resolving a requested date
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Month-granularity target matched its catalog month
    Month(ReportMonth),
    /// Exact day match
    Day(ReportDay),
    /// No exact day existed; the month's highest-numbered day stands in
    Latest(ReportDay),
}

impl Resolved {
    /// The date string a navigation event should load
    pub fn date(&self) -> &str {
        match self {
            Self::Month(month) => &month.date,
            Self::Day(day) | Self::Latest(day) => &day.date,
        }
    }

    pub fn is_exact(&self) -> bool {
        match self {
            Self::Month(_) | Self::Day(_) => true,
            Self::Latest(_) => false,
        }
    }
}

/// Resolve `target` against the catalog.
///
/// Day targets scan the month's days in catalog order and return the first
/// exact date match. When none exists, the fallback is the day with the
/// highest day number in the month - NOT the day closest to the target.
/// That matches the dashboard's long-observed behavior (a dated link into a
/// month lands on that month's most recent report), so it is kept as is.
pub fn resolve_report_date(
    months: &[ReportMonth],
    target: &PageDate,
) -> Result<Resolved, ResolveError> {
    let key = target.month_key();
    let Some(month) = months.iter().find(|month| month.date == key) else {
        return Err(ResolveError::MonthNotFound { month: key });
    };

    if target.granularity() == Granularity::Month {
        return Ok(Resolved::Month(month.clone()));
    }

    let wanted = target.to_string();
    let mut latest: Option<&ReportDay> = None;
    for day in &month.days {
        if day.date == wanted {
            return Ok(Resolved::Day(day.clone()));
        }
        if latest.is_none_or(|best| day.day > best.day) {
            latest = Some(day);
        }
    }

    match latest {
        Some(day) => {
            debug!("no report for {}, standing in with {}", wanted, day.date);
            Ok(Resolved::Latest(day.clone()))
        }
        None => Err(ResolveError::NoReportDays { month: key }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(key: &str, year: i32, month_number: u32, days: &[u32]) -> ReportMonth {
        ReportMonth {
            date: key.to_owned(),
            month: month_number,
            year,
            name: enerview_types::month_name(month_number).unwrap().to_owned(),
            days: days
                .iter()
                .map(|&day| ReportDay {
                    date: format!("{key}-{day:02}"),
                    day,
                })
                .collect(),
        }
    }

    fn target(input: &str) -> PageDate {
        input.parse().unwrap()
    }

    #[test]
    fn test_exact_day_match() {
        let catalog = vec![month("2021-07", 2021, 7, &[5, 20])];
        let resolved = resolve_report_date(&catalog, &target("2021-07-05")).unwrap();
        assert_eq!(resolved, Resolved::Day(catalog[0].days[0].clone()));
        assert!(resolved.is_exact());
    }

    #[test]
    fn test_month_match() {
        let catalog = vec![month("2021-07", 2021, 7, &[5, 20])];
        let resolved = resolve_report_date(&catalog, &target("2021-07")).unwrap();
        assert_eq!(resolved.date(), "2021-07");
        assert!(resolved.is_exact());
    }

    #[test]
    fn test_fallback_is_highest_day_not_nearest() {
        let catalog = vec![month("2021-07", 2021, 7, &[5, 20])];
        // Day 5 is closer to the 10th, but the fallback is the month's
        // highest day number.
        let resolved = resolve_report_date(&catalog, &target("2021-07-10")).unwrap();
        assert_eq!(resolved, Resolved::Latest(catalog[0].days[1].clone()));
        assert_eq!(resolved.date(), "2021-07-20");
        assert!(!resolved.is_exact());
    }

    #[test]
    fn test_fallback_with_unsorted_days() {
        let catalog = vec![month("2021-07", 2021, 7, &[20, 3, 11])];
        let resolved = resolve_report_date(&catalog, &target("2021-07-10")).unwrap();
        assert_eq!(resolved.date(), "2021-07-20");
    }

    #[test]
    fn test_exact_match_wins_over_later_higher_day() {
        let catalog = vec![month("2021-07", 2021, 7, &[5, 20])];
        let resolved = resolve_report_date(&catalog, &target("2021-07-05")).unwrap();
        assert!(matches!(resolved, Resolved::Day(_)));
    }

    #[test]
    fn test_month_not_found() {
        let catalog = vec![month("2021-07", 2021, 7, &[5])];
        let error = resolve_report_date(&catalog, &target("2021-08-01")).unwrap_err();
        assert_eq!(
            error,
            ResolveError::MonthNotFound {
                month: "2021-08".to_owned()
            }
        );
    }

    #[test]
    fn test_month_without_days() {
        let catalog = vec![month("2021-07", 2021, 7, &[])];
        let error = resolve_report_date(&catalog, &target("2021-07-10")).unwrap_err();
        assert_eq!(
            error,
            ResolveError::NoReportDays {
                month: "2021-07".to_owned()
            }
        );
    }
}
