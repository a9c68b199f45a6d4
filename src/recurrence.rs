// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Occurrence dates for recurring transactions.
//!
//! Every occurrence is computed from the start date and its index rather
//! than from the previous occurrence, so a clamped date (Jan 31 -> Feb 29)
//! never drags later months onto the shorter day.

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::Recurrence;
use crate::utils::clamp_to_month;

/// Upper bound on occurrences a single request may expand into.
pub const MAX_OCCURRENCES: usize = 1024;

/// Lazy, finite sequence of occurrence dates. Clone it to restart.
#[derive(Debug, Clone)]
pub struct Occurrences {
    start: NaiveDate,
    rule: Recurrence,
    end: NaiveDate,
    index: u32,
    finished: bool,
}

pub fn generate_occurrences(start: NaiveDate, rule: Recurrence, end: NaiveDate) -> Occurrences {
    Occurrences {
        start,
        rule,
        end,
        index: 0,
        finished: false,
    }
}

impl Occurrences {
    fn nth_date(&self, n: u32) -> Option<NaiveDate> {
        let n = i64::from(n);
        match self.rule {
            Recurrence::OneTime => (n == 0).then_some(self.start),
            Recurrence::Weekly => self.start.checked_add_signed(Duration::days(7 * n)),
            Recurrence::BiWeekly => self.start.checked_add_signed(Duration::days(14 * n)),
            Recurrence::Monthly => self.shift_months(n),
            Recurrence::BiMonthly => self.shift_months(2 * n),
            Recurrence::Yearly => self.shift_months(12 * n),
        }
    }

    fn shift_months(&self, months: i64) -> Option<NaiveDate> {
        let index = i64::from(self.start.year()) * 12 + i64::from(self.start.month0()) + months;
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
        clamp_to_month(year, month, self.start.day())
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.finished {
            return None;
        }
        if self.rule == Recurrence::OneTime {
            self.finished = true;
            return Some(self.start);
        }
        let candidate = match self.nth_date(self.index) {
            Some(date) => date,
            None => {
                self.finished = true;
                return None;
            }
        };
        // Re-check against the candidate's own month before accepting it.
        let candidate = match clamp_to_month(candidate.year(), candidate.month(), candidate.day()) {
            Some(date) if date <= self.end => date,
            _ => {
                self.finished = true;
                return None;
            }
        };
        self.index += 1;
        Some(candidate)
    }
}

impl std::iter::FusedIterator for Occurrences {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::parse_date;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn dates(start: &str, rule: Recurrence, end: &str) -> Vec<String> {
        generate_occurrences(d(start), rule, d(end))
            .map(|x| x.to_string())
            .collect()
    }

    #[test]
    fn weekly_scenario() {
        assert_eq!(
            dates("2024-01-15", Recurrence::Weekly, "2024-02-05"),
            vec!["2024-01-15", "2024-01-22", "2024-01-29", "2024-02-05"]
        );
    }

    #[test]
    fn bi_weekly_steps_fourteen_days() {
        assert_eq!(
            dates("2024-01-01", Recurrence::BiWeekly, "2024-02-10"),
            vec!["2024-01-01", "2024-01-15", "2024-01-29"]
        );
    }

    #[test]
    fn one_time_ignores_end_date() {
        assert_eq!(
            dates("2024-05-01", Recurrence::OneTime, "2024-01-01"),
            vec!["2024-05-01"]
        );
    }

    #[test]
    fn monthly_from_jan_31_clamps_and_recovers() {
        assert_eq!(
            dates("2024-01-31", Recurrence::Monthly, "2024-05-31"),
            vec!["2024-01-31", "2024-02-29", "2024-03-31", "2024-04-30", "2024-05-31"]
        );
        assert_eq!(
            dates("2023-01-31", Recurrence::Monthly, "2023-03-01"),
            vec!["2023-01-31", "2023-02-28"]
        );
    }

    #[test]
    fn bi_monthly_crosses_year() {
        assert_eq!(
            dates("2024-10-31", Recurrence::BiMonthly, "2025-05-01"),
            vec!["2024-10-31", "2024-12-31", "2025-02-28", "2025-04-30"]
        );
    }

    #[test]
    fn yearly_from_leap_day() {
        assert_eq!(
            dates("2024-02-29", Recurrence::Yearly, "2028-03-01"),
            vec!["2024-02-29", "2025-02-28", "2026-02-28", "2027-02-28", "2028-02-29"]
        );
    }

    #[test]
    fn first_candidate_past_end_yields_start_only() {
        assert_eq!(
            dates("2024-01-15", Recurrence::Monthly, "2024-02-01"),
            vec!["2024-01-15"]
        );
        assert_eq!(
            dates("2024-01-15", Recurrence::Weekly, "2024-01-15"),
            vec!["2024-01-15"]
        );
    }

    #[test]
    fn start_after_end_is_empty() {
        assert!(dates("2024-03-01", Recurrence::Weekly, "2024-02-01").is_empty());
    }

    #[test]
    fn sequence_is_restartable() {
        let seq = generate_occurrences(d("2024-01-01"), Recurrence::Weekly, d("2024-03-01"));
        let first: Vec<_> = seq.clone().collect();
        let second: Vec<_> = seq.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn ordered_and_bounded_for_every_rule() {
        let start = d("2023-08-31");
        let end = d("2026-01-15");
        for rule in [
            Recurrence::Weekly,
            Recurrence::BiWeekly,
            Recurrence::Monthly,
            Recurrence::BiMonthly,
            Recurrence::Yearly,
        ] {
            let out: Vec<_> = generate_occurrences(start, rule, end).collect();
            assert_eq!(out.first(), Some(&start), "{rule}");
            assert!(out.windows(2).all(|w| w[0] <= w[1]), "{rule}");
            assert!(out.iter().all(|x| *x >= start && *x <= end), "{rule}");
        }
    }
}
