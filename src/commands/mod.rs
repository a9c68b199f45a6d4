// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod balance;
pub mod calendar;
pub mod config;
pub mod debts;
pub mod doctor;
pub mod exporter;
pub mod transactions;

use anyhow::{Result, anyhow};
use chrono::Local;

use crate::models::Month;

pub(crate) fn required<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(|s| s.as_str())
        .ok_or_else(|| anyhow!("missing required argument '{}'", name))
}

pub(crate) fn optional<'a>(m: &'a clap::ArgMatches, name: &str) -> Option<&'a str> {
    m.get_one::<String>(name).map(|s| s.as_str())
}

/// `--month` if given, otherwise the current local month.
pub(crate) fn month_or_current(m: &clap::ArgMatches) -> Result<Month> {
    match optional(m, "month") {
        Some(s) => Ok(s.parse()?),
        None => Ok(Month::of(Local::now().date_naive())),
    }
}
