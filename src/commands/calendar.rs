// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Month grid view: one row per week, Sunday first, each day listing the
//! transactions dated on it.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Duration, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};

use super::balance::summary_table;
use super::month_or_current;
use super::transactions::display_amount;
use crate::models::{Month, Transaction};
use crate::service::FinanceService;
use crate::store::RecordStore;

pub const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub type Week = [Option<NaiveDate>; 7];

pub fn calendar_weeks(month: Month) -> Vec<Week> {
    let first = month.first_day();
    let last = month.last_day();
    let lead = first.weekday().num_days_from_sunday() as i64;
    let mut weeks = Vec::new();
    let mut cursor = first - Duration::days(lead);
    while cursor <= last {
        let mut week: Week = [None; 7];
        for slot in week.iter_mut() {
            if cursor >= first && cursor <= last {
                *slot = Some(cursor);
            }
            cursor += Duration::days(1);
        }
        weeks.push(week);
    }
    weeks
}

fn event_label(t: &Transaction) -> String {
    format!("{} {}", t.title, display_amount(t))
}

pub fn render_calendar(month: Month, transactions: &[Transaction]) -> Table {
    let mut by_day: BTreeMap<NaiveDate, Vec<&Transaction>> = BTreeMap::new();
    for t in transactions.iter().filter(|t| month.contains(t.date)) {
        by_day.entry(t.date).or_default().push(t);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(WEEKDAYS.iter().map(|d| Cell::new(*d)));
    for week in calendar_weeks(month) {
        table.add_row(week.iter().map(|slot| match slot {
            Some(day) => {
                let mut text = day.day().to_string();
                for t in by_day.get(day).into_iter().flatten() {
                    text.push('\n');
                    text.push_str(&event_label(t));
                }
                Cell::new(text)
            }
            None => Cell::new(""),
        }));
    }
    table
}

/// Series started before `month` with no occurrence dated inside it, one
/// entry per series at its latest earlier occurrence.
pub fn carried_over_line(month: Month, transactions: &[Transaction]) -> Option<String> {
    let dated_here: HashSet<&str> = transactions
        .iter()
        .filter(|t| month.contains(t.date))
        .map(|t| t.series_id.as_str())
        .collect();
    let mut latest: BTreeMap<&str, &Transaction> = BTreeMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.date < month.first_day() && !dated_here.contains(t.series_id.as_str()))
    {
        latest
            .entry(t.series_id.as_str())
            .and_modify(|seen| {
                if t.date > seen.date {
                    *seen = t;
                }
            })
            .or_insert(t);
    }
    if latest.is_empty() {
        return None;
    }
    let mut carried: Vec<&Transaction> = latest.into_values().collect();
    carried.sort_by_key(|t| t.date);
    let labels: Vec<String> = carried
        .iter()
        .map(|t| format!("{} (since {})", event_label(t), t.date))
        .collect();
    Some(format!("Still active this month: {}", labels.join(", ")))
}

pub fn handle<S: RecordStore>(svc: &FinanceService<S>, sub: &clap::ArgMatches) -> anyhow::Result<()> {
    let month = month_or_current(sub)?;
    let transactions = svc.transactions_in_month(month)?;
    println!("{}", month.first_day().format("%B %Y"));
    println!("{}", render_calendar(month, &transactions));

    if let Some(line) = carried_over_line(month, &transactions) {
        println!("{}", line);
    }
    println!("{}", summary_table(&svc.month_balance(month)?));
    Ok(())
}
