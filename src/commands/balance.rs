// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::month_or_current;
use super::transactions::display_amount;
use crate::balance::MonthBalance;
use crate::models::{Month, Transaction};
use crate::service::FinanceService;
use crate::store::RecordStore;
use crate::utils::{fmt_date, fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Serialize)]
pub struct BalanceReport<'a> {
    pub month: Month,
    pub starting_balance: Decimal,
    pub ending_balance: Decimal,
    pub net: Decimal,
    pub transactions: &'a [Transaction],
}

impl<'a> From<&'a MonthBalance> for BalanceReport<'a> {
    fn from(b: &'a MonthBalance) -> Self {
        BalanceReport {
            month: b.month,
            starting_balance: b.starting_balance.round_dp(2),
            ending_balance: b.ending_balance.round_dp(2),
            net: b.net().round_dp(2),
            transactions: &b.transactions,
        }
    }
}

pub fn summary_table(b: &MonthBalance) -> comfy_table::Table {
    pretty_table(
        &["Month", "Starting Balance", "Ending Balance", "Net"],
        vec![vec![
            b.month.to_string(),
            fmt_money(&b.starting_balance),
            fmt_money(&b.ending_balance),
            fmt_money(&b.net()),
        ]],
    )
}

pub fn handle<S: RecordStore>(svc: &FinanceService<S>, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let b = svc.month_balance(month)?;
    let report = BalanceReport::from(&b);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        println!("{}", summary_table(&b));
        let rows: Vec<Vec<String>> = b
            .transactions
            .iter()
            .map(|t| {
                vec![
                    fmt_date(&t.date),
                    t.title.clone(),
                    display_amount(t),
                    t.r#type.to_string(),
                ]
            })
            .collect();
        if !rows.is_empty() {
            println!("{}", pretty_table(&["Date", "Title", "Amount", "Type"], rows));
        }
    }
    Ok(())
}
