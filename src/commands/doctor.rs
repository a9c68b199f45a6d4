// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;

use crate::models::{TransactionFilter, TransactionType};
use crate::service::FinanceService;
use crate::store::RecordStore;
use crate::utils::pretty_table;
use anyhow::Result;

/// One `[issue, detail]` pair per problem found.
pub fn find_issues<S: RecordStore>(svc: &FinanceService<S>) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let debts: HashSet<String> = svc.list_debts()?.into_iter().map(|d| d.id).collect();
    let transactions = svc.list_transactions(&TransactionFilter::default())?;

    for t in &transactions {
        if let Some(debt) = &t.debt_id {
            if !debts.contains(debt) {
                rows.push(vec![
                    "dangling_debt_ref".into(),
                    format!("{} '{}' -> {}", t.id, t.title, debt),
                ]);
            }
            if t.r#type != TransactionType::CreditCardPayment {
                rows.push(vec![
                    "debt_ref_on_non_payment".into(),
                    format!("{} '{}' ({})", t.id, t.title, t.r#type),
                ]);
            }
        }
        if t.recurrence.is_recurring() && t.end_date.is_none() {
            rows.push(vec![
                "recurring_without_end_date".into(),
                format!("{} '{}' ({})", t.id, t.title, t.recurrence),
            ]);
        }
        if t.end_date.is_some_and(|e| e < t.date) {
            rows.push(vec![
                "end_before_date".into(),
                format!("{} '{}' {}", t.id, t.title, t.date),
            ]);
        }
        if t.amount.is_sign_negative() && !t.amount.is_zero() {
            rows.push(vec![
                "negative_amount".into(),
                format!("{} '{}' {}", t.id, t.title, t.amount),
            ]);
        }
    }
    Ok(rows)
}

pub fn handle<S: RecordStore>(svc: &FinanceService<S>) -> Result<()> {
    let rows = find_issues(svc)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
