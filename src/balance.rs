// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::Result;
use crate::models::{Month, Transaction};
use crate::store::RecordStore;

/// Earliest month tracked when no `epoch_month` setting exists.
pub const DEFAULT_EPOCH: Month = match Month::new(2024, 1) {
    Some(m) => m,
    None => panic!("invalid default epoch"),
};

pub const EPOCH_SETTING: &str = "epoch_month";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBalance {
    pub month: Month,
    pub starting_balance: Decimal,
    pub ending_balance: Decimal,
    /// Rows contributing to the month itself.
    #[serde(skip)]
    pub transactions: Vec<Transaction>,
}

impl MonthBalance {
    pub fn net(&self) -> Decimal {
        self.ending_balance - self.starting_balance
    }
}

pub fn signed_sum<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Decimal {
    transactions
        .into_iter()
        .fold(Decimal::ZERO, |acc, t| acc + t.signed_amount())
}

pub fn epoch(store: &impl RecordStore) -> Result<Month> {
    match store.get_setting(EPOCH_SETTING)? {
        Some(v) => v.parse(),
        None => Ok(DEFAULT_EPOCH),
    }
}

/// Starting balance sums every row dated from the epoch up to the month;
/// the ending balance adds the month's active rows not already counted.
pub fn compute_balances(
    store: &impl RecordStore,
    as_of: Month,
    epoch: Month,
) -> Result<MonthBalance> {
    if as_of < epoch {
        return Ok(MonthBalance {
            month: as_of,
            starting_balance: Decimal::ZERO,
            ending_balance: Decimal::ZERO,
            transactions: Vec::new(),
        });
    }
    let month_start = as_of.first_day();
    let prior = store.list_transactions_dated(epoch.first_day(), month_start)?;
    let starting_balance = signed_sum(&prior);

    // Rows dated before the month are active here only through their end date.
    let current: Vec<Transaction> = store
        .list_transactions_by_month(as_of)?
        .into_iter()
        .filter(|t| t.date >= month_start)
        .collect();
    let ending_balance = starting_balance + signed_sum(&current);

    tracing::debug!(
        month = %as_of,
        prior = prior.len(),
        current = current.len(),
        %starting_balance,
        %ending_balance,
        "computed balances"
    );
    Ok(MonthBalance {
        month: as_of,
        starting_balance,
        ending_balance,
        transactions: current,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Recurrence, TransactionType};
    use crate::utils::parse_date;

    fn tx(t: TransactionType, amount: &str) -> Transaction {
        Transaction {
            id: "x".into(),
            series_id: "x".into(),
            title: "t".into(),
            amount: amount.parse().unwrap(),
            date: parse_date("2024-03-01").unwrap(),
            r#type: t,
            recurrence: Recurrence::OneTime,
            end_date: None,
            notes: String::new(),
            debt_id: None,
        }
    }

    #[test]
    fn sign_follows_type() {
        let rows = vec![
            tx(TransactionType::Payday, "3000"),
            tx(TransactionType::Expense, "1200"),
            tx(TransactionType::CreditCardPayment, "150.25"),
            tx(TransactionType::Placeholder, "49.75"),
        ];
        assert_eq!(signed_sum(&rows), "1600.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn cents_do_not_drift() {
        let rows: Vec<_> = (0..10).map(|_| tx(TransactionType::Payday, "0.10")).collect();
        assert_eq!(signed_sum(&rows), Decimal::ONE);
    }

    #[test]
    fn default_epoch_is_january_2024() {
        assert_eq!(DEFAULT_EPOCH.to_string(), "2024-01");
    }
}
