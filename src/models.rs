// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::FinanceError;
use crate::utils::days_in_month;

/// Serialized under its wire name; deserialized through `FromStr`, so any
/// spelling the CLI accepts is accepted in requests too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum TransactionType {
    Expense,
    Payday,
    #[serde(rename = "Credit Card Payment")]
    CreditCardPayment,
    Placeholder,
}

impl TransactionType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "Expense",
            Self::Payday => "Payday",
            Self::CreditCardPayment => "Credit Card Payment",
            Self::Placeholder => "Placeholder",
        }
    }

    /// Paydays add to the balance, every other type subtracts.
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Payday => amount,
            Self::Expense | Self::CreditCardPayment | Self::Placeholder => -amount,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match compact(s).as_str() {
            "expense" => Ok(Self::Expense),
            "payday" => Ok(Self::Payday),
            "creditcardpayment" | "ccpayment" => Ok(Self::CreditCardPayment),
            "placeholder" => Ok(Self::Placeholder),
            _ => Err(FinanceError::validation(format!(
                "unknown transaction type '{}' (use Expense|Payday|Credit Card Payment|Placeholder)",
                s.trim()
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Recurrence {
    #[serde(rename = "one-time")]
    OneTime,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "bi-weekly")]
    BiWeekly,
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "bi-monthly")]
    BiMonthly,
    #[serde(rename = "yearly")]
    Yearly,
}

impl Recurrence {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneTime => "one-time",
            Self::Weekly => "weekly",
            Self::BiWeekly => "bi-weekly",
            Self::Monthly => "monthly",
            Self::BiMonthly => "bi-monthly",
            Self::Yearly => "yearly",
        }
    }

    pub const fn is_recurring(self) -> bool {
        !matches!(self, Self::OneTime)
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match compact(s).as_str() {
            "onetime" | "once" => Ok(Self::OneTime),
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::BiWeekly),
            "monthly" => Ok(Self::Monthly),
            "bimonthly" => Ok(Self::BiMonthly),
            "yearly" | "annual" => Ok(Self::Yearly),
            _ => Err(FinanceError::validation(format!(
                "unknown recurrence '{}' (use one-time|weekly|bi-weekly|monthly|bi-monthly|yearly)",
                s.trim()
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum DebtType {
    #[serde(rename = "Credit Card")]
    CreditCard,
    Loan,
}

impl DebtType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "Credit Card",
            Self::Loan => "Loan",
        }
    }
}

impl fmt::Display for DebtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DebtType {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match compact(s).as_str() {
            "creditcard" | "card" => Ok(Self::CreditCard),
            "loan" => Ok(Self::Loan),
            _ => Err(FinanceError::validation(format!(
                "unknown debt type '{}' (use Credit Card|Loan)",
                s.trim()
            ))),
        }
    }
}

macro_rules! try_from_string {
    ($($t:ty),*) => {$(
        impl TryFrom<String> for $t {
            type Error = FinanceError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }
    )*};
}

try_from_string!(TransactionType, Recurrence, DebtType);

fn compact(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub series_id: String,
    pub title: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub r#type: TransactionType,
    pub recurrence: Recurrence,
    pub end_date: Option<NaiveDate>,
    pub notes: String,
    pub debt_id: Option<String>,
}

impl Transaction {
    pub fn signed_amount(&self) -> Decimal {
        self.r#type.signed(self.amount)
    }

    /// True when the row's date, end date, or date..end date span touches `month`.
    pub fn is_active_in(&self, month: Month) -> bool {
        let (start, end) = (month.first_day(), month.last_day());
        let dated_within = self.date >= start && self.date <= end;
        let ends_within = self.end_date.is_some_and(|e| e >= start && e <= end);
        let spans = self.date <= end && self.end_date.is_some_and(|e| e >= start);
        dated_within || ends_within || spans
    }
}

/// Transaction fields as written to the store, minus the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionData {
    pub series_id: Option<String>,
    pub title: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub r#type: TransactionType,
    pub recurrence: Recurrence,
    pub end_date: Option<NaiveDate>,
    pub notes: String,
    pub debt_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    pub id: String,
    pub title: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub r#type: DebtType,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebtData {
    pub title: String,
    pub amount: Decimal,
    pub r#type: DebtType,
    pub notes: String,
}

/// Signed change applied to a debt's outstanding amount alongside a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebtAdjustment {
    pub debt_id: String,
    pub delta: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub month: Option<Month>,
    pub r#type: Option<TransactionType>,
    pub debt_id: Option<String>,
    pub series_id: Option<String>,
    pub limit: Option<usize>,
}

/// A calendar month, e.g. `2024-02`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub const fn new(year: i32, month: u32) -> Option<Month> {
        if month >= 1 && month <= 12 && year > -9999 && year < 9999 {
            Some(Month { year, month })
        } else {
            None
        }
    }

    pub fn of(date: NaiveDate) -> Month {
        Month {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, days_in_month(self.year, self.month))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        Month::of(date) == self
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || FinanceError::validation(format!("invalid month '{}', expected YYYY-MM", s));
        let (y, m) = s.split_once('-').ok_or_else(invalid)?;
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        Month::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for Month {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
