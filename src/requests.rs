// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Request shapes accepted by the service. Each one is validated on its own
//! before anything touches the store.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{FinanceError, Result};
use crate::models::{DebtData, DebtType, Recurrence, TransactionData, TransactionType};
use crate::utils::{add_months_clamped, validate_id};

/// Months added to the start date when a recurring request has no end date.
pub const DEFAULT_SPAN_MONTHS: i32 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    CreateTransaction(CreateTransactionRequest),
    UpdateTransaction(UpdateTransactionRequest),
    DeleteTransaction { id: String },
    CreateDebt(CreateDebtRequest),
    UpdateDebt(UpdateDebtRequest),
    ChargeDebt(ChargeDebtRequest),
    DeleteDebt { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub title: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub r#type: TransactionType,
    #[serde(default = "one_time")]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub debt_id: Option<String>,
}

/// Full replacement of one stored transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTransactionRequest {
    pub id: String,
    #[serde(flatten)]
    pub fields: CreateTransactionRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDebtRequest {
    pub title: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub r#type: DebtType,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDebtRequest {
    pub id: String,
    #[serde(flatten)]
    pub fields: CreateDebtRequest,
}

/// A purchase on a debt: raises the outstanding amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeDebtRequest {
    pub id: String,
    pub amount: Decimal,
}

fn one_time() -> Recurrence {
    Recurrence::OneTime
}

fn required_title(title: &str) -> Result<String> {
    let t = title.trim();
    if t.is_empty() {
        return Err(FinanceError::validation("title is required"));
    }
    Ok(t.to_string())
}

fn cents(amount: Decimal, field: &str) -> Result<Decimal> {
    if amount.normalize().scale() > 2 {
        return Err(FinanceError::validation(format!(
            "{} '{}' has more than 2 decimal places",
            field, amount
        )));
    }
    Ok(amount.round_dp(2))
}

fn non_negative(amount: Decimal, field: &str) -> Result<Decimal> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(FinanceError::validation(format!(
            "{} must not be negative (got {})",
            field, amount
        )));
    }
    cents(amount, field)
}

impl CreateTransactionRequest {
    pub fn validate(&self) -> Result<TransactionData> {
        let title = required_title(&self.title)?;
        let amount = non_negative(self.amount, "amount")?;

        let end_date = match (self.recurrence.is_recurring(), self.end_date) {
            (_, Some(end)) => Some(end),
            (true, None) => Some(
                add_months_clamped(self.date, DEFAULT_SPAN_MONTHS)
                    .ok_or_else(|| FinanceError::validation("date is out of range"))?,
            ),
            (false, None) => None,
        };
        if let Some(end) = end_date
            && end < self.date
        {
            return Err(FinanceError::validation(format!(
                "end date {} is before date {}",
                end, self.date
            )));
        }

        let debt_id = match self.debt_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(_) if self.r#type != TransactionType::CreditCardPayment => {
                return Err(FinanceError::validation(
                    "only a Credit Card Payment may reference a debt",
                ));
            }
            Some(id) => Some(validate_id(id)?),
        };

        Ok(TransactionData {
            series_id: None,
            title,
            amount,
            date: self.date,
            r#type: self.r#type,
            recurrence: self.recurrence,
            end_date,
            notes: self.notes.trim().to_string(),
            debt_id,
        })
    }
}

impl UpdateTransactionRequest {
    pub fn validate(&self) -> Result<(String, TransactionData)> {
        Ok((validate_id(&self.id)?, self.fields.validate()?))
    }
}

impl CreateDebtRequest {
    /// Outstanding amounts are signed; an overpaid card may sit below zero.
    pub fn validate(&self) -> Result<DebtData> {
        Ok(DebtData {
            title: required_title(&self.title)?,
            amount: cents(self.amount, "amount")?,
            r#type: self.r#type,
            notes: self.notes.trim().to_string(),
        })
    }
}

impl UpdateDebtRequest {
    pub fn validate(&self) -> Result<(String, DebtData)> {
        Ok((validate_id(&self.id)?, self.fields.validate()?))
    }
}

impl ChargeDebtRequest {
    pub fn validate(&self) -> Result<(String, Decimal)> {
        Ok((validate_id(&self.id)?, non_negative(self.amount, "charge")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{new_id, parse_date};

    fn base() -> CreateTransactionRequest {
        CreateTransactionRequest {
            title: "  Rent ".into(),
            amount: "1200".parse().unwrap(),
            date: parse_date("2024-01-31").unwrap(),
            r#type: TransactionType::Expense,
            recurrence: Recurrence::Monthly,
            end_date: None,
            notes: String::new(),
            debt_id: None,
        }
    }

    #[test]
    fn recurring_without_end_defaults_two_years() {
        let data = base().validate().unwrap();
        assert_eq!(data.title, "Rent");
        assert_eq!(data.end_date, Some(parse_date("2026-01-31").unwrap()));
    }

    #[test]
    fn one_time_keeps_missing_end_date() {
        let mut req = base();
        req.recurrence = Recurrence::OneTime;
        assert_eq!(req.validate().unwrap().end_date, None);
    }

    #[test]
    fn rejects_bad_fields() {
        let mut req = base();
        req.title = "   ".into();
        assert!(req.validate().unwrap_err().is_validation());

        let mut req = base();
        req.amount = "-5".parse().unwrap();
        assert!(req.validate().unwrap_err().is_validation());

        let mut req = base();
        req.amount = "1.005".parse().unwrap();
        assert!(req.validate().unwrap_err().is_validation());

        let mut req = base();
        req.end_date = Some(parse_date("2024-01-01").unwrap());
        assert!(req.validate().unwrap_err().is_validation());
    }

    #[test]
    fn debt_reference_rules() {
        let mut req = base();
        req.debt_id = Some(new_id());
        assert!(req.validate().unwrap_err().is_validation());

        req.r#type = TransactionType::CreditCardPayment;
        req.debt_id = Some("not-an-id".into());
        assert!(req.validate().unwrap_err().is_validation());

        let id = new_id();
        req.debt_id = Some(id.clone());
        assert_eq!(req.validate().unwrap().debt_id, Some(id));
    }

    #[test]
    fn requests_are_tagged_by_operation() {
        let json = serde_json::json!({
            "op": "create_transaction",
            "title": "Pay",
            "amount": "3000.00",
            "date": "2024-03-01",
            "type": "Payday"
        });
        let req: Request = serde_json::from_value(json).unwrap();
        match req {
            Request::CreateTransaction(c) => {
                assert_eq!(c.recurrence, Recurrence::OneTime);
                assert_eq!(c.r#type, TransactionType::Payday);
            }
            other => panic!("unexpected {:?}", other),
        }

        let del: Request =
            serde_json::from_value(serde_json::json!({"op": "delete_debt", "id": "x"})).unwrap();
        assert_eq!(del, Request::DeleteDebt { id: "x".into() });
    }
}
