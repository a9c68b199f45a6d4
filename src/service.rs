// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::balance::{self, EPOCH_SETTING, MonthBalance};
use crate::errors::{FinanceError, Result};
use crate::models::{
    Debt, DebtAdjustment, Month, Transaction, TransactionData, TransactionFilter, TransactionType,
};
use crate::recurrence::{MAX_OCCURRENCES, generate_occurrences};
use crate::requests::{
    ChargeDebtRequest, CreateDebtRequest, CreateTransactionRequest, Request,
    UpdateDebtRequest, UpdateTransactionRequest,
};
use crate::store::RecordStore;
use crate::utils::{new_id, validate_id};

/// Result of a dispatched request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(Vec<Transaction>),
    Updated(Transaction),
    Deleted(Transaction),
    Debt(Debt),
    DebtDeleted(Debt),
}

/// Operations over an injected record store. Holds no cached records;
/// every read goes back to the store.
pub struct FinanceService<S: RecordStore> {
    store: S,
}

/// Debt movement caused by one stored transaction.
fn payment_effect(t: &TransactionData) -> Option<DebtAdjustment> {
    match (&t.r#type, &t.debt_id) {
        (TransactionType::CreditCardPayment, Some(id)) => Some(DebtAdjustment {
            debt_id: id.clone(),
            delta: -t.amount,
        }),
        _ => None,
    }
}

fn reversal(t: &Transaction) -> Option<DebtAdjustment> {
    match (&t.r#type, &t.debt_id) {
        (TransactionType::CreditCardPayment, Some(id)) => Some(DebtAdjustment {
            debt_id: id.clone(),
            delta: t.amount,
        }),
        _ => None,
    }
}

impl<S: RecordStore> FinanceService<S> {
    pub fn new(store: S) -> Self {
        FinanceService { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn dispatch(&mut self, request: Request) -> Result<Outcome> {
        let result = match request {
            Request::CreateTransaction(req) => self.create_transaction(&req).map(Outcome::Created),
            Request::UpdateTransaction(req) => self.update_transaction(&req).map(Outcome::Updated),
            Request::DeleteTransaction { id } => {
                self.delete_transaction(&id).map(Outcome::Deleted)
            }
            Request::CreateDebt(req) => self.create_debt(&req).map(Outcome::Debt),
            Request::UpdateDebt(req) => self.update_debt(&req).map(Outcome::Debt),
            Request::ChargeDebt(req) => self.charge_debt(&req).map(Outcome::Debt),
            Request::DeleteDebt { id } => self.delete_debt(&id).map(Outcome::DebtDeleted),
        };
        if let Err(e) = &result {
            tracing::debug!(error = %e, "request rejected");
        }
        result
    }

    /// Expands the request into one stored transaction per occurrence date.
    /// All rows and the paired debt adjustment are written together or not at all.
    pub fn create_transaction(
        &mut self,
        req: &CreateTransactionRequest,
    ) -> Result<Vec<Transaction>> {
        let data = req.validate()?;
        if let Some(debt_id) = &data.debt_id {
            self.store.get_debt(debt_id)?;
        }

        let end = data.end_date.unwrap_or(data.date);
        let dates: Vec<_> = generate_occurrences(data.date, data.recurrence, end)
            .take(MAX_OCCURRENCES + 1)
            .collect();
        if dates.len() > MAX_OCCURRENCES {
            return Err(FinanceError::validation(format!(
                "{} recurrence from {} to {} produces more than {} occurrences",
                data.recurrence, data.date, end, MAX_OCCURRENCES
            )));
        }

        let series_id = data.recurrence.is_recurring().then(new_id);
        let batch: Vec<TransactionData> = dates
            .iter()
            .map(|date| TransactionData {
                series_id: series_id.clone(),
                date: *date,
                ..data.clone()
            })
            .collect();
        let adjustments: Vec<DebtAdjustment> = payment_effect(&data)
            .map(|adj| DebtAdjustment {
                delta: adj.delta * Decimal::from(batch.len()),
                ..adj
            })
            .into_iter()
            .collect();

        let created = self.store.create_transactions(&batch, &adjustments)?;
        tracing::info!(
            title = %data.title,
            occurrences = created.len(),
            recurrence = %data.recurrence,
            "recorded transaction"
        );
        Ok(created)
    }

    pub fn update_transaction(&mut self, req: &UpdateTransactionRequest) -> Result<Transaction> {
        let (id, data) = req.validate()?;
        let existing = self.store.get_transaction(&id)?;
        if let Some(debt_id) = &data.debt_id {
            self.store.get_debt(debt_id)?;
        }
        let adjustments: Vec<DebtAdjustment> = reversal(&existing)
            .into_iter()
            .chain(payment_effect(&data))
            .collect();
        self.store.update_transaction(&id, &data, &adjustments)
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<Transaction> {
        let id = validate_id(id)?;
        let existing = self.store.get_transaction(&id)?;
        let adjustments: Vec<DebtAdjustment> = reversal(&existing).into_iter().collect();
        self.store.delete_transaction(&id, &adjustments)
    }

    pub fn get_transaction(&self, id: &str) -> Result<Transaction> {
        self.store.get_transaction(&validate_id(id)?)
    }

    pub fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        if let Some(debt) = &filter.debt_id {
            validate_id(debt)?;
        }
        self.store.list_transactions(filter)
    }

    pub fn transactions_in_month(&self, month: Month) -> Result<Vec<Transaction>> {
        self.store.list_transactions_by_month(month)
    }

    pub fn create_debt(&mut self, req: &CreateDebtRequest) -> Result<Debt> {
        let data = req.validate()?;
        self.store.create_debt(&data)
    }

    pub fn update_debt(&mut self, req: &UpdateDebtRequest) -> Result<Debt> {
        let (id, data) = req.validate()?;
        self.store.update_debt(&id, &data)
    }

    pub fn charge_debt(&mut self, req: &ChargeDebtRequest) -> Result<Debt> {
        let (id, charge) = req.validate()?;
        let debt = self.store.get_debt(&id)?;
        let data = crate::models::DebtData {
            title: debt.title,
            amount: debt.amount + charge,
            r#type: debt.r#type,
            notes: debt.notes,
        };
        self.store.update_debt(&id, &data)
    }

    /// Refuses while transactions still reference the debt.
    pub fn delete_debt(&mut self, id: &str) -> Result<Debt> {
        let id = validate_id(id)?;
        self.store.get_debt(&id)?;
        let linked = self.store.list_transactions_by_debt_id(&id)?;
        if !linked.is_empty() {
            return Err(FinanceError::validation(format!(
                "debt '{}' is referenced by {} transaction(s)",
                id,
                linked.len()
            )));
        }
        self.store.delete_debt(&id)
    }

    pub fn list_debts(&self) -> Result<Vec<Debt>> {
        self.store.list_debts()
    }

    pub fn get_debt(&self, id: &str) -> Result<Debt> {
        self.store.get_debt(&validate_id(id)?)
    }

    /// The debt together with every transaction that references it.
    pub fn debt_detail(&self, id: &str) -> Result<(Debt, Vec<Transaction>)> {
        let debt = self.get_debt(id)?;
        let transactions = self.store.list_transactions_by_debt_id(&debt.id)?;
        Ok((debt, transactions))
    }

    pub fn epoch(&self) -> Result<Month> {
        balance::epoch(&self.store)
    }

    pub fn set_epoch(&mut self, month: Month) -> Result<()> {
        self.store.set_setting(EPOCH_SETTING, &month.to_string())
    }

    pub fn month_balance(&self, month: Month) -> Result<MonthBalance> {
        balance::compute_balances(&self.store, month, self.epoch()?)
    }
}
