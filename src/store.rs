// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Record store for transactions, debts and settings.

use chrono::NaiveDate;
use rusqlite::types::{Type, Value};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use rust_decimal::Decimal;

use crate::db::init_schema;
use crate::errors::{FinanceError, Result};
use crate::models::{
    Debt, DebtAdjustment, DebtData, Month, Transaction, TransactionData, TransactionFilter,
};
use crate::utils::{fmt_date, new_id};

/// Everything the service needs from persistence. Writes that carry debt
/// adjustments apply them in the same unit of work as the records.
pub trait RecordStore {
    fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>>;
    fn get_transaction(&self, id: &str) -> Result<Transaction>;
    /// Transactions dated in `[from, until)`.
    fn list_transactions_dated(&self, from: NaiveDate, until: NaiveDate)
    -> Result<Vec<Transaction>>;
    fn create_transactions(
        &mut self,
        batch: &[TransactionData],
        adjustments: &[DebtAdjustment],
    ) -> Result<Vec<Transaction>>;
    fn update_transaction(
        &mut self,
        id: &str,
        data: &TransactionData,
        adjustments: &[DebtAdjustment],
    ) -> Result<Transaction>;
    fn delete_transaction(&mut self, id: &str, adjustments: &[DebtAdjustment])
    -> Result<Transaction>;

    fn list_debts(&self) -> Result<Vec<Debt>>;
    fn get_debt(&self, id: &str) -> Result<Debt>;
    fn create_debt(&mut self, data: &DebtData) -> Result<Debt>;
    fn update_debt(&mut self, id: &str, data: &DebtData) -> Result<Debt>;
    fn delete_debt(&mut self, id: &str) -> Result<Debt>;

    fn get_setting(&self, key: &str) -> Result<Option<String>>;
    fn set_setting(&mut self, key: &str, value: &str) -> Result<()>;

    fn create_transaction(&mut self, data: &TransactionData) -> Result<Transaction> {
        self.create_transactions(std::slice::from_ref(data), &[])?
            .pop()
            .ok_or_else(|| FinanceError::validation("nothing to create"))
    }

    /// Rows active in `month`: dated in it, ending in it, or spanning it.
    fn list_transactions_by_month(&self, month: Month) -> Result<Vec<Transaction>> {
        self.list_transactions(&TransactionFilter {
            month: Some(month),
            ..TransactionFilter::default()
        })
    }

    fn list_transactions_by_debt_id(&self, debt_id: &str) -> Result<Vec<Transaction>> {
        self.list_transactions(&TransactionFilter {
            debt_id: Some(debt_id.to_string()),
            ..TransactionFilter::default()
        })
    }
}

const TX_COLUMNS: &str =
    "id, series_id, title, amount, date, type, recurrence, end_date, notes, debt_id";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        SqliteStore { conn }
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(SqliteStore { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn bad_column(idx: usize, err: FinanceError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn text_column<T: std::str::FromStr<Err = FinanceError>>(
    r: &Row<'_>,
    idx: usize,
) -> rusqlite::Result<T> {
    let s: String = r.get(idx)?;
    s.parse::<T>().map_err(|e| bad_column(idx, e))
}

fn decimal_column(r: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = r.get(idx)?;
    s.parse::<Decimal>()
        .map_err(|_| bad_column(idx, FinanceError::validation(format!("bad amount '{}'", s))))
}

fn date_column(r: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let s: Option<String> = r.get(idx)?;
    s.map(|s| crate::utils::parse_date(&s).map_err(|e| bad_column(idx, e)))
        .transpose()
}

fn row_to_transaction(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    let date = date_column(r, 4)?.ok_or(rusqlite::Error::InvalidColumnType(
        4,
        "date".into(),
        Type::Null,
    ))?;
    Ok(Transaction {
        id: r.get(0)?,
        series_id: r.get(1)?,
        title: r.get(2)?,
        amount: decimal_column(r, 3)?,
        date,
        r#type: text_column(r, 5)?,
        recurrence: text_column(r, 6)?,
        end_date: date_column(r, 7)?,
        notes: r.get(8)?,
        debt_id: r.get(9)?,
    })
}

fn row_to_debt(r: &Row<'_>) -> rusqlite::Result<Debt> {
    Ok(Debt {
        id: r.get(0)?,
        title: r.get(1)?,
        amount: decimal_column(r, 2)?,
        r#type: text_column(r, 3)?,
        notes: r.get(4)?,
    })
}

fn fetch_transaction(conn: &Connection, id: &str) -> Result<Option<Transaction>> {
    let sql = format!("SELECT {TX_COLUMNS} FROM transactions WHERE id=?1");
    Ok(conn
        .query_row(&sql, params![id], row_to_transaction)
        .optional()?)
}

fn fetch_debt(conn: &Connection, id: &str) -> Result<Option<Debt>> {
    Ok(conn
        .query_row(
            "SELECT id, title, amount, type, notes FROM debts WHERE id=?1",
            params![id],
            row_to_debt,
        )
        .optional()?)
}

fn apply_adjustments(conn: &Connection, adjustments: &[DebtAdjustment]) -> Result<()> {
    for adj in adjustments {
        let debt = fetch_debt(conn, &adj.debt_id)?
            .ok_or_else(|| FinanceError::debt_not_found(&adj.debt_id))?;
        let amount = debt.amount + adj.delta;
        conn.execute(
            "UPDATE debts SET amount=?1 WHERE id=?2",
            params![amount.to_string(), adj.debt_id],
        )?;
        tracing::info!(debt = %adj.debt_id, delta = %adj.delta, balance = %amount, "debt adjusted");
    }
    Ok(())
}

impl RecordStore for SqliteStore {
    fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let mut sql = format!("SELECT {TX_COLUMNS} FROM transactions WHERE 1=1");
        let mut args: Vec<Value> = Vec::new();

        if let Some(month) = filter.month {
            let n = args.len();
            sql.push_str(&format!(
                " AND ((date >= ?{s} AND date <= ?{e})
                   OR (end_date IS NOT NULL AND end_date >= ?{s} AND end_date <= ?{e})
                   OR (date <= ?{e} AND end_date IS NOT NULL AND end_date >= ?{s}))",
                s = n + 1,
                e = n + 2
            ));
            args.push(Value::Text(fmt_date(&month.first_day())));
            args.push(Value::Text(fmt_date(&month.last_day())));
        }
        if let Some(t) = filter.r#type {
            sql.push_str(&format!(" AND type=?{}", args.len() + 1));
            args.push(Value::Text(t.as_str().to_string()));
        }
        if let Some(debt) = &filter.debt_id {
            sql.push_str(&format!(" AND debt_id=?{}", args.len() + 1));
            args.push(Value::Text(debt.clone()));
        }
        if let Some(series) = &filter.series_id {
            sql.push_str(&format!(" AND series_id=?{}", args.len() + 1));
            args.push(Value::Text(series.clone()));
        }
        sql.push_str(" ORDER BY date, rowid");
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT ?{}", args.len() + 1));
            args.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), row_to_transaction)?;
        let mut data = Vec::new();
        for row in rows {
            data.push(row?);
        }
        if let Some(month) = filter.month {
            debug_assert!(data.iter().all(|t| t.is_active_in(month)));
        }
        tracing::debug!(count = data.len(), ?filter, "listed transactions");
        Ok(data)
    }

    fn get_transaction(&self, id: &str) -> Result<Transaction> {
        fetch_transaction(&self.conn, id)?.ok_or_else(|| FinanceError::transaction_not_found(id))
    }

    fn list_transactions_dated(
        &self,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let sql = format!(
            "SELECT {TX_COLUMNS} FROM transactions WHERE date >= ?1 AND date < ?2 ORDER BY date, rowid"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![fmt_date(&from), fmt_date(&until)],
            row_to_transaction,
        )?;
        let mut data = Vec::new();
        for row in rows {
            data.push(row?);
        }
        Ok(data)
    }

    fn create_transactions(
        &mut self,
        batch: &[TransactionData],
        adjustments: &[DebtAdjustment],
    ) -> Result<Vec<Transaction>> {
        let tx = self.conn.transaction()?;
        let mut created = Vec::with_capacity(batch.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO transactions(id, series_id, title, amount, date, type, recurrence, end_date, notes, debt_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for data in batch {
                let id = new_id();
                let series_id = data.series_id.clone().unwrap_or_else(|| id.clone());
                stmt.execute(params![
                    id,
                    series_id,
                    data.title,
                    data.amount.to_string(),
                    fmt_date(&data.date),
                    data.r#type.as_str(),
                    data.recurrence.as_str(),
                    data.end_date.as_ref().map(fmt_date),
                    data.notes,
                    data.debt_id,
                ])?;
                created.push(Transaction {
                    id,
                    series_id,
                    title: data.title.clone(),
                    amount: data.amount,
                    date: data.date,
                    r#type: data.r#type,
                    recurrence: data.recurrence,
                    end_date: data.end_date,
                    notes: data.notes.clone(),
                    debt_id: data.debt_id.clone(),
                });
            }
        }
        apply_adjustments(&tx, adjustments)?;
        tx.commit()?;
        tracing::info!(count = created.len(), "transactions created");
        Ok(created)
    }

    fn update_transaction(
        &mut self,
        id: &str,
        data: &TransactionData,
        adjustments: &[DebtAdjustment],
    ) -> Result<Transaction> {
        let tx = self.conn.transaction()?;
        let existing =
            fetch_transaction(&tx, id)?.ok_or_else(|| FinanceError::transaction_not_found(id))?;
        let series_id = data.series_id.clone().unwrap_or(existing.series_id);
        tx.execute(
            "UPDATE transactions SET series_id=?2, title=?3, amount=?4, date=?5, type=?6,
                recurrence=?7, end_date=?8, notes=?9, debt_id=?10
             WHERE id=?1",
            params![
                id,
                series_id,
                data.title,
                data.amount.to_string(),
                fmt_date(&data.date),
                data.r#type.as_str(),
                data.recurrence.as_str(),
                data.end_date.as_ref().map(fmt_date),
                data.notes,
                data.debt_id,
            ],
        )?;
        apply_adjustments(&tx, adjustments)?;
        let updated =
            fetch_transaction(&tx, id)?.ok_or_else(|| FinanceError::transaction_not_found(id))?;
        tx.commit()?;
        tracing::info!(id, "transaction updated");
        Ok(updated)
    }

    fn delete_transaction(
        &mut self,
        id: &str,
        adjustments: &[DebtAdjustment],
    ) -> Result<Transaction> {
        let tx = self.conn.transaction()?;
        let existing =
            fetch_transaction(&tx, id)?.ok_or_else(|| FinanceError::transaction_not_found(id))?;
        tx.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        apply_adjustments(&tx, adjustments)?;
        tx.commit()?;
        tracing::info!(id, "transaction deleted");
        Ok(existing)
    }

    fn list_debts(&self) -> Result<Vec<Debt>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, amount, type, notes FROM debts ORDER BY title, rowid")?;
        let rows = stmt.query_map([], row_to_debt)?;
        let mut data = Vec::new();
        for row in rows {
            data.push(row?);
        }
        Ok(data)
    }

    fn get_debt(&self, id: &str) -> Result<Debt> {
        fetch_debt(&self.conn, id)?.ok_or_else(|| FinanceError::debt_not_found(id))
    }

    fn create_debt(&mut self, data: &DebtData) -> Result<Debt> {
        let id = new_id();
        self.conn.execute(
            "INSERT INTO debts(id, title, amount, type, notes) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id,
                data.title,
                data.amount.to_string(),
                data.r#type.as_str(),
                data.notes
            ],
        )?;
        tracing::info!(id = %id, title = %data.title, "debt created");
        Ok(Debt {
            id,
            title: data.title.clone(),
            amount: data.amount,
            r#type: data.r#type,
            notes: data.notes.clone(),
        })
    }

    fn update_debt(&mut self, id: &str, data: &DebtData) -> Result<Debt> {
        let changed = self.conn.execute(
            "UPDATE debts SET title=?2, amount=?3, type=?4, notes=?5 WHERE id=?1",
            params![
                id,
                data.title,
                data.amount.to_string(),
                data.r#type.as_str(),
                data.notes
            ],
        )?;
        if changed == 0 {
            return Err(FinanceError::debt_not_found(id));
        }
        tracing::info!(id, "debt updated");
        self.get_debt(id)
    }

    fn delete_debt(&mut self, id: &str) -> Result<Debt> {
        let existing = self.get_debt(id)?;
        self.conn
            .execute("DELETE FROM debts WHERE id=?1", params![id])?;
        tracing::info!(id, "debt deleted");
        Ok(existing)
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key=?1",
                params![key],
                |r| r.get(0),
            )
            .optional()?)
    }

    fn set_setting(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}
