// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{optional, required};
use crate::models::{Month, Recurrence, Transaction, TransactionFilter, TransactionType};
use crate::requests::{CreateTransactionRequest, Request, UpdateTransactionRequest};
use crate::service::{FinanceService, Outcome};
use crate::store::RecordStore;
use crate::utils::{fmt_date, fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Result, bail};

pub fn handle<S: RecordStore>(svc: &mut FinanceService<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(svc, sub)?,
        Some(("list", sub)) => list(svc, sub)?,
        Some(("show", sub)) => show(svc, sub)?,
        Some(("edit", sub)) => edit(svc, sub)?,
        Some(("rm", sub)) => remove(svc, sub)?,
        _ => {}
    }
    Ok(())
}

/// Amount as it affects the balance: paydays positive, everything else negative.
pub fn display_amount(t: &Transaction) -> String {
    fmt_money(&t.signed_amount())
}

pub fn add_request(sub: &clap::ArgMatches) -> Result<CreateTransactionRequest> {
    Ok(CreateTransactionRequest {
        title: required(sub, "title")?.to_string(),
        amount: parse_decimal(required(sub, "amount")?)?,
        date: parse_date(required(sub, "date")?)?,
        r#type: optional(sub, "type")
            .map(str::parse::<TransactionType>)
            .transpose()?
            .unwrap_or(TransactionType::Expense),
        recurrence: optional(sub, "recurrence")
            .map(str::parse::<Recurrence>)
            .transpose()?
            .unwrap_or(Recurrence::OneTime),
        end_date: optional(sub, "end-date").map(parse_date).transpose()?,
        notes: optional(sub, "notes").unwrap_or_default().to_string(),
        debt_id: optional(sub, "debt").map(str::to_string),
    })
}

fn add<S: RecordStore>(svc: &mut FinanceService<S>, sub: &clap::ArgMatches) -> Result<()> {
    let req = add_request(sub)?;
    let created = match svc.dispatch(Request::CreateTransaction(req))? {
        Outcome::Created(rows) => rows,
        other => bail!("unexpected outcome {:?}", other),
    };
    match (created.first(), created.last()) {
        (Some(first), Some(last)) if created.len() > 1 => println!(
            "Recorded {} occurrences of '{}' ({}) from {} to {}",
            created.len(),
            first.title,
            display_amount(first),
            first.date,
            last.date
        ),
        (Some(first), _) => println!(
            "Recorded '{}' {} on {} [{}]",
            first.title,
            display_amount(first),
            first.date,
            first.id
        ),
        _ => println!("Nothing recorded"),
    }
    Ok(())
}

pub fn filter_from(sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    Ok(TransactionFilter {
        month: optional(sub, "month").map(str::parse::<Month>).transpose()?,
        r#type: optional(sub, "type").map(str::parse::<TransactionType>).transpose()?,
        debt_id: optional(sub, "debt").map(str::to_string),
        series_id: optional(sub, "series").map(str::to_string),
        limit: sub.get_one::<usize>("limit").copied(),
    })
}

pub fn query_rows<S: RecordStore>(
    svc: &FinanceService<S>,
    sub: &clap::ArgMatches,
) -> Result<Vec<Transaction>> {
    Ok(svc.list_transactions(&filter_from(sub)?)?)
}

pub fn table_rows(data: &[Transaction]) -> Vec<Vec<String>> {
    data.iter()
        .map(|t| {
            vec![
                t.id.clone(),
                fmt_date(&t.date),
                t.title.clone(),
                display_amount(t),
                t.r#type.to_string(),
                t.recurrence.to_string(),
                t.end_date.as_ref().map(fmt_date).unwrap_or_default(),
                t.debt_id.clone().unwrap_or_default(),
                t.notes.clone(),
            ]
        })
        .collect()
}

pub const TABLE_HEADERS: [&str; 9] = [
    "ID",
    "Date",
    "Title",
    "Amount",
    "Type",
    "Recurrence",
    "End Date",
    "Debt",
    "Notes",
];

fn list<S: RecordStore>(svc: &FinanceService<S>, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(svc, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(&TABLE_HEADERS, table_rows(&data)));
    }
    Ok(())
}

fn show<S: RecordStore>(svc: &FinanceService<S>, sub: &clap::ArgMatches) -> Result<()> {
    let t = svc.get_transaction(required(sub, "id")?)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &t)? {
        let rows = TABLE_HEADERS
            .iter()
            .zip(table_rows(std::slice::from_ref(&t)).remove(0))
            .map(|(h, v)| vec![h.to_string(), v])
            .chain(std::iter::once(vec!["Series".into(), t.series_id.clone()]))
            .collect();
        println!("{}", pretty_table(&["Field", "Value"], rows));
    }
    Ok(())
}

/// Unset flags keep the stored value; the merged record replaces the old one.
pub fn edit_request(existing: Transaction, sub: &clap::ArgMatches) -> Result<UpdateTransactionRequest> {
    let end_date = if sub.get_flag("clear-end-date") {
        None
    } else {
        match optional(sub, "end-date") {
            Some(s) => Some(parse_date(s)?),
            None => existing.end_date,
        }
    };
    let r#type = optional(sub, "type")
        .map(str::parse::<TransactionType>)
        .transpose()?
        .unwrap_or(existing.r#type);
    // Only card payments keep the stored debt link.
    let inherited = existing
        .debt_id
        .filter(|_| r#type == TransactionType::CreditCardPayment);
    let debt_id = if sub.get_flag("clear-debt") {
        None
    } else {
        optional(sub, "debt").map(str::to_string).or(inherited)
    };
    Ok(UpdateTransactionRequest {
        id: existing.id,
        fields: CreateTransactionRequest {
            title: optional(sub, "title")
                .map(str::to_string)
                .unwrap_or(existing.title),
            amount: optional(sub, "amount")
                .map(parse_decimal)
                .transpose()?
                .unwrap_or(existing.amount),
            date: optional(sub, "date")
                .map(parse_date)
                .transpose()?
                .unwrap_or(existing.date),
            r#type,
            recurrence: optional(sub, "recurrence")
                .map(str::parse::<Recurrence>)
                .transpose()?
                .unwrap_or(existing.recurrence),
            end_date,
            notes: optional(sub, "notes")
                .map(str::to_string)
                .unwrap_or(existing.notes),
            debt_id,
        },
    })
}

fn edit<S: RecordStore>(svc: &mut FinanceService<S>, sub: &clap::ArgMatches) -> Result<()> {
    let existing = svc.get_transaction(required(sub, "id")?)?;
    let req = edit_request(existing, sub)?;
    if let Outcome::Updated(t) = svc.dispatch(Request::UpdateTransaction(req))? {
        println!("Updated '{}' {} on {}", t.title, display_amount(&t), t.date);
    }
    Ok(())
}

fn remove<S: RecordStore>(svc: &mut FinanceService<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "id")?.to_string();
    if let Outcome::Deleted(t) = svc.dispatch(Request::DeleteTransaction { id })? {
        println!("Removed '{}' on {}", t.title, t.date);
    }
    Ok(())
}
