// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::transactions::{TABLE_HEADERS, table_rows};
use super::{optional, required};
use crate::models::{Debt, DebtType};
use crate::requests::{ChargeDebtRequest, CreateDebtRequest, Request, UpdateDebtRequest};
use crate::service::{FinanceService, Outcome};
use crate::store::RecordStore;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use serde::Serialize;

pub fn handle<S: RecordStore>(svc: &mut FinanceService<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(svc, sub)?,
        Some(("list", sub)) => list(svc, sub)?,
        Some(("show", sub)) => show(svc, sub)?,
        Some(("edit", sub)) => edit(svc, sub)?,
        Some(("charge", sub)) => charge(svc, sub)?,
        Some(("rm", sub)) => remove(svc, sub)?,
        _ => {}
    }
    Ok(())
}

fn add<S: RecordStore>(svc: &mut FinanceService<S>, sub: &clap::ArgMatches) -> Result<()> {
    let req = CreateDebtRequest {
        title: required(sub, "title")?.to_string(),
        amount: parse_decimal(required(sub, "amount")?)?,
        r#type: optional(sub, "type")
            .map(str::parse::<DebtType>)
            .transpose()?
            .unwrap_or(DebtType::CreditCard),
        notes: optional(sub, "notes").unwrap_or_default().to_string(),
    };
    if let Outcome::Debt(d) = svc.dispatch(Request::CreateDebt(req))? {
        println!(
            "Added {} '{}' owing {} [{}]",
            d.r#type,
            d.title,
            fmt_money(&d.amount),
            d.id
        );
    }
    Ok(())
}

fn debt_rows(debts: &[Debt]) -> Vec<Vec<String>> {
    debts
        .iter()
        .map(|d| {
            vec![
                d.id.clone(),
                d.title.clone(),
                fmt_money(&d.amount),
                d.r#type.to_string(),
                d.notes.clone(),
            ]
        })
        .collect()
}

const DEBT_HEADERS: [&str; 5] = ["ID", "Title", "Outstanding", "Type", "Notes"];

fn list<S: RecordStore>(svc: &FinanceService<S>, sub: &clap::ArgMatches) -> Result<()> {
    let debts = svc.list_debts()?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &debts)? {
        println!("{}", pretty_table(&DEBT_HEADERS, debt_rows(&debts)));
    }
    Ok(())
}

#[derive(Serialize)]
struct DebtDetail<'a> {
    debt: &'a Debt,
    transactions: &'a [crate::models::Transaction],
}

fn show<S: RecordStore>(svc: &FinanceService<S>, sub: &clap::ArgMatches) -> Result<()> {
    let (debt, transactions) = svc.debt_detail(required(sub, "id")?)?;
    let detail = DebtDetail {
        debt: &debt,
        transactions: &transactions,
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &detail)? {
        println!("Debt details for {}", debt.title);
        println!("Balance: {}", fmt_money(&debt.amount));
        println!("{}", pretty_table(&DEBT_HEADERS, debt_rows(std::slice::from_ref(&debt))));
        if transactions.is_empty() {
            println!("No payments recorded against this debt");
        } else {
            println!("{}", pretty_table(&TABLE_HEADERS, table_rows(&transactions)));
        }
    }
    Ok(())
}

fn edit<S: RecordStore>(svc: &mut FinanceService<S>, sub: &clap::ArgMatches) -> Result<()> {
    let existing = svc.get_debt(required(sub, "id")?)?;
    let req = UpdateDebtRequest {
        id: existing.id,
        fields: CreateDebtRequest {
            title: optional(sub, "title")
                .map(str::to_string)
                .unwrap_or(existing.title),
            amount: optional(sub, "amount")
                .map(parse_decimal)
                .transpose()?
                .unwrap_or(existing.amount),
            r#type: optional(sub, "type")
                .map(str::parse::<DebtType>)
                .transpose()?
                .unwrap_or(existing.r#type),
            notes: optional(sub, "notes")
                .map(str::to_string)
                .unwrap_or(existing.notes),
        },
    };
    if let Outcome::Debt(d) = svc.dispatch(Request::UpdateDebt(req))? {
        println!("Updated '{}' owing {}", d.title, fmt_money(&d.amount));
    }
    Ok(())
}

fn charge<S: RecordStore>(svc: &mut FinanceService<S>, sub: &clap::ArgMatches) -> Result<()> {
    let req = ChargeDebtRequest {
        id: required(sub, "id")?.to_string(),
        amount: parse_decimal(required(sub, "amount")?)?,
    };
    if let Outcome::Debt(d) = svc.dispatch(Request::ChargeDebt(req))? {
        println!("Charged '{}', now owing {}", d.title, fmt_money(&d.amount));
    }
    Ok(())
}

fn remove<S: RecordStore>(svc: &mut FinanceService<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "id")?.to_string();
    if let Outcome::DebtDeleted(d) = svc.dispatch(Request::DeleteDebt { id })? {
        println!("Removed debt '{}'", d.title);
    }
    Ok(())
}
