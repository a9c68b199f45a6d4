// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::required;
use crate::models::TransactionFilter;
use crate::service::FinanceService;
use crate::store::RecordStore;
use crate::utils::fmt_date;
use anyhow::{Context, Result, bail};

pub fn handle<S: RecordStore>(svc: &FinanceService<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(svc, sub),
        _ => Ok(()),
    }
}

fn export_transactions<S: RecordStore>(svc: &FinanceService<S>, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required(sub, "format")?.to_lowercase();
    let out = required(sub, "out")?;
    let rows = svc.list_transactions(&TransactionFilter::default())?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Cannot write {}", out))?;
            wtr.write_record([
                "id", "series_id", "date", "title", "amount", "type", "recurrence", "end_date",
                "notes", "debt_id",
            ])?;
            for t in &rows {
                wtr.write_record([
                    t.id.clone(),
                    t.series_id.clone(),
                    fmt_date(&t.date),
                    t.title.clone(),
                    t.amount.to_string(),
                    t.r#type.to_string(),
                    t.recurrence.to_string(),
                    t.end_date.as_ref().map(fmt_date).unwrap_or_default(),
                    t.notes.clone(),
                    t.debt_id.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)
                .with_context(|| format!("Cannot write {}", out))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}
