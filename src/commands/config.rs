// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::required;
use crate::balance::EPOCH_SETTING;
use crate::models::Month;
use crate::service::FinanceService;
use crate::store::RecordStore;
use anyhow::{Result, bail};

pub const KNOWN_KEYS: [&str; 1] = [EPOCH_SETTING];

pub fn handle<S: RecordStore>(svc: &mut FinanceService<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = required(sub, "key")?.trim();
            match key {
                EPOCH_SETTING => println!("{} = {}", key, svc.epoch()?),
                _ => bail!("Unknown setting '{}' (known: {})", key, KNOWN_KEYS.join(", ")),
            }
        }
        Some(("set", sub)) => {
            let key = required(sub, "key")?.trim();
            let value = required(sub, "value")?;
            match key {
                EPOCH_SETTING => {
                    let month: Month = value.parse()?;
                    svc.set_epoch(month)?;
                    println!("{} = {}", key, month);
                }
                _ => bail!("Unknown setting '{}' (known: {})", key, KNOWN_KEYS.join(", ")),
            }
        }
        _ => {}
    }
    Ok(())
}
