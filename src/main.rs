// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;

use balancebook::service::FinanceService;
use balancebook::store::SqliteStore;
use balancebook::{cli, commands, db, utils};

fn run(matches: &clap::ArgMatches) -> Result<()> {
    let explicit = matches.get_one::<String>("db").map(Path::new);
    let path = db::db_path(explicit)?;
    let conn = db::open_or_init(&path)?;
    let mut svc = FinanceService::new(SqliteStore::new(conn));

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", path.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&mut svc, sub)?,
        Some(("debt", sub)) => commands::debts::handle(&mut svc, sub)?,
        Some(("balance", sub)) => commands::balance::handle(&svc, sub)?,
        Some(("calendar", sub)) => commands::calendar::handle(&svc, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&svc, sub)?,
        Some(("config", sub)) => commands::config::handle(&mut svc, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&svc)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    utils::init_tracing();
    let matches = cli::build_cli().get_matches();

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = %format!("{:#}", err), "command failed");
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
