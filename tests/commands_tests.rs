// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use balancebook::commands::{doctor, exporter};
use balancebook::models::{Recurrence, TransactionType};
use balancebook::requests::{CreateDebtRequest, CreateTransactionRequest};
use balancebook::service::FinanceService;
use balancebook::store::SqliteStore;
use balancebook::utils::{new_id, parse_date};
use balancebook::{cli, models::DebtType};
use rusqlite::params;
use tempfile::tempdir;

fn service() -> FinanceService<SqliteStore> {
    FinanceService::new(SqliteStore::open_in_memory().unwrap())
}

fn seed(svc: &mut FinanceService<SqliteStore>) {
    svc.create_transaction(&CreateTransactionRequest {
        title: "Salary, main".into(),
        amount: "3000".parse().unwrap(),
        date: parse_date("2024-01-01").unwrap(),
        r#type: TransactionType::Payday,
        recurrence: Recurrence::BiWeekly,
        end_date: Some(parse_date("2024-01-29").unwrap()),
        notes: String::new(),
        debt_id: None,
    })
    .unwrap();
}

fn export(svc: &FinanceService<SqliteStore>, format: &str, out: &str) {
    let matches = cli::build_cli().get_matches_from([
        "balancebook", "export", "transactions", "--format", format, "--out", out,
    ]);
    let Some(("export", m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(svc, m).unwrap();
}

#[test]
fn export_csv_writes_header_and_rows() {
    let mut svc = service();
    seed(&mut svc);
    let dir = tempdir().unwrap();
    let path = dir.path().join("tx.csv");
    export(&svc, "csv", path.to_str().unwrap());

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[0], "id");
    assert_eq!(&headers[9], "debt_id");
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 3);
    assert_eq!(&records[0][2], "2024-01-01");
    assert_eq!(&records[2][2], "2024-01-29");
    assert_eq!(&records[1][3], "Salary, main");
    assert_eq!(&records[1][5], "Payday");
    assert_eq!(&records[1][6], "bi-weekly");
}

#[test]
fn export_json_keeps_type_names() {
    let mut svc = service();
    seed(&mut svc);
    let dir = tempdir().unwrap();
    let path = dir.path().join("tx.json");
    export(&svc, "json", path.to_str().unwrap());

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["type"], "Payday");
    assert_eq!(rows[0]["end_date"], "2024-01-29");
    assert_eq!(rows[0]["series_id"], rows[2]["series_id"]);
}

#[test]
fn doctor_is_quiet_on_clean_data() {
    let mut svc = service();
    seed(&mut svc);
    assert!(doctor::find_issues(&svc).unwrap().is_empty());
}

#[test]
fn doctor_flags_rows_written_around_validation() {
    let mut svc = service();
    let debt = svc
        .create_debt(&CreateDebtRequest {
            title: "Loan".into(),
            amount: "100".parse().unwrap(),
            r#type: DebtType::Loan,
            notes: String::new(),
        })
        .unwrap();
    let conn = svc.store().connection();
    let open_ended = new_id();
    conn.execute(
        "INSERT INTO transactions(id, series_id, title, amount, date, type, recurrence, end_date, notes, debt_id)
         VALUES (?1, ?1, 'Rent', '900', '2024-01-01', 'Expense', 'monthly', NULL, '', NULL)",
        params![open_ended],
    )
    .unwrap();
    let misfiled = new_id();
    conn.execute(
        "INSERT INTO transactions(id, series_id, title, amount, date, type, recurrence, end_date, notes, debt_id)
         VALUES (?1, ?1, 'Food', '20', '2024-01-05', 'Expense', 'one-time', '2023-12-01', '', ?2)",
        params![misfiled, debt.id],
    )
    .unwrap();

    let issues = doctor::find_issues(&svc).unwrap();
    let kinds: Vec<&str> = issues.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(
        kinds,
        ["recurring_without_end_date", "debt_ref_on_non_payment", "end_before_date"]
    );
    assert!(issues[0][1].contains(&open_ended));
}
