// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id").required(true).help("Record identifier")
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .help("Calendar month (defaults to the current month)")
}

fn transaction_fields(cmd: Command, creating: bool) -> Command {
    cmd.arg(
        Arg::new("title")
            .long("title")
            .required(creating)
            .help("Short description"),
    )
    .arg(
        Arg::new("amount")
            .long("amount")
            .required(creating)
            .allow_hyphen_values(true)
            .help("Non-negative amount, e.g. 42.50"),
    )
    .arg(
        Arg::new("date")
            .long("date")
            .required(creating)
            .value_name("YYYY-MM-DD"),
    )
    .arg(
        Arg::new("type")
            .long("type")
            .help("Expense | Payday | Credit Card Payment | Placeholder"),
    )
    .arg(
        Arg::new("recurrence")
            .long("recurrence")
            .help("one-time | weekly | bi-weekly | monthly | bi-monthly | yearly"),
    )
    .arg(
        Arg::new("end-date")
            .long("end-date")
            .value_name("YYYY-MM-DD")
            .help("Last possible occurrence (recurring defaults to two years out)"),
    )
    .arg(Arg::new("notes").long("notes"))
    .arg(
        Arg::new("debt")
            .long("debt")
            .value_name("DEBT_ID")
            .help("Debt paid by a Credit Card Payment"),
    )
}

fn debt_fields(cmd: Command, creating: bool) -> Command {
    cmd.arg(Arg::new("title").long("title").required(creating))
        .arg(
            Arg::new("amount")
                .long("amount")
                .required(creating)
                .allow_hyphen_values(true)
                .help("Outstanding amount"),
        )
        .arg(
            Arg::new("type")
                .long("type")
                .help("Credit Card | Loan"),
        )
        .arg(Arg::new("notes").long("notes"))
}

pub fn build_cli() -> Command {
    Command::new("balancebook")
        .about("Track transactions, recurring bills, debts and monthly balances")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .help("SQLite database file (overrides BALANCEBOOK_DB)"),
        )
        .subcommand(Command::new("init").about("Create the database if needed"))
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand_required(true)
                .subcommand(transaction_fields(
                    Command::new("add").about("Record a transaction and its recurrences"),
                    true,
                ))
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions")
                        .arg(month_arg().help("Only rows active in this month"))
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("debt").long("debt").value_name("DEBT_ID"))
                        .arg(Arg::new("series").long("series").value_name("SERIES_ID"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("show").about("Show one transaction").arg(id_arg()),
                ))
                .subcommand(
                    transaction_fields(
                        Command::new("edit")
                            .about("Replace fields of one transaction")
                            .arg(id_arg()),
                        false,
                    )
                    .arg(
                        Arg::new("clear-end-date")
                            .long("clear-end-date")
                            .action(ArgAction::SetTrue)
                            .conflicts_with("end-date"),
                    )
                    .arg(
                        Arg::new("clear-debt")
                            .long("clear-debt")
                            .action(ArgAction::SetTrue)
                            .conflicts_with("debt"),
                    ),
                )
                .subcommand(Command::new("rm").about("Delete one transaction").arg(id_arg())),
        )
        .subcommand(
            Command::new("debt")
                .about("Credit cards and loans")
                .subcommand_required(true)
                .subcommand(debt_fields(Command::new("add").about("Add a debt"), true))
                .subcommand(json_flags(Command::new("list").about("List debts")))
                .subcommand(json_flags(
                    Command::new("show")
                        .about("Show a debt and the payments made to it")
                        .arg(id_arg()),
                ))
                .subcommand(debt_fields(
                    Command::new("edit").about("Replace fields of a debt").arg(id_arg()),
                    false,
                ))
                .subcommand(
                    Command::new("charge")
                        .about("Record a purchase on a debt")
                        .arg(id_arg())
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(Command::new("rm").about("Delete an unreferenced debt").arg(id_arg())),
        )
        .subcommand(json_flags(
            Command::new("balance")
                .about("Starting and ending balance for a month")
                .arg(month_arg()),
        ))
        .subcommand(
            Command::new("calendar")
                .about("Month calendar with each day's transactions")
                .arg(month_arg()),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand_required(true)
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv | json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Persistent settings")
                .subcommand_required(true)
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for problems"))
}
