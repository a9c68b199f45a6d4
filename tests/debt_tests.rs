// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use balancebook::errors::FinanceError;
use balancebook::models::{DebtType, Recurrence, TransactionFilter, TransactionType};
use balancebook::requests::{
    ChargeDebtRequest, CreateDebtRequest, CreateTransactionRequest, Request, UpdateTransactionRequest,
};
use balancebook::service::{FinanceService, Outcome};
use balancebook::store::SqliteStore;
use balancebook::utils::{new_id, parse_date};
use balancebook::{cli, commands::transactions};
use rust_decimal::Decimal;

fn service() -> FinanceService<SqliteStore> {
    FinanceService::new(SqliteStore::open_in_memory().unwrap())
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn card(svc: &mut FinanceService<SqliteStore>, owing: &str) -> String {
    svc.create_debt(&CreateDebtRequest {
        title: "Visa".into(),
        amount: dec(owing),
        r#type: DebtType::CreditCard,
        notes: String::new(),
    })
    .unwrap()
    .id
}

fn payment(debt_id: &str, amount: &str, date: &str) -> CreateTransactionRequest {
    CreateTransactionRequest {
        title: "Visa payment".into(),
        amount: dec(amount),
        date: parse_date(date).unwrap(),
        r#type: TransactionType::CreditCardPayment,
        recurrence: Recurrence::OneTime,
        end_date: None,
        notes: String::new(),
        debt_id: Some(debt_id.to_string()),
    }
}

fn transaction_count(svc: &FinanceService<SqliteStore>) -> usize {
    svc.list_transactions(&TransactionFilter::default()).unwrap().len()
}

#[test]
fn payment_reduces_outstanding_amount() {
    let mut svc = service();
    let debt = card(&mut svc, "1500.00");

    let created = svc.create_transaction(&payment(&debt, "200.00", "2024-03-05")).unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].debt_id.as_deref(), Some(debt.as_str()));
    assert_eq!(svc.get_debt(&debt).unwrap().amount, dec("1300.00"));

    let (d, linked) = svc.debt_detail(&debt).unwrap();
    assert_eq!(d.title, "Visa");
    assert_eq!(linked, created);
}

#[test]
fn recurring_payment_adjusts_once_per_occurrence() {
    let mut svc = service();
    let debt = card(&mut svc, "1000");
    let mut req = payment(&debt, "100", "2024-01-10");
    req.recurrence = Recurrence::Monthly;
    req.end_date = Some(parse_date("2024-04-10").unwrap());

    let created = svc.create_transaction(&req).unwrap();
    assert_eq!(created.len(), 4);
    assert_eq!(svc.get_debt(&debt).unwrap().amount, dec("600"));
}

#[test]
fn payment_to_missing_debt_writes_nothing() {
    let mut svc = service();
    let existing = card(&mut svc, "50");
    let missing = new_id();

    let err = svc
        .dispatch(Request::CreateTransaction(payment(&missing, "10", "2024-02-01")))
        .unwrap_err();
    assert!(err.is_not_found(), "{err}");
    assert!(matches!(err, FinanceError::NotFound { kind: "Debt", .. }));
    assert_eq!(transaction_count(&svc), 0);
    assert_eq!(svc.get_debt(&existing).unwrap().amount, dec("50"));
}

#[test]
fn only_card_payments_reference_a_debt() {
    let mut svc = service();
    let debt = card(&mut svc, "50");
    let mut req = payment(&debt, "10", "2024-02-01");
    req.r#type = TransactionType::Expense;

    let err = svc.create_transaction(&req).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(transaction_count(&svc), 0);
    assert_eq!(svc.get_debt(&debt).unwrap().amount, dec("50"));
}

#[test]
fn deleting_a_payment_restores_the_debt() {
    let mut svc = service();
    let debt = card(&mut svc, "900");
    let paid = svc.create_transaction(&payment(&debt, "150.25", "2024-05-01")).unwrap();
    assert_eq!(svc.get_debt(&debt).unwrap().amount, dec("749.75"));

    let outcome = svc
        .dispatch(Request::DeleteTransaction { id: paid[0].id.clone() })
        .unwrap();
    assert!(matches!(outcome, Outcome::Deleted(t) if t.id == paid[0].id));
    assert_eq!(svc.get_debt(&debt).unwrap().amount, dec("900"));
}

#[test]
fn editing_a_payment_moves_its_effect() {
    let mut svc = service();
    let first = card(&mut svc, "500");
    let second = card(&mut svc, "800");
    let paid = svc.create_transaction(&payment(&first, "100", "2024-05-01")).unwrap();

    let mut fields = payment(&second, "40", "2024-05-02");
    fields.title = "Moved payment".into();
    let updated = svc
        .update_transaction(&UpdateTransactionRequest {
            id: paid[0].id.clone(),
            fields,
        })
        .unwrap();

    assert_eq!(updated.debt_id.as_deref(), Some(second.as_str()));
    assert_eq!(svc.get_debt(&first).unwrap().amount, dec("500"));
    assert_eq!(svc.get_debt(&second).unwrap().amount, dec("760"));
}

#[test]
fn charge_raises_outstanding_amount() {
    let mut svc = service();
    let debt = card(&mut svc, "10.50");
    let outcome = svc
        .dispatch(Request::ChargeDebt(ChargeDebtRequest {
            id: debt.clone(),
            amount: dec("89.50"),
        }))
        .unwrap();
    let Outcome::Debt(d) = outcome else {
        panic!("expected debt outcome");
    };
    assert_eq!(d.amount, dec("100.00"));

    let negative = svc.charge_debt(&ChargeDebtRequest {
        id: debt.clone(),
        amount: dec("-5"),
    });
    assert!(negative.unwrap_err().is_validation());
    assert_eq!(svc.get_debt(&debt).unwrap().amount, dec("100.00"));
}

#[test]
fn referenced_debt_cannot_be_deleted() {
    let mut svc = service();
    let debt = card(&mut svc, "300");
    let paid = svc.create_transaction(&payment(&debt, "30", "2024-06-01")).unwrap();

    let err = svc.delete_debt(&debt).unwrap_err();
    assert!(err.is_validation(), "{err}");
    assert!(svc.get_debt(&debt).is_ok());

    svc.delete_transaction(&paid[0].id).unwrap();
    let removed = svc.delete_debt(&debt).unwrap();
    assert_eq!(removed.id, debt);
    assert!(svc.get_debt(&debt).unwrap_err().is_not_found());
    assert!(svc.list_debts().unwrap().is_empty());
}

#[test]
fn debt_requests_validate_title_and_cents() {
    let mut svc = service();
    let blank = svc.create_debt(&CreateDebtRequest {
        title: "   ".into(),
        amount: dec("1"),
        r#type: DebtType::Loan,
        notes: String::new(),
    });
    assert!(blank.unwrap_err().is_validation());

    let fractional = svc.create_debt(&CreateDebtRequest {
        title: "Car".into(),
        amount: dec("1.005"),
        r#type: DebtType::Loan,
        notes: String::new(),
    });
    assert!(fractional.unwrap_err().is_validation());
    assert!(svc.list_debts().unwrap().is_empty());
}

#[test]
fn retyping_a_payment_drops_its_debt_link() {
    let mut svc = service();
    let debt = card(&mut svc, "400");
    let paid = svc.create_transaction(&payment(&debt, "25", "2024-07-01")).unwrap();
    assert_eq!(svc.get_debt(&debt).unwrap().amount, dec("375"));

    let matches = cli::build_cli().get_matches_from([
        "balancebook", "tx", "edit", paid[0].id.as_str(), "--type", "expense",
    ]);
    let Some(("tx", m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    transactions::handle(&mut svc, m).unwrap();

    let edited = svc.get_transaction(&paid[0].id).unwrap();
    assert_eq!(edited.r#type, TransactionType::Expense);
    assert_eq!(edited.debt_id, None);
    assert_eq!(svc.get_debt(&debt).unwrap().amount, dec("400"));
}
