// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::ledger::{income, rates};
use billfold::models::Wallet;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    billfold::db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO users(username, email, password_hash) VALUES('rafael','rafael@expenses.com','x')",
        [],
    )
    .unwrap();
    conn
}

#[test]
fn floor_threshold_protects_against_falling_rate() {
    // rate below the threshold: the threshold is used instead
    let calc = income::compute_income(2300, Decimal::from(4400), Decimal::from(4100)).unwrap();
    assert_eq!(calc.amount_cop, Decimal::from(10_120_000));
    assert_eq!(calc.rate_used, Decimal::from(4400));
    assert_eq!(format!("{:.2}", calc.amount_usd.round_dp(2)), "2300.00");
}

#[test]
fn live_rate_used_at_or_above_threshold() {
    let calc = income::compute_income(2300, Decimal::from(4400), Decimal::from(4500)).unwrap();
    assert_eq!(calc.rate_used, Decimal::from(4500));
    assert_eq!(format!("{:.2}", calc.amount_usd.round_dp(2)), "2248.89");
}

#[test]
fn equal_rate_and_threshold_takes_live_branch() {
    let calc = income::compute_income(3000, Decimal::from(4400), Decimal::from(4400)).unwrap();
    assert_eq!(calc.rate_used, Decimal::from(4400));
    assert_eq!(format!("{:.2}", calc.amount_usd.round_dp(2)), "3000.00");
}

#[test]
fn nonpositive_threshold_rejected() {
    let err = income::compute_income(2300, Decimal::ZERO, Decimal::from(4100)).unwrap_err();
    assert!(matches!(err, billfold::error::LedgerError::Validation(_)));
}

#[test]
fn record_standard_persists_breakdown() {
    let mut conn = setup();
    rates::set_rate(
        &mut conn,
        Decimal::from(4500),
        NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        None,
    )
    .unwrap();

    let (id, calc) = income::record_standard(
        &conn,
        1,
        Wallet::Rafael,
        Decimal::from(4400),
        NaiveDate::from_ymd_opt(2025, 8, 25).unwrap(),
    )
    .unwrap();
    assert_eq!(format!("{:.2}", calc.amount_usd), "2248.89");

    let (name, cop, rate, usd, wallet): (String, String, String, String, String) = conn
        .query_row(
            "SELECT name, amount_cop, exchange_rate, amount_usd, payment_source FROM income WHERE id=?1",
            [id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
        )
        .unwrap();
    assert_eq!(name, "Income 1 (Rafael)");
    assert_eq!(cop, "10120000");
    assert_eq!(rate, "4500");
    assert_eq!(usd, "2248.89");
    assert_eq!(wallet, "Rafael");
}

#[test]
fn record_extra_stores_zero_cop_and_current_rate() {
    let conn = setup();
    // no active rate: the fallback is recorded for reference
    let id = income::record_extra(
        &conn,
        1,
        "Freelance",
        Decimal::new(35050, 2),
        Wallet::Jessica,
        NaiveDate::from_ymd_opt(2025, 8, 5).unwrap(),
    )
    .unwrap();
    let (cop, rate, usd): (String, String, String) = conn
        .query_row(
            "SELECT amount_cop, exchange_rate, amount_usd FROM income WHERE id=?1",
            [id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap();
    assert_eq!(cop, "0");
    assert_eq!(rate, "4200");
    assert_eq!(usd, "350.50");
}

#[test]
fn list_limit_and_wallet_filter_respected() {
    let conn = setup();
    for day in 1..=3 {
        conn.execute(
            "INSERT INTO income(user_id, name, amount_cop, exchange_rate, amount_usd, date, payment_source)
             VALUES (1, 'Extra', '0', '4200', '10.00', ?1, 'Rafael')",
            [format!("2025-08-0{}", day)],
        )
        .unwrap();
    }
    conn.execute(
        "INSERT INTO income(user_id, name, amount_cop, exchange_rate, amount_usd, date, payment_source)
         VALUES (1, 'Extra', '0', '4200', '10.00', '2025-08-04', 'Jessica')",
        [],
    )
    .unwrap();

    let cli = billfold::cli::build_cli();
    let matches = cli.get_matches_from([
        "billfold", "income", "list", "--wallet", "rafael", "--limit", "2",
    ]);
    if let Some(("income", income_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = income_m.subcommand() {
            let rows = billfold::commands::income::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-08-03");
            assert!(rows.iter().all(|r| r.wallet == "Rafael"));
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no income subcommand");
    }
}

#[test]
fn record_extra_rejects_blank_name_and_nonpositive_amount() {
    let conn = setup();
    let date = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
    assert!(income::record_extra(&conn, 1, "  ", Decimal::ONE, Wallet::Rafael, date).is_err());
    assert!(
        income::record_extra(&conn, 1, "Bonus", Decimal::ZERO, Wallet::Rafael, date).is_err()
    );
}

#[test]
fn unknown_user_surfaces_as_constraint_violation() {
    let conn = setup();
    let err = income::record_extra(
        &conn,
        999,
        "Bonus",
        Decimal::ONE,
        Wallet::Rafael,
        NaiveDate::from_ymd_opt(2025, 8, 5).unwrap(),
    )
    .unwrap_err();
    assert!(err.is_constraint_violation());
}
