// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::ledger::{fixed, income, summary};
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
    conn.execute(
        "INSERT INTO users(username, email, password_hash) VALUES('yessica','yessica@expenses.com','x')",
        [],
    )
    .unwrap();
    conn
}

fn insert_income(conn: &Connection, usd: &str, wallet: &str, date: &str) {
    conn.execute(
        "INSERT INTO income(user_id, name, amount_cop, exchange_rate, amount_usd, date, payment_source)
         VALUES (1, 'Income 1 (Rafael)', '10120000', '4400', ?1, ?2, ?3)",
        rusqlite::params![usd, date, wallet],
    )
    .unwrap();
}

fn insert_expense(conn: &Connection, user_id: i64, amount: &str, wallet: &str, date: &str) {
    conn.execute(
        "INSERT INTO expenses(user_id, amount, category_id, description, date, payment_source)
         VALUES (?1, ?2, (SELECT id FROM expense_categories WHERE name='Groceries'), 'test', ?3, ?4)",
        rusqlite::params![user_id, amount, date, wallet],
    )
    .unwrap();
}

#[test]
fn wallet_balance_is_income_minus_expenses() {
    let conn = setup();
    insert_income(&conn, "2300.00", "Rafael", "2025-08-25");
    insert_expense(&conn, 1, "1800.50", "Rafael", "2025-08-26");

    let b = summary::wallet_balance(&conn, Wallet::Rafael).unwrap();
    assert_eq!(format!("{:.2}", b.balance), "499.50");
    assert_eq!(format!("{:.2}", b.income), "2300.00");
    assert_eq!(format!("{:.2}", b.expenses), "1800.50");
}

#[test]
fn wallet_balance_spans_users_but_not_wallets() {
    let conn = setup();
    insert_income(&conn, "100.00", "Rafael", "2025-08-01");
    // recorded by the other user, same wallet: still counts
    conn.execute(
        "INSERT INTO income(user_id, name, amount_cop, exchange_rate, amount_usd, date, payment_source)
         VALUES (2, 'Extra', '0', '4200', '50.00', '2025-08-02', 'Rafael')",
        [],
    )
    .unwrap();
    insert_expense(&conn, 2, "30.00", "Jessica", "2025-08-03");

    let rafael = summary::wallet_balance(&conn, Wallet::Rafael).unwrap();
    assert_eq!(format!("{:.2}", rafael.balance), "150.00");
    let jessica = summary::wallet_balance(&conn, Wallet::Jessica).unwrap();
    assert_eq!(format!("{:.2}", jessica.balance), "-30.00");
}

#[test]
fn expected_income_zero_on_or_after_pay_day() {
    let rate = Decimal::from(4500);
    let before = NaiveDate::from_ymd_opt(2025, 8, 19).unwrap();
    let on = NaiveDate::from_ymd_opt(2025, 8, 20).unwrap();
    let after = NaiveDate::from_ymd_opt(2025, 8, 26).unwrap();

    assert!(summary::expected_income(Wallet::Jessica, before, rate).unwrap() > Decimal::ZERO);
    assert_eq!(
        summary::expected_income(Wallet::Jessica, on, rate).unwrap(),
        Decimal::ZERO
    );
    assert_eq!(
        summary::expected_income(Wallet::Rafael, after, rate).unwrap(),
        Decimal::ZERO
    );
}

#[test]
fn expected_income_applies_the_conversion_rule() {
    let rate = Decimal::from(4500);
    let today = NaiveDate::from_ymd_opt(2025, 8, 10).unwrap();
    let expected = summary::expected_income(Wallet::Rafael, today, rate).unwrap();
    let calc = income::compute_income(
        Wallet::Rafael.multiplier(),
        Decimal::from(income::DEFAULT_THRESHOLD),
        rate,
    )
    .unwrap();
    assert_eq!(expected, calc.amount_usd);
    assert_eq!(format!("{:.2}", expected.round_dp(2)), "2248.89");

    // falling rate floors at the threshold
    let floored = summary::expected_income(Wallet::Jessica, today, Decimal::from(4100)).unwrap();
    assert_eq!(format!("{:.2}", floored.round_dp(2)), "3000.00");
}

#[test]
fn fixed_totals_partition_by_paid_state() {
    let mut conn = setup();
    fixed::seed_defaults(&mut conn, 1, "2025-08").unwrap();
    let internet: i64 = conn
        .query_row(
            "SELECT id FROM fixed_expenses WHERE user_id=1 AND name='Internet' AND month='2025-08'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    fixed::set_paid(
        &mut conn,
        internet,
        true,
        None,
        Wallet::Rafael,
        NaiveDate::from_ymd_opt(2025, 8, 30).unwrap(),
    )
    .unwrap();

    let totals = summary::fixed_liability_totals(&conn, 1, "2025-08").unwrap();
    // catalog total: 100+15+25+20+26+490+300+15000+45000+100
    assert_eq!(format!("{:.2}", totals.total), "61076.00");
    assert_eq!(format!("{:.2}", totals.paid), "25.00");
    assert_eq!(format!("{:.2}", totals.pending), "61051.00");
    assert_eq!(totals.paid_count, 1);
    assert_eq!(totals.pending_count, 9);
}

#[test]
fn fixed_totals_empty_month_is_zero() {
    let conn = setup();
    let totals = summary::fixed_liability_totals(&conn, 1, "2030-01").unwrap();
    assert!(totals.total.is_zero());
    assert_eq!(totals.paid_count + totals.pending_count, 0);
}

#[test]
fn actual_income_sums_only_the_wallet_and_month() {
    let conn = setup();
    insert_income(&conn, "2300.00", "Rafael", "2025-08-25");
    insert_income(&conn, "99.00", "Rafael", "2025-07-25");
    insert_income(&conn, "500.00", "Jessica", "2025-08-20");

    let total = summary::actual_income_for_month(&conn, Wallet::Rafael, "2025-08").unwrap();
    assert_eq!(format!("{:.2}", total), "2300.00");
}

#[test]
fn spend_by_category_sorts_largest_first() {
    let conn = setup();
    insert_expense(&conn, 1, "10.00", "Rafael", "2025-08-01");
    conn.execute(
        "INSERT INTO expenses(user_id, amount, category_id, description, date, payment_source)
         VALUES (1, '75.00', (SELECT id FROM expense_categories WHERE name='Uber'), 'rides', '2025-08-02', 'Rafael')",
        [],
    )
    .unwrap();

    let items = summary::spend_by_category(&conn, 1, "2025-08").unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].0, "Uber");
    assert_eq!(format!("{:.2}", items[0].1), "75.00");
    assert_eq!(items[1].0, "Groceries");
}

#[test]
fn month_events_scope_income_by_wallet_and_expenses_by_user() {
    let conn = setup();
    insert_income(&conn, "2300.00", "Rafael", "2025-08-25");
    insert_expense(&conn, 1, "40.00", "Rafael", "2025-08-10");
    // another user's expense stays out of user 1's listing
    insert_expense(&conn, 2, "55.00", "Jessica", "2025-08-11");

    let events = summary::month_events(&conn, 1, "2025-08").unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].date, NaiveDate::from_ymd_opt(2025, 8, 10).unwrap());
    assert!(matches!(events[0].kind, summary::EventKind::Expense));
    assert_eq!(events[1].date, NaiveDate::from_ymd_opt(2025, 8, 25).unwrap());
    assert!(matches!(events[1].kind, summary::EventKind::Income));
}
