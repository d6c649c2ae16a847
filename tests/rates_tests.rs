// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::ledger::rates;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    billfold::db::init_schema(&mut conn).unwrap();
    conn
}

fn active_count(conn: &Connection) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM exchange_rates WHERE is_active=1",
        [],
        |r| r.get(0),
    )
    .unwrap()
}

#[test]
fn fallback_when_no_active_rate() {
    let conn = setup();
    assert_eq!(rates::current_rate(&conn).unwrap(), Decimal::from(4200));
}

#[test]
fn set_rate_deactivates_previous() {
    let mut conn = setup();
    let d = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
    rates::set_rate(&mut conn, Decimal::from(4100), d, Some("first")).unwrap();
    rates::set_rate(&mut conn, Decimal::from(4350), d.succ_opt().unwrap(), None).unwrap();
    assert_eq!(active_count(&conn), 1);
    assert_eq!(rates::current_rate(&conn).unwrap(), Decimal::from(4350));
}

#[test]
fn activate_old_rate_leaves_one_active() {
    let mut conn = setup();
    let d = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
    let first = rates::set_rate(&mut conn, Decimal::from(4100), d, None).unwrap();
    rates::set_rate(&mut conn, Decimal::from(4350), d.succ_opt().unwrap(), None).unwrap();
    rates::activate(&mut conn, first).unwrap();
    assert_eq!(active_count(&conn), 1);
    assert_eq!(rates::current_rate(&conn).unwrap(), Decimal::from(4100));
}

#[test]
fn activate_unknown_id_is_a_validation_error() {
    let mut conn = setup();
    let err = rates::activate(&mut conn, 99).unwrap_err();
    assert!(matches!(err, billfold::error::LedgerError::Validation(_)));
    assert_eq!(active_count(&conn), 0);
}

#[test]
fn nonpositive_rate_rejected() {
    let mut conn = setup();
    let d = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
    assert!(rates::set_rate(&mut conn, Decimal::ZERO, d, None).is_err());
    assert!(rates::set_rate(&mut conn, Decimal::from(-10), d, None).is_err());
    assert_eq!(active_count(&conn), 0);
}

#[test]
fn at_most_one_active_after_any_sequence() {
    let mut conn = setup();
    let d = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let mut ids = Vec::new();
    for i in 0..5i64 {
        let id = rates::set_rate(
            &mut conn,
            Decimal::from(4000 + i * 50),
            d + chrono::Duration::days(i),
            None,
        )
        .unwrap();
        ids.push(id);
        assert_eq!(active_count(&conn), 1);
    }
    for id in ids {
        rates::activate(&mut conn, id).unwrap();
        assert_eq!(active_count(&conn), 1);
    }
}

#[test]
fn current_rate_prefers_most_recent_active_date() {
    let mut conn = setup();
    // a lone active row wins regardless of newer inactive rows
    let d = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
    let first = rates::set_rate(&mut conn, Decimal::from(4250), d, None).unwrap();
    rates::set_rate(&mut conn, Decimal::from(4500), d.succ_opt().unwrap(), None).unwrap();
    rates::activate(&mut conn, first).unwrap();
    assert_eq!(rates::current_rate(&conn).unwrap(), Decimal::from(4250));
}

#[test]
fn list_orders_newest_first_and_flags_active() {
    let mut conn = setup();
    let d = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
    rates::set_rate(&mut conn, Decimal::from(4100), d, Some("old")).unwrap();
    rates::set_rate(&mut conn, Decimal::from(4350), d.succ_opt().unwrap(), None).unwrap();
    let all = rates::list(&conn).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].rate, Decimal::from(4350));
    assert!(all[0].is_active);
    assert!(!all[1].is_active);
    assert_eq!(all[1].notes.as_deref(), Some("old"));
}
