// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use super::stored_decimal;
use crate::error::{LedgerError, LedgerResult};
use crate::models::ExchangeRate;

/// USD/COP rate assumed when no active row exists yet.
pub const FALLBACK_RATE: i64 = 4200;

/// Rate value of the single active exchange-rate row, most recent by date;
/// [`FALLBACK_RATE`] when the table holds no active row.
pub fn current_rate(conn: &Connection) -> LedgerResult<Decimal> {
    let row: Option<String> = conn
        .query_row(
            "SELECT rate FROM exchange_rates WHERE is_active=1 ORDER BY date DESC LIMIT 1",
            [],
            |r| r.get(0),
        )
        .optional()?;
    match row {
        Some(s) => stored_decimal(&s, "exchange rate"),
        None => Ok(Decimal::from(FALLBACK_RATE)),
    }
}

/// Insert a new rate and make it the active one. The deactivate-then-insert
/// pair runs in one transaction; the partial unique index on `is_active`
/// makes a second active row impossible even outside this path.
pub fn set_rate(
    conn: &mut Connection,
    rate: Decimal,
    date: NaiveDate,
    notes: Option<&str>,
) -> LedgerResult<i64> {
    if rate <= Decimal::ZERO {
        return Err(LedgerError::Validation(format!(
            "Exchange rate must be positive, got {}",
            rate
        )));
    }
    let tx = conn.transaction()?;
    tx.execute("UPDATE exchange_rates SET is_active=0 WHERE is_active=1", [])?;
    tx.execute(
        "INSERT INTO exchange_rates(rate, date, is_active, notes) VALUES (?1, ?2, 1, ?3)",
        params![rate.to_string(), date.to_string(), notes],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    Ok(id)
}

/// Re-activate an existing rate row by id, deactivating every other row in
/// the same transaction.
pub fn activate(conn: &mut Connection, rate_id: i64) -> LedgerResult<()> {
    let tx = conn.transaction()?;
    let exists: Option<i64> = tx
        .query_row(
            "SELECT id FROM exchange_rates WHERE id=?1",
            params![rate_id],
            |r| r.get(0),
        )
        .optional()?;
    if exists.is_none() {
        return Err(LedgerError::Validation(format!(
            "Exchange rate {} not found",
            rate_id
        )));
    }
    tx.execute("UPDATE exchange_rates SET is_active=0 WHERE is_active=1", [])?;
    tx.execute(
        "UPDATE exchange_rates SET is_active=1 WHERE id=?1",
        params![rate_id],
    )?;
    tx.commit()?;
    Ok(())
}

pub fn list(conn: &Connection) -> LedgerResult<Vec<ExchangeRate>> {
    let mut stmt = conn.prepare(
        "SELECT id, rate, date, is_active, notes FROM exchange_rates
         ORDER BY date DESC, created_at DESC",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let rate_s: String = r.get(1)?;
        let date_s: String = r.get(2)?;
        out.push(ExchangeRate {
            id: r.get(0)?,
            rate: stored_decimal(&rate_s, "exchange rate")?,
            date: NaiveDate::parse_from_str(&date_s, "%Y-%m-%d")
                .map_err(|_| LedgerError::Invariant(format!("unparseable date '{}'", date_s)))?,
            is_active: r.get::<_, i64>(3)? != 0,
            notes: r.get(4)?,
        });
    }
    Ok(out)
}
