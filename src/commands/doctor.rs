// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use regex::Regex;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) More than one active exchange rate (impossible once the partial
    // unique index exists; databases created before it may still carry it)
    let active: i64 = conn.query_row(
        "SELECT COUNT(*) FROM exchange_rates WHERE is_active=1",
        [],
        |r| r.get(0),
    )?;
    if active > 1 {
        rows.push(vec![
            "multiple_active_rates".into(),
            format!("{} rows active", active),
        ]);
    }

    // 2) Paid liabilities with no synthetic expense
    let mut stmt = conn.prepare(
        "SELECT fe.id, fe.name, fe.month FROM fixed_expenses fe
         WHERE fe.is_paid=1 AND NOT EXISTS (
            SELECT 1 FROM expenses e
            WHERE e.source_liability_id=fe.id AND e.source_month=fe.month)",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let name: String = r.get(1)?;
        let month: String = r.get(2)?;
        rows.push(vec![
            "paid_without_expense".into(),
            format!("liability {} '{}' ({})", id, name, month),
        ]);
    }

    // 3) Synthetic expenses pointing at missing or unpaid liabilities
    let mut stmt = conn.prepare(
        "SELECT e.id, e.source_liability_id FROM expenses e
         LEFT JOIN fixed_expenses fe ON e.source_liability_id=fe.id
         WHERE e.source_liability_id IS NOT NULL AND (fe.id IS NULL OR fe.is_paid=0)",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let liab: Option<i64> = r.get(1)?;
        rows.push(vec![
            "stale_synthetic_expense".into(),
            format!("expense {} -> liability {:?}", id, liab),
        ]);
    }

    // 4) Duplicate synthetic rows per liability-month
    let mut stmt = conn.prepare(
        "SELECT source_liability_id, source_month, COUNT(*) FROM expenses
         WHERE source_liability_id IS NOT NULL
         GROUP BY source_liability_id, source_month HAVING COUNT(*) > 1",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let liab: i64 = r.get(0)?;
        let month: String = r.get(1)?;
        let n: i64 = r.get(2)?;
        rows.push(vec![
            "duplicate_synthetic_expense".into(),
            format!("liability {} ({}): {} rows", liab, month, n),
        ]);
    }

    // 5) Unlinked rows still using the legacy description convention
    let legacy = Regex::new(r"^Fixed Expense: .+ \(\d{4}-\d{2}\)$")?;
    let mut stmt = conn.prepare(
        "SELECT id, description FROM expenses
         WHERE source_liability_id IS NULL AND description IS NOT NULL",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let desc: String = r.get(1)?;
        if legacy.is_match(&desc) {
            rows.push(vec![
                "legacy_fixed_description".into(),
                format!("expense {} '{}' has no liability link", id, desc),
            ]);
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
