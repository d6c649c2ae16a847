// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => export_expenses(conn, sub),
        Some(("income", sub)) => export_income(conn, sub),
        _ => Ok(()),
    }
}

fn export_expenses(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT e.date, u.username, e.amount, c.name as category, e.description,
                e.payment_source, e.source_liability_id, e.source_month
         FROM expenses e
         LEFT JOIN users u ON e.user_id=u.id
         LEFT JOIN expense_categories c ON e.category_id=c.id
         ORDER BY e.date, e.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, Option<i64>>(6)?,
            r.get::<_, Option<String>>(7)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "user",
                "amount",
                "category",
                "description",
                "wallet",
                "source_liability_id",
                "source_month",
            ])?;
            for row in rows {
                let (d, u, amt, cat, desc, wal, liab, sm) = row?;
                wtr.write_record([
                    d,
                    u,
                    amt,
                    cat.unwrap_or_default(),
                    desc.unwrap_or_default(),
                    wal,
                    liab.map(|v| v.to_string()).unwrap_or_default(),
                    sm.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, u, amt, cat, desc, wal, liab, sm) = row?;
                items.push(json!({
                    "date": d, "user": u, "amount": amt, "category": cat,
                    "description": desc, "wallet": wal,
                    "source_liability_id": liab, "source_month": sm
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported expenses to {}", out);
    Ok(())
}

fn export_income(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT i.date, u.username, i.name, i.amount_cop, i.exchange_rate, i.amount_usd,
                i.payment_source
         FROM income i LEFT JOIN users u ON i.user_id=u.id
         ORDER BY i.date, i.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "user",
                "name",
                "amount_cop",
                "exchange_rate",
                "amount_usd",
                "wallet",
            ])?;
            for row in rows {
                let (d, u, n, cop, rate, usd, wal) = row?;
                wtr.write_record([d, u, n, cop, rate, usd, wal])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, u, n, cop, rate, usd, wal) = row?;
                items.push(json!({
                    "date": d, "user": u, "name": n, "amount_cop": cop,
                    "exchange_rate": rate, "amount_usd": usd, "wallet": wal
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported income to {}", out);
    Ok(())
}
