// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::income;
use crate::models::Wallet;
use crate::utils::{id_for_user, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("add-extra", sub)) => add_extra(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let wallet: Wallet = sub.get_one::<String>("wallet").unwrap().parse()?;
    let threshold = match sub.get_one::<String>("threshold") {
        Some(t) => parse_decimal(t)?,
        None => rust_decimal::Decimal::from(income::DEFAULT_THRESHOLD),
    };
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Utc::now().date_naive(),
    };
    let (_, calc) = income::record_standard(conn, user_id, wallet, threshold, date)?;
    println!(
        "Recorded {} on {}: {} COP -> {} USD (rate {})",
        wallet.income_name(),
        date,
        calc.amount_cop,
        calc.amount_usd,
        calc.rate_used
    );
    Ok(())
}

fn add_extra(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let name = sub.get_one::<String>("name").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let wallet: Wallet = sub.get_one::<String>("wallet").unwrap().parse()?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Utc::now().date_naive(),
    };
    income::record_extra(conn, user_id, name, amount, wallet, date)?;
    println!("Recorded extra income '{}': {} USD ({})", name, amount, wallet);
    Ok(())
}

#[derive(Serialize)]
pub struct IncomeRow {
    pub date: String,
    pub name: String,
    pub amount_cop: String,
    pub rate: String,
    pub amount_usd: String,
    pub wallet: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.name.clone(),
                    r.amount_cop.clone(),
                    r.rate.clone(),
                    r.amount_usd.clone(),
                    r.wallet.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Name", "COP", "Rate", "USD", "Wallet"], rows)
        );
    }
    Ok(())
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<IncomeRow>> {
    let mut sql = String::from(
        "SELECT date, name, amount_cop, exchange_rate, amount_usd, payment_source
         FROM income WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(wallet) = sub.get_one::<String>("wallet") {
        let wallet: Wallet = wallet.parse()?;
        sql.push_str(" AND payment_source=?");
        params_vec.push(wallet.as_str().into());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(IncomeRow {
            date: r.get(0)?,
            name: r.get(1)?,
            amount_cop: r.get(2)?,
            rate: r.get(3)?,
            amount_usd: r.get(4)?,
            wallet: r.get(5)?,
        });
    }
    Ok(data)
}
