// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Wallet;
use crate::utils::{
    id_for_category, id_for_user, maybe_print_json, parse_date, parse_decimal, pretty_table,
};
use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount <= rust_decimal::Decimal::ZERO {
        anyhow::bail!("Expense amount must be positive, got {}", amount);
    }
    let category_id = id_for_category(conn, sub.get_one::<String>("category").unwrap())?;
    let description = sub.get_one::<String>("description");
    let wallet: Wallet = sub.get_one::<String>("wallet").unwrap().parse()?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Utc::now().date_naive(),
    };
    conn.execute(
        "INSERT INTO expenses(user_id, amount, category_id, description, date, payment_source)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user_id,
            format!("{:.2}", amount.round_dp(2)),
            category_id,
            description,
            date.to_string(),
            wallet.as_str()
        ],
    )?;
    println!("Recorded expense {} USD on {} ({})", amount, date, wallet);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let synthetic: Option<i64> = conn
        .query_row(
            "SELECT source_liability_id FROM expenses WHERE id=?1",
            params![id],
            |r| r.get(0),
        )
        .optional()?
        .flatten();
    if synthetic.is_some() {
        anyhow::bail!(
            "Expense {} is a fixed-liability payment; unpay the liability instead",
            id
        );
    }
    let n = conn.execute("DELETE FROM expenses WHERE id=?1", params![id])?;
    if n == 0 {
        anyhow::bail!("Expense {} not found", id);
    }
    println!("Removed expense {}", id);
    Ok(())
}

#[derive(Serialize)]
pub struct ExpenseRow {
    pub id: i64,
    pub date: String,
    pub amount: String,
    pub category: String,
    pub description: String,
    pub wallet: String,
    pub fixed: bool,
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
                    r.id.to_string(),
                    r.date.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    if r.fixed { "fixed" } else { "regular" }.to_string(),
                    r.description.clone(),
                    r.wallet.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Amount", "Category", "Type", "Description", "Wallet"],
                rows,
            )
        );
    }
    Ok(())
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<ExpenseRow>> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let mut sql = String::from(
        "SELECT e.id, e.date, e.amount, c.name, e.description, e.payment_source,
                e.source_liability_id IS NOT NULL
         FROM expenses e LEFT JOIN expense_categories c ON e.category_id=c.id
         WHERE e.user_id=?",
    );
    let mut params_vec: Vec<String> = vec![user_id.to_string()];

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(e.date,1,7)=?");
        params_vec.push(month.into());
    }
    match sub.get_one::<String>("filter").map(|s| s.as_str()) {
        Some("fixed") => sql.push_str(" AND e.source_liability_id IS NOT NULL"),
        Some("regular") => sql.push_str(" AND e.source_liability_id IS NULL"),
        _ => {}
    }
    sql.push_str(" ORDER BY e.date DESC, e.id DESC");
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
        let category: Option<String> = r.get(3)?;
        let description: Option<String> = r.get(4)?;
        data.push(ExpenseRow {
            id: r.get(0)?,
            date: r.get(1)?,
            amount: r.get(2)?,
            category: category.unwrap_or_default(),
            description: description.unwrap_or_default(),
            wallet: r.get(5)?,
            fixed: r.get::<_, i64>(6)? != 0,
        });
    }
    Ok(data)
}
