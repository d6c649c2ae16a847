// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{fmt_usd, id_for_user, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("update", sub)) => update(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = conn.execute("DELETE FROM assets WHERE id=?1", params![id])?;
            if n == 0 {
                anyhow::bail!("Asset {} not found", id);
            }
            println!("Removed asset {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let name = sub.get_one::<String>("name").unwrap();
    let r#type = sub.get_one::<String>("type");
    let value = parse_decimal(sub.get_one::<String>("value").unwrap())?;
    let description = sub.get_one::<String>("description");
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Utc::now().date_naive(),
    };
    conn.execute(
        "INSERT INTO assets(user_id, name, type, value, description, date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user_id,
            name,
            r#type,
            format!("{:.2}", value.round_dp(2)),
            description,
            date.to_string()
        ],
    )?;
    println!("Added asset '{}' valued {}", name, value);
    Ok(())
}

fn update(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut sets: Vec<&str> = Vec::new();
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(name) = sub.get_one::<String>("name") {
        sets.push("name=?");
        params_vec.push(name.clone());
    }
    if let Some(t) = sub.get_one::<String>("type") {
        sets.push("type=?");
        params_vec.push(t.clone());
    }
    if let Some(v) = sub.get_one::<String>("value") {
        sets.push("value=?");
        params_vec.push(format!("{:.2}", parse_decimal(v)?.round_dp(2)));
    }
    if let Some(d) = sub.get_one::<String>("description") {
        sets.push("description=?");
        params_vec.push(d.clone());
    }
    if let Some(d) = sub.get_one::<String>("date") {
        sets.push("date=?");
        params_vec.push(parse_date(d)?.to_string());
    }
    if sets.is_empty() {
        anyhow::bail!("Nothing to update for asset {}", id);
    }
    let sql = format!("UPDATE assets SET {} WHERE id=?", sets.join(", "));
    params_vec.push(id.to_string());
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let n = conn.execute(&sql, rusqlite::params_from_iter(params))?;
    if n == 0 {
        anyhow::bail!("Asset {} not found", id);
    }
    println!("Updated asset {}", id);
    Ok(())
}

#[derive(Serialize)]
pub struct AssetRow {
    pub id: i64,
    pub name: String,
    pub r#type: String,
    pub value: String,
    pub description: String,
    pub date: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let mut stmt = conn.prepare(
        "SELECT id, name, IFNULL(type,''), value, IFNULL(description,''), date
         FROM assets WHERE user_id=?1 ORDER BY date DESC, created_at DESC",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut data = Vec::new();
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let value_s: String = r.get(3)?;
        total += crate::utils::parse_decimal(&value_s)?;
        data.push(AssetRow {
            id: r.get(0)?,
            name: r.get(1)?,
            r#type: r.get(2)?,
            value: value_s,
            description: r.get(4)?,
            date: r.get(5)?,
        });
    }
    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.name.clone(),
                a.r#type.clone(),
                a.value.clone(),
                a.description.clone(),
                a.date.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Name", "Type", "Value", "Description", "Date"], rows)
    );
    println!("Net value: {}", fmt_usd(&total));
    Ok(())
}
