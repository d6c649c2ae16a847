// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::rates;
use crate::utils::{http_client, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::Connection;
use serde::Deserialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let rate = parse_decimal(sub.get_one::<String>("rate").unwrap())?;
            let date = match sub.get_one::<String>("date") {
                Some(d) => parse_date(d)?,
                None => Utc::now().date_naive(),
            };
            let notes = sub.get_one::<String>("notes").map(|s| s.as_str());
            let id = rates::set_rate(conn, rate, date, notes)?;
            println!("Exchange rate {} activated (id {})", rate, id);
        }
        Some(("activate", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            rates::activate(conn, id)?;
            println!("Exchange rate {} activated", id);
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let all = rates::list(conn)?;
            if !maybe_print_json(json_flag, jsonl_flag, &all)? {
                let rows = all
                    .iter()
                    .map(|r| {
                        vec![
                            r.id.to_string(),
                            format!("{:.2}", r.rate.round_dp(2)),
                            r.date.to_string(),
                            if r.is_active { "active" } else { "" }.to_string(),
                            r.notes.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Rate", "Date", "Status", "Notes"], rows)
                );
            }
        }
        Some(("current", _)) => {
            let rate = rates::current_rate(conn)?;
            println!("Current USD/COP rate: {:.2}", rate.round_dp(2));
        }
        Some(("fetch", sub)) => fetch_rate(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct Latest {
    date: String,
    rates: std::collections::HashMap<String, f64>,
}

fn fetch_rate(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let url = "https://api.frankfurter.dev/latest?from=USD&to=COP";
    let client = http_client()?;
    let resp = client.get(url).send()?.error_for_status()?;
    let latest: Latest = resp.json()?;
    let cop = latest
        .rates
        .get("COP")
        .context("Frankfurter response has no COP rate")?;
    println!("USD/COP {} as of {}", cop, latest.date);
    if sub.get_flag("activate") {
        let rate = parse_decimal(&cop.to_string())?;
        let date = parse_date(&latest.date)?;
        let id = rates::set_rate(conn, rate, date, Some("frankfurter"))?;
        println!("Stored and activated (id {})", id);
    }
    Ok(())
}
