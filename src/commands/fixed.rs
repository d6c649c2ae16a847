// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{fixed, summary};
use crate::models::Wallet;
use crate::utils::{
    fmt_usd, id_for_user, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table,
};
use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("init", sub)) => {
            let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
            let month = parse_month(sub.get_one::<String>("month").unwrap())?;
            let inserted = fixed::seed_defaults(conn, user_id, &month)?;
            println!("Fixed expenses initialized for {} ({} added)", month, inserted);
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("pay", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let amount = match sub.get_one::<String>("amount") {
                Some(a) => Some(parse_decimal(a)?),
                None => None,
            };
            let wallet: Wallet = sub.get_one::<String>("wallet").unwrap().parse()?;
            let date = match sub.get_one::<String>("date") {
                Some(d) => parse_date(d)?,
                None => Utc::now().date_naive(),
            };
            fixed::set_paid(conn, id, true, amount, wallet, date)?;
            println!("Liability {} marked paid ({})", id, wallet);
        }
        Some(("unpay", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            // wallet/date are irrelevant for the unpaid transition
            fixed::set_paid(conn, id, false, None, Wallet::Rafael, Utc::now().date_naive())?;
            println!("Liability {} marked unpaid", id);
        }
        Some(("reset", sub)) => {
            let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
            let month = parse_month(sub.get_one::<String>("month").unwrap())?;
            let n = fixed::reset_month(conn, user_id, &month)?;
            println!("Reset {} paid liabilities for {}", n, month);
        }
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = sub.get_one::<String>("user").unwrap();
    let user_id = id_for_user(conn, user)?;
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;

    let liabilities = fixed::list_for_month(conn, user_id, &month)?;
    if maybe_print_json(json_flag, jsonl_flag, &liabilities)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = liabilities
        .iter()
        .map(|l| {
            vec![
                l.id.to_string(),
                l.name.clone(),
                fmt_usd(&l.amount),
                if l.is_paid { "paid" } else { "pending" }.to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Id", "Name", "Amount", "Status"], rows));

    let totals = summary::fixed_liability_totals(conn, user_id, &month)?;
    println!(
        "Total {} | Paid {} ({} items) | Pending {} ({} items) | Due day {}",
        fmt_usd(&totals.total),
        fmt_usd(&totals.paid),
        totals.paid_count,
        fmt_usd(&totals.pending),
        totals.pending_count,
        fixed::DUE_DAY
    );
    Ok(())
}
