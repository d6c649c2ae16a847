// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{fixed, rates, summary};
use crate::models::Wallet;
use crate::utils::{fmt_usd, id_for_user, maybe_print_json, parse_date, parse_month, pretty_table};
use anyhow::Result;
use chrono::{Datelike, Utc};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balances", sub)) => balances(conn, sub)?,
        Some(("forecast", sub)) => forecast(conn, sub)?,
        Some(("spend-by-category", sub)) => spend_by_category(conn, sub)?,
        Some(("month", sub)) => month_events(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn balances(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut all = Vec::new();
    for wallet in Wallet::ALL {
        all.push(summary::wallet_balance(conn, wallet)?);
    }
    if maybe_print_json(json_flag, jsonl_flag, &all)? {
        return Ok(());
    }
    let mut data = Vec::new();
    let mut total = rust_decimal::Decimal::ZERO;
    for b in &all {
        total += b.balance;
        data.push(vec![
            b.wallet.to_string(),
            fmt_usd(&b.income),
            fmt_usd(&b.expenses),
            fmt_usd(&b.balance),
        ]);
    }
    data.push(vec![
        "Total".into(),
        String::new(),
        String::new(),
        fmt_usd(&total),
    ]);
    println!(
        "{}",
        pretty_table(&["Wallet", "Income", "Expenses", "Balance"], data)
    );
    Ok(())
}

fn forecast(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let today = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Utc::now().date_naive(),
    };
    let month = today.format("%Y-%m").to_string();
    let rate = rates::current_rate(conn)?;
    println!("Current USD/COP rate: {:.2} | Today: {}", rate.round_dp(2), today);

    let mut data = Vec::new();
    let mut total_expected = rust_decimal::Decimal::ZERO;
    let mut total_actual = rust_decimal::Decimal::ZERO;
    for wallet in Wallet::ALL {
        let expected = summary::expected_income(wallet, today, rate)?;
        let actual = summary::actual_income_for_month(conn, wallet, &month)?;
        total_expected += expected;
        total_actual += actual;
        let due = match today.day().cmp(&wallet.pay_day()) {
            std::cmp::Ordering::Less => {
                format!("due {}th (in {} days)", wallet.pay_day(), wallet.pay_day() - today.day())
            }
            std::cmp::Ordering::Equal => "due TODAY".into(),
            std::cmp::Ordering::Greater => "paid this month".into(),
        };
        data.push(vec![
            wallet.income_name().to_string(),
            fmt_usd(&actual),
            fmt_usd(&expected),
            due,
        ]);
    }
    data.push(vec![
        "Total".into(),
        fmt_usd(&total_actual),
        fmt_usd(&total_expected),
        String::new(),
    ]);
    println!(
        "{}",
        pretty_table(&["Income", "Actual", "Expected", "Status"], data)
    );

    let totals = summary::fixed_liability_totals(conn, user_id, &month)?;
    println!(
        "Fixed: total {} | paid {} ({}) | pending {} ({})",
        fmt_usd(&totals.total),
        fmt_usd(&totals.paid),
        totals.paid_count,
        fmt_usd(&totals.pending),
        totals.pending_count
    );
    let pending: Vec<_> = fixed::list_for_month(conn, user_id, &month)?
        .into_iter()
        .filter(|l| !l.is_paid)
        .collect();
    for l in &pending {
        println!("  pending: {} {}", l.name, fmt_usd(&l.amount));
    }
    if today.day() < fixed::DUE_DAY {
        println!(
            "Fixed expenses due on the {}th (in {} days)",
            fixed::DUE_DAY,
            fixed::DUE_DAY - today.day()
        );
    } else if today.day() == fixed::DUE_DAY {
        println!("Fixed expenses due TODAY");
    }
    Ok(())
}

fn spend_by_category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let items = summary::spend_by_category(conn, user_id, &month)?;
    let data: Vec<Vec<String>> = items
        .iter()
        .map(|(cat, amt)| vec![cat.clone(), fmt_usd(amt)])
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Category", "Spent"], data));
    }
    Ok(())
}

fn month_events(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let events = summary::month_events(conn, user_id, &month)?;
    if maybe_print_json(json_flag, jsonl_flag, &events)? {
        return Ok(());
    }
    println!(
        "Standing dates: Jessica pay {}th | Rafael pay {}th | fixed due {}th",
        Wallet::Jessica.pay_day(),
        Wallet::Rafael.pay_day(),
        fixed::DUE_DAY
    );
    let data: Vec<Vec<String>> = events
        .iter()
        .map(|e| {
            vec![
                e.date.to_string(),
                match e.kind {
                    summary::EventKind::Income => "income".into(),
                    summary::EventKind::Expense if e.synthetic => "fixed".into(),
                    summary::EventKind::Expense => "expense".into(),
                },
                e.label.clone(),
                fmt_usd(&e.amount),
                e.wallet.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Kind", "Label", "Amount", "Wallet"], data)
    );
    Ok(())
}
