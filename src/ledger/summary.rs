// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

use super::income::{compute_income, DEFAULT_THRESHOLD};
use super::stored_decimal;
use crate::error::LedgerResult;
use crate::models::Wallet;

#[derive(Debug, Clone, Serialize)]
pub struct WalletBalance {
    pub wallet: Wallet,
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

/// Income minus expenses attributed to a wallet, across all users.
pub fn wallet_balance(conn: &Connection, wallet: Wallet) -> LedgerResult<WalletBalance> {
    let income = sum_column(
        conn,
        "SELECT amount_usd FROM income WHERE payment_source=?1",
        wallet.as_str(),
        "income amount",
    )?;
    let expenses = sum_column(
        conn,
        "SELECT amount FROM expenses WHERE payment_source=?1",
        wallet.as_str(),
        "expense amount",
    )?;
    Ok(WalletBalance {
        wallet,
        income,
        expenses,
        balance: income - expenses,
    })
}

fn sum_column(
    conn: &Connection,
    sql: &str,
    param: &str,
    what: &str,
) -> LedgerResult<Decimal> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params![param])?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let s: String = r.get(0)?;
        total += stored_decimal(&s, what)?;
    }
    Ok(total)
}

/// Projected standard income for a wallet this month: zero on or after the
/// wallet's pay day (payment presumed received), otherwise the conversion
/// rule applied to the wallet's multiplier at the default threshold.
pub fn expected_income(
    wallet: Wallet,
    today: NaiveDate,
    current_rate: Decimal,
) -> LedgerResult<Decimal> {
    if today.day() >= wallet.pay_day() {
        return Ok(Decimal::ZERO);
    }
    let calc = compute_income(
        wallet.multiplier(),
        Decimal::from(DEFAULT_THRESHOLD),
        current_rate,
    )?;
    Ok(calc.amount_usd)
}

/// Sum of a wallet's recorded income for one YYYY-MM month.
pub fn actual_income_for_month(
    conn: &Connection,
    wallet: Wallet,
    month: &str,
) -> LedgerResult<Decimal> {
    let mut stmt = conn.prepare(
        "SELECT amount_usd FROM income WHERE payment_source=?1 AND substr(date,1,7)=?2",
    )?;
    let mut rows = stmt.query(params![wallet.as_str(), month])?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let s: String = r.get(0)?;
        total += stored_decimal(&s, "income amount")?;
    }
    Ok(total)
}

#[derive(Debug, Clone, Serialize)]
pub struct FixedTotals {
    pub total: Decimal,
    pub paid: Decimal,
    pub pending: Decimal,
    pub paid_count: usize,
    pub pending_count: usize,
}

/// Fixed-liability amounts for a user/month partitioned by paid state.
pub fn fixed_liability_totals(
    conn: &Connection,
    user_id: i64,
    month: &str,
) -> LedgerResult<FixedTotals> {
    let mut stmt = conn.prepare(
        "SELECT amount, is_paid FROM fixed_expenses WHERE user_id=?1 AND month=?2",
    )?;
    let mut rows = stmt.query(params![user_id, month])?;
    let mut totals = FixedTotals {
        total: Decimal::ZERO,
        paid: Decimal::ZERO,
        pending: Decimal::ZERO,
        paid_count: 0,
        pending_count: 0,
    };
    while let Some(r) = rows.next()? {
        let amount_s: String = r.get(0)?;
        let amount = stored_decimal(&amount_s, "liability amount")?;
        totals.total += amount;
        if r.get::<_, i64>(1)? != 0 {
            totals.paid += amount;
            totals.paid_count += 1;
        } else {
            totals.pending += amount;
            totals.pending_count += 1;
        }
    }
    Ok(totals)
}

/// Spend per category for a user/month, largest first.
pub fn spend_by_category(
    conn: &Connection,
    user_id: i64,
    month: &str,
) -> LedgerResult<Vec<(String, Decimal)>> {
    let mut stmt = conn.prepare(
        "SELECT c.name, e.amount FROM expenses e
         LEFT JOIN expense_categories c ON e.category_id=c.id
         WHERE e.user_id=?1 AND substr(e.date,1,7)=?2",
    )?;
    let mut rows = stmt.query(params![user_id, month])?;
    use std::collections::HashMap;
    let mut agg: HashMap<String, Decimal> = HashMap::new();
    while let Some(r) = rows.next()? {
        let cat: Option<String> = r.get(0)?;
        let amount_s: String = r.get(1)?;
        let amount = stored_decimal(&amount_s, "expense amount")?;
        *agg.entry(cat.unwrap_or("(uncategorized)".into()))
            .or_insert(Decimal::ZERO) += amount;
    }
    let mut items: Vec<_> = agg.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(items)
}

#[derive(Debug, Clone, Serialize)]
pub enum EventKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthEvent {
    pub date: NaiveDate,
    pub kind: EventKind,
    pub label: String,
    pub amount: Decimal,
    pub wallet: String,
    pub synthetic: bool,
}

/// Dated income and expense events for a user/month, for the calendar-style
/// listing. Income is wallet-scoped across users, expenses user-scoped,
/// mirroring the dashboard queries.
pub fn month_events(
    conn: &Connection,
    user_id: i64,
    month: &str,
) -> LedgerResult<Vec<MonthEvent>> {
    let mut out = Vec::new();
    {
        let mut stmt = conn.prepare(
            "SELECT date, name, amount_usd, payment_source FROM income
             WHERE substr(date,1,7)=?1 ORDER BY date",
        )?;
        let mut rows = stmt.query(params![month])?;
        while let Some(r) = rows.next()? {
            let date_s: String = r.get(0)?;
            let amount_s: String = r.get(2)?;
            out.push(MonthEvent {
                date: parse_event_date(&date_s)?,
                kind: EventKind::Income,
                label: r.get(1)?,
                amount: stored_decimal(&amount_s, "income amount")?,
                wallet: r.get(3)?,
                synthetic: false,
            });
        }
    }
    {
        let mut stmt = conn.prepare(
            "SELECT e.date, IFNULL(e.description, ''), e.amount, e.payment_source,
                    e.source_liability_id IS NOT NULL
             FROM expenses e WHERE e.user_id=?1 AND substr(e.date,1,7)=?2 ORDER BY e.date",
        )?;
        let mut rows = stmt.query(params![user_id, month])?;
        while let Some(r) = rows.next()? {
            let date_s: String = r.get(0)?;
            let amount_s: String = r.get(2)?;
            out.push(MonthEvent {
                date: parse_event_date(&date_s)?,
                kind: EventKind::Expense,
                label: r.get(1)?,
                amount: stored_decimal(&amount_s, "expense amount")?,
                wallet: r.get(3)?,
                synthetic: r.get::<_, i64>(4)? != 0,
            });
        }
    }
    out.sort_by_key(|e| e.date);
    Ok(out)
}

fn parse_event_date(s: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| crate::error::LedgerError::Invariant(format!("unparseable date '{}'", s)))
}
