// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

use super::rates;
use crate::error::{LedgerError, LedgerResult};
use crate::models::Wallet;

/// COP value of one pay unit; salaries are quoted as a unit multiplier.
pub const COP_PER_UNIT: i64 = 4400;

/// Default floor threshold for the conversion rule.
pub const DEFAULT_THRESHOLD: i64 = 4400;

#[derive(Debug, Clone, Serialize)]
pub struct IncomeBreakdown {
    pub amount_cop: Decimal,
    pub amount_usd: Decimal,
    pub rate_used: Decimal,
}

/// The floor-threshold conversion rule.
///
/// `amount_cop = COP_PER_UNIT * units`. When the live rate is below the
/// threshold, the threshold is used as the conversion rate instead. A rate
/// exactly at the threshold uses the live rate. Pure; callers persist the
/// result.
pub fn compute_income(
    units: i64,
    threshold: Decimal,
    current_rate: Decimal,
) -> LedgerResult<IncomeBreakdown> {
    if threshold <= Decimal::ZERO {
        return Err(LedgerError::Validation(format!(
            "Threshold must be positive, got {}",
            threshold
        )));
    }
    let amount_cop = Decimal::from(COP_PER_UNIT) * Decimal::from(units);
    let rate_used = if current_rate < threshold {
        threshold
    } else {
        current_rate
    };
    Ok(IncomeBreakdown {
        amount_cop,
        amount_usd: amount_cop / rate_used,
        rate_used,
    })
}

/// Record a wallet's standard monthly income at the current rate and return
/// the persisted breakdown. USD amounts are stored rounded to cents.
pub fn record_standard(
    conn: &Connection,
    user_id: i64,
    wallet: Wallet,
    threshold: Decimal,
    date: NaiveDate,
) -> LedgerResult<(i64, IncomeBreakdown)> {
    let rate = rates::current_rate(conn)?;
    let calc = compute_income(wallet.multiplier(), threshold, rate)?;
    let amount_usd = calc.amount_usd.round_dp(2);
    conn.execute(
        "INSERT INTO income(user_id, name, amount_cop, exchange_rate, amount_usd, date, payment_source)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user_id,
            wallet.income_name(),
            calc.amount_cop.to_string(),
            calc.rate_used.to_string(),
            format!("{:.2}", amount_usd),
            date.to_string(),
            wallet.as_str()
        ],
    )?;
    let id = conn.last_insert_rowid();
    Ok((
        id,
        IncomeBreakdown {
            amount_usd,
            ..calc
        },
    ))
}

/// Record a free-named income directly in USD (bonus, freelance, ...).
/// No COP conversion happens; the current rate is stored for reference.
pub fn record_extra(
    conn: &Connection,
    user_id: i64,
    name: &str,
    amount_usd: Decimal,
    wallet: Wallet,
    date: NaiveDate,
) -> LedgerResult<i64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::Validation("Income name is required".into()));
    }
    if amount_usd <= Decimal::ZERO {
        return Err(LedgerError::Validation(format!(
            "Income amount must be positive, got {}",
            amount_usd
        )));
    }
    let rate = rates::current_rate(conn)?;
    conn.execute(
        "INSERT INTO income(user_id, name, amount_cop, exchange_rate, amount_usd, date, payment_source)
         VALUES (?1, ?2, '0', ?3, ?4, ?5, ?6)",
        params![
            user_id,
            name,
            rate.to_string(),
            format!("{:.2}", amount_usd.round_dp(2)),
            date.to_string(),
            wallet.as_str()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}
