// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use rust_decimal::Decimal;

use super::stored_decimal;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{FixedExpense, Wallet};

/// Day of month the fixed liabilities fall due.
pub const DUE_DAY: u32 = 30;

/// The recurring monthly obligations seeded by `seed_defaults`:
/// (name, nominal USD amount, category name).
const DEFAULT_CATALOG: [(&str, i64, &str); 10] = [
    ("Residence Admin", 100, "Utility Bills"),
    ("Gas Utility Bill", 15, "Utility Bills"),
    ("Internet", 25, "Utility Bills"),
    ("Mobile Internet", 20, "Utility Bills"),
    ("Water", 26, "Utility Bills"),
    ("Mortgage", 490, "Other"),
    ("Second Credit Line", 300, "Other"),
    ("Credit 1", 15000, "Other"),
    ("Credit 2", 45000, "Other"),
    ("Uber", 100, "Uber"),
];

/// One liability transition in a reconciliation batch.
#[derive(Debug, Clone)]
pub enum PaymentUpdate {
    /// Mark paid; materialize a synthetic expense if none exists yet.
    /// `amount` overrides the liability's nominal amount at payment time.
    Pay {
        liability_id: i64,
        amount: Option<Decimal>,
        wallet: Wallet,
        date: NaiveDate,
    },
    /// Mark unpaid; remove the one matching synthetic expense if present.
    Unpay { liability_id: i64 },
}

struct LiabilityRow {
    user_id: i64,
    name: String,
    amount: Decimal,
    category_id: i64,
    month: String,
}

fn load_liability(tx: &Transaction, liability_id: i64) -> LedgerResult<LiabilityRow> {
    let row = tx
        .query_row(
            "SELECT user_id, name, amount, category_id, month FROM fixed_expenses WHERE id=?1",
            params![liability_id],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, i64>(3)?,
                    r.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;
    let (user_id, name, amount_s, category_id, month) = row.ok_or_else(|| {
        LedgerError::Validation(format!("Fixed liability {} not found", liability_id))
    })?;
    Ok(LiabilityRow {
        user_id,
        name,
        amount: stored_decimal(&amount_s, "liability amount")?,
        category_id,
        month,
    })
}

fn apply_one(tx: &Transaction, update: &PaymentUpdate) -> LedgerResult<()> {
    match update {
        PaymentUpdate::Pay {
            liability_id,
            amount,
            wallet,
            date,
        } => {
            let liab = load_liability(tx, *liability_id)?;
            tx.execute(
                "UPDATE fixed_expenses SET is_paid=1 WHERE id=?1",
                params![liability_id],
            )?;
            let existing: Option<i64> = tx
                .query_row(
                    "SELECT id FROM expenses WHERE source_liability_id=?1 AND source_month=?2",
                    params![liability_id, liab.month],
                    |r| r.get(0),
                )
                .optional()?;
            if existing.is_none() {
                let paid_amount = amount.unwrap_or(liab.amount);
                if paid_amount <= Decimal::ZERO {
                    return Err(LedgerError::Validation(format!(
                        "Payment amount must be positive, got {}",
                        paid_amount
                    )));
                }
                tx.execute(
                    "INSERT INTO expenses(user_id, amount, category_id, description, date,
                                          payment_source, source_liability_id, source_month)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        liab.user_id,
                        format!("{:.2}", paid_amount.round_dp(2)),
                        liab.category_id,
                        format!("Fixed Expense: {} ({})", liab.name, liab.month),
                        date.to_string(),
                        wallet.as_str(),
                        liability_id,
                        liab.month
                    ],
                )?;
            }
        }
        PaymentUpdate::Unpay { liability_id } => {
            let liab = load_liability(tx, *liability_id)?;
            tx.execute(
                "UPDATE fixed_expenses SET is_paid=0 WHERE id=?1",
                params![liability_id],
            )?;
            // delete exactly one row even if duplicates slipped in
            tx.execute(
                "DELETE FROM expenses WHERE id = (
                     SELECT id FROM expenses
                     WHERE source_liability_id=?1 AND source_month=?2
                     ORDER BY id LIMIT 1)",
                params![liability_id, liab.month],
            )?;
        }
    }
    Ok(())
}

/// Apply a batch of payment transitions. The whole batch commits or rolls
/// back as one transaction: flag updates and synthetic-expense writes for
/// every liability in it.
pub fn apply_payments(conn: &mut Connection, updates: &[PaymentUpdate]) -> LedgerResult<()> {
    let tx = conn.transaction()?;
    for update in updates {
        apply_one(&tx, update)?;
    }
    tx.commit()?;
    Ok(())
}

/// Single-liability convenience over [`apply_payments`]. Idempotent in both
/// directions: paying twice keeps one synthetic expense, unpaying twice
/// deletes nothing further.
pub fn set_paid(
    conn: &mut Connection,
    liability_id: i64,
    paid: bool,
    amount: Option<Decimal>,
    wallet: Wallet,
    date: NaiveDate,
) -> LedgerResult<()> {
    let update = if paid {
        PaymentUpdate::Pay {
            liability_id,
            amount,
            wallet,
            date,
        }
    } else {
        PaymentUpdate::Unpay { liability_id }
    };
    apply_payments(conn, &[update])
}

/// Seed the default liability catalog for a user/month. Rows that already
/// exist are skipped by the `(user_id, name, month)` unique constraint, so
/// repeated calls are safe. Returns the number of rows actually inserted.
pub fn seed_defaults(conn: &mut Connection, user_id: i64, month: &str) -> LedgerResult<usize> {
    let tx = conn.transaction()?;
    let other_id: Option<i64> = tx
        .query_row(
            "SELECT id FROM expense_categories WHERE name='Other'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    let mut inserted = 0usize;
    for (name, amount, category) in DEFAULT_CATALOG {
        let cat_id: Option<i64> = tx
            .query_row(
                "SELECT id FROM expense_categories WHERE name=?1",
                params![category],
                |r| r.get(0),
            )
            .optional()?;
        let cat_id = cat_id.or(other_id).ok_or_else(|| {
            LedgerError::Validation(format!(
                "Category '{}' not found and no 'Other' fallback exists",
                category
            ))
        })?;
        let n = tx.execute(
            "INSERT OR IGNORE INTO fixed_expenses(user_id, name, amount, category_id, month, is_paid)
             VALUES (?1, ?2, ?3, ?4, ?5, 0)",
            params![user_id, name, format!("{:.2}", Decimal::from(amount)), cat_id, month],
        )?;
        inserted += n;
    }
    tx.commit()?;
    Ok(inserted)
}

/// Start a new cycle: mark every liability of the month unpaid through the
/// reconciler, deleting synthetic expenses in the same transaction. Returns
/// how many liabilities changed state.
pub fn reset_month(conn: &mut Connection, user_id: i64, month: &str) -> LedgerResult<usize> {
    let tx = conn.transaction()?;
    let ids: Vec<i64> = {
        let mut stmt = tx.prepare(
            "SELECT id FROM fixed_expenses WHERE user_id=?1 AND month=?2 AND is_paid=1",
        )?;
        let rows = stmt.query_map(params![user_id, month], |r| r.get(0))?;
        rows.collect::<Result<_, _>>()?
    };
    for id in &ids {
        apply_one(&tx, &PaymentUpdate::Unpay { liability_id: *id })?;
    }
    tx.commit()?;
    Ok(ids.len())
}

pub fn list_for_month(
    conn: &Connection,
    user_id: i64,
    month: &str,
) -> LedgerResult<Vec<FixedExpense>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, amount, category_id, month, is_paid
         FROM fixed_expenses WHERE user_id=?1 AND month=?2 ORDER BY name",
    )?;
    let mut rows = stmt.query(params![user_id, month])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let amount_s: String = r.get(3)?;
        out.push(FixedExpense {
            id: r.get(0)?,
            user_id: r.get(1)?,
            name: r.get(2)?,
            amount: stored_decimal(&amount_s, "liability amount")?,
            category_id: r.get(4)?,
            month: r.get(5)?,
            is_paid: r.get::<_, i64>(6)? != 0,
        });
    }
    Ok(out)
}
