// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// One of the two fixed payment-source identities. Income and expenses are
/// attributed to a wallet independently of which user recorded them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wallet {
    Rafael,
    Jessica,
}

impl Wallet {
    pub const ALL: [Wallet; 2] = [Wallet::Rafael, Wallet::Jessica];

    pub fn as_str(&self) -> &'static str {
        match self {
            Wallet::Rafael => "Rafael",
            Wallet::Jessica => "Jessica",
        }
    }

    /// COP pay units per month for this wallet's standard income.
    pub fn multiplier(&self) -> i64 {
        match self {
            Wallet::Rafael => 2300,
            Wallet::Jessica => 3000,
        }
    }

    /// Day of month the wallet's payment lands.
    pub fn pay_day(&self) -> u32 {
        match self {
            Wallet::Rafael => 25,
            Wallet::Jessica => 20,
        }
    }

    /// Ledger name for the wallet's standard income records.
    pub fn income_name(&self) -> &'static str {
        match self {
            Wallet::Rafael => "Income 1 (Rafael)",
            Wallet::Jessica => "Income 2",
        }
    }
}

impl std::str::FromStr for Wallet {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rafael" => Ok(Wallet::Rafael),
            "jessica" => Ok(Wallet::Jessica),
            other => Err(LedgerError::Validation(format!(
                "Unknown wallet '{}' (expected Rafael or Jessica)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub id: i64,
    pub rate: Decimal,
    pub date: NaiveDate,
    pub is_active: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub amount_cop: Decimal,
    pub exchange_rate: Decimal,
    pub amount_usd: Decimal,
    pub date: NaiveDate,
    pub payment_source: Wallet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub payment_source: Wallet,
    /// Set only on synthetic rows materialized from a paid fixed liability.
    pub source_liability_id: Option<i64>,
    pub source_month: Option<String>,
}

impl Expense {
    pub fn is_synthetic(&self) -> bool {
        self.source_liability_id.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedExpense {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub amount: Decimal,
    pub category_id: i64,
    pub month: String, // YYYY-MM
    pub is_paid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub r#type: Option<String>,
    pub value: Decimal, // signed
    pub description: Option<String>,
    pub date: NaiveDate,
}
