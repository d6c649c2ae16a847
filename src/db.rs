// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Billfold", "billfold"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("billfold.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS users(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS expense_categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        description TEXT
    );

    CREATE TABLE IF NOT EXISTS exchange_rates(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        rate TEXT NOT NULL,
        date TEXT NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 0,
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    -- at most one active rate, enforced structurally
    CREATE UNIQUE INDEX IF NOT EXISTS idx_exchange_rates_one_active
        ON exchange_rates(is_active) WHERE is_active = 1;
    CREATE INDEX IF NOT EXISTS idx_exchange_rates_date ON exchange_rates(date);

    CREATE TABLE IF NOT EXISTS income(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        amount_cop TEXT NOT NULL,
        exchange_rate TEXT NOT NULL,
        amount_usd TEXT NOT NULL,
        date TEXT NOT NULL,
        payment_source TEXT NOT NULL CHECK(payment_source IN ('Rafael','Jessica')),
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_income_date ON income(date);
    CREATE INDEX IF NOT EXISTS idx_income_source ON income(payment_source);

    CREATE TABLE IF NOT EXISTS fixed_expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        amount TEXT NOT NULL,
        category_id INTEGER NOT NULL,
        month TEXT NOT NULL,
        is_paid INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(user_id, name, month),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY(category_id) REFERENCES expense_categories(id)
    );
    CREATE INDEX IF NOT EXISTS idx_fixed_expenses_month ON fixed_expenses(month);

    CREATE TABLE IF NOT EXISTS expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        category_id INTEGER,
        description TEXT,
        date TEXT NOT NULL,
        payment_source TEXT NOT NULL CHECK(payment_source IN ('Rafael','Jessica')),
        source_liability_id INTEGER,
        source_month TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY(category_id) REFERENCES expense_categories(id) ON DELETE SET NULL,
        FOREIGN KEY(source_liability_id) REFERENCES fixed_expenses(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
    -- at most one synthetic expense per liability-month
    CREATE UNIQUE INDEX IF NOT EXISTS idx_expenses_one_synthetic
        ON expenses(source_liability_id, source_month)
        WHERE source_liability_id IS NOT NULL;

    CREATE TABLE IF NOT EXISTS assets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        type TEXT,
        value TEXT NOT NULL, -- signed: negative = liability/credit balance
        description TEXT,
        date TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_assets_user_id ON assets(user_id);

    INSERT OR IGNORE INTO expense_categories(name, description) VALUES
      ('Luxury', 'Luxury items and services'),
      ('Transportation', 'Transportation expenses'),
      ('Groceries', 'Grocery shopping'),
      ('Deliveries', 'Food and package deliveries'),
      ('Maid', 'Maid and cleaning services'),
      ('Utility Bills', 'Utility bills'),
      ('Uber', 'Ride-sharing services'),
      ('Other', 'Other expenses');
    "#,
    )?;
    Ok(())
}
