// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let description = sub.get_one::<String>("description");
            conn.execute(
                "INSERT INTO expense_categories(name, description) VALUES (?1, ?2)",
                params![name, description],
            )?;
            println!("Added category '{}'", name);
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare(
                "SELECT name, IFNULL(description,'') FROM expense_categories ORDER BY name",
            )?;
            let rows =
                stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
            let mut data = Vec::new();
            for row in rows {
                let (n, d) = row?;
                data.push(vec![n, d]);
            }
            println!("{}", pretty_table(&["Category", "Description"], data));
        }
        _ => {}
    }
    Ok(())
}
