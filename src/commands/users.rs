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
            let username = sub.get_one::<String>("username").unwrap();
            let email = sub.get_one::<String>("email");
            let hash = sub.get_one::<String>("password-hash").unwrap();
            conn.execute(
                "INSERT INTO users(username, email, password_hash) VALUES (?1, ?2, ?3)",
                params![username, email, hash],
            )?;
            println!("Added user '{}'", username);
        }
        Some(("set-password", sub)) => {
            let username = sub.get_one::<String>("username").unwrap();
            let hash = sub.get_one::<String>("password-hash").unwrap();
            let n = conn.execute(
                "UPDATE users SET password_hash=?1 WHERE username=?2",
                params![hash, username],
            )?;
            if n == 0 {
                anyhow::bail!("User '{}' not found", username);
            }
            println!("Password updated for '{}'", username);
        }
        Some(("list", _)) => {
            let mut stmt =
                conn.prepare("SELECT username, email, created_at FROM users ORDER BY username")?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, Option<String>>(1)?,
                    r.get::<_, String>(2)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (u, e, c) = row?;
                data.push(vec![u, e.unwrap_or_default(), c]);
            }
            println!("{}", pretty_table(&["Username", "Email", "Created"], data));
        }
        _ => {}
    }
    Ok(())
}
