// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::audit;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let limit = *sub.get_one::<usize>("limit").unwrap_or(&50);
            let rows = audit::recent(conn, limit)?
                .into_iter()
                .map(|e| {
                    vec![
                        e.created_at,
                        e.action,
                        e.details.unwrap_or_default(),
                        e.realm_id.unwrap_or_default(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["When", "Action", "Details", "Realm"], rows)
            );
        }
        _ => {}
    }
    Ok(())
}
