// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{NOTE_STATUSES, NOTE_TYPES, ReconciliationNote};
use crate::utils::{decimal_col, fmt_grouped, maybe_print_json, one_of, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => {
            let notes = load_notes(conn)?;
            if !maybe_print_json(sub.get_flag("json"), &notes)? {
                let rows = notes
                    .into_iter()
                    .map(|n| {
                        vec![
                            n.id.to_string(),
                            n.title,
                            n.note_type,
                            fmt_grouped(n.amount),
                            n.status,
                            n.created_at,
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Title", "Type", "Amount", "Status", "Created"], rows)
                );
            }
        }
        Some(("set-status", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let status = one_of(
                "status",
                sub.get_one::<String>("status").unwrap().trim(),
                NOTE_STATUSES,
            )?;
            let n = conn.execute(
                "UPDATE reconciliation_notes SET status=?1, updated_at=datetime('now') WHERE id=?2",
                params![status, id],
            )?;
            if n == 0 {
                return Err(anyhow!("Note {} not found", id));
            }
            println!("Note {} marked {}", id, status);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let title = sub.get_one::<String>("title").unwrap().trim();
    let description = sub.get_one::<String>("description").unwrap().trim();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let note_type = one_of(
        "note type",
        sub.get_one::<String>("type").unwrap().trim(),
        NOTE_TYPES,
    )?;
    let status = one_of(
        "status",
        sub.get_one::<String>("status").unwrap().trim(),
        NOTE_STATUSES,
    )?;
    insert_note(conn, title, description, &amount.to_string(), note_type, status)?;
    println!("Added note '{}'", title);
    Ok(())
}

pub(crate) fn insert_note(
    conn: &Connection,
    title: &str,
    description: &str,
    amount: &str,
    note_type: &str,
    status: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO reconciliation_notes(title, description, amount, note_type, status)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![title, description, amount, note_type, status],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Newest first.
pub fn load_notes(conn: &Connection) -> Result<Vec<ReconciliationNote>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, amount, note_type, status, created_at
         FROM reconciliation_notes ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(ReconciliationNote {
            id: r.get(0)?,
            title: r.get(1)?,
            description: r.get(2)?,
            amount: decimal_col(&r.get::<_, String>(3)?)?,
            note_type: r.get(4)?,
            status: r.get(5)?,
            created_at: r.get(6)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
