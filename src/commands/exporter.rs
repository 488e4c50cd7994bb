// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::audit;
use crate::store::SnapshotStore;
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("snapshot", sub)) => export_snapshot(conn, sub),
        _ => Ok(()),
    }
}

fn export_snapshot(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let store = SnapshotStore::new(conn);
    let snap = store.resolve(sub.get_one::<i64>("id").copied())?;
    let adjustments = store.adjustments(snap.id)?;

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record(["account", "original", "adjusted", "adjustment", "reason", "type"])?;
        for a in &adjustments {
            wtr.write_record([
                a.account_name.clone(),
                a.original_amount.to_string(),
                a.adjusted_amount.to_string(),
                a.adjustment_amount.to_string(),
                a.reason.clone(),
                a.adjustment_type.to_string(),
            ])?;
        }
        wtr.flush()?;
    } else {
        let doc = json!({ "snapshot": snap, "adjustments": adjustments });
        std::fs::write(out, serde_json::to_string_pretty(&doc)?)?;
    }

    audit::log_action(
        conn,
        audit::SNAPSHOT_EXPORTED,
        Some(&format!("snapshot {} exported as {} to {}", snap.id, fmt, out)),
        None,
    )?;
    println!("Exported snapshot {} to {}", snap.id, out);
    Ok(())
}
