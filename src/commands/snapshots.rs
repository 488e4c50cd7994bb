// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::SnapshotStore;
use crate::utils::{fmt_grouped, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let store = SnapshotStore::new(conn);
    match m.subcommand() {
        Some(("list", sub)) => {
            let limit = *sub.get_one::<usize>("limit").unwrap_or(&20);
            let snaps = store.list(limit)?;
            if !maybe_print_json(sub.get_flag("json"), &snaps)? {
                let rows = snaps
                    .into_iter()
                    .map(|s| {
                        vec![
                            s.id.to_string(),
                            s.date.to_string(),
                            fmt_grouped(s.total_assets),
                            fmt_grouped(s.total_liabilities),
                            fmt_grouped(s.total_equity),
                            if s.is_balanced { "YES" } else { "NO" }.to_string(),
                            s.adjustments_count.to_string(),
                            s.created_at,
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &[
                            "ID",
                            "As of",
                            "Assets",
                            "Liabilities",
                            "Equity",
                            "Balanced",
                            "Adjustments",
                            "Created"
                        ],
                        rows
                    )
                );
            }
        }
        Some(("show", sub)) => {
            let snap = store.resolve(sub.get_one::<i64>("id").copied())?;
            let adjustments = store.adjustments(snap.id)?;
            let out = json!({ "snapshot": snap, "adjustments": adjustments });
            if !maybe_print_json(sub.get_flag("json"), &out)? {
                println!(
                    "Snapshot {} as of {} ({}, balanced: {})",
                    snap.id,
                    snap.date,
                    snap.status,
                    if snap.is_balanced { "YES" } else { "NO" }
                );
                let totals = vec![
                    vec!["Total assets".into(), fmt_grouped(snap.total_assets)],
                    vec!["Total liabilities".into(), fmt_grouped(snap.total_liabilities)],
                    vec!["Total equity".into(), fmt_grouped(snap.total_equity)],
                ];
                println!("{}", pretty_table(&["Category", "Amount"], totals));
                let rows = adjustments
                    .iter()
                    .map(|a| {
                        vec![
                            a.account_name.clone(),
                            a.adjustment_type.to_string(),
                            fmt_grouped(a.adjustment_amount),
                            a.reason.clone(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Account", "Type", "Adjustment", "Reason"], rows)
                );
            }
        }
        _ => {}
    }
    Ok(())
}
