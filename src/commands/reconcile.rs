// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::audit;
use crate::config::Config;
use crate::models::RunResult;
use crate::reconcile::Reconciler;
use crate::source::{DirSource, QboSource, ReportSource};
use crate::store::SnapshotStore;
use crate::utils::{fmt_grouped, parse_date, pretty_table};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let as_of = m
        .get_one::<String>("as-of")
        .map(|s| parse_date(s))
        .transpose()?;
    let source: Box<dyn ReportSource> = match m.get_one::<String>("source").map(String::as_str) {
        Some("dir") => {
            let dir = m
                .get_one::<String>("dir")
                .context("--dir is required with --source dir")?;
            Box::new(DirSource::new(dir.trim()))
        }
        _ => Box::new(QboSource::new(&cfg.qbo)?),
    };
    let persist = !m.get_flag("dry-run");

    let (result, snapshot_id) = run(
        conn,
        source.as_ref(),
        as_of,
        persist,
        cfg.qbo.realm_id.as_deref(),
    )?;

    if m.get_flag("json") {
        let out = json!({ "snapshot_id": snapshot_id, "result": result });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_result(&result, snapshot_id);
    }
    Ok(())
}

/// Reconcile and, when `persist` is set, store the snapshot. Every attempt is
/// audited; a failed run stores nothing.
pub fn run(
    conn: &Connection,
    source: &dyn ReportSource,
    as_of: Option<NaiveDate>,
    persist: bool,
    realm_id: Option<&str>,
) -> Result<(RunResult, Option<i64>)> {
    let result = match Reconciler::new(source).reconcile(as_of) {
        Ok(r) => r,
        Err(e) => {
            audit::log_action(conn, audit::RECONCILIATION_FAILED, Some(&e.to_string()), realm_id)?;
            return Err(e.into());
        }
    };

    let snapshot_id = if persist {
        Some(SnapshotStore::new(conn).persist(&result)?)
    } else {
        None
    };
    let details = format!(
        "as of {}: {} adjustments, balanced={}{}",
        result.as_of,
        result.adjustments.len(),
        result.is_balanced,
        if persist { "" } else { " (dry run)" }
    );
    audit::log_action(conn, audit::RECONCILIATION_COMPLETED, Some(&details), realm_id)?;
    Ok((result, snapshot_id))
}

fn print_result(r: &RunResult, snapshot_id: Option<i64>) {
    let s = &r.summary_balance_sheet;
    let summary = vec![
        vec!["Current assets".into(), fmt_grouped(s.assets.current)],
        vec!["Fixed assets".into(), fmt_grouped(s.assets.fixed)],
        vec!["Other assets".into(), fmt_grouped(s.assets.other)],
        vec!["Total assets".into(), fmt_grouped(s.total_assets)],
        vec!["Current liabilities".into(), fmt_grouped(s.liabilities.current)],
        vec!["Long-term liabilities".into(), fmt_grouped(s.liabilities.long_term)],
        vec!["Total liabilities".into(), fmt_grouped(s.total_liabilities)],
        vec!["Owners' equity".into(), fmt_grouped(s.equity.owners_equity)],
        vec!["Retained earnings".into(), fmt_grouped(s.equity.retained_earnings)],
        vec!["Total equity".into(), fmt_grouped(s.total_equity)],
        vec![
            "Balanced".into(),
            if r.is_balanced { "YES" } else { "NO" }.to_string(),
        ],
    ];
    println!("Balance sheet as of {}", r.as_of);
    println!("{}", pretty_table(&["Category", "Amount"], summary));

    let checks = r
        .reconciliation_checks
        .iter()
        .map(|(k, v)| vec![k.clone(), v.to_string()])
        .collect();
    println!("{}", pretty_table(&["Check", "Result"], checks));

    if !r.adjustments.is_empty() {
        let rows = r
            .adjustments
            .iter()
            .map(|a| {
                vec![
                    a.account_name.clone(),
                    a.adjustment_type.to_string(),
                    fmt_grouped(a.original_amount),
                    fmt_grouped(a.adjusted_amount),
                    fmt_grouped(a.adjustment_amount),
                    a.reason.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Account", "Type", "Original", "Adjusted", "Adjustment", "Reason"],
                rows
            )
        );
    }
    for d in &r.diagnostics {
        eprintln!("warning: check skipped: {}", d);
    }
    match snapshot_id {
        Some(id) => println!("Stored snapshot {}", id),
        None => println!("Dry run: nothing stored"),
    }
}
