// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use balsheet::models::{Adjustment, AdjustmentKind, RunResult, SummaryBalanceSheet};
use balsheet::store::SnapshotStore;
use balsheet::{audit, cli, commands::exporter, db};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tempfile::tempdir;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn conn_with_snapshot() -> (Connection, i64) {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let run = RunResult {
        as_of: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        summary_balance_sheet: SummaryBalanceSheet::default(),
        adjustments: vec![
            Adjustment {
                account_name: "Trial Balance Adjustment".into(),
                original_amount: dec("500.00"),
                adjusted_amount: Decimal::ZERO,
                adjustment_amount: dec("-500.00"),
                reason: "Trial balance out of balance by $500.00".into(),
                adjustment_type: AdjustmentKind::Correction,
            },
            Adjustment {
                account_name: "Operating".into(),
                original_amount: dec("1200000"),
                adjusted_amount: dec("1200000"),
                adjustment_amount: Decimal::ZERO,
                reason: "Large bank balance requires manual review: $1,200,000.00".into(),
                adjustment_type: AdjustmentKind::Info,
            },
        ],
        reconciliation_checks: Default::default(),
        is_balanced: true,
        diagnostics: vec![],
    };
    let id = SnapshotStore::new(&conn).persist(&run).unwrap();
    (conn, id)
}

fn export(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["balsheet", "export", "snapshot"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_snapshot_writes_csv_rows() {
    let (conn, _) = conn_with_snapshot();
    let dir = tempdir().unwrap();
    let out = dir.path().join("snap.csv");
    let out_str = out.to_string_lossy().to_string();

    export(&conn, &["--format", "csv", "--out", &out_str]).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["account", "original", "adjusted", "adjustment", "reason", "type"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "Trial Balance Adjustment");
    assert_eq!(&rows[0][3], "-500.00");
    assert_eq!(&rows[0][5], "correction");
    assert_eq!(
        &rows[1][4],
        "Large bank balance requires manual review: $1,200,000.00"
    );

    let entries = audit::recent(&conn, 1).unwrap();
    assert_eq!(entries[0].action, audit::SNAPSHOT_EXPORTED);
}

#[test]
fn export_snapshot_writes_pretty_json() {
    let (conn, id) = conn_with_snapshot();
    let dir = tempdir().unwrap();
    let out = dir.path().join("snap.json");
    let out_str = out.to_string_lossy().to_string();

    export(
        &conn,
        &["--id", &id.to_string(), "--format", "JSON", "--out", &out_str],
    )
    .unwrap();

    let contents = std::fs::read_to_string(&out).unwrap();
    assert!(contents.contains("\n  \"adjustments\""));
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["snapshot"]["id"], id);
    assert_eq!(parsed["snapshot"]["date"], "2025-01-31");
    assert_eq!(parsed["adjustments"][0]["adjustment_amount"], "-500.00");
    assert_eq!(parsed["adjustments"][1]["adjustment_type"], "info");
}

#[test]
fn unknown_format_fails_without_creating_file() {
    let (conn, _) = conn_with_snapshot();
    let dir = tempdir().unwrap();
    let out = dir.path().join("snap.xml");
    let out_str = out.to_string_lossy().to_string();

    let err = export(&conn, &["--format", "xml", "--out", &out_str]).unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
    assert!(!out.exists());
}

#[test]
fn export_without_snapshots_fails() {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("snap.csv");
    let out_str = out.to_string_lossy().to_string();

    assert!(export(&conn, &["--format", "csv", "--out", &out_str]).is_err());
    assert!(!out.exists());
}
