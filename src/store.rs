// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Snapshot and adjustment persistence.

use crate::models::{Adjustment, AdjustmentKind, RunResult, Snapshot};
use crate::utils::decimal_col;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

const SNAPSHOT_COLS: &str = "id, period, date, total_assets, total_liabilities, total_equity, \
     is_balanced, adjustments_count, status, created_at";

pub struct SnapshotStore<'c> {
    conn: &'c Connection,
}

impl<'c> SnapshotStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Store a run and its adjustments atomically; returns the snapshot id.
    pub fn persist(&self, run: &RunResult) -> Result<i64> {
        let tx = self.conn.unchecked_transaction()?;
        let s = &run.summary_balance_sheet;
        tx.execute(
            "INSERT INTO snapshots(period, date, total_assets, total_liabilities, total_equity,
                                   is_balanced, adjustments_count, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'completed')",
            params![
                run.as_of.to_string(),
                run.as_of.to_string(),
                s.total_assets.to_string(),
                s.total_liabilities.to_string(),
                s.total_equity.to_string(),
                run.is_balanced,
                run.adjustments.len() as i64,
            ],
        )?;
        let id = tx.last_insert_rowid();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO adjustments(snapshot_id, account_name, original_amount, adjusted_amount,
                                         adjustment_amount, reason, adjustment_type)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for adj in &run.adjustments {
                stmt.execute(params![
                    id,
                    adj.account_name,
                    adj.original_amount.to_string(),
                    adj.adjusted_amount.to_string(),
                    adj.adjustment_amount.to_string(),
                    adj.reason,
                    adj.adjustment_type.as_str(),
                ])?;
            }
        }
        tx.commit()?;
        tracing::info!(
            snapshot_id = id,
            adjustments = run.adjustments.len(),
            "snapshot persisted"
        );
        Ok(id)
    }

    pub fn list(&self, limit: usize) -> Result<Vec<Snapshot>> {
        let sql = format!("SELECT {SNAPSHOT_COLS} FROM snapshots ORDER BY id DESC LIMIT ?1");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![limit as i64], snapshot_from_row)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn get(&self, id: i64) -> Result<Option<Snapshot>> {
        let sql = format!("SELECT {SNAPSHOT_COLS} FROM snapshots WHERE id=?1");
        let snap = self
            .conn
            .query_row(&sql, params![id], snapshot_from_row)
            .optional()?;
        Ok(snap)
    }

    pub fn latest(&self) -> Result<Option<Snapshot>> {
        let sql = format!("SELECT {SNAPSHOT_COLS} FROM snapshots ORDER BY id DESC LIMIT 1");
        let snap = self.conn.query_row(&sql, [], snapshot_from_row).optional()?;
        Ok(snap)
    }

    /// Requested snapshot, or the latest when `id` is `None`.
    pub fn resolve(&self, id: Option<i64>) -> Result<Snapshot> {
        match id {
            Some(id) => self
                .get(id)?
                .with_context(|| format!("Snapshot {} not found", id)),
            None => self
                .latest()?
                .context("No snapshots found. Run `balsheet reconcile` first."),
        }
    }

    /// Adjustments of a snapshot in the order they were produced.
    pub fn adjustments(&self, snapshot_id: i64) -> Result<Vec<Adjustment>> {
        let mut stmt = self.conn.prepare(
            "SELECT account_name, original_amount, adjusted_amount, adjustment_amount, reason, adjustment_type
             FROM adjustments WHERE snapshot_id=?1 ORDER BY id",
        )?;
        let mut rows = stmt.query(params![snapshot_id])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            let kind: String = r.get(5)?;
            out.push(Adjustment {
                account_name: r.get(0)?,
                original_amount: decimal_col(&r.get::<_, String>(1)?)?,
                adjusted_amount: decimal_col(&r.get::<_, String>(2)?)?,
                adjustment_amount: decimal_col(&r.get::<_, String>(3)?)?,
                reason: r.get(4)?,
                adjustment_type: kind
                    .parse::<AdjustmentKind>()
                    .with_context(|| format!("Snapshot {} has a bad adjustment row", snapshot_id))?,
            });
        }
        Ok(out)
    }
}

fn snapshot_from_row(r: &Row<'_>) -> rusqlite::Result<Snapshot> {
    let date: String = r.get(2)?;
    Ok(Snapshot {
        id: r.get(0)?,
        period: r.get(1)?,
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?,
        total_assets: decimal_col(&r.get::<_, String>(3)?)?,
        total_liabilities: decimal_col(&r.get::<_, String>(4)?)?,
        total_equity: decimal_col(&r.get::<_, String>(5)?)?,
        is_balanced: r.get(6)?,
        adjustments_count: r.get(7)?,
        status: r.get(8)?,
        created_at: r.get(9)?,
    })
}
