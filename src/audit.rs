// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::AuditEntry;
use anyhow::Result;
use rusqlite::{Connection, params};

pub const RECONCILIATION_COMPLETED: &str = "RECONCILIATION_COMPLETED";
pub const RECONCILIATION_FAILED: &str = "RECONCILIATION_FAILED";
pub const SNAPSHOT_EXPORTED: &str = "SNAPSHOT_EXPORTED";
pub const SAMPLE_DATA_SEEDED: &str = "SAMPLE_DATA_SEEDED";

pub fn log_action(
    conn: &Connection,
    action: &str,
    details: Option<&str>,
    realm_id: Option<&str>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO audit_logs(action, details, realm_id) VALUES (?1, ?2, ?3)",
        params![action, details, realm_id],
    )?;
    tracing::info!(action, details = details.unwrap_or_default(), "audit");
    Ok(())
}

pub fn recent(conn: &Connection, limit: usize) -> Result<Vec<AuditEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, action, details, realm_id, created_at FROM audit_logs ORDER BY id DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit as i64], |r| {
        Ok(AuditEntry {
            id: r.get(0)?,
            action: r.get(1)?,
            details: r.get(2)?,
            realm_id: r.get(3)?,
            created_at: r.get(4)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
