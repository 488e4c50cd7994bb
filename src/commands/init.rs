// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::audit;
use crate::commands::notes::insert_note;
use anyhow::Result;
use rusqlite::{Connection, params};

// name, type, subcategory, balance, status
const SAMPLE_ACCOUNTS: &[(&str, &str, Option<&str>, &str, &str)] = &[
    ("Cash & Cash Equivalents", "asset", Some("current"), "482300", "reconciled"),
    ("Accounts Receivable", "asset", Some("current"), "315750", "reconciled"),
    ("Inventory", "asset", Some("current"), "204600", "adjusted"),
    ("Prepaid Expenses", "asset", Some("current"), "38400", "reconciled"),
    ("Property & Equipment (net)", "asset", Some("non_current"), "1280000", "reconciled"),
    ("Intangible Assets", "asset", Some("non_current"), "520000", "pending"),
    ("Accounts Payable", "liability", Some("current"), "198400", "reconciled"),
    ("Accrued Liabilities", "liability", Some("current"), "87200", "reconciled"),
    ("Short-Term Debt", "liability", Some("current"), "125000", "open_item"),
    ("Long-Term Debt", "liability", Some("non_current"), "712000", "reconciled"),
    ("Common Stock", "equity", None, "500000", "reconciled"),
    ("Retained Earnings", "equity", None, "1032000", "reconciled"),
    ("Current Period Net Income", "equity", None, "186450", "adjusted"),
];

// title, description, amount, type, status
const SAMPLE_NOTES: &[(&str, &str, &str, &str, &str)] = &[
    (
        "Inventory Adjustment",
        "Physical count variance vs. ledger. Wrote down $4,200 for obsolete stock per management review.",
        "-4200",
        "adjustment",
        "resolved",
    ),
    (
        "Short-Term Debt - Open",
        "Bank statement shows $125K draw; loan agreement not yet filed. Awaiting signed docs.",
        "125000",
        "open_item",
        "pending",
    ),
    (
        "Net Income Reclassification",
        "$12,300 reclassified from retained earnings to current period net income to match P&L.",
        "12300",
        "adjustment",
        "resolved",
    ),
    (
        "Intangible Assets - Pending",
        "Software license capitalization under review. Value held at cost pending amortization schedule.",
        "520000",
        "info",
        "reviewed",
    ),
];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if m.get_flag("sample") {
        if seed_sample(conn)? {
            println!(
                "Seeded {} sample accounts and {} notes",
                SAMPLE_ACCOUNTS.len(),
                SAMPLE_NOTES.len()
            );
        } else {
            println!("Accounts already present; sample data not loaded");
        }
    }
    Ok(())
}

/// Seed sample data into an empty book. Returns false when accounts exist.
pub fn seed_sample(conn: &Connection) -> Result<bool> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM accounts", [], |r| r.get(0))?;
    if existing > 0 {
        return Ok(false);
    }
    let tx = conn.unchecked_transaction()?;
    for (name, typ, sub, balance, status) in SAMPLE_ACCOUNTS {
        tx.execute(
            "INSERT INTO accounts(name, account_type, subcategory, balance, status)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![name, typ, sub, balance, status],
        )?;
    }
    for (title, description, amount, note_type, status) in SAMPLE_NOTES {
        insert_note(&tx, title, description, amount, note_type, status)?;
    }
    tx.commit()?;
    audit::log_action(conn, audit::SAMPLE_DATA_SEEDED, None, None)?;
    Ok(true)
}
