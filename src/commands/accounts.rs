// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{ACCOUNT_STATUSES, ACCOUNT_TYPES, Account, SUBCATEGORIES};
use crate::utils::{
    decimal_col, fmt_money, id_for_account, maybe_print_json, one_of, parse_decimal,
    pretty_table,
};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("update", sub)) => update(conn, sub)?,
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let n = conn.execute("DELETE FROM accounts WHERE name=?1", params![name])?;
            if n == 0 {
                return Err(anyhow!("Account '{}' not found", name));
            }
            println!("Removed account '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim();
    let typ = one_of(
        "account type",
        sub.get_one::<String>("type").unwrap().trim(),
        ACCOUNT_TYPES,
    )?;
    let subcategory = sub
        .get_one::<String>("subcategory")
        .map(|s| one_of("subcategory", s.trim(), SUBCATEGORIES))
        .transpose()?;
    let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
    let ccy = sub.get_one::<String>("currency").unwrap().trim().to_uppercase();
    let status = one_of(
        "status",
        sub.get_one::<String>("status").unwrap().trim(),
        ACCOUNT_STATUSES,
    )?;
    let description = sub.get_one::<String>("description").map(|s| s.trim());

    conn.execute(
        "INSERT INTO accounts(name, account_type, subcategory, balance, currency, status, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![name, typ, subcategory, balance.to_string(), ccy, status, description],
    )?;
    println!("Added account '{}' ({}, {} {})", name, typ, ccy, balance);
    Ok(())
}

fn update(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim();
    let balance = sub
        .get_one::<String>("balance")
        .map(|raw| parse_decimal(raw))
        .transpose()?;
    let status = sub
        .get_one::<String>("status")
        .map(|raw| one_of("status", raw.trim(), ACCOUNT_STATUSES))
        .transpose()?;
    let description = sub.get_one::<String>("description").map(|s| s.trim());
    let id = id_for_account(conn, name)?;

    let tx = conn.unchecked_transaction()?;
    if let Some(balance) = balance {
        tx.execute(
            "UPDATE accounts SET balance=?1, updated_at=datetime('now') WHERE id=?2",
            params![balance.to_string(), id],
        )?;
    }
    if let Some(status) = status {
        tx.execute(
            "UPDATE accounts SET status=?1, updated_at=datetime('now') WHERE id=?2",
            params![status, id],
        )?;
    }
    if let Some(desc) = description {
        tx.execute(
            "UPDATE accounts SET description=?1, updated_at=datetime('now') WHERE id=?2",
            params![desc, id],
        )?;
    }
    tx.commit()?;
    println!("Updated account '{}'", name);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let accounts = load_accounts(conn)?;
    if !maybe_print_json(sub.get_flag("json"), &accounts)? {
        let rows = accounts
            .into_iter()
            .map(|a| {
                vec![
                    a.name,
                    a.account_type,
                    a.subcategory.unwrap_or_default(),
                    fmt_money(&a.balance, &a.currency),
                    a.status,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Name", "Type", "Subcategory", "Balance", "Status"],
                rows
            )
        );
    }
    Ok(())
}

pub fn load_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, account_type, subcategory, balance, currency, status, description
         FROM accounts ORDER BY account_type, name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(Account {
            id: r.get(0)?,
            name: r.get(1)?,
            account_type: r.get(2)?,
            subcategory: r.get(3)?,
            balance: decimal_col(&r.get::<_, String>(4)?)?,
            currency: r.get(5)?,
            status: r.get(6)?,
            description: r.get(7)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
