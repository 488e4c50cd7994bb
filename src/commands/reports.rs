// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::accounts::load_accounts;
use crate::models::{Account, SummaryBalanceSheet};
use crate::summary::{is_balanced, summary_from_accounts};
use crate::utils::{fmt_grouped, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balance-sheet", sub)) => balance_sheet(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Default, Serialize)]
pub struct Grouped {
    pub current: Vec<Account>,
    pub non_current: Vec<Account>,
}

#[derive(Debug, Serialize)]
pub struct LocalBalanceSheet {
    pub assets: Grouped,
    pub liabilities: Grouped,
    pub equity: Vec<Account>,
    pub totals: SummaryBalanceSheet,
    pub is_balanced: bool,
}

pub fn local_balance_sheet(accounts: Vec<Account>) -> Result<LocalBalanceSheet> {
    let totals = summary_from_accounts(&accounts)?;
    let mut assets = Grouped::default();
    let mut liabilities = Grouped::default();
    let mut equity = Vec::new();
    for a in accounts {
        let current = a.subcategory.as_deref() == Some("current");
        match (a.account_type.as_str(), current) {
            ("asset", true) => assets.current.push(a),
            ("asset", false) => assets.non_current.push(a),
            ("liability", true) => liabilities.current.push(a),
            ("liability", false) => liabilities.non_current.push(a),
            ("equity", _) => equity.push(a),
            _ => {}
        }
    }
    Ok(LocalBalanceSheet {
        assets,
        liabilities,
        equity,
        is_balanced: is_balanced(&totals),
        totals,
    })
}

fn balance_sheet(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let bs = local_balance_sheet(load_accounts(conn)?)?;
    if maybe_print_json(sub.get_flag("json"), &bs)? {
        return Ok(());
    }

    let mut rows = Vec::new();
    let mut section = |title: &str, accounts: &[Account]| {
        for a in accounts {
            rows.push(vec![
                title.to_string(),
                a.name.clone(),
                fmt_grouped(a.balance),
                a.status.clone(),
            ]);
        }
    };
    section("Current assets", &bs.assets.current);
    section("Non-current assets", &bs.assets.non_current);
    section("Current liabilities", &bs.liabilities.current);
    section("Non-current liabilities", &bs.liabilities.non_current);
    section("Equity", &bs.equity);
    println!(
        "{}",
        pretty_table(&["Section", "Account", "Balance", "Status"], rows)
    );

    let t = &bs.totals;
    let totals = vec![
        vec!["Total assets".into(), fmt_grouped(t.total_assets)],
        vec!["Total liabilities".into(), fmt_grouped(t.total_liabilities)],
        vec!["Total equity".into(), fmt_grouped(t.total_equity)],
        vec![
            "Balanced".into(),
            if bs.is_balanced { "YES" } else { "NO" }.to_string(),
        ],
    ];
    println!("{}", pretty_table(&["Category", "Amount"], totals));
    Ok(())
}
