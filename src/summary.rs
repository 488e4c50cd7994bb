// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Summary balance sheet builders.

use crate::error::CheckError;
use crate::models::{Account, SummaryBalanceSheet};
use crate::report::Report;
use rust_decimal::Decimal;

/// Case-insensitive substring test used for all section label matching.
pub(crate) fn label_has(label: &str, needle: &str) -> bool {
    label.to_uppercase().contains(needle)
}

/// Build the summary from a balance sheet report.
///
/// Each bucket holds the last matching section's total; sections are not
/// summed. `net_income` is never populated from report data.
pub fn build_summary(report: &Report) -> Result<SummaryBalanceSheet, CheckError> {
    let mut s = SummaryBalanceSheet::default();

    for (label, total) in report.section_totals() {
        if label_has(label, "ASSET") {
            if label_has(label, "CURRENT") {
                s.assets.current = total;
            } else if label_has(label, "FIXED") || label_has(label, "PROPERTY") {
                s.assets.fixed = total;
            } else {
                s.assets.other = total;
            }
        } else if label_has(label, "LIABILITY") {
            if label_has(label, "CURRENT") {
                s.liabilities.current = total;
            } else {
                s.liabilities.long_term = total;
            }
        } else if label_has(label, "EQUITY") {
            if label_has(label, "RETAINED") {
                s.equity.retained_earnings = total;
            } else {
                s.equity.owners_equity = total;
            }
        }
    }

    s.total_assets = sum(
        &[s.assets.current, s.assets.fixed, s.assets.other],
        "total assets",
    )?;
    s.total_liabilities = sum(
        &[s.liabilities.current, s.liabilities.long_term],
        "total liabilities",
    )?;
    s.total_equity = sum(
        &[s.equity.owners_equity, s.equity.retained_earnings],
        "total equity",
    )?;
    Ok(s)
}

/// Build the summary from locally tracked accounts. Buckets are sums and
/// current-period net income counts toward total equity.
pub fn summary_from_accounts(accounts: &[Account]) -> Result<SummaryBalanceSheet, CheckError> {
    let mut s = SummaryBalanceSheet::default();

    for a in accounts {
        let current = a.subcategory.as_deref() == Some("current");
        let (bucket, what) = match a.account_type.as_str() {
            "asset" if current => (&mut s.assets.current, "current assets"),
            "asset" => (&mut s.assets.fixed, "fixed assets"),
            "liability" if current => (&mut s.liabilities.current, "current liabilities"),
            "liability" => (&mut s.liabilities.long_term, "long-term liabilities"),
            "equity" => {
                let name = a.name.to_lowercase();
                if name.contains("retained") {
                    (&mut s.equity.retained_earnings, "retained earnings")
                } else if name.contains("net income") {
                    (&mut s.equity.net_income, "net income")
                } else {
                    (&mut s.equity.owners_equity, "owners' equity")
                }
            }
            _ => continue,
        };
        *bucket = sum(&[*bucket, a.balance], what)?;
    }

    s.total_assets = sum(
        &[s.assets.current, s.assets.fixed, s.assets.other],
        "total assets",
    )?;
    s.total_liabilities = sum(
        &[s.liabilities.current, s.liabilities.long_term],
        "total liabilities",
    )?;
    s.total_equity = sum(
        &[
            s.equity.owners_equity,
            s.equity.retained_earnings,
            s.equity.net_income,
        ],
        "total equity",
    )?;
    Ok(s)
}

fn sum(parts: &[Decimal], what: &'static str) -> Result<Decimal, CheckError> {
    parts.iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(*v).ok_or(CheckError::Overflow(what))
    })
}

/// |assets - (liabilities + equity)| < 0.01. A difference too large to
/// represent is not balanced.
pub fn is_balanced(s: &SummaryBalanceSheet) -> bool {
    s.total_liabilities
        .checked_add(s.total_equity)
        .and_then(|claims| s.total_assets.checked_sub(claims))
        .is_some_and(|diff| diff.abs() < Decimal::new(1, 2))
}
