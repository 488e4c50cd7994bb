// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    Correction,
    Reclassification,
    WriteOff,
    Info,
    OpenItem,
}

impl AdjustmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentKind::Correction => "correction",
            AdjustmentKind::Reclassification => "reclassification",
            AdjustmentKind::WriteOff => "write_off",
            AdjustmentKind::Info => "info",
            AdjustmentKind::OpenItem => "open_item",
        }
    }
}

impl fmt::Display for AdjustmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdjustmentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "correction" => Ok(AdjustmentKind::Correction),
            "reclassification" => Ok(AdjustmentKind::Reclassification),
            "write_off" => Ok(AdjustmentKind::WriteOff),
            "info" => Ok(AdjustmentKind::Info),
            "open_item" => Ok(AdjustmentKind::OpenItem),
            other => Err(anyhow::anyhow!("Unknown adjustment type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub account_name: String,
    pub original_amount: Decimal,
    pub adjusted_amount: Decimal,
    pub adjustment_amount: Decimal,
    pub reason: String,
    pub adjustment_type: AdjustmentKind,
}

/// Scalar result reported by a reconciliation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckValue {
    Flag(bool),
    Amount(Decimal),
}

impl CheckValue {
    pub fn as_amount(&self) -> Option<Decimal> {
        match self {
            CheckValue::Amount(d) => Some(*d),
            CheckValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            CheckValue::Flag(b) => Some(*b),
            CheckValue::Amount(_) => None,
        }
    }
}

impl fmt::Display for CheckValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckValue::Flag(b) => write!(f, "{}", b),
            CheckValue::Amount(d) => write!(f, "{:.2}", d),
        }
    }
}

pub type CheckMetrics = BTreeMap<String, CheckValue>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assets {
    pub current: Decimal,
    pub fixed: Decimal,
    pub other: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Liabilities {
    pub current: Decimal,
    pub long_term: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equity {
    pub owners_equity: Decimal,
    pub retained_earnings: Decimal,
    pub net_income: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryBalanceSheet {
    pub assets: Assets,
    pub liabilities: Liabilities,
    pub equity: Equity,
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub total_equity: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub as_of: NaiveDate,
    pub summary_balance_sheet: SummaryBalanceSheet,
    pub adjustments: Vec<Adjustment>,
    pub reconciliation_checks: CheckMetrics,
    pub is_balanced: bool,
    /// One line per check that failed internally and was skipped.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: i64,
    pub period: String,
    pub date: NaiveDate,
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub total_equity: Decimal,
    pub is_balanced: bool,
    pub adjustments_count: i64,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub account_type: String, // asset | liability | equity
    pub subcategory: Option<String>, // current | non_current
    pub balance: Decimal,
    pub currency: String,
    pub status: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationNote {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub amount: Decimal,
    pub note_type: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    pub action: String,
    pub details: Option<String>,
    pub realm_id: Option<String>,
    pub created_at: String,
}

pub const ACCOUNT_TYPES: &[&str] = &["asset", "liability", "equity"];
pub const SUBCATEGORIES: &[&str] = &["current", "non_current"];
pub const ACCOUNT_STATUSES: &[&str] = &["reconciled", "pending", "adjusted", "open_item"];
pub const NOTE_TYPES: &[&str] = &["adjustment", "open_item", "info"];
pub const NOTE_STATUSES: &[&str] = &["pending", "resolved", "reviewed"];
