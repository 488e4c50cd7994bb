// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Report payloads supplied by the accounting service.
//!
//! Trial balance and balance sheet reports arrive as nested rows; the query
//! endpoint returns flat lists of accounts, customers and vendors. Both are
//! parsed leniently: missing rows, columns or balances read as absent/zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// One labelled column value of a report row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Column {
    pub id: Option<String>,
    pub value: Option<Decimal>,
}

impl Column {
    pub fn new(id: Option<&str>, value: Option<Decimal>) -> Self {
        Self {
            id: id.map(str::to_string),
            value,
        }
    }

    pub fn value_or_zero(&self) -> Decimal {
        self.value.unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Leaf {
        group: Option<String>,
        columns: Vec<Column>,
    },
    Group {
        group: Option<String>,
        columns: Vec<Column>,
        children: Vec<Row>,
    },
}

impl Row {
    pub fn leaf(group: Option<&str>, columns: Vec<Column>) -> Self {
        Row::Leaf {
            group: group.map(str::to_string),
            columns,
        }
    }

    pub fn group(group: Option<&str>, columns: Vec<Column>, children: Vec<Row>) -> Self {
        Row::Group {
            group: group.map(str::to_string),
            columns,
            children,
        }
    }

    /// Group label, or "" when the row carries none.
    pub fn label(&self) -> &str {
        match self {
            Row::Leaf { group, .. } | Row::Group { group, .. } => group.as_deref().unwrap_or(""),
        }
    }

    pub fn columns(&self) -> &[Column] {
        match self {
            Row::Leaf { columns, .. } | Row::Group { columns, .. } => columns,
        }
    }

    pub fn children(&self) -> &[Row] {
        match self {
            Row::Leaf { .. } => &[],
            Row::Group { children, .. } => children,
        }
    }

    /// Value of the last column, zero when absent.
    pub fn total(&self) -> Decimal {
        self.columns()
            .last()
            .map(Column::value_or_zero)
            .unwrap_or(Decimal::ZERO)
    }
}

/// A trial balance or balance sheet report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    pub rows: Vec<Row>,
}

impl Report {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        let wire: WireReport = serde_json::from_str(s)?;
        Ok(wire.into())
    }

    /// Section subtotals: children of top-level groups carrying more than one
    /// column, yielded as (label, last column value).
    pub fn section_totals(&self) -> impl Iterator<Item = (&str, Decimal)> + '_ {
        self.rows
            .iter()
            .flat_map(Row::children)
            .filter(|sub| sub.columns().len() > 1)
            .map(|sub| (sub.label(), sub.total()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAccount {
    pub name: String,
    pub account_type: String,
    pub current_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChartOfAccounts {
    pub accounts: Vec<LedgerAccount>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenItem {
    pub name: String,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpenReceivables {
    pub customers: Vec<OpenItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpenPayables {
    pub vendors: Vec<OpenItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAccount {
    pub name: String,
    pub current_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BankAccounts {
    pub accounts: Vec<BankAccount>,
}

impl ChartOfAccounts {
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        let env: QueryEnvelope<AccountQuery> = serde_json::from_str(s)?;
        let accounts = env
            .query_response
            .unwrap_or_default()
            .account
            .into_iter()
            .map(|a| LedgerAccount {
                name: a.name,
                account_type: a.account_type,
                current_balance: a.current_balance.unwrap_or(Decimal::ZERO),
            })
            .collect();
        Ok(Self { accounts })
    }
}

impl BankAccounts {
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        let env: QueryEnvelope<AccountQuery> = serde_json::from_str(s)?;
        let accounts = env
            .query_response
            .unwrap_or_default()
            .account
            .into_iter()
            .map(|a| BankAccount {
                name: a.name,
                current_balance: a.current_balance.unwrap_or(Decimal::ZERO),
            })
            .collect();
        Ok(Self { accounts })
    }
}

impl OpenReceivables {
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        let env: QueryEnvelope<CustomerQuery> = serde_json::from_str(s)?;
        let customers = env
            .query_response
            .unwrap_or_default()
            .customer
            .into_iter()
            .map(WireParty::into_item)
            .collect();
        Ok(Self { customers })
    }
}

impl OpenPayables {
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        let env: QueryEnvelope<VendorQuery> = serde_json::from_str(s)?;
        let vendors = env
            .query_response
            .unwrap_or_default()
            .vendor
            .into_iter()
            .map(WireParty::into_item)
            .collect();
        Ok(Self { vendors })
    }
}

// Wire shapes

#[derive(Debug, Deserialize)]
struct WireReport {
    #[serde(rename = "Rows", default)]
    rows: Option<Vec<WireRow>>,
}

#[derive(Debug, Deserialize)]
struct WireRow {
    #[serde(default)]
    group: Option<String>,
    #[serde(rename = "ColData", default)]
    col_data: Option<Vec<WireColumn>>,
    #[serde(rename = "Rows", default)]
    rows: Option<Vec<WireRow>>,
}

#[derive(Debug, Deserialize)]
struct WireColumn {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    value: Option<Decimal>,
}

impl From<WireReport> for Report {
    fn from(w: WireReport) -> Self {
        Report::new(
            w.rows
                .unwrap_or_default()
                .into_iter()
                .map(Row::from)
                .collect(),
        )
    }
}

impl From<WireRow> for Row {
    fn from(w: WireRow) -> Self {
        let columns = w
            .col_data
            .unwrap_or_default()
            .into_iter()
            .map(|c| Column {
                id: c.id,
                value: c.value,
            })
            .collect();
        match w.rows {
            Some(children) => Row::Group {
                group: w.group,
                columns,
                children: children.into_iter().map(Row::from).collect(),
            },
            None => Row::Leaf {
                group: w.group,
                columns,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct QueryEnvelope<T> {
    #[serde(rename = "QueryResponse", default)]
    query_response: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
struct AccountQuery {
    #[serde(rename = "Account", default)]
    account: Vec<WireAccount>,
}

#[derive(Debug, Default, Deserialize)]
struct CustomerQuery {
    #[serde(rename = "Customer", default)]
    customer: Vec<WireParty>,
}

#[derive(Debug, Default, Deserialize)]
struct VendorQuery {
    #[serde(rename = "Vendor", default)]
    vendor: Vec<WireParty>,
}

#[derive(Debug, Deserialize)]
struct WireAccount {
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "AccountType", default)]
    account_type: String,
    #[serde(rename = "CurrentBalance", default, deserialize_with = "lenient_decimal")]
    current_balance: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct WireParty {
    #[serde(rename = "DisplayName", default)]
    name: String,
    #[serde(rename = "Balance", default, deserialize_with = "lenient_decimal")]
    balance: Option<Decimal>,
}

impl WireParty {
    fn into_item(self) -> OpenItem {
        OpenItem {
            name: self.name,
            balance: self.balance.unwrap_or(Decimal::ZERO),
        }
    }
}

/// Parse a money cell: JSON number or string, commas allowed, blank = absent.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    let parsed = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok();
    if parsed.is_none() {
        tracing::debug!(value = raw, "amount not representable; treated as absent");
    }
    parsed
}

fn lenient_decimal<'de, D>(d: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<serde_json::Value>::deserialize(d)?;
    Ok(match v {
        Some(serde_json::Value::Number(n)) => parse_amount(&n.to_string()),
        Some(serde_json::Value::String(s)) => parse_amount(&s),
        _ => None,
    })
}
