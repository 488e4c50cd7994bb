// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Where report payloads come from.
//!
//! `Ok(None)` means the source has no such report; `Err` means fetching it
//! failed. The reconciler decides which of those are fatal.

use crate::config::QboConfig;
use crate::error::SourceError;
use crate::report::{BankAccounts, ChartOfAccounts, OpenPayables, OpenReceivables, Report};
use chrono::NaiveDate;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use std::fs;
use std::path::{Path, PathBuf};

pub trait ReportSource {
    fn trial_balance(&self, as_of: Option<NaiveDate>) -> Result<Option<Report>, SourceError>;
    fn balance_sheet(&self, as_of: Option<NaiveDate>) -> Result<Option<Report>, SourceError>;
    fn chart_of_accounts(&self) -> Result<Option<ChartOfAccounts>, SourceError>;
    fn open_receivables(&self) -> Result<Option<OpenReceivables>, SourceError>;
    fn open_payables(&self) -> Result<Option<OpenPayables>, SourceError>;
    fn bank_accounts(&self) -> Result<Option<BankAccounts>, SourceError>;
}

fn parse<T>(
    what: &'static str,
    body: Option<String>,
    f: fn(&str) -> serde_json::Result<T>,
) -> Result<Option<T>, SourceError> {
    body.map(|b| f(&b).map_err(|source| SourceError::Json { what, source }))
        .transpose()
}

/// QuickBooks Online style company API over blocking HTTP.
pub struct QboSource {
    client: reqwest::blocking::Client,
    company_url: String,
    access_token: String,
}

impl QboSource {
    pub fn new(cfg: &QboConfig) -> Result<Self, SourceError> {
        let realm = cfg
            .realm_id
            .as_deref()
            .ok_or(SourceError::NotConfigured("QBO_REALM_ID"))?;
        let token = cfg
            .access_token
            .clone()
            .ok_or(SourceError::NotConfigured("QBO_ACCESS_TOKEN"))?;
        Ok(Self {
            client: crate::utils::http_client()?,
            company_url: format!("{}/v3/company/{}", cfg.base_url, realm),
            access_token: token,
        })
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Option<String>, SourceError> {
        let url = format!("{}/{}", self.company_url, path);
        tracing::debug!(url = %url, "fetching report");
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .header(ACCEPT, "application/json")
            .query(query)
            .send()?;
        if resp.status() == StatusCode::NOT_FOUND {
            tracing::debug!(url = %url, "report not found");
            return Ok(None);
        }
        Ok(Some(resp.error_for_status()?.text()?))
    }

    fn query(&self, sql: &str) -> Result<Option<String>, SourceError> {
        self.get("query", &[("query", sql.to_string())])
    }
}

fn date_param(key: &'static str, as_of: Option<NaiveDate>) -> Vec<(&'static str, String)> {
    as_of.map(|d| vec![(key, d.to_string())]).unwrap_or_default()
}

impl ReportSource for QboSource {
    fn trial_balance(&self, as_of: Option<NaiveDate>) -> Result<Option<Report>, SourceError> {
        let body = self.get("reports/TrialBalance", &date_param("asofdate", as_of))?;
        parse("trial balance", body, Report::from_json)
    }

    fn balance_sheet(&self, as_of: Option<NaiveDate>) -> Result<Option<Report>, SourceError> {
        let body = self.get("reports/BalanceSheet", &date_param("as_of_date", as_of))?;
        parse("balance sheet", body, Report::from_json)
    }

    fn chart_of_accounts(&self) -> Result<Option<ChartOfAccounts>, SourceError> {
        let body = self.query("SELECT * FROM Account WHERE Active = true")?;
        parse("chart of accounts", body, ChartOfAccounts::from_json)
    }

    fn open_receivables(&self) -> Result<Option<OpenReceivables>, SourceError> {
        let body = self.query("SELECT * FROM Customer WHERE Balance > 0")?;
        parse("open receivables", body, OpenReceivables::from_json)
    }

    fn open_payables(&self) -> Result<Option<OpenPayables>, SourceError> {
        let body = self.query("SELECT * FROM Vendor WHERE Balance > 0")?;
        parse("open payables", body, OpenPayables::from_json)
    }

    fn bank_accounts(&self) -> Result<Option<BankAccounts>, SourceError> {
        let body = self.query("SELECT * FROM Account WHERE AccountType = 'Bank'")?;
        parse("bank accounts", body, BankAccounts::from_json)
    }
}

/// Reads captured payloads from `<dir>/<report>.json`. A missing file is a
/// missing report.
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub const TRIAL_BALANCE: &'static str = "trial_balance.json";
    pub const BALANCE_SHEET: &'static str = "balance_sheet.json";
    pub const CHART_OF_ACCOUNTS: &'static str = "chart_of_accounts.json";
    pub const OPEN_RECEIVABLES: &'static str = "open_receivables.json";
    pub const OPEN_PAYABLES: &'static str = "open_payables.json";
    pub const BANK_ACCOUNTS: &'static str = "bank_accounts.json";

    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn read(&self, file: &str) -> Result<Option<String>, SourceError> {
        let path = self.dir.join(file);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "payload file absent");
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| SourceError::Io { path, source })
    }
}

impl ReportSource for DirSource {
    fn trial_balance(&self, _as_of: Option<NaiveDate>) -> Result<Option<Report>, SourceError> {
        parse("trial balance", self.read(Self::TRIAL_BALANCE)?, Report::from_json)
    }

    fn balance_sheet(&self, _as_of: Option<NaiveDate>) -> Result<Option<Report>, SourceError> {
        parse("balance sheet", self.read(Self::BALANCE_SHEET)?, Report::from_json)
    }

    fn chart_of_accounts(&self) -> Result<Option<ChartOfAccounts>, SourceError> {
        parse(
            "chart of accounts",
            self.read(Self::CHART_OF_ACCOUNTS)?,
            ChartOfAccounts::from_json,
        )
    }

    fn open_receivables(&self) -> Result<Option<OpenReceivables>, SourceError> {
        parse(
            "open receivables",
            self.read(Self::OPEN_RECEIVABLES)?,
            OpenReceivables::from_json,
        )
    }

    fn open_payables(&self) -> Result<Option<OpenPayables>, SourceError> {
        parse(
            "open payables",
            self.read(Self::OPEN_PAYABLES)?,
            OpenPayables::from_json,
        )
    }

    fn bank_accounts(&self) -> Result<Option<BankAccounts>, SourceError> {
        parse(
            "bank accounts",
            self.read(Self::BANK_ACCOUNTS)?,
            BankAccounts::from_json,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn dir_source_missing_file_is_none_and_bad_json_errors() {
        let dir = tempdir().unwrap();
        let src = DirSource::new(dir.path());
        assert!(src.trial_balance(None).unwrap().is_none());

        fs::write(dir.path().join(DirSource::BALANCE_SHEET), "{not json").unwrap();
        let err = src.balance_sheet(None).unwrap_err();
        assert!(err.to_string().contains("malformed balance sheet payload"));

        fs::write(
            dir.path().join(DirSource::BANK_ACCOUNTS),
            r#"{"QueryResponse": {"Account": [{"Name": "Operating", "CurrentBalance": "2,000,000.00"}]}}"#,
        )
        .unwrap();
        let banks = src.bank_accounts().unwrap().unwrap();
        assert_eq!(banks.accounts[0].name, "Operating");
        assert_eq!(banks.accounts[0].current_balance.to_string(), "2000000.00");
    }

    #[test]
    fn qbo_source_requires_realm_and_token() {
        let cfg = QboConfig {
            base_url: "http://localhost".into(),
            realm_id: None,
            access_token: Some("t".into()),
        };
        let err = QboSource::new(&cfg).err().unwrap();
        assert!(matches!(err, SourceError::NotConfigured("QBO_REALM_ID")));
    }
}
