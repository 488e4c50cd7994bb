// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use balsheet::commands::reconcile;
use balsheet::error::{ReconcileError, SourceError};
use balsheet::models::{AdjustmentKind, CheckValue};
use balsheet::reconcile::Reconciler;
use balsheet::report::{
    BankAccount, BankAccounts, ChartOfAccounts, Column, LedgerAccount, OpenItem, OpenPayables,
    OpenReceivables, Report, Row,
};
use balsheet::source::ReportSource;
use balsheet::{audit, db};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn trial_balance(debit: &str, credit: &str) -> Report {
    Report::new(vec![
        Row::leaf(
            Some("Checking"),
            vec![
                Column::new(Some("Debit"), Some(dec(debit))),
                Column::new(Some("Credit"), None),
            ],
        ),
        Row::leaf(
            Some("Equity"),
            vec![
                Column::new(Some("Debit"), None),
                Column::new(Some("Credit"), Some(dec(credit))),
            ],
        ),
    ])
}

fn balance_sheet(sections: &[(&str, &str)]) -> Report {
    let children = sections
        .iter()
        .map(|(label, total)| {
            Row::leaf(
                Some(*label),
                vec![Column::new(None, None), Column::new(None, Some(dec(total)))],
            )
        })
        .collect();
    Report::new(vec![Row::group(Some("Balance Sheet"), vec![], children)])
}

fn ledger(name: &str, typ: &str, balance: &str) -> LedgerAccount {
    LedgerAccount {
        name: name.into(),
        account_type: typ.into(),
        current_balance: dec(balance),
    }
}

fn item(name: &str, balance: &str) -> OpenItem {
    OpenItem {
        name: name.into(),
        balance: dec(balance),
    }
}

/// In-memory source. `None` fields are missing reports; `failing` names a
/// report whose fetch errors.
#[derive(Default)]
struct StubSource {
    tb: Option<Report>,
    bs: Option<Report>,
    chart: Option<ChartOfAccounts>,
    ar: Option<OpenReceivables>,
    ap: Option<OpenPayables>,
    banks: Option<BankAccounts>,
    failing: Option<&'static str>,
}

impl StubSource {
    fn clean() -> Self {
        Self {
            tb: Some(trial_balance("100000.00", "100000.00")),
            bs: Some(balance_sheet(&[
                ("Total Assets", "500000"),
                ("Total Liability", "200000"),
                ("Total Equity", "300000"),
            ])),
            chart: Some(ChartOfAccounts::default()),
            ..Default::default()
        }
    }

    fn fetch<T: Clone>(&self, name: &str, v: &Option<T>) -> Result<Option<T>, SourceError> {
        if self.failing == Some(name) {
            return Err(SourceError::Io {
                path: name.into(),
                source: std::io::Error::other("connection reset"),
            });
        }
        Ok(v.clone())
    }
}

impl ReportSource for StubSource {
    fn trial_balance(&self, _: Option<NaiveDate>) -> Result<Option<Report>, SourceError> {
        self.fetch("tb", &self.tb)
    }
    fn balance_sheet(&self, _: Option<NaiveDate>) -> Result<Option<Report>, SourceError> {
        self.fetch("bs", &self.bs)
    }
    fn chart_of_accounts(&self) -> Result<Option<ChartOfAccounts>, SourceError> {
        self.fetch("chart", &self.chart)
    }
    fn open_receivables(&self) -> Result<Option<OpenReceivables>, SourceError> {
        self.fetch("ar", &self.ar)
    }
    fn open_payables(&self) -> Result<Option<OpenPayables>, SourceError> {
        self.fetch("ap", &self.ap)
    }
    fn bank_accounts(&self) -> Result<Option<BankAccounts>, SourceError> {
        self.fetch("banks", &self.banks)
    }
}

fn as_of() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2025, 3, 31)
}

#[test]
fn balanced_trial_balance_has_no_adjustment() {
    let src = StubSource::clean();
    let r = Reconciler::new(&src).reconcile(as_of()).unwrap();
    assert_eq!(
        r.reconciliation_checks["trial_balance_difference"],
        CheckValue::Amount(Decimal::ZERO)
    );
    assert!(r.adjustments.is_empty());
    assert_eq!(r.as_of, as_of().unwrap());
}

#[test]
fn unbalanced_trial_balance_gets_correction() {
    let src = StubSource {
        tb: Some(trial_balance("100500.00", "100000.00")),
        ..StubSource::clean()
    };
    let r = Reconciler::new(&src).reconcile(as_of()).unwrap();
    assert_eq!(
        r.reconciliation_checks["trial_balance_difference"].as_amount(),
        Some(dec("500.00"))
    );
    assert_eq!(r.adjustments.len(), 1);
    let adj = &r.adjustments[0];
    assert_eq!(adj.account_name, "Trial Balance Adjustment");
    assert_eq!(adj.adjustment_amount, dec("-500.00"));
    assert_eq!(adj.adjustment_type, AdjustmentKind::Correction);
}

#[test]
fn negative_cash_account_is_corrected_with_double_delta() {
    let src = StubSource {
        chart: Some(ChartOfAccounts {
            accounts: vec![
                ledger("Petty Cash", "Cash", "-200.00"),
                ledger("Credit Card", "Credit Card", "-900.00"),
            ],
        }),
        ..StubSource::clean()
    };
    let r = Reconciler::new(&src).reconcile(as_of()).unwrap();
    assert_eq!(r.adjustments.len(), 1);
    let adj = &r.adjustments[0];
    assert_eq!(adj.account_name, "Petty Cash");
    assert_eq!(adj.original_amount, dec("-200.00"));
    assert_eq!(adj.adjusted_amount, dec("200.00"));
    assert_eq!(adj.adjustment_amount, dec("400.00"));
    assert_eq!(adj.adjustment_type, AdjustmentKind::Correction);
    assert_eq!(adj.reason, "Negative balance in Cash account");
}

#[test]
fn balanced_sheet_reports_balanced_without_correction() {
    let src = StubSource::clean();
    let r = Reconciler::new(&src).reconcile(as_of()).unwrap();
    assert!(r.is_balanced);
    assert_eq!(
        r.reconciliation_checks["balance_sheet_difference"],
        CheckValue::Amount(Decimal::ZERO)
    );
    assert_eq!(r.summary_balance_sheet.total_assets, dec("500000"));
    assert_eq!(r.summary_balance_sheet.total_liabilities, dec("200000"));
    assert_eq!(r.summary_balance_sheet.total_equity, dec("300000"));
}

#[test]
fn missing_chart_of_accounts_fails_and_persists_nothing() {
    let conn = conn();
    let src = StubSource {
        chart: None,
        ..StubSource::clean()
    };
    let err = reconcile::run(&conn, &src, as_of(), true, Some("realm-1")).unwrap_err();
    assert_eq!(err.to_string(), "required report unavailable: chart of accounts");

    let snapshots: i64 = conn
        .query_row("SELECT COUNT(*) FROM snapshots", [], |r| r.get(0))
        .unwrap();
    assert_eq!(snapshots, 0);

    let entries = audit::recent(&conn, 10).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, audit::RECONCILIATION_FAILED);
    assert_eq!(entries[0].realm_id.as_deref(), Some("realm-1"));
}

#[test]
fn failing_mandatory_fetch_is_data_unavailable() {
    let src = StubSource {
        failing: Some("bs"),
        ..StubSource::clean()
    };
    match Reconciler::new(&src).reconcile(as_of()) {
        Err(ReconcileError::DataUnavailable { report, reason }) => {
            assert_eq!(report, "balance sheet");
            assert!(reason.unwrap().contains("connection reset"));
        }
        other => panic!("expected DataUnavailable, got {:?}", other),
    }
}

#[test]
fn failing_optional_fetch_is_treated_as_absent() {
    let src = StubSource {
        failing: Some("ar"),
        ap: Some(OpenPayables {
            vendors: vec![item("Acme", "120.50")],
        }),
        ..StubSource::clean()
    };
    let r = Reconciler::new(&src).reconcile(as_of()).unwrap();
    assert_eq!(r.reconciliation_checks["total_open_ar"], CheckValue::Amount(Decimal::ZERO));
    assert_eq!(r.reconciliation_checks["total_open_ap"], CheckValue::Amount(dec("120.50")));
}

#[test]
fn optional_reports_absent_yield_zero_metrics_and_no_bank_flag() {
    let src = StubSource::clean();
    let r = Reconciler::new(&src).reconcile(as_of()).unwrap();
    assert_eq!(r.reconciliation_checks["total_open_ar"], CheckValue::Amount(Decimal::ZERO));
    assert_eq!(r.reconciliation_checks["total_open_ap"], CheckValue::Amount(Decimal::ZERO));
    assert!(!r.reconciliation_checks.contains_key("bank_reconciled"));
    assert!(r.diagnostics.is_empty());
}

#[test]
fn bank_threshold_is_strictly_greater_than_one_million() {
    let src = StubSource {
        banks: Some(BankAccounts {
            accounts: vec![
                BankAccount {
                    name: "Operating".into(),
                    current_balance: dec("1000000"),
                },
                BankAccount {
                    name: "Overdrawn".into(),
                    current_balance: dec("-1000001"),
                },
            ],
        }),
        ..StubSource::clean()
    };
    let r = Reconciler::new(&src).reconcile(as_of()).unwrap();
    assert_eq!(r.adjustments.len(), 1);
    let adj = &r.adjustments[0];
    assert_eq!(adj.account_name, "Overdrawn");
    assert_eq!(adj.adjustment_type, AdjustmentKind::Info);
    assert_eq!(adj.adjustment_amount, Decimal::ZERO);
    assert_eq!(adj.reason, "Large bank balance requires manual review: $-1,000,001.00");
    assert_eq!(r.reconciliation_checks["bank_reconciled"], CheckValue::Flag(false));
}

#[test]
fn receivables_threshold_and_payables_never_flagged() {
    let at_limit = StubSource {
        ar: Some(OpenReceivables {
            customers: vec![item("A", "300000"), item("B", "200000")],
        }),
        ap: Some(OpenPayables {
            vendors: vec![item("Big Supplier", "9000000")],
        }),
        ..StubSource::clean()
    };
    let r = Reconciler::new(&at_limit).reconcile(as_of()).unwrap();
    assert!(r.adjustments.is_empty());
    assert_eq!(r.reconciliation_checks["total_open_ap"].as_amount(), Some(dec("9000000")));

    let over = StubSource {
        ar: Some(OpenReceivables {
            customers: vec![item("A", "300000"), item("B", "200000.01")],
        }),
        ..StubSource::clean()
    };
    let r = Reconciler::new(&over).reconcile(as_of()).unwrap();
    assert_eq!(r.adjustments.len(), 1);
    assert_eq!(r.adjustments[0].account_name, "Accounts Receivable");
    assert_eq!(r.adjustments[0].adjustment_type, AdjustmentKind::Info);
    assert_eq!(r.adjustments[0].adjustment_amount, Decimal::ZERO);
    assert_eq!(
        r.adjustments[0].reason,
        "High A/R balance requires review: $500,000.01"
    );
}

#[test]
fn adjustments_follow_check_order() {
    let src = StubSource {
        tb: Some(trial_balance("10", "0")),
        chart: Some(ChartOfAccounts {
            accounts: vec![ledger("Stock", "Inventory", "-5")],
        }),
        bs: Some(balance_sheet(&[
            ("Total Assets", "100"),
            ("Total Liability", "40"),
            ("Total Equity", "60"),
            ("Retained Earnings", "-25"),
        ])),
        ..StubSource::clean()
    };
    let r = Reconciler::new(&src).reconcile(as_of()).unwrap();
    let names: Vec<&str> = r.adjustments.iter().map(|a| a.account_name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Trial Balance Adjustment", "Stock", "Retained Earnings"]
    );
}

#[test]
fn balanced_flag_is_independent_of_totals_check() {
    // The totals check keeps the last asset section; the summary adds buckets.
    let src = StubSource {
        bs: Some(balance_sheet(&[
            ("Current Assets", "100"),
            ("Total Assets", "100"),
            ("Total Liability", "100"),
        ])),
        ..StubSource::clean()
    };
    let r = Reconciler::new(&src).reconcile(as_of()).unwrap();
    assert_eq!(
        r.reconciliation_checks["balance_sheet_difference"],
        CheckValue::Amount(Decimal::ZERO)
    );
    assert_eq!(r.summary_balance_sheet.total_assets, dec("200"));
    assert!(!r.is_balanced);
}

#[test]
fn successful_run_persists_and_audits() {
    let conn = conn();
    let src = StubSource {
        tb: Some(trial_balance("100500.00", "100000.00")),
        ..StubSource::clean()
    };
    let (result, id) = reconcile::run(&conn, &src, as_of(), true, None).unwrap();
    let id = id.unwrap();
    let stored = balsheet::store::SnapshotStore::new(&conn)
        .adjustments(id)
        .unwrap();
    assert_eq!(stored, result.adjustments);

    let entries = audit::recent(&conn, 10).unwrap();
    assert_eq!(entries[0].action, audit::RECONCILIATION_COMPLETED);
}

#[test]
fn dry_run_stores_nothing() {
    let conn = conn();
    let src = StubSource::clean();
    let (_, id) = reconcile::run(&conn, &src, as_of(), false, None).unwrap();
    assert!(id.is_none());
    let snapshots: i64 = conn
        .query_row("SELECT COUNT(*) FROM snapshots", [], |r| r.get(0))
        .unwrap();
    assert_eq!(snapshots, 0);
}

#[test]
fn overflowing_summary_fails_run_without_panicking() {
    let conn = conn();
    let huge = "50000000000000000000000000000";
    let src = StubSource {
        bs: Some(balance_sheet(&[("Current Assets", huge), ("Fixed Assets", huge)])),
        ..StubSource::clean()
    };
    match Reconciler::new(&src).reconcile(as_of()) {
        Err(ReconcileError::Summary(e)) => {
            assert_eq!(e.to_string(), "decimal overflow while computing total assets");
        }
        other => panic!("expected summary error, got {:?}", other),
    }

    assert!(reconcile::run(&conn, &src, as_of(), true, None).is_err());
    let snapshots: i64 = conn
        .query_row("SELECT COUNT(*) FROM snapshots", [], |r| r.get(0))
        .unwrap();
    assert_eq!(snapshots, 0);
    assert_eq!(audit::recent(&conn, 1).unwrap()[0].action, audit::RECONCILIATION_FAILED);
}
