// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Reconciliation of accounting service reports.
//!
//! A run fetches the reports once, then runs six independent checks in a
//! fixed order. Each check yields adjustments and metrics or fails on its
//! own; a failed check is logged and skipped, never fatal to the run.

use crate::error::{CheckError, ReconcileError, SourceError};
use crate::models::{Adjustment, AdjustmentKind, CheckMetrics, CheckValue, RunResult};
use crate::report::{BankAccounts, ChartOfAccounts, OpenPayables, OpenReceivables, Report};
use crate::source::ReportSource;
use crate::summary::{build_summary, is_balanced, label_has};
use crate::utils::fmt_grouped;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

/// Account types that should never carry a negative balance.
const NON_NEGATIVE_TYPES: &[&str] = &["Accounts Receivable", "Cash", "Inventory"];

fn tolerance() -> Decimal {
    Decimal::new(1, 2)
}

fn large_bank_balance() -> Decimal {
    Decimal::from(1_000_000)
}

fn high_receivables() -> Decimal {
    Decimal::from(500_000)
}

pub struct Reconciler<'a, S: ReportSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: ReportSource + ?Sized> Reconciler<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Run every check against the reports for `as_of` (today when absent).
    pub fn reconcile(&self, as_of: Option<NaiveDate>) -> Result<RunResult, ReconcileError> {
        let date = as_of.unwrap_or_else(|| Local::now().date_naive());
        tracing::info!(as_of = %date, "starting reconciliation");

        let trial_balance = self.source.trial_balance(as_of);
        let balance_sheet = self.source.balance_sheet(as_of);
        let chart = self.source.chart_of_accounts();
        let open_ar = self.source.open_receivables();
        let open_ap = self.source.open_payables();
        let banks = self.source.bank_accounts();

        let trial_balance = required("trial balance", trial_balance)?;
        let balance_sheet = required("balance sheet", balance_sheet)?;
        let chart = required("chart of accounts", chart)?;
        let open_ar = optional("open receivables", open_ar);
        let open_ap = optional("open payables", open_ap);
        let banks = optional("bank accounts", banks);

        let mut run = Run::default();
        run.apply("trial_balance", validate_trial_balance(&trial_balance));
        run.apply("balance_sheet_totals", verify_balance_sheet_totals(&balance_sheet));
        run.apply("account_balances", check_account_balances(&chart));
        run.apply("bank_accounts", reconcile_bank_accounts(banks.as_ref()));
        run.apply(
            "open_items",
            verify_open_items(open_ar.as_ref(), open_ap.as_ref()),
        );
        run.apply("retained_earnings", validate_retained_earnings(&balance_sheet));

        let summary = build_summary(&balance_sheet).map_err(ReconcileError::Summary)?;
        let balanced = is_balanced(&summary);

        tracing::info!(
            as_of = %date,
            adjustments = run.adjustments.len(),
            balanced,
            failed_checks = run.diagnostics.len(),
            "reconciliation completed"
        );

        Ok(RunResult {
            as_of: date,
            summary_balance_sheet: summary,
            adjustments: run.adjustments,
            reconciliation_checks: run.metrics,
            is_balanced: balanced,
            diagnostics: run.diagnostics,
        })
    }
}

fn required<T>(
    report: &'static str,
    fetched: Result<Option<T>, SourceError>,
) -> Result<T, ReconcileError> {
    match fetched {
        Ok(Some(v)) => Ok(v),
        Ok(None) => Err(ReconcileError::DataUnavailable {
            report,
            reason: None,
        }),
        Err(e) => Err(ReconcileError::DataUnavailable {
            report,
            reason: Some(e.to_string()),
        }),
    }
}

fn optional<T>(report: &'static str, fetched: Result<Option<T>, SourceError>) -> Option<T> {
    match fetched {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(report, error = %e, "optional report unavailable; skipping its checks");
            None
        }
    }
}

#[derive(Default)]
struct Run {
    adjustments: Vec<Adjustment>,
    metrics: CheckMetrics,
    diagnostics: Vec<String>,
}

impl Run {
    fn apply(&mut self, check: &'static str, outcome: Result<Findings, CheckError>) {
        match outcome {
            Ok(f) => {
                tracing::debug!(check, adjustments = f.adjustments.len(), "check finished");
                self.adjustments.extend(f.adjustments);
                for (name, value) in f.metrics {
                    self.metrics.insert(name.to_string(), value);
                }
            }
            Err(e) => {
                tracing::warn!(check, error = %e, "check failed; continuing");
                self.diagnostics.push(format!("{check}: {e}"));
            }
        }
    }
}

/// What a single check found.
#[derive(Debug, Default)]
struct Findings {
    adjustments: Vec<Adjustment>,
    metrics: Vec<(&'static str, CheckValue)>,
}

impl Findings {
    fn metric(&mut self, name: &'static str, value: CheckValue) {
        self.metrics.push((name, value));
    }

    fn push(&mut self, adj: Adjustment) {
        self.adjustments.push(adj);
    }
}

fn add(acc: Decimal, v: Decimal, what: &'static str) -> Result<Decimal, CheckError> {
    acc.checked_add(v).ok_or(CheckError::Overflow(what))
}

fn abs_diff(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, CheckError> {
    a.checked_sub(b)
        .map(|d| d.abs())
        .ok_or(CheckError::Overflow(what))
}

/// Plug for an out-of-balance difference: original = diff, adjusted = 0.
fn balancing_correction(account: &str, subject: &str, difference: Decimal) -> Adjustment {
    Adjustment {
        account_name: account.to_string(),
        original_amount: difference,
        adjusted_amount: Decimal::ZERO,
        adjustment_amount: -difference,
        reason: format!("{} out of balance by ${:.2}", subject, difference.round_dp(2)),
        adjustment_type: AdjustmentKind::Correction,
    }
}

fn review_note(account: &str, amount: Decimal, reason: String) -> Adjustment {
    Adjustment {
        account_name: account.to_string(),
        original_amount: amount,
        adjusted_amount: amount,
        adjustment_amount: Decimal::ZERO,
        reason,
        adjustment_type: AdjustmentKind::Info,
    }
}

fn validate_trial_balance(tb: &Report) -> Result<Findings, CheckError> {
    let mut debits = Decimal::ZERO;
    let mut credits = Decimal::ZERO;

    for col in tb.rows.iter().flat_map(|r| r.columns()) {
        let Some(value) = col.value else { continue };
        match col.id.as_deref() {
            Some("Debit") => debits = add(debits, value, "trial balance debits")?,
            Some("Credit") => credits = add(credits, value, "trial balance credits")?,
            _ => {}
        }
    }

    let difference = abs_diff(debits, credits, "trial balance difference")?;
    let mut f = Findings::default();
    f.metric("trial_balance_difference", CheckValue::Amount(difference));
    if difference > tolerance() {
        f.push(balancing_correction(
            "Trial Balance Adjustment",
            "Trial balance",
            difference,
        ));
    }
    Ok(f)
}

fn verify_balance_sheet_totals(bs: &Report) -> Result<Findings, CheckError> {
    let mut assets = Decimal::ZERO;
    let mut liabilities = Decimal::ZERO;
    let mut equity = Decimal::ZERO;

    // Last matching section wins per category.
    for (label, total) in bs.section_totals() {
        if label_has(label, "ASSET") {
            assets = total;
        } else if label_has(label, "LIABILITY") {
            liabilities = total;
        } else if label_has(label, "EQUITY") {
            equity = total;
        }
    }

    let claims = add(liabilities, equity, "liabilities plus equity")?;
    let difference = abs_diff(assets, claims, "balance sheet difference")?;
    let mut f = Findings::default();
    f.metric("balance_sheet_difference", CheckValue::Amount(difference));
    if difference > tolerance() {
        f.push(balancing_correction(
            "Balance Sheet Adjustment",
            "Balance sheet",
            difference,
        ));
    }
    Ok(f)
}

fn check_account_balances(chart: &ChartOfAccounts) -> Result<Findings, CheckError> {
    let mut f = Findings::default();
    for account in &chart.accounts {
        let balance = account.current_balance;
        if !NON_NEGATIVE_TYPES.contains(&account.account_type.as_str())
            || balance >= Decimal::ZERO
        {
            continue;
        }
        let magnitude = balance.abs();
        // Doubled delta: reverses the negative and books the positive at once.
        let delta = magnitude
            .checked_mul(Decimal::TWO)
            .ok_or(CheckError::Overflow("account balance correction"))?;
        f.push(Adjustment {
            account_name: account.name.clone(),
            original_amount: balance,
            adjusted_amount: magnitude,
            adjustment_amount: delta,
            reason: format!("Negative balance in {} account", account.account_type),
            adjustment_type: AdjustmentKind::Correction,
        });
    }
    Ok(f)
}

/// Only flags unusually large balances; there is no bank feed to match against.
fn reconcile_bank_accounts(banks: Option<&BankAccounts>) -> Result<Findings, CheckError> {
    let mut f = Findings::default();
    let Some(banks) = banks else { return Ok(f) };

    for account in &banks.accounts {
        let balance = account.current_balance;
        if balance.abs() > large_bank_balance() {
            f.push(review_note(
                &account.name,
                balance,
                format!(
                    "Large bank balance requires manual review: ${}",
                    fmt_grouped(balance)
                ),
            ));
        }
    }
    f.metric("bank_reconciled", CheckValue::Flag(f.adjustments.is_empty()));
    Ok(f)
}

fn verify_open_items(
    open_ar: Option<&OpenReceivables>,
    open_ap: Option<&OpenPayables>,
) -> Result<Findings, CheckError> {
    let mut total_ar = Decimal::ZERO;
    let mut total_ap = Decimal::ZERO;

    for customer in open_ar.map(|r| r.customers.as_slice()).unwrap_or_default() {
        total_ar = add(total_ar, customer.balance, "open receivables")?;
    }
    for vendor in open_ap.map(|p| p.vendors.as_slice()).unwrap_or_default() {
        total_ap = add(total_ap, vendor.balance, "open payables")?;
    }

    let mut f = Findings::default();
    f.metric("total_open_ar", CheckValue::Amount(total_ar));
    f.metric("total_open_ap", CheckValue::Amount(total_ap));
    // Payables are reported but never flagged.
    if total_ar > high_receivables() {
        f.push(review_note(
            "Accounts Receivable",
            total_ar,
            format!("High A/R balance requires review: ${}", fmt_grouped(total_ar)),
        ));
    }
    Ok(f)
}

fn validate_retained_earnings(bs: &Report) -> Result<Findings, CheckError> {
    let retained = bs
        .section_totals()
        .find(|(label, _)| label_has(label, "RETAINED"))
        .map(|(_, total)| total)
        .unwrap_or(Decimal::ZERO);

    let mut f = Findings::default();
    if retained < Decimal::ZERO {
        f.push(review_note(
            "Retained Earnings",
            retained,
            format!("Negative retained earnings: ${}", fmt_grouped(retained)),
        ));
    }
    Ok(f)
}
