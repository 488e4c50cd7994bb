// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error types for the library seams. Command handlers use `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while fetching a report from a [`crate::source::ReportSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {what} payload: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("report source not configured: {0} is missing")]
    NotConfigured(&'static str),
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("required report unavailable: {report}{}", reason.as_deref().map(|r| format!(" ({r})")).unwrap_or_default())]
    DataUnavailable {
        report: &'static str,
        reason: Option<String>,
    },

    #[error("summary balance sheet unusable: {0}")]
    Summary(#[source] CheckError),
}

/// Internal failure of a single reconciliation check. Never aborts a run.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("decimal overflow while computing {0}")]
    Overflow(&'static str),
}
