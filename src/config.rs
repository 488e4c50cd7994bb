// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Runtime configuration read from the environment (and `.env`).

use std::env;
use std::path::PathBuf;

const SANDBOX_URL: &str = "https://sandbox-quickbooks.api.intuit.com";
const PRODUCTION_URL: &str = "https://quickbooks.api.intuit.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    pub qbo: QboConfig,
}

#[derive(Debug, Clone)]
pub struct QboConfig {
    pub base_url: String,
    pub realm_id: Option<String>,
    pub access_token: Option<String>,
}

impl Config {
    /// Load `.env` if present, then read from the process environment.
    pub fn from_env() -> Self {
        // A missing .env file is the normal case.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|k| env::var(k).ok())
    }

    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let base_url = non_empty("QBO_BASE_URL").unwrap_or_else(|| {
            match non_empty("QBO_ENVIRONMENT").as_deref() {
                Some("production") => PRODUCTION_URL.to_string(),
                _ => SANDBOX_URL.to_string(),
            }
        });

        Self {
            db_path: non_empty("BALSHEET_DB").map(PathBuf::from),
            log_level: non_empty("BALSHEET_LOG").unwrap_or_else(|| "info".to_string()),
            qbo: QboConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                realm_id: non_empty("QBO_REALM_ID"),
                access_token: non_empty("QBO_ACCESS_TOKEN"),
            },
        }
    }
}
