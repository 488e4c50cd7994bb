// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod audit_log;
pub mod exporter;
pub mod init;
pub mod notes;
pub mod reconcile;
pub mod reports;
pub mod snapshots;
