// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Startup readiness: do the configured directories exist and does the TLS
//! material load?

use serde::Serialize;

use crate::paths::DirectoryReport;
use crate::settings::RuntimeSettings;

/// Outcome of loading the TLS key/cert pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TlsStatus {
    Disabled,
    Ok,
    Error { message: String },
}

impl TlsStatus {
    pub fn is_ok(&self) -> bool {
        !matches!(self, TlsStatus::Error { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessReport {
    pub port: u16,
    pub directories: DirectoryReport,
    pub tls: TlsStatus,
}

impl ReadinessReport {
    pub fn is_ready(&self) -> bool {
        self.directories.is_ready() && self.tls.is_ok()
    }
}

/// Inspect directories and TLS material without failing.
pub fn check_readiness(settings: &RuntimeSettings) -> ReadinessReport {
    let directories = settings.paths().check_directories();
    if !directories.is_ready() {
        tracing::warn!(?directories, "Runtime directories are not ready");
    }

    let tls = match &settings.tls {
        None => TlsStatus::Disabled,
        Some(tls) => match tls.server_config() {
            Ok(_) => TlsStatus::Ok,
            Err(e) => {
                tracing::warn!(error = %e, "TLS material could not be loaded");
                TlsStatus::Error {
                    message: e.to_string(),
                }
            }
        },
    };

    ReadinessReport {
        port: settings.listen_port,
        directories,
        tls,
    }
}
