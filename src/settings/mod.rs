// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Settings
//!
//! The single record handed to the host runtime at startup. It is built once
//! by the [`loader`](crate::loader) and never mutated afterwards.
//!
//! ## Serialized Form
//!
//! The record serializes to the key names the host runtime reads:
//!
//! ```text
//! {
//!   "uiPort": 1880,
//!   "userDir": "/data",
//!   "logging": { "console": { "level": "info", "metrics": false, "audit": false } },
//!   "adminAuth": { "type": "credentials", "users": [ { "username", "password", "permissions" } ] },
//!   "editorTheme": { "projects": { "enabled": true } },
//!   "nodesDir": "/data/nodes",
//!   "https": { "key": "...", "cert": "..." }   # only when TLS is enabled
//! }
//! ```

pub mod admin;
pub mod editor;
pub mod logging;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_NODES_SUBDIR, DEFAULT_PORT, DEFAULT_USER_DIR};
use crate::error::{ConfigError, ConfigResult};
use crate::paths::{validate_dir, RuntimePaths};
use crate::tls::TlsSettings;

pub use admin::{AdminAuth, AdminUser, AuthType, PasswordHash, Permissions};
pub use editor::EditorFeatures;
pub use logging::{ConsoleLogging, LogLevel, LoggingSettings};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeSettings {
    /// Port the editor and HTTP nodes listen on.
    #[serde(rename = "uiPort")]
    pub listen_port: u16,
    /// Runtime working state (flows, credentials, projects).
    #[serde(rename = "userDir")]
    pub user_dir: PathBuf,
    pub logging: LoggingSettings,
    #[serde(rename = "adminAuth")]
    pub admin_auth: AdminAuth,
    #[serde(rename = "editorTheme")]
    pub editor: EditorFeatures,
    /// Where extra node modules are discovered.
    #[serde(rename = "nodesDir")]
    pub nodes_dir: PathBuf,
    #[serde(rename = "https", default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsSettings>,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        let user_dir = PathBuf::from(DEFAULT_USER_DIR);
        Self {
            listen_port: DEFAULT_PORT,
            nodes_dir: user_dir.join(DEFAULT_NODES_SUBDIR),
            user_dir,
            logging: LoggingSettings::default(),
            admin_auth: AdminAuth::default(),
            editor: EditorFeatures::default(),
            tls: None,
        }
    }
}

impl RuntimeSettings {
    /// Check every invariant of the record.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.listen_port == 0 {
            return Err(ConfigError::invalid(
                "uiPort",
                "0",
                "port must be between 1 and 65535",
            ));
        }
        validate_dir("userDir", &self.user_dir)?;
        validate_dir("nodesDir", &self.nodes_dir)?;
        self.admin_auth.validate()?;
        if let Some(tls) = &self.tls {
            if tls.key_path.as_os_str().is_empty() {
                return Err(ConfigError::invalid("https.key", "", "path must not be empty"));
            }
            if tls.cert_path.as_os_str().is_empty() {
                return Err(ConfigError::invalid("https.cert", "", "path must not be empty"));
            }
        }
        Ok(())
    }

    pub fn tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    pub fn paths(&self) -> RuntimePaths {
        RuntimePaths::with_nodes_dir(&self.user_dir, &self.nodes_dir)
    }

    /// Render the document consumed by the host runtime.
    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a previously rendered document and re-check it.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let settings: RuntimeSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }
}
