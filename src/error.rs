// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::path::PathBuf;

/// Errors raised while building or using [`RuntimeSettings`](crate::settings::RuntimeSettings).
///
/// Every variant is produced at load time (or when TLS material is read on
/// demand), never later while the settings are in use.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A value was present but unusable.
    #[error("invalid configuration value for {key} ({value:?}): {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// A user entry carries something that is not a bcrypt hash.
    #[error("password for user '{username}' is not a bcrypt hash")]
    InvalidPasswordHash { username: String },

    #[error("admin user '{0}' is declared more than once")]
    DuplicateUser(String),

    /// Only one half of the key/cert pair was supplied.
    #[error("TLS is only partially configured: {missing} is not set")]
    IncompleteTls { missing: &'static str },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TLS material rejected: {0}")]
    Tls(String),

    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("settings document is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("runtime settings have already been installed")]
    AlreadyInstalled,
}

impl ConfigError {
    pub fn invalid(key: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// The environment variable or settings key the error refers to, if any.
    pub fn key(&self) -> Option<&'static str> {
        match self {
            ConfigError::InvalidValue { key, .. } => Some(*key),
            ConfigError::IncompleteTls { missing } => Some(*missing),
            _ => None,
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_sets_key_and_message() {
        let err = ConfigError::invalid("PORT", "abc", "not a number");
        assert_eq!(err.key(), Some("PORT"));
        assert_eq!(
            err.to_string(),
            r#"invalid configuration value for PORT ("abc"): not a number"#
        );
    }

    #[test]
    fn incomplete_tls_names_missing_variable() {
        let err = ConfigError::IncompleteTls {
            missing: "TLS_CERT_PATH",
        };
        assert_eq!(err.key(), Some("TLS_CERT_PATH"));
        assert!(err.to_string().contains("TLS_CERT_PATH"));
    }

    #[test]
    fn other_errors_have_no_key() {
        assert_eq!(ConfigError::AlreadyInstalled.key(), None);
        assert_eq!(ConfigError::DuplicateUser("admin".into()).key(), None);
    }
}
