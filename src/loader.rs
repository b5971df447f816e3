// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Builds [`RuntimeSettings`] from the environment and compiled-in defaults.
//!
//! Loading is a pure function of an [`EnvSource`] and a [`PortPolicy`]: it
//! reads variables, applies defaults, and validates the result before
//! returning it. Values are trimmed; blank variables count as unset.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::config::{
    ADMIN_PASSWORD_HASH_ENV, ADMIN_PERMISSIONS_ENV, ADMIN_USERNAME_ENV, DEFAULT_NODES_SUBDIR,
    DEFAULT_PORT, LOG_AUDIT_ENV, LOG_LEVEL_ENV, LOG_METRICS_ENV, NODES_DIR_ENV, PORT_ENV,
    PROJECTS_ENABLED_ENV, TLS_CERT_PATH_ENV, TLS_KEY_PATH_ENV, USER_DIR_ENV,
};
use crate::error::{ConfigError, ConfigResult};
use crate::paths::{resolve_nodes_dir, validate_dir};
use crate::settings::{
    AdminAuth, AdminUser, ConsoleLogging, EditorFeatures, LogLevel, LoggingSettings,
    PasswordHash, Permissions, RuntimeSettings,
};
use crate::tls::TlsSettings;

/// Read access to environment variables.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for [(&str, &str)] {
    fn var(&self, key: &str) -> Option<String> {
        self.iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    }
}

impl<const N: usize> EnvSource for [(&str, &str); N] {
    fn var(&self, key: &str) -> Option<String> {
        self[..].var(key)
    }
}

/// What to do with a `PORT` value that is not a usable port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortPolicy {
    /// Fall back to the default port and log a warning.
    #[default]
    Lenient,
    /// Fail with [`ConfigError::InvalidValue`].
    Strict,
}

/// Load settings from the process environment with the lenient port policy.
pub fn load() -> ConfigResult<RuntimeSettings> {
    load_from(&ProcessEnv, PortPolicy::default())
}

/// Load settings from `env`.
pub fn load_from<E: EnvSource + ?Sized>(
    env: &E,
    policy: PortPolicy,
) -> ConfigResult<RuntimeSettings> {
    let defaults = RuntimeSettings::default();

    let listen_port = resolve_port(non_empty(env, PORT_ENV), policy)?;

    let user_dir = non_empty(env, USER_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or(defaults.user_dir);
    validate_dir(USER_DIR_ENV, &user_dir)?;

    let nodes_dir = match non_empty(env, NODES_DIR_ENV) {
        Some(dir) => resolve_nodes_dir(&user_dir, &PathBuf::from(dir)),
        None => user_dir.join(DEFAULT_NODES_SUBDIR),
    };

    let settings = RuntimeSettings {
        listen_port,
        user_dir,
        logging: LoggingSettings {
            console: load_console_logging(env)?,
        },
        admin_auth: load_admin_auth(env)?,
        editor: EditorFeatures::new(
            parse_bool(env, PROJECTS_ENABLED_ENV)?
                .unwrap_or(defaults.editor.projects_enabled()),
        ),
        nodes_dir,
        tls: load_tls(env)?,
    };
    settings.validate()?;

    for user in settings.admin_auth.builtin_password_users() {
        warn!(
            username = %user.username,
            "Admin user has the built-in password hash; set {ADMIN_PASSWORD_HASH_ENV}"
        );
    }
    debug!(
        port = settings.listen_port,
        user_dir = %settings.user_dir.display(),
        nodes_dir = %settings.nodes_dir.display(),
        level = %settings.logging.console.level,
        tls = settings.tls_enabled(),
        "Runtime settings loaded"
    );

    Ok(settings)
}

/// Only the `logging.console` section.
///
/// Lets a binary configure its own subscriber before the full load runs.
pub fn load_console_logging<E: EnvSource + ?Sized>(env: &E) -> ConfigResult<ConsoleLogging> {
    let level = match non_empty(env, LOG_LEVEL_ENV) {
        Some(raw) => LogLevel::parse(&raw).ok_or_else(|| {
            ConfigError::invalid(
                LOG_LEVEL_ENV,
                raw,
                "expected one of error, warn, info, debug, trace",
            )
        })?,
        None => LogLevel::default(),
    };
    Ok(ConsoleLogging {
        level,
        metrics: parse_bool(env, LOG_METRICS_ENV)?.unwrap_or(false),
        audit: parse_bool(env, LOG_AUDIT_ENV)?.unwrap_or(false),
    })
}

fn load_admin_auth<E: EnvSource + ?Sized>(env: &E) -> ConfigResult<AdminAuth> {
    let builtin = AdminUser::default();

    let username = non_empty(env, ADMIN_USERNAME_ENV).unwrap_or(builtin.username);
    let password_hash = match non_empty(env, ADMIN_PASSWORD_HASH_ENV) {
        Some(raw) => PasswordHash::parse(&raw)
            .ok_or_else(|| ConfigError::InvalidPasswordHash {
                username: username.clone(),
            })?,
        None => builtin.password_hash,
    };
    let permissions = non_empty(env, ADMIN_PERMISSIONS_ENV)
        .map(Permissions::new)
        .unwrap_or(builtin.permissions);

    Ok(AdminAuth::credentials(vec![AdminUser {
        username,
        password_hash,
        permissions,
    }]))
}

fn load_tls<E: EnvSource + ?Sized>(env: &E) -> ConfigResult<Option<TlsSettings>> {
    match (non_empty(env, TLS_KEY_PATH_ENV), non_empty(env, TLS_CERT_PATH_ENV)) {
        (Some(key), Some(cert)) => Ok(Some(TlsSettings::new(key, cert))),
        (None, None) => Ok(None),
        (Some(_), None) => Err(ConfigError::IncompleteTls {
            missing: TLS_CERT_PATH_ENV,
        }),
        (None, Some(_)) => Err(ConfigError::IncompleteTls {
            missing: TLS_KEY_PATH_ENV,
        }),
    }
}

fn resolve_port(raw: Option<String>, policy: PortPolicy) -> ConfigResult<u16> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_PORT);
    };
    match parse_port(&raw) {
        Ok(port) => Ok(port),
        Err(reason) => match policy {
            PortPolicy::Strict => Err(ConfigError::invalid(PORT_ENV, raw, reason)),
            PortPolicy::Lenient => {
                warn!(
                    value = %raw,
                    reason,
                    default = DEFAULT_PORT,
                    "Ignoring unusable {PORT_ENV}, using default port"
                );
                Ok(DEFAULT_PORT)
            }
        },
    }
}

fn parse_port(raw: &str) -> Result<u16, &'static str> {
    let value: u32 = raw.trim().parse().map_err(|_| "not a number")?;
    match u16::try_from(value) {
        Ok(0) => Err("port must be between 1 and 65535"),
        Ok(port) => Ok(port),
        Err(_) => Err("port must be between 1 and 65535"),
    }
}

fn parse_bool<E: EnvSource + ?Sized>(env: &E, key: &'static str) -> ConfigResult<Option<bool>> {
    let Some(raw) = non_empty(env, key) else {
        return Ok(None);
    };
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::invalid(key, raw, "expected true or false")),
    }
}

/// Trimmed value of `key`, or `None` when unset or blank.
fn non_empty<E: EnvSource + ?Sized>(env: &E, key: &str) -> Option<String> {
    env.var(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const NO_ENV: [(&str, &str); 0] = [];

    #[test]
    fn empty_environment_yields_defaults() {
        let settings = load_from(&NO_ENV, PortPolicy::Lenient).unwrap();
        assert_eq!(settings, RuntimeSettings::default());
    }

    #[test]
    fn default_admin_list_has_one_unrestricted_user() {
        let settings = load_from(&NO_ENV, PortPolicy::Lenient).unwrap();
        let users = &settings.admin_auth.users;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].permissions.as_str(), "*");
        assert!(settings.tls.is_none());
    }

    #[test]
    fn loading_twice_gives_equal_records() {
        let env = [
            ("PORT", "3000"),
            ("USER_DIR", "/srv/flows"),
            ("LOG_LEVEL", "trace"),
            ("TLS_KEY_PATH", "/certs/key.pem"),
            ("TLS_CERT_PATH", "/certs/cert.pem"),
        ];
        let first = load_from(&env, PortPolicy::Strict).unwrap();
        let second = load_from(&env, PortPolicy::Strict).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn port_from_environment() {
        let settings = load_from(&[("PORT", "3000")], PortPolicy::Lenient).unwrap();
        assert_eq!(settings.listen_port, 3000);

        let settings = load_from(&[("PORT", " 8080 ")], PortPolicy::Strict).unwrap();
        assert_eq!(settings.listen_port, 8080);
    }

    #[test]
    fn lenient_policy_falls_back_on_bad_port() {
        for bad in ["abc", "0", "70000", "-1", "18.80"] {
            let settings = load_from(&[("PORT", bad)], PortPolicy::Lenient).unwrap();
            assert_eq!(settings.listen_port, 1880, "{bad}");
        }
    }

    #[test]
    fn strict_policy_rejects_bad_port() {
        for bad in ["abc", "0", "70000"] {
            let err = load_from(&[("PORT", bad)], PortPolicy::Strict).unwrap_err();
            assert_eq!(err.key(), Some("PORT"), "{bad}");
        }
        // unset is still the default, even when strict
        assert_eq!(load_from(&NO_ENV, PortPolicy::Strict).unwrap().listen_port, 1880);
        assert_eq!(
            load_from(&[("PORT", "")], PortPolicy::Strict).unwrap().listen_port,
            1880
        );
    }

    #[test]
    fn nodes_dir_follows_user_dir() {
        let settings = load_from(&[("USER_DIR", "/srv/flows")], PortPolicy::Lenient).unwrap();
        assert_eq!(settings.user_dir, Path::new("/srv/flows"));
        assert_eq!(settings.nodes_dir, Path::new("/srv/flows/nodes"));

        let env = [("USER_DIR", "/srv/flows"), ("NODES_DIR", "extra")];
        let settings = load_from(&env, PortPolicy::Lenient).unwrap();
        assert_eq!(settings.nodes_dir, Path::new("/srv/flows/extra"));

        let env = [("NODES_DIR", "/opt/nodes")];
        let settings = load_from(&env, PortPolicy::Lenient).unwrap();
        assert_eq!(settings.nodes_dir, Path::new("/opt/nodes"));
    }

    #[test]
    fn path_values_are_trimmed() {
        let env = [
            ("USER_DIR", " /srv/flows "),
            ("NODES_DIR", "\textra\n"),
            ("TLS_KEY_PATH", " /certs/key.pem"),
            ("TLS_CERT_PATH", "/certs/cert.pem "),
        ];
        let settings = load_from(&env, PortPolicy::Strict).unwrap();
        assert_eq!(settings.user_dir, Path::new("/srv/flows"));
        assert_eq!(settings.nodes_dir, Path::new("/srv/flows/extra"));
        let tls = settings.tls.unwrap();
        assert_eq!(tls.key_path, Path::new("/certs/key.pem"));
        assert_eq!(tls.cert_path, Path::new("/certs/cert.pem"));
    }

    #[test]
    fn relative_user_dir_is_rejected() {
        let err = load_from(&[("USER_DIR", "data")], PortPolicy::Lenient).unwrap_err();
        assert_eq!(err.key(), Some("USER_DIR"));
    }

    #[test]
    fn console_logging_overrides() {
        let env = [("LOG_LEVEL", "Debug"), ("LOG_METRICS", "true"), ("LOG_AUDIT", "1")];
        let console = load_console_logging(&env).unwrap();
        assert_eq!(console.level, LogLevel::Debug);
        assert!(console.metrics);
        assert!(console.audit);

        let err = load_console_logging(&[("LOG_LEVEL", "loud")]).unwrap_err();
        assert_eq!(err.key(), Some("LOG_LEVEL"));

        let err = load_console_logging(&[("LOG_AUDIT", "maybe")]).unwrap_err();
        assert_eq!(err.key(), Some("LOG_AUDIT"));
    }

    #[test]
    fn projects_flag_override() {
        let settings = load_from(&[("PROJECTS_ENABLED", "off")], PortPolicy::Lenient).unwrap();
        assert!(!settings.editor.projects_enabled());
    }

    #[test]
    fn admin_overrides() {
        let hash = PasswordHash::generate("s3cret", 4).unwrap();
        let env = [
            ("ADMIN_USERNAME", "operator"),
            ("ADMIN_PASSWORD_HASH", hash.as_str()),
            ("ADMIN_PERMISSIONS", "read"),
        ];
        let settings = load_from(&env, PortPolicy::Lenient).unwrap();
        let users = &settings.admin_auth.users;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "operator");
        assert!(users[0].password_hash.verify("s3cret").unwrap());
        assert!(!users[0].permissions.is_unrestricted());
        assert_eq!(settings.admin_auth.builtin_password_users().count(), 0);
    }

    #[test]
    fn plaintext_admin_password_is_rejected() {
        let env = [("ADMIN_USERNAME", "operator"), ("ADMIN_PASSWORD_HASH", "hunter2")];
        match load_from(&env, PortPolicy::Lenient) {
            Err(ConfigError::InvalidPasswordHash { username }) => assert_eq!(username, "operator"),
            other => panic!("expected InvalidPasswordHash, got {other:?}"),
        }
    }

    #[test]
    fn tls_requires_both_paths() {
        let env = [("TLS_KEY_PATH", "/certs/key.pem"), ("TLS_CERT_PATH", "/certs/cert.pem")];
        let tls = load_from(&env, PortPolicy::Lenient).unwrap().tls.unwrap();
        assert_eq!(tls.key_path, Path::new("/certs/key.pem"));
        assert_eq!(tls.cert_path, Path::new("/certs/cert.pem"));

        let err = load_from(&[("TLS_KEY_PATH", "/certs/key.pem")], PortPolicy::Lenient)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::IncompleteTls {
                missing: "TLS_CERT_PATH"
            }
        ));

        let err = load_from(&[("TLS_CERT_PATH", "/certs/cert.pem")], PortPolicy::Lenient)
            .unwrap_err();
        assert_eq!(err.key(), Some("TLS_KEY_PATH"));
    }

    #[test]
    fn hash_map_source_reads_owned_values() {
        let env: HashMap<String, String> =
            [("PORT".to_string(), "4000".to_string())].into_iter().collect();
        assert_eq!(load_from(&env, PortPolicy::Strict).unwrap().listen_port, 4000);
    }

    #[test]
    fn last_duplicate_entry_wins() {
        let env = [("PORT", "3000"), ("PORT", "3001")];
        assert_eq!(load_from(&env, PortPolicy::Strict).unwrap().listen_port, 3001);
    }
}
