// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Editor administrator authentication.
//!
//! ## Credential Model
//!
//! - Passwords are only ever stored as bcrypt hashes
//! - A plaintext value is rejected when the settings are built
//! - `Debug` output never includes the digest
//! - Permissions are plain strings; `*` grants everything

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_ADMIN_PASSWORD_HASH, DEFAULT_ADMIN_PERMISSIONS, DEFAULT_ADMIN_USERNAME,
};
use crate::error::{ConfigError, ConfigResult};

/// Authentication strategy for the editor and admin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// Username/password pairs declared in the settings.
    Credentials,
}

impl Default for AuthType {
    fn default() -> Self {
        AuthType::Credentials
    }
}

/// Length of `$2b$NN$` + 22 salt chars + 31 digest chars.
const BCRYPT_HASH_LEN: usize = 60;
const BCRYPT_MIN_COST: u32 = 4;
const BCRYPT_MAX_COST: u32 = 31;

/// A bcrypt password hash.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Accept `s` only if it has the shape of a bcrypt hash.
    pub fn parse(s: &str) -> Option<PasswordHash> {
        if is_bcrypt_format(s) {
            Some(PasswordHash(s.to_string()))
        } else {
            None
        }
    }

    /// Hash `password` with the given bcrypt cost.
    pub fn generate(password: &str, cost: u32) -> ConfigResult<PasswordHash> {
        let hash = bcrypt::hash(password, cost)?;
        Ok(PasswordHash(hash))
    }

    /// Check a candidate password against this hash.
    pub fn verify(&self, password: &str) -> ConfigResult<bool> {
        Ok(bcrypt::verify(password, &self.0)?)
    }

    /// Work factor encoded in the hash.
    pub fn cost(&self) -> u32 {
        // Format was checked on construction: `$2?$NN$...`
        self.0[4..6].parse().unwrap_or(0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PasswordHash({}<redacted>)", &self.0[..7])
    }
}

impl TryFrom<String> for PasswordHash {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_bcrypt_format(&value) {
            Ok(PasswordHash(value))
        } else {
            Err(ConfigError::invalid(
                "adminAuth.users.password",
                "<redacted>",
                "not a bcrypt hash",
            ))
        }
    }
}

impl From<PasswordHash> for String {
    fn from(hash: PasswordHash) -> Self {
        hash.0
    }
}

fn is_bcrypt_format(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != BCRYPT_HASH_LEN {
        return false;
    }
    if !s.starts_with("$2") || !matches!(bytes[2], b'a' | b'b' | b'x' | b'y') || bytes[3] != b'$' {
        return false;
    }
    if bytes[6] != b'$' || !bytes[4..6].iter().all(u8::is_ascii_digit) {
        return false;
    }
    let cost: u32 = match s[4..6].parse() {
        Ok(cost) => cost,
        Err(_) => return false,
    };
    if !(BCRYPT_MIN_COST..=BCRYPT_MAX_COST).contains(&cost) {
        return false;
    }
    bytes[7..]
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || *b == b'.' || *b == b'/')
}

/// Permission string attached to an admin user.
///
/// - `*` - full access
/// - `read` - read-only access to every scope (`flows.read`, `nodes.read`, ...)
/// - otherwise a comma-separated list of exact scopes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(String);

impl Permissions {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn unrestricted() -> Self {
        Self("*".to_string())
    }

    pub fn is_unrestricted(&self) -> bool {
        self.entries().any(|p| p == "*")
    }

    /// Check whether these permissions cover `scope`.
    pub fn grants(&self, scope: &str) -> bool {
        self.entries().any(|p| match p {
            "*" => true,
            "read" => scope.ends_with(".read"),
            other => other == scope,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn entries(&self) -> impl Iterator<Item = &str> {
        self.0.split(',').map(str::trim).filter(|p| !p.is_empty())
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::unrestricted()
    }
}

/// One entry of `adminAuth.users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub username: String,
    #[serde(rename = "password")]
    pub password_hash: PasswordHash,
    pub permissions: Permissions,
}

impl Default for AdminUser {
    /// The built-in administrator with unrestricted permissions.
    fn default() -> Self {
        Self {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            password_hash: PasswordHash(DEFAULT_ADMIN_PASSWORD_HASH.to_string()),
            permissions: Permissions::new(DEFAULT_ADMIN_PERMISSIONS),
        }
    }
}

impl AdminUser {
    pub fn uses_builtin_password(&self) -> bool {
        self.password_hash.as_str() == DEFAULT_ADMIN_PASSWORD_HASH
    }
}

/// `adminAuth` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAuth {
    #[serde(rename = "type")]
    pub auth_type: AuthType,
    pub users: Vec<AdminUser>,
}

impl Default for AdminAuth {
    fn default() -> Self {
        Self::credentials(vec![AdminUser::default()])
    }
}

impl AdminAuth {
    pub fn credentials(users: Vec<AdminUser>) -> Self {
        Self {
            auth_type: AuthType::Credentials,
            users,
        }
    }

    /// Users declared with the built-in password hash.
    pub fn builtin_password_users(&self) -> impl Iterator<Item = &AdminUser> {
        self.users.iter().filter(|u| u.uses_builtin_password())
    }

    pub fn find_user(&self, username: &str) -> Option<&AdminUser> {
        self.users.iter().find(|u| u.username == username)
    }

    /// Check the user list: at least one user, non-empty names, no duplicates,
    /// and a permission string on every entry.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.users.is_empty() {
            return Err(ConfigError::invalid(
                "adminAuth.users",
                "[]",
                "credentials authentication needs at least one user",
            ));
        }

        let mut seen = HashSet::new();
        for user in &self.users {
            if user.username.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "adminAuth.users.username",
                    user.username.clone(),
                    "username must not be empty",
                ));
            }
            if !seen.insert(user.username.as_str()) {
                return Err(ConfigError::DuplicateUser(user.username.clone()));
            }
            if user.permissions.entries().next().is_none() {
                return Err(ConfigError::invalid(
                    "adminAuth.users.permissions",
                    user.permissions.as_str(),
                    format!("user '{}' has no permissions", user.username),
                ));
            }
        }
        Ok(())
    }
}
