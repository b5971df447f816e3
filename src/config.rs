// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! when building [`RuntimeSettings`](crate::settings::RuntimeSettings).
//! Configuration is read from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `PORT` | Editor/HTTP listen port | `1880` |
//! | `USER_DIR` | Runtime working state (flows, credentials, projects) | `/data` |
//! | `NODES_DIR` | Extra node modules directory | `<USER_DIR>/nodes` |
//! | `LOG_LEVEL` | Console verbosity (`error`..`trace`) | `info` |
//! | `LOG_METRICS` | Emit metrics events | `false` |
//! | `LOG_AUDIT` | Emit audit events | `false` |
//! | `ADMIN_USERNAME` | Editor administrator login | `admin` |
//! | `ADMIN_PASSWORD_HASH` | bcrypt hash of the administrator password | built-in hash |
//! | `ADMIN_PERMISSIONS` | Administrator permission string | `*` |
//! | `PROJECTS_ENABLED` | Enable the editor projects feature | `true` |
//! | `TLS_KEY_PATH` | PEM private key (enables HTTPS with `TLS_CERT_PATH`) | unset |
//! | `TLS_CERT_PATH` | PEM certificate chain | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | derived from `LOG_LEVEL` |
//! | `STRICT_PORT` | Reject an unusable `PORT` instead of using the default | `false` |

/// Environment variable name for the listen port.
pub const PORT_ENV: &str = "PORT";

/// Port used when `PORT` is unset (or unusable under the lenient policy).
pub const DEFAULT_PORT: u16 = 1880;

/// Environment variable name for the user directory.
///
/// # Default
/// `/data` (the volume mounted into the runtime container)
pub const USER_DIR_ENV: &str = "USER_DIR";

pub const DEFAULT_USER_DIR: &str = "/data";

/// Environment variable name for the nodes directory.
/// A relative value is resolved against the user directory.
pub const NODES_DIR_ENV: &str = "NODES_DIR";

/// Nodes directory name below the user directory.
pub const DEFAULT_NODES_SUBDIR: &str = "nodes";

pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
pub const LOG_METRICS_ENV: &str = "LOG_METRICS";
pub const LOG_AUDIT_ENV: &str = "LOG_AUDIT";

pub const ADMIN_USERNAME_ENV: &str = "ADMIN_USERNAME";
pub const ADMIN_PASSWORD_HASH_ENV: &str = "ADMIN_PASSWORD_HASH";
pub const ADMIN_PERMISSIONS_ENV: &str = "ADMIN_PERMISSIONS";

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Built-in administrator hash, used only until `ADMIN_PASSWORD_HASH` is set.
///
/// Well-formed bcrypt with a random salt and digest that no password was ever
/// hashed into, so the built-in login cannot be used. The loader logs a
/// warning whenever this value ends up in the settings.
pub const DEFAULT_ADMIN_PASSWORD_HASH: &str =
    "$2b$10$K3P2xu9KGnO.ShdCmU6ViOeJGSM4f.i.gQa15tfea7kCQk0RZlDQu";

/// Unrestricted access.
pub const DEFAULT_ADMIN_PERMISSIONS: &str = "*";

pub const PROJECTS_ENABLED_ENV: &str = "PROJECTS_ENABLED";

pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";

/// Logging output format for the binary (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
