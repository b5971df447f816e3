// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Flow Runtime Settings
//!
//! Builds the immutable settings record handed to the flow automation
//! runtime at startup: listen port, user and nodes directories, console
//! logging, editor admin credentials, editor features, and optional TLS.
//!
//! ## Modules
//!
//! - `config` - Environment variable names and defaults
//! - `loader` - Environment → settings, with eager validation
//! - `settings` - The settings record and its sections
//! - `paths` - User directory layout
//! - `tls` - HTTPS key/cert material
//! - `readiness` - Directory and TLS checks before handing off to the runtime
//! - `telemetry` - Tracing subscriber setup
//! - `state` - Install-once process-wide holder

pub mod config;
pub mod error;
pub mod loader;
pub mod paths;
pub mod readiness;
pub mod settings;
pub mod state;
pub mod telemetry;
pub mod tls;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load, load_from, EnvSource, PortPolicy, ProcessEnv};
pub use settings::RuntimeSettings;
