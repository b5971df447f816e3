// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path utilities for the runtime's user directory layout.
//!
//! ```text
//! /data/
//!   flows.json             # Flow definitions
//!   flows_cred.json        # Encrypted node credentials
//!   .config.runtime.json   # Runtime-managed state
//!   package.json           # Installed node modules
//!   lib/                   # Shared function library
//!   projects/{name}/       # Editor projects (when enabled)
//!   nodes/                 # Extra node modules (default nodes directory)
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::DEFAULT_NODES_SUBDIR;
use crate::error::{ConfigError, ConfigResult};

/// Locations inside the user directory plus the nodes directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    root: PathBuf,
    nodes: PathBuf,
}

impl RuntimePaths {
    /// Paths for `user_dir`, with the nodes directory in its default place.
    pub fn new(user_dir: impl AsRef<Path>) -> Self {
        let root = user_dir.as_ref().to_path_buf();
        let nodes = root.join(DEFAULT_NODES_SUBDIR);
        Self { root, nodes }
    }

    pub fn with_nodes_dir(user_dir: impl AsRef<Path>, nodes_dir: impl AsRef<Path>) -> Self {
        let root = user_dir.as_ref().to_path_buf();
        let nodes = resolve_nodes_dir(&root, nodes_dir.as_ref());
        Self { root, nodes }
    }

    /// User directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn nodes_dir(&self) -> &Path {
        &self.nodes
    }

    // ========== Flow Files ==========

    pub fn flows_file(&self) -> PathBuf {
        self.root.join("flows.json")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.root.join("flows_cred.json")
    }

    pub fn runtime_config_file(&self) -> PathBuf {
        self.root.join(".config.runtime.json")
    }

    // ========== Modules ==========

    pub fn package_json(&self) -> PathBuf {
        self.root.join("package.json")
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.root.join("lib")
    }

    // ========== Projects ==========

    pub fn projects_dir(&self) -> PathBuf {
        self.root.join("projects")
    }

    pub fn project_dir(&self, name: &str) -> PathBuf {
        self.projects_dir().join(name)
    }

    /// Inspect both directories without failing.
    pub fn check_directories(&self) -> DirectoryReport {
        DirectoryReport {
            user_dir: DirStatus::of(&self.root),
            nodes_dir: DirStatus::of(&self.nodes),
        }
    }
}

/// A relative nodes directory lives below the user directory.
pub fn resolve_nodes_dir(user_dir: &Path, nodes_dir: &Path) -> PathBuf {
    if nodes_dir.is_absolute() {
        nodes_dir.to_path_buf()
    } else {
        user_dir.join(nodes_dir)
    }
}

/// A directory setting must be non-empty and absolute.
pub fn validate_dir(key: &'static str, path: &Path) -> ConfigResult<()> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::invalid(key, "", "path must not be empty"));
    }
    if !path.is_absolute() {
        return Err(ConfigError::invalid(
            key,
            path.display().to_string(),
            "path must be absolute",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirStatus {
    Ok,
    Missing,
    NotADirectory,
}

impl DirStatus {
    fn of(path: &Path) -> Self {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => DirStatus::Ok,
            Ok(_) => DirStatus::NotADirectory,
            Err(_) => DirStatus::Missing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DirectoryReport {
    pub user_dir: DirStatus,
    pub nodes_dir: DirStatus,
}

impl DirectoryReport {
    pub fn is_ready(&self) -> bool {
        self.user_dir == DirStatus::Ok && self.nodes_dir == DirStatus::Ok
    }
}
