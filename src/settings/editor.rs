// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Editor feature flags (`editorTheme` block).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectsFeature {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorFeatures {
    /// Git-backed projects in the editor.
    pub projects: ProjectsFeature,
}

impl EditorFeatures {
    pub fn new(projects_enabled: bool) -> Self {
        Self {
            projects: ProjectsFeature {
                enabled: projects_enabled,
            },
        }
    }

    pub fn projects_enabled(&self) -> bool {
        self.projects.enabled
    }
}

impl Default for EditorFeatures {
    fn default() -> Self {
        Self::new(true)
    }
}
