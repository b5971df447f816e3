// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Process-wide settings, installed once at startup.

use std::sync::OnceLock;

use crate::error::{ConfigError, ConfigResult};
use crate::settings::RuntimeSettings;

static SETTINGS: OnceLock<RuntimeSettings> = OnceLock::new();

/// Install the loaded settings. Fails if settings were already installed.
pub fn install(settings: RuntimeSettings) -> ConfigResult<&'static RuntimeSettings> {
    SETTINGS
        .set(settings)
        .map_err(|_| ConfigError::AlreadyInstalled)?;
    SETTINGS.get().ok_or(ConfigError::AlreadyInstalled)
}

/// The installed settings, if [`install`] has run.
pub fn get() -> Option<&'static RuntimeSettings> {
    SETTINGS.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: the holder is process-global.
    #[test]
    fn install_once_then_read() {
        let settings = RuntimeSettings {
            listen_port: 4321,
            ..RuntimeSettings::default()
        };
        let installed = install(settings.clone()).unwrap();
        assert_eq!(installed.listen_port, 4321);
        assert_eq!(get(), Some(&settings));

        assert!(matches!(
            install(RuntimeSettings::default()),
            Err(ConfigError::AlreadyInstalled)
        ));
        assert_eq!(get().unwrap().listen_port, 4321);
    }
}
