// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Optional HTTPS material for the runtime's web server.
//!
//! The settings only carry file paths. The files are read on demand by
//! [`TlsSettings::load_material`], never while the settings are built.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustls::pki_types::{
    CertificateDer, PrivateKeyDer, PrivatePkcs1KeyDer, PrivatePkcs8KeyDer, PrivateSec1KeyDer,
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// `https` block: PEM key and certificate chain paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsSettings {
    #[serde(rename = "key")]
    pub key_path: PathBuf,
    #[serde(rename = "cert")]
    pub cert_path: PathBuf,
}

impl TlsSettings {
    pub fn new(key_path: impl Into<PathBuf>, cert_path: impl Into<PathBuf>) -> Self {
        Self {
            key_path: key_path.into(),
            cert_path: cert_path.into(),
        }
    }

    /// Read the certificate chain and private key.
    pub fn load_material(
        &self,
    ) -> ConfigResult<(Vec<CertificateDer<'static>>, PrivateKeyDer<'static>)> {
        let certs = read_pem(&self.cert_path)?
            .into_iter()
            .filter(|p| p.tag() == "CERTIFICATE")
            .map(|p| CertificateDer::from(p.into_contents()))
            .collect::<Vec<_>>();
        if certs.is_empty() {
            return Err(ConfigError::Tls(format!(
                "no certificate found in {}",
                self.cert_path.display()
            )));
        }

        let key = read_pem(&self.key_path)?
            .into_iter()
            .find_map(|p| {
                let tag = p.tag().to_owned();
                let der = p.into_contents();
                match tag.as_str() {
                    "PRIVATE KEY" => Some(PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(der))),
                    "RSA PRIVATE KEY" => Some(PrivateKeyDer::Pkcs1(PrivatePkcs1KeyDer::from(der))),
                    "EC PRIVATE KEY" => Some(PrivateKeyDer::Sec1(PrivateSec1KeyDer::from(der))),
                    _ => None,
                }
            })
            .ok_or_else(|| {
                ConfigError::Tls(format!(
                    "no private key found in {}",
                    self.key_path.display()
                ))
            })?;

        tracing::debug!(
            certs = certs.len(),
            cert_path = %self.cert_path.display(),
            "Loaded TLS material"
        );
        Ok((certs, key))
    }

    /// Build a rustls server config (ring provider), which also checks that
    /// the key belongs to the leaf certificate.
    pub fn server_config(&self) -> ConfigResult<Arc<rustls::ServerConfig>> {
        let (certs, key) = self.load_material()?;
        let config = rustls::ServerConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_safe_default_protocol_versions()
        .map_err(|e| ConfigError::Tls(e.to_string()))?
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| ConfigError::Tls(e.to_string()))?;
        Ok(Arc::new(config))
    }
}

fn read_pem(path: &Path) -> ConfigResult<Vec<pem::Pem>> {
    let raw = std::fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    pem::parse_many(&raw).map_err(|e| ConfigError::Tls(format!("{}: {e}", path.display())))
}
