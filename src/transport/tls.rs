//! Optional mutual-TLS configuration for the peer transport (spec.md §6:
//! "Optional TLS"). Absent configuration falls back to plain HTTP.

use std::path::PathBuf;

use anyhow::{Context, Result};
use axum_server::tls_rustls::RustlsConfig;

#[derive(Clone, Debug)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
    pub ca_pool_path: Option<PathBuf>,
    pub require_client_cert: bool,
}

impl TlsConfig {
    pub async fn into_server_config(&self) -> Result<RustlsConfig> {
        RustlsConfig::from_pem_file(&self.cert_path, &self.key_path)
            .await
            .with_context(|| format!("failed to load TLS cert/key from {:?}", self.cert_path))
    }

    /// Builds a `reqwest` client configured with this peer's client identity
    /// and CA pool, for mutual-TLS outbound connections.
    pub fn build_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(ca_path) = &self.ca_pool_path {
            let ca_pem = std::fs::read(ca_path)
                .with_context(|| format!("failed to read CA pool at {:?}", ca_path))?;
            let ca_cert = reqwest::Certificate::from_pem(&ca_pem)
                .context("failed to parse CA pool as PEM")?;
            builder = builder.add_root_certificate(ca_cert);
        }
        if self.require_client_cert {
            let mut identity_pem = std::fs::read(&self.cert_path)
                .with_context(|| format!("failed to read client cert at {:?}", self.cert_path))?;
            let mut key_pem = std::fs::read(&self.key_path)
                .with_context(|| format!("failed to read client key at {:?}", self.key_path))?;
            identity_pem.append(&mut key_pem);
            let identity = reqwest::Identity::from_pem(&identity_pem)
                .context("failed to build client identity from cert/key")?;
            builder = builder.identity(identity);
        }
        builder.build().context("failed to build TLS-enabled reqwest client")
    }
}
