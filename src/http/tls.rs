//! TLS configuration for HTTPS serving.
//!
//! Certificates and keys are read from PEM files. Only TLS 1.3 is offered, and
//! the server's cipher suite order wins over the client's.

use std::path::Path;
use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use rustls::version::TLS13;
use rustls_pki_types::pem::PemObject;
use rustls_pki_types::{CertificateDer, PrivateKeyDer};

use crate::config::TlsFiles;
use crate::error::ServerError;

/// Build the rustls server configuration from the certificate/key pair.
pub fn load_tls_config(files: &TlsFiles) -> Result<RustlsConfig, ServerError> {
    let certs = load_certs(&files.cert_path)?;
    let key = PrivateKeyDer::from_pem_file(&files.key_path).map_err(|e| {
        ServerError::TlsConfig(format!(
            "Failed to read private key {}: {}",
            files.key_path.display(),
            e
        ))
    })?;

    let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
    let mut config = rustls::ServerConfig::builder_with_provider(provider)
        .with_protocol_versions(&[&TLS13])
        .map_err(|e| ServerError::TlsConfig(e.to_string()))?
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| ServerError::TlsConfig(format!("Invalid certificate or key: {}", e)))?;

    config.ignore_client_order = true;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(RustlsConfig::from_config(Arc::new(config)))
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, ServerError> {
    let read_error = |e: rustls_pki_types::pem::Error| {
        ServerError::TlsConfig(format!(
            "Failed to read certificate {}: {}",
            path.display(),
            e
        ))
    };

    let certs = CertificateDer::pem_file_iter(path)
        .map_err(read_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error)?;

    if certs.is_empty() {
        return Err(ServerError::TlsConfig(format!(
            "No certificates found in {}",
            path.display()
        )));
    }

    Ok(certs)
}
