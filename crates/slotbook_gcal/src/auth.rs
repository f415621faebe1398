// File: crates/slotbook_gcal/src/auth.rs
//! Service-account authorisation for the Google Calendar gateway.
//!
//! The booking core never sees credentials: the backend calls [`connect`] once at
//! startup and hands the resulting [`GoogleHub`] to
//! [`GoogleCalendarGateway`](crate::service::GoogleCalendarGateway).

use google_calendar3::{
    hyper_rustls::{HttpsConnector, HttpsConnectorBuilder},
    hyper_util::client::legacy::{connect::HttpConnector, Client},
    yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator, ServiceAccountKey},
    CalendarHub,
};
use hyper_util::rt::TokioExecutor;
use slotbook_config::{env_vars::SECRET_MARKER, GcalConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Authorised Calendar v3 client over rustls.
pub type GoogleHub = CalendarHub<HttpsConnector<HttpConnector>>;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("gcal.key_path is not set")]
    MissingKeyPath,
    #[error("gcal.key_path is still 'secret_from_env'; set SLOTBOOK_SECRET_GCAL_KEY_PATH or GCAL_KEY_PATH")]
    UnresolvedKeyPath,
    #[error("cannot read service account key {}: {source}", .path.display())]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("service account authenticator rejected the key: {0}")]
    Authenticator(#[source] std::io::Error),
    #[error("no native TLS roots available: {0}")]
    TlsRoots(#[source] std::io::Error),
}

/// The service account key file named by `config`, once marker resolution has run.
pub fn key_path(config: &GcalConfig) -> Result<&Path, AuthError> {
    match config.key_path.as_deref().map(str::trim) {
        None | Some("") => Err(AuthError::MissingKeyPath),
        Some(SECRET_MARKER) => Err(AuthError::UnresolvedKeyPath),
        Some(path) => Ok(Path::new(path)),
    }
}

/// Reads the service account key and builds an authorised hub.
///
/// Tokens are fetched and refreshed in memory by the authenticator.
pub async fn connect(config: &GcalConfig) -> Result<GoogleHub, AuthError> {
    let path = key_path(config)?;
    let key = read_service_account_key(path)
        .await
        .map_err(|source| AuthError::KeyFile {
            path: path.to_path_buf(),
            source,
        })?;
    info!("Using Google service account {}", key.client_email);
    hub_for(key).await
}

async fn hub_for(key: ServiceAccountKey) -> Result<GoogleHub, AuthError> {
    let authenticator = ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .map_err(AuthError::Authenticator)?;

    let connector = HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(AuthError::TlsRoots)?
        .https_or_http()
        .enable_http1()
        .build();
    debug!("Calendar client ready over HTTP/1.1");

    let client = Client::builder(TokioExecutor::new()).build(connector);
    Ok(CalendarHub::new(client, authenticator))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(key_path: Option<&str>) -> GcalConfig {
        GcalConfig {
            key_path: key_path.map(str::to_string),
        }
    }

    #[test]
    fn test_key_path_requires_a_resolved_value() {
        assert!(matches!(key_path(&config(None)), Err(AuthError::MissingKeyPath)));
        assert!(matches!(key_path(&config(Some("  "))), Err(AuthError::MissingKeyPath)));
        assert!(matches!(
            key_path(&config(Some(SECRET_MARKER))),
            Err(AuthError::UnresolvedKeyPath)
        ));

        let resolved = config(Some("/etc/slotbook/sa.json"));
        assert_eq!(key_path(&resolved).unwrap(), Path::new("/etc/slotbook/sa.json"));
    }

    #[tokio::test]
    async fn test_connect_reports_unreadable_key_file() {
        let missing = "/nonexistent/slotbook-service-account.json";

        match connect(&config(Some(missing))).await {
            Err(AuthError::KeyFile { path, .. }) => assert_eq!(path, Path::new(missing)),
            Err(other) => panic!("expected key file error, got {:?}", other),
            Ok(_) => panic!("connected without a key file"),
        }
    }

    #[tokio::test]
    async fn test_connect_rejects_malformed_key_file() {
        let path = std::env::temp_dir().join(format!("slotbook-sa-{}.json", std::process::id()));
        std::fs::write(&path, "{\"type\": \"service_account\"}").unwrap();

        let result = connect(&config(path.to_str())).await;
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(AuthError::KeyFile { .. })));
    }
}
