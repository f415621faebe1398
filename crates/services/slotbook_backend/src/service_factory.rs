// --- File: crates/services/slotbook_backend/src/service_factory.rs ---
//! Service factory implementation.
//!
//! Builds the calendar gateway the booking coordinator is handed at startup. The
//! coordinator never authenticates or chooses a provider itself.
use slotbook_common::CalendarGateway;
use slotbook_config::AppConfig;
use slotbook_gcal::{
    auth::{self, AuthError}, memory::InMemoryCalendarGateway, service::GoogleCalendarGateway,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum FactoryError {
    #[error("Google Calendar is enabled but the [gcal] section is missing")]
    MissingGcalConfig,
    #[error("Failed to initialize Google Calendar: {0}")]
    GcalInit(#[from] AuthError),
}

/// Which backend ended up behind the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayKind {
    Google,
    InMemory,
}

pub struct SlotbookServiceFactory {
    calendar_gateway: Arc<dyn CalendarGateway>,
    kind: GatewayKind,
}

impl SlotbookServiceFactory {
    /// Creates the gateway selected by `config.use_gcal`.
    ///
    /// With Google Calendar enabled, a missing section or an unusable service account
    /// key is an error: the process should not start against a calendar it cannot
    /// read.
    pub async fn new(config: &AppConfig) -> Result<Self, FactoryError> {
        if !config.use_gcal {
            warn!("Google Calendar disabled; bookings are kept in memory and lost on restart");
            return Ok(Self {
                calendar_gateway: Arc::new(InMemoryCalendarGateway::new()),
                kind: GatewayKind::InMemory,
            });
        }

        let gcal_config = config.gcal.as_ref().ok_or(FactoryError::MissingGcalConfig)?;
        info!("Initializing Google Calendar gateway...");
        let hub = auth::connect(gcal_config).await?;
        info!("Google Calendar gateway initialized");

        Ok(Self {
            calendar_gateway: Arc::new(GoogleCalendarGateway::new(Arc::new(hub))),
            kind: GatewayKind::Google,
        })
    }

    pub fn calendar_gateway(&self) -> Arc<dyn CalendarGateway> {
        self.calendar_gateway.clone()
    }

    pub fn kind(&self) -> GatewayKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotbook_config::GcalConfig;

    #[tokio::test]
    async fn test_disabled_gcal_uses_in_memory_gateway() {
        let config = AppConfig::default();

        let factory = SlotbookServiceFactory::new(&config).await.unwrap();

        assert_eq!(factory.kind(), GatewayKind::InMemory);
    }

    #[tokio::test]
    async fn test_enabled_gcal_without_section_fails() {
        let config = AppConfig {
            use_gcal: true,
            gcal: None,
            ..AppConfig::default()
        };

        let err = SlotbookServiceFactory::new(&config).await.err().unwrap();

        assert!(matches!(err, FactoryError::MissingGcalConfig));
    }

    #[tokio::test]
    async fn test_enabled_gcal_with_missing_key_file_fails() {
        let config = AppConfig {
            use_gcal: true,
            gcal: Some(GcalConfig {
                key_path: Some("/nonexistent/slotbook-service-account.json".to_string()),
            }),
            ..AppConfig::default()
        };

        let err = SlotbookServiceFactory::new(&config).await.err().unwrap();

        assert!(matches!(err, FactoryError::GcalInit(AuthError::KeyFile { .. })));
    }

    #[tokio::test]
    async fn test_enabled_gcal_with_unresolved_secret_fails() {
        let config = AppConfig {
            use_gcal: true,
            gcal: Some(GcalConfig {
                key_path: Some(slotbook_config::env_vars::SECRET_MARKER.to_string()),
            }),
            ..AppConfig::default()
        };

        let err = SlotbookServiceFactory::new(&config).await.err().unwrap();

        assert!(matches!(err, FactoryError::GcalInit(AuthError::UnresolvedKeyPath)));
    }
}
