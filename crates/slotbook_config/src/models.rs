// --- File: crates/slotbook_config/src/models.rs ---

use chrono::{FixedOffset, Offset, Utc};
use config::ConfigError;
use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8086,
        }
    }
}

// --- Google Calendar Config ---
// Only consulted by the backend when building the authorised gateway handle.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GcalConfig {
    pub key_path: Option<String>, // service account key, may be "secret_from_env" (GCAL_KEY_PATH)
}

/// How an existing calendar entry blocks a candidate slot.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// A slot is blocked only when it starts at the very instant an entry starts.
    #[default]
    ExactStart,
    /// A slot is blocked when its hour intersects the entry's `[start, end)` range.
    Overlap,
}

// --- Booking Config ---
/// Longest look-ahead accepted, one year.
pub const MAX_DAYS_AHEAD: u32 = 366;

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct BookingConfig {
    pub calendar_id: String,
    /// First bookable hour of the day (inclusive).
    pub start_hour: u32,
    /// Hour at which bookings stop (exclusive).
    pub end_hour: u32,
    /// Number of days, starting today, that can be booked.
    pub days_ahead: u32,
    /// Fixed offset every instant is normalised to, e.g. "+05:00".
    pub utc_offset: String,
    /// IANA label sent to the calendar provider alongside event times.
    pub time_zone: String,
    /// Upper bound on the number of upcoming entries read per evaluation.
    pub max_results: u32,
    pub gateway_timeout_secs: u64,
    pub conflict_policy: ConflictPolicy,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            calendar_id: "primary".to_string(),
            start_hour: 9,
            end_hour: 15,
            days_ahead: 7,
            utc_offset: "+05:00".to_string(),
            time_zone: "Asia/Karachi".to_string(),
            max_results: 10,
            gateway_timeout_secs: 10,
            conflict_policy: ConflictPolicy::ExactStart,
        }
    }
}

impl BookingConfig {
    /// Parses `utc_offset` ("+05:00", "-03:30", "Z").
    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        parse_utc_offset(&self.utc_offset)
    }

    /// Checks the values that the slot engine cannot work around.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.utc_offset()?;
        if self.end_hour > 24 {
            return Err(ConfigError::Message(format!(
                "booking.end_hour must be at most 24, got {}",
                self.end_hour
            )));
        }
        if self.start_hour >= self.end_hour {
            return Err(ConfigError::Message(format!(
                "booking.start_hour ({}) must be before booking.end_hour ({})",
                self.start_hour, self.end_hour
            )));
        }
        if self.days_ahead == 0 || self.days_ahead > MAX_DAYS_AHEAD {
            return Err(ConfigError::Message(format!(
                "booking.days_ahead must be between 1 and {}, got {}",
                MAX_DAYS_AHEAD, self.days_ahead
            )));
        }
        if self.gateway_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "booking.gateway_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.calendar_id.trim().is_empty() {
            return Err(ConfigError::Message(
                "booking.calendar_id must not be empty".to_string(),
            ));
        }
        if self.time_zone.parse::<chrono_tz::Tz>().is_err() {
            return Err(ConfigError::Message(format!(
                "booking.time_zone '{}' is not a known IANA zone",
                self.time_zone
            )));
        }
        Ok(())
    }
}

fn parse_utc_offset(raw: &str) -> Result<FixedOffset, ConfigError> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }
    raw.parse::<FixedOffset>().map_err(|err| {
        ConfigError::Message(format!("invalid utc_offset '{raw}', expected ±HH:MM: {err}"))
    })
}

// --- Logging Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level for the slotbook crates ("trace" .. "error").
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    // Runtime flag: false falls back to the in-memory calendar
    #[serde(default)]
    pub use_gcal: bool,

    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
