// --- File: crates/slotbook_common/src/services.rs ---
//! Service abstractions for the external calendar.
//!
//! The booking core only ever talks to a [`CalendarGateway`]. Credentials, HTTP and
//! provider quirks stay behind this trait so an already-authorised handle can be
//! injected, and so tests can swap in a mock.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Start or end of a calendar entry as the provider reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStart {
    /// A timed entry, offset preserved as received.
    DateTime(DateTime<FixedOffset>),
    /// An all-day entry.
    Date(NaiveDate),
}

impl EventStart {
    /// Parses the provider's textual form: RFC 3339 with an explicit offset, or a
    /// bare `YYYY-MM-DD` date.
    ///
    /// A date-time without an offset cannot be placed on the timeline and is
    /// rejected with [`GatewayError::TimezoneMismatch`].
    pub fn parse(raw: &str) -> Result<Self, GatewayError> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(EventStart::DateTime(dt));
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(EventStart::Date(date));
        }
        if chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").is_ok() {
            return Err(GatewayError::TimezoneMismatch(format!(
                "date-time '{raw}' carries no UTC offset"
            )));
        }
        Err(GatewayError::InvalidResponse(format!(
            "unrecognised event time '{raw}'"
        )))
    }
}

impl std::fmt::Display for EventStart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStart::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            EventStart::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// An existing entry returned by [`CalendarGateway::list_upcoming`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingEvent {
    pub start: EventStart,
    /// Not every provider response carries it; only the overlap policy uses it.
    pub end: Option<EventStart>,
}

/// Reminder override attached to a new event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderOverride {
    /// "email" or "popup".
    pub method: String,
    /// Minutes before the event start.
    pub minutes: i32,
}

impl ReminderOverride {
    pub fn email(minutes: i32) -> Self {
        Self {
            method: "email".to_string(),
            minutes,
        }
    }

    pub fn popup(minutes: i32) -> Self {
        Self {
            method: "popup".to_string(),
            minutes,
        }
    }
}

/// The event payload written to the calendar for one booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingEvent {
    /// Event title, the attendee's name.
    pub summary: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    /// IANA zone label sent with start/end.
    pub time_zone: String,
    pub attendee_email: String,
    pub reminders: Vec<ReminderOverride>,
    pub send_notifications: bool,
}

/// What the provider persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedEvent {
    pub event_id: Option<String>,
    pub summary: String,
    pub start: EventStart,
}

/// Read/write access to one remote calendar provider.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Lists entries starting at or after `time_min`, ordered by start time,
    /// at most `max_results` of them.
    async fn list_upcoming(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<UpcomingEvent>, GatewayError>;

    /// Inserts `event`, notifying attendees when `event.send_notifications` is set.
    async fn create_event(
        &self,
        calendar_id: &str,
        event: BookingEvent,
    ) -> Result<CreatedEvent, GatewayError>;
}
