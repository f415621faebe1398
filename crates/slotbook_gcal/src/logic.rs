// --- File: crates/slotbook_gcal/src/logic.rs ---
use chrono::{DateTime, Days, Duration, FixedOffset, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use slotbook_common::{
    BookingEvent, EventStart, GatewayError, HttpStatusCode, ReminderOverride, UpcomingEvent,
};
use std::collections::HashSet;
use std::fmt;

pub use slotbook_config::ConflictPolicy;

/// Every appointment lasts one hour.
pub const APPOINTMENT_MINUTES: i64 = 60;
/// Email reminder sent a day ahead.
pub const EMAIL_REMINDER_MINUTES: i32 = 24 * 60;
/// Popup reminder shortly before the start.
pub const POPUP_REMINDER_MINUTES: i32 = 10;

// --- Error Handling ---
use thiserror::Error;
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Requested time slot is no longer available: {0}")]
    SlotUnavailable(String),
    #[error("Failed to read calendar availability: {0}")]
    GatewayRead(#[source] GatewayError),
    #[error("Failed to create calendar event: {0}")]
    GatewayWrite(#[source] GatewayError),
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl BookingError {
    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        match self {
            BookingError::GatewayRead(e) | BookingError::GatewayWrite(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl HttpStatusCode for BookingError {
    fn status_code(&self) -> u16 {
        match self {
            BookingError::Validation(_) => 400,
            BookingError::SlotUnavailable(_) => 409,
            BookingError::GatewayRead(e) | BookingError::GatewayWrite(e) => e.status_code(),
            BookingError::Configuration(_) => 500,
        }
    }
}

// --- Clock ---

/// Source of "now" for availability checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// --- Data Structures ---

/// A bookable start time in a fixed-offset zone.
///
/// Equality, ordering and hashing follow the absolute instant, so the same moment
/// expressed in two offsets compares equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot {
    start: DateTime<FixedOffset>,
}

impl TimeSlot {
    pub fn new(start: DateTime<FixedOffset>) -> Self {
        Self { start }
    }

    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.start
    }

    /// Calendar date in the slot's own offset.
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn hour(&self) -> u32 {
        self.start.hour()
    }

    pub fn offset(&self) -> FixedOffset {
        *self.start.offset()
    }

    pub fn end(&self) -> DateTime<FixedOffset> {
        self.start + Duration::minutes(APPOINTMENT_MINUTES)
    }

    /// The same instant expressed in `offset`.
    pub fn in_zone(&self, offset: FixedOffset) -> Self {
        Self::new(self.start.with_timezone(&offset))
    }

    /// Button caption, e.g. "2024-01-02 10:00 AM".
    pub fn label(&self) -> String {
        self.start.format("%Y-%m-%d %I:%M %p").to_string()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start.to_rfc3339())
    }
}

/// An existing calendar entry, normalised to the booking offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyInterval {
    pub start: DateTime<FixedOffset>,
    /// Exclusive end when known.
    pub end: Option<DateTime<FixedOffset>>,
}

impl BusyInterval {
    /// Whether this entry makes `slot` unbookable under `policy`.
    pub fn blocks(&self, slot: &TimeSlot, policy: ConflictPolicy) -> bool {
        match policy {
            ConflictPolicy::ExactStart => slot.instant() == self.start,
            ConflictPolicy::Overlap => {
                let (slot_start, slot_end) = (slot.instant(), slot.end());
                match self.end {
                    Some(end) if end > self.start => slot_start < end && slot_end > self.start,
                    // zero-length or open entries block the slot containing their start
                    _ => slot_start <= self.start && self.start < slot_end,
                }
            }
        }
    }
}

// --- Slot Generation ---

/// Builds the candidate grid: one slot per hour in `[start_hour, end_hour)` for each of
/// `num_days` days from `start_date`, at minute zero, in `offset`.
///
/// Output is chronological, day-major then hour. `start_hour >= end_hour` yields no
/// slots; hours past 23 are skipped.
pub fn generate_slots(
    start_date: NaiveDate,
    num_days: u32,
    start_hour: u32,
    end_hour: u32,
    offset: FixedOffset,
) -> Vec<TimeSlot> {
    let end_hour = end_hour.min(24);
    (0..num_days)
        .filter_map(|day| start_date.checked_add_days(Days::new(u64::from(day))))
        .flat_map(|date| {
            (start_hour..end_hour).filter_map(move |hour| date.and_hms_opt(hour, 0, 0))
        })
        .filter_map(|naive| naive.and_local_timezone(offset).single())
        .map(TimeSlot::new)
        .collect()
}

// --- Availability Logic ---

fn local_instant(point: &EventStart, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    match point {
        EventStart::DateTime(dt) => Some(dt.with_timezone(&offset)),
        EventStart::Date(date) => date.and_hms_opt(0, 0, 0)?.and_local_timezone(offset).single(),
    }
}

/// Converts provider entries into busy intervals expressed in `offset`.
///
/// Timed entries keep their instant. All-day entries start at local midnight and,
/// without an explicit end, last until the next local midnight.
pub fn normalize_busy(events: &[UpcomingEvent], offset: FixedOffset) -> Vec<BusyInterval> {
    events
        .iter()
        .filter_map(|event| {
            let start = local_instant(&event.start, offset)?;
            let end = match (&event.start, &event.end) {
                (_, Some(end)) => local_instant(end, offset),
                (EventStart::Date(_), None) => Some(start + Duration::days(1)),
                (EventStart::DateTime(_), None) => None,
            };
            Some(BusyInterval { start, end })
        })
        .collect()
}

/// Returns the free slots of `date`: candidates strictly after `now` that no busy
/// interval blocks, in input order.
///
/// `date` is compared with each slot's date in the slot's own offset.
pub fn filter_free_slots(
    candidates: &[TimeSlot],
    busy: &[BusyInterval],
    now: DateTime<FixedOffset>,
    date: NaiveDate,
    policy: ConflictPolicy,
) -> Vec<TimeSlot> {
    let busy_starts: HashSet<DateTime<Utc>> =
        busy.iter().map(|b| b.start.with_timezone(&Utc)).collect();
    let now = now.with_timezone(&Utc);

    candidates
        .iter()
        .filter(|slot| slot.instant().with_timezone(&Utc) > now)
        .filter(|slot| match policy {
            ConflictPolicy::ExactStart => {
                !busy_starts.contains(&slot.instant().with_timezone(&Utc))
            }
            ConflictPolicy::Overlap => !busy.iter().any(|b| b.blocks(slot, policy)),
        })
        .filter(|slot| slot.date() == date)
        .copied()
        .collect()
}

// --- Booking Logic ---

/// Builds the event written for one booking: one hour from `slot`, the attendee
/// invited, and the fixed email/popup reminders.
pub fn build_booking_event(
    name: &str,
    email: &str,
    slot: &TimeSlot,
    time_zone: &str,
) -> BookingEvent {
    BookingEvent {
        summary: name.to_string(),
        start: slot.instant(),
        end: slot.end(),
        time_zone: time_zone.to_string(),
        attendee_email: email.to_string(),
        reminders: vec![
            ReminderOverride::email(EMAIL_REMINDER_MINUTES),
            ReminderOverride::popup(POPUP_REMINDER_MINUTES),
        ],
        send_notifications: true,
    }
}

// --- HTTP payloads ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    /// Day to inspect, YYYY-MM-DD
    #[cfg_attr(feature = "openapi", param(example = "2024-01-02"))]
    pub date: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SlotView {
    #[cfg_attr(feature = "openapi", schema(example = "2024-01-02T10:00:00+05:00"))]
    pub start_time: String, // RFC 3339
    #[cfg_attr(feature = "openapi", schema(example = "2024-01-02T11:00:00+05:00"))]
    pub end_time: String, // RFC 3339
    #[cfg_attr(feature = "openapi", schema(example = "2024-01-02 10:00 AM"))]
    pub label: String,
}

impl From<&TimeSlot> for SlotView {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            start_time: slot.instant().to_rfc3339(),
            end_time: slot.end().to_rfc3339(),
            label: slot.label(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FreeSlotsResponse {
    pub date: String,
    pub slots: Vec<SlotView>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookSlotRequest {
    pub name: String,
    pub email: String,
    pub start_time: String, // RFC 3339, one of the offered slots
    /// Client-generated identifier; resubmitting it returns the first confirmation.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub request_id: Option<uuid::Uuid>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingResponse {
    pub success: bool,
    pub event_id: Option<String>,
    pub message: String,
}
