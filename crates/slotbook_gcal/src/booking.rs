// --- File: crates/slotbook_gcal/src/booking.rs ---
//! Free-slot computation and booking against an injected calendar gateway.
//!
//! Each evaluation reads the calendar once; nothing is cached between calls. Two
//! visitors can still pick the same slot between one's availability read and the
//! other's event write: there is no lock around that window.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};
use slotbook_common::{CalendarGateway, CreatedEvent, EventStart, GatewayError};
use slotbook_config::BookingConfig;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::logic::{
    build_booking_event, filter_free_slots, generate_slots, normalize_busy, BookingError,
    BusyInterval, Clock, ConflictPolicy, SystemClock, TimeSlot,
};

/// Resolved booking settings.
#[derive(Debug, Clone)]
pub struct BookingSettings {
    pub calendar_id: String,
    pub offset: FixedOffset,
    pub time_zone: String,
    pub start_hour: u32,
    pub end_hour: u32,
    pub days_ahead: u32,
    pub max_results: u32,
    pub gateway_timeout: Duration,
    pub conflict_policy: ConflictPolicy,
}

impl BookingSettings {
    pub fn from_config(config: &BookingConfig) -> Result<Self, BookingError> {
        config
            .validate()
            .map_err(|e| BookingError::Configuration(e.to_string()))?;
        let offset = config
            .utc_offset()
            .map_err(|e| BookingError::Configuration(e.to_string()))?;

        Ok(Self {
            calendar_id: config.calendar_id.clone(),
            offset,
            time_zone: config.time_zone.clone(),
            start_hour: config.start_hour,
            end_hour: config.end_hour,
            days_ahead: config.days_ahead,
            max_results: config.max_results,
            gateway_timeout: Duration::from_secs(config.gateway_timeout_secs),
            conflict_policy: config.conflict_policy,
        })
    }
}

/// One submission from the booking form.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub slot: TimeSlot,
    pub request_id: Option<Uuid>,
}

/// Result of a successful booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub event_id: Option<String>,
    pub summary: String,
    pub start: EventStart,
    pub message: String,
}

impl From<CreatedEvent> for Confirmation {
    fn from(created: CreatedEvent) -> Self {
        let message = format!(
            "Event '{}' successfully created at {}.",
            created.summary, created.start
        );
        Self {
            event_id: created.event_id,
            summary: created.summary,
            start: created.start,
            message,
        }
    }
}

pub struct BookingCoordinator {
    gateway: Arc<dyn CalendarGateway>,
    settings: BookingSettings,
    clock: Arc<dyn Clock>,
    // successful confirmations by client request id
    receipts: Mutex<HashMap<Uuid, Confirmation>>,
}

impl BookingCoordinator {
    pub fn new(gateway: Arc<dyn CalendarGateway>, settings: BookingSettings) -> Self {
        Self {
            gateway,
            settings,
            clock: Arc::new(SystemClock),
            receipts: Mutex::new(HashMap::new()),
        }
    }

    /// Replaces the wall clock, e.g. with a [`FixedClock`](crate::logic::FixedClock).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &BookingSettings {
        &self.settings
    }

    /// Current instant in the booking offset.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now().with_timezone(&self.settings.offset)
    }

    /// First and last bookable dates, inclusive.
    pub fn booking_window(&self) -> (NaiveDate, NaiveDate) {
        let today = self.now().date_naive();
        let last = today
            .checked_add_days(Days::new(u64::from(self.settings.days_ahead.saturating_sub(1))))
            .unwrap_or(NaiveDate::MAX);
        (today, last)
    }

    /// Reads existing entries from `now` on and normalises them to the booking offset.
    pub async fn busy_intervals(
        &self,
        now: DateTime<FixedOffset>,
    ) -> Result<Vec<BusyInterval>, BookingError> {
        let events = self
            .with_timeout(self.gateway.list_upcoming(
                &self.settings.calendar_id,
                now.with_timezone(&Utc),
                self.settings.max_results,
            ))
            .await
            .map_err(|e| {
                warn!("Could not list upcoming events: {}", e);
                BookingError::GatewayRead(e)
            })?;
        Ok(normalize_busy(&events, self.settings.offset))
    }

    /// Free slots of `date`, chronologically ordered.
    ///
    /// A failed calendar read is returned as [`BookingError::GatewayRead`] rather than
    /// treated as an empty calendar.
    pub async fn compute_free_slots(&self, date: NaiveDate) -> Result<Vec<TimeSlot>, BookingError> {
        let now = self.now();
        let (first, last) = self.booking_window();
        if date < first || date > last {
            return Err(BookingError::Validation(format!(
                "date {} is outside the booking window {} to {}",
                date, first, last
            )));
        }

        let busy = self.busy_intervals(now).await?;
        let grid = generate_slots(
            first,
            self.settings.days_ahead,
            self.settings.start_hour,
            self.settings.end_hour,
            self.settings.offset,
        );
        let free = filter_free_slots(&grid, &busy, now, date, self.settings.conflict_policy);
        debug!(
            "{} of {} candidate slots free on {} ({} busy entries)",
            free.len(),
            grid.len(),
            date,
            busy.len()
        );
        Ok(free)
    }

    /// Books `request.slot` if it is still free.
    ///
    /// Name and email are checked before any calendar call. A request id that already
    /// succeeded returns its stored confirmation without writing again. Gateway
    /// failures are reported once, never retried here.
    pub async fn submit_booking(&self, request: BookingRequest) -> Result<Confirmation, BookingError> {
        let name = request.name.trim();
        let email = request.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(BookingError::Validation(
                "name and email are both required".to_string(),
            ));
        }

        if let Some(receipt) = request.request_id.and_then(|id| self.receipt(&id)) {
            info!("Returning stored confirmation for repeated request {:?}", request.request_id);
            return Ok(receipt);
        }

        let slot = request.slot.in_zone(self.settings.offset);
        let free = self.compute_free_slots(slot.date()).await?;
        if !free.contains(&slot) {
            return Err(BookingError::SlotUnavailable(slot.label()));
        }

        let event = build_booking_event(name, email, &slot, &self.settings.time_zone);
        let created = self
            .with_timeout(self.gateway.create_event(&self.settings.calendar_id, event))
            .await
            .map_err(|e| {
                warn!("Event creation for {} failed: {}", slot, e);
                BookingError::GatewayWrite(e)
            })?;

        let confirmation = Confirmation::from(created);
        if let Some(id) = request.request_id {
            self.receipts
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .insert(id, confirmation.clone());
        }
        info!(
            "Booked {} for {} (event {:?})",
            slot,
            confirmation.summary,
            confirmation.event_id
        );
        Ok(confirmation)
    }

    fn receipt(&self, id: &Uuid) -> Option<Confirmation> {
        self.receipts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(id)
            .cloned()
    }

    async fn with_timeout<T, F>(&self, call: F) -> Result<T, GatewayError>
    where
        F: Future<Output = Result<T, GatewayError>>,
    {
        let limit = self.settings.gateway_timeout;
        tokio::time::timeout(limit, call)
            .await
            .unwrap_or(Err(GatewayError::Timeout(limit)))
    }
}
