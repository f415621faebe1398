// --- File: crates/slotbook_gcal/src/memory.rs ---
//! In-process calendar used when Google Calendar is disabled, and by tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slotbook_common::{
    BookingEvent, CalendarGateway, CreatedEvent, EventStart, GatewayError, UpcomingEvent,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
struct Entry {
    start: EventStart,
    end: Option<EventStart>,
    booking: Option<BookingEvent>,
}

/// Calendar entries kept in memory, keyed by calendar id.
#[derive(Debug, Default)]
pub struct InMemoryCalendarGateway {
    calendars: Mutex<HashMap<String, Vec<Entry>>>,
}

impl InMemoryCalendarGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an existing entry, as if created elsewhere, from the provider's textual
    /// start/end (RFC 3339 or `YYYY-MM-DD`).
    ///
    /// Nothing is stored when either value fails [`EventStart::parse`].
    pub fn insert_entry(
        &self,
        calendar_id: &str,
        start: &str,
        end: Option<&str>,
    ) -> Result<(), GatewayError> {
        let start = EventStart::parse(start)?;
        let end = end.map(EventStart::parse).transpose()?;

        let mut calendars = self
            .calendars
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        calendars.entry(calendar_id.to_string()).or_default().push(Entry {
            start,
            end,
            booking: None,
        });
        Ok(())
    }

    /// Events written through [`CalendarGateway::create_event`], oldest first.
    pub fn created_events(&self, calendar_id: &str) -> Vec<BookingEvent> {
        self.calendars
            .lock()
            .map(|calendars| {
                calendars
                    .get(calendar_id)
                    .map(|entries| entries.iter().filter_map(|e| e.booking.clone()).collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<Entry>>>, GatewayError> {
        self.calendars
            .lock()
            .map_err(|_| GatewayError::provider("in-memory calendar lock poisoned", false))
    }
}

// All-day dates are placed at UTC midnight for ordering and range checks.
fn utc_instant(point: &EventStart) -> DateTime<Utc> {
    match point {
        EventStart::DateTime(dt) => dt.with_timezone(&Utc),
        EventStart::Date(date) => date.and_time(chrono::NaiveTime::MIN).and_utc(),
    }
}

impl Entry {
    /// An all-day entry without an end lasts the whole day; a timed one is a point.
    fn effective_end(&self) -> DateTime<Utc> {
        match (&self.end, &self.start) {
            (Some(end), _) => utc_instant(end),
            (None, EventStart::Date(date)) => {
                utc_instant(&EventStart::Date(*date)) + chrono::Duration::days(1)
            }
            (None, start) => utc_instant(start),
        }
    }
}

#[async_trait]
impl CalendarGateway for InMemoryCalendarGateway {
    async fn list_upcoming(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<UpcomingEvent>, GatewayError> {
        let calendars = self.lock()?;
        let mut upcoming: Vec<UpcomingEvent> = calendars
            .get(calendar_id)
            .map(|entries| {
                entries
                    .iter()
                    // like Google, an entry still running at time_min is listed
                    .filter(|e| e.effective_end() >= time_min)
                    .map(|e| UpcomingEvent {
                        start: e.start,
                        end: e.end,
                    })
                    .collect()
            })
            .unwrap_or_default();

        upcoming.sort_by_key(|e| utc_instant(&e.start));
        upcoming.truncate(max_results as usize);
        Ok(upcoming)
    }

    async fn create_event(
        &self,
        calendar_id: &str,
        event: BookingEvent,
    ) -> Result<CreatedEvent, GatewayError> {
        let mut calendars = self.lock()?;
        let entries = calendars.entry(calendar_id.to_string()).or_default();
        let id = format!("local-{}", uuid::Uuid::new_v4());

        entries.push(Entry {
            start: EventStart::DateTime(event.start),
            end: Some(EventStart::DateTime(event.end)),
            booking: Some(event.clone()),
        });
        tracing::debug!("Stored event {} in calendar {}", id, calendar_id);

        Ok(CreatedEvent {
            event_id: Some(id),
            summary: event.summary,
            start: EventStart::DateTime(event.start),
        })
    }
}
