// --- File: crates/slotbook_gcal/src/service.rs ---
//! Google Calendar gateway implementation.
//!
//! This module provides an implementation of the CalendarGateway trait for Google Calendar.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use google_calendar3::api::{
    Event, EventAttendee, EventDateTime, EventReminder, EventReminders,
};
use slotbook_common::{
    BookingEvent, CalendarGateway, CreatedEvent, EventStart, GatewayError, UpcomingEvent,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::GoogleHub;

/// Google Calendar gateway implementation.
pub struct GoogleCalendarGateway {
    calendar_hub: Arc<GoogleHub>,
}

impl GoogleCalendarGateway {
    /// Wraps an already-authorised calendar hub.
    pub fn new(calendar_hub: Arc<GoogleHub>) -> Self {
        Self { calendar_hub }
    }
}

#[async_trait]
impl CalendarGateway for GoogleCalendarGateway {
    /// Lists upcoming single events (recurrences expanded) ordered by start time.
    ///
    /// Cancelled entries and entries without any start are skipped.
    async fn list_upcoming(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<UpcomingEvent>, GatewayError> {
        let max_results = i32::try_from(max_results).unwrap_or(i32::MAX);
        let (_response, events) = self
            .calendar_hub
            .events()
            .list(calendar_id)
            .time_min(time_min)
            .max_results(max_results)
            .single_events(true)
            .order_by("startTime")
            .doit()
            .await
            .map_err(map_api_error)?;

        let items = events.items.unwrap_or_default();
        debug!("Google Calendar returned {} upcoming events", items.len());

        Ok(items
            .into_iter()
            .filter(|event| event.status.as_deref() != Some("cancelled"))
            .filter_map(|event| match event.start.as_ref().and_then(event_time) {
                Some(start) => Some(UpcomingEvent {
                    start,
                    end: event.end.as_ref().and_then(event_time),
                }),
                None => {
                    warn!("Skipping event {:?} without a start time", event.id);
                    None
                }
            })
            .collect())
    }

    /// Inserts the booking event and reports what Google persisted.
    async fn create_event(
        &self,
        calendar_id: &str,
        event: BookingEvent,
    ) -> Result<CreatedEvent, GatewayError> {
        let (_response, created) = self
            .calendar_hub
            .events()
            .insert(to_google_event(&event), calendar_id)
            .send_notifications(event.send_notifications)
            .doit()
            .await
            .map_err(map_api_error)?;

        Ok(created_from_google(created, &event))
    }
}

/// Reads a Google start/end, preferring the timed form over the all-day date.
pub(crate) fn event_time(value: &EventDateTime) -> Option<EventStart> {
    match (value.date_time, value.date) {
        (Some(date_time), _) => Some(EventStart::DateTime(date_time.fixed_offset())),
        (None, Some(date)) => Some(EventStart::Date(date)),
        (None, None) => None,
    }
}

pub(crate) fn to_google_event(event: &BookingEvent) -> Event {
    let at = |instant: chrono::DateTime<chrono::FixedOffset>| EventDateTime {
        date_time: Some(instant.with_timezone(&Utc)),
        time_zone: Some(event.time_zone.clone()),
        ..Default::default()
    };

    Event {
        summary: Some(event.summary.clone()),
        start: Some(at(event.start)),
        end: Some(at(event.end)),
        attendees: Some(vec![EventAttendee {
            email: Some(event.attendee_email.clone()),
            ..Default::default()
        }]),
        reminders: Some(EventReminders {
            use_default: Some(false),
            overrides: Some(
                event
                    .reminders
                    .iter()
                    .map(|r| EventReminder {
                        method: Some(r.method.clone()),
                        minutes: Some(r.minutes),
                        ..Default::default()
                    })
                    .collect(),
            ),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Falls back to the submitted values for anything Google leaves out.
pub(crate) fn created_from_google(created: Event, submitted: &BookingEvent) -> CreatedEvent {
    CreatedEvent {
        event_id: created.id,
        summary: created.summary.unwrap_or_else(|| submitted.summary.clone()),
        start: created
            .start
            .as_ref()
            .and_then(event_time)
            .unwrap_or(EventStart::DateTime(submitted.start)),
    }
}

/// Transport failures and throttling/server statuses are worth retrying; anything
/// the API rejected on its merits is not.
pub(crate) fn map_api_error(err: google_calendar3::Error) -> GatewayError {
    use google_calendar3::Error;

    let retryable = match &err {
        Error::HttpError(_) | Error::Io(_) => true,
        Error::Failure(response) => retryable_status(response.status().as_u16()),
        Error::BadRequest(body) => body
            .pointer("/error/code")
            .and_then(serde_json::Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
            .is_some_and(retryable_status),
        _ => false,
    };
    GatewayError::provider(err.to_string(), retryable)
}

fn retryable_status(code: u16) -> bool {
    matches!(code, 429 | 500 | 502 | 503 | 504)
}
