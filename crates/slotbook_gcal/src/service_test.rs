#[cfg(test)]
mod tests {
    use crate::logic::{build_booking_event, TimeSlot};
    use crate::service::{created_from_google, event_time, map_api_error, to_google_event};
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
    use google_calendar3::api::{Event, EventDateTime};
    use slotbook_common::EventStart;

    fn sample_event() -> slotbook_common::BookingEvent {
        let slot = TimeSlot::new(
            FixedOffset::east_opt(5 * 3600)
                .unwrap()
                .with_ymd_and_hms(2024, 1, 2, 10, 0, 0)
                .unwrap(),
        );
        build_booking_event("Ada", "ada@example.com", &slot, "Asia/Karachi")
    }

    #[test]
    fn test_to_google_event_carries_booking_fields() {
        let google = to_google_event(&sample_event());

        assert_eq!(google.summary.as_deref(), Some("Ada"));
        let start = google.start.unwrap();
        assert_eq!(start.date_time, Some(Utc.with_ymd_and_hms(2024, 1, 2, 5, 0, 0).unwrap()));
        assert_eq!(start.time_zone.as_deref(), Some("Asia/Karachi"));
        let end = google.end.unwrap();
        assert_eq!(end.date_time, Some(Utc.with_ymd_and_hms(2024, 1, 2, 6, 0, 0).unwrap()));

        let attendees = google.attendees.unwrap();
        assert_eq!(attendees.len(), 1);
        assert_eq!(attendees[0].email.as_deref(), Some("ada@example.com"));

        let reminders = google.reminders.unwrap();
        assert_eq!(reminders.use_default, Some(false));
        let overrides: Vec<(String, i32)> = reminders
            .overrides
            .unwrap()
            .into_iter()
            .map(|r| (r.method.unwrap(), r.minutes.unwrap()))
            .collect();
        assert_eq!(
            overrides,
            vec![("email".to_string(), 1440), ("popup".to_string(), 10)]
        );
    }

    #[test]
    fn test_event_time_prefers_date_time() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 2, 6, 0, 0).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();

        let timed = EventDateTime {
            date_time: Some(instant),
            date: Some(day),
            ..Default::default()
        };
        assert_eq!(
            event_time(&timed),
            Some(EventStart::DateTime(instant.fixed_offset()))
        );

        let all_day = EventDateTime {
            date: Some(day),
            ..Default::default()
        };
        assert_eq!(event_time(&all_day), Some(EventStart::Date(day)));

        assert_eq!(event_time(&EventDateTime::default()), None);
    }

    #[test]
    fn test_created_from_google_falls_back_to_submitted_values() {
        let submitted = sample_event();

        let sparse = created_from_google(
            Event {
                id: Some("abc123".to_string()),
                ..Default::default()
            },
            &submitted,
        );

        assert_eq!(sparse.event_id.as_deref(), Some("abc123"));
        assert_eq!(sparse.summary, "Ada");
        assert_eq!(sparse.start, EventStart::DateTime(submitted.start));
    }

    #[test]
    fn test_map_api_error_reads_status_not_message_text() {
        let unavailable = map_api_error(google_calendar3::Error::BadRequest(serde_json::json!({
            "error": { "code": 503, "message": "Backend Error" }
        })));
        assert!(unavailable.is_retryable());

        let rejected = map_api_error(google_calendar3::Error::BadRequest(serde_json::json!({
            "error": { "code": 400, "message": "summary exceeds 500 characters" }
        })));
        assert!(!rejected.is_retryable());

        assert!(!map_api_error(google_calendar3::Error::FieldClash("500")).is_retryable());
        assert!(!map_api_error(google_calendar3::Error::MissingAPIKey).is_retryable());
    }

    #[test]
    fn test_map_api_error_retries_io_failures() {
        let err = map_api_error(google_calendar3::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset",
        )));
        assert!(err.is_retryable());
    }
}
