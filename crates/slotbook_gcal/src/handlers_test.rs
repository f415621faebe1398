#[cfg(test)]
mod tests {
    use crate::booking::{BookingCoordinator, BookingSettings};
    use crate::logic::{BookingResponse, FixedClock, FreeSlotsResponse};
    use crate::memory::InMemoryCalendarGateway;
    use crate::routes::routes;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use chrono::{TimeZone, Utc};
    use slotbook_config::BookingConfig;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<InMemoryCalendarGateway>) {
        let gateway = Arc::new(InMemoryCalendarGateway::new());
        gateway
            .insert_entry("primary", "2024-01-02T11:00:00+05:00", None)
            .unwrap();
        let settings = BookingSettings::from_config(&BookingConfig::default()).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 0, 0).unwrap();
        let coordinator = BookingCoordinator::new(gateway.clone(), settings)
            .with_clock(Arc::new(FixedClock(now)));
        (routes(Arc::new(coordinator)), gateway)
    }

    fn book(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/book")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_availability_lists_free_slots() {
        let (app, _) = app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/availability?date=2024-01-02")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: FreeSlotsResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.date, "2024-01-02");
        let starts: Vec<&str> = body.slots.iter().map(|s| s.start_time.as_str()).collect();
        assert_eq!(
            starts,
            vec![
                "2024-01-02T09:00:00+05:00",
                "2024-01-02T10:00:00+05:00",
                "2024-01-02T12:00:00+05:00",
                "2024-01-02T13:00:00+05:00",
                "2024-01-02T14:00:00+05:00",
            ]
        );
        assert_eq!(body.slots[0].label, "2024-01-02 09:00 AM");
    }

    #[tokio::test]
    async fn test_availability_rejects_bad_date() {
        let (app, _) = app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/availability?date=02.01.2024")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_book_creates_event() {
        let (app, gateway) = app();

        let response = app
            .oneshot(book(
                r#"{"name":"Ada","email":"ada@example.com","start_time":"2024-01-02T10:00:00+05:00"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: BookingResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(body.success);
        assert!(body.event_id.is_some());
        assert_eq!(
            body.message,
            "Event 'Ada' successfully created at 2024-01-02T10:00:00+05:00."
        );
        assert_eq!(gateway.created_events("primary").len(), 1);
    }

    #[tokio::test]
    async fn test_book_maps_errors_to_status() {
        let cases = [
            (
                r#"{"name":"","email":"a@b.com","start_time":"2024-01-02T10:00:00+05:00"}"#,
                StatusCode::BAD_REQUEST,
            ),
            (
                r#"{"name":"Ada","email":"a@b.com","start_time":"tomorrow at ten"}"#,
                StatusCode::BAD_REQUEST,
            ),
            (
                r#"{"name":"Ada","email":"a@b.com","start_time":"2024-01-02T11:00:00+05:00"}"#,
                StatusCode::CONFLICT,
            ),
        ];

        for (body, expected) in cases {
            let (app, gateway) = app();
            let response = app.oneshot(book(body)).await.unwrap();
            assert_eq!(response.status(), expected, "body: {}", body);
            assert!(gateway.created_events("primary").is_empty());
        }
    }
}
