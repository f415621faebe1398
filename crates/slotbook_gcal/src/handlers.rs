// File: crates/slotbook_gcal/src/handlers.rs
use crate::booking::{BookingCoordinator, BookingRequest};
use crate::logic::{
    AvailabilityQuery, BookSlotRequest, BookingError, BookingResponse, FreeSlotsResponse,
    SlotView, TimeSlot,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, NaiveDate};
use slotbook_common::HttpStatusCode;
use std::sync::Arc;
use tracing::{info, warn};

// Shared state for the booking handlers
#[derive(Clone)]
pub struct BookingState {
    pub coordinator: Arc<BookingCoordinator>,
}

fn error_response(err: BookingError) -> (StatusCode, String) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        warn!("Booking request failed: {}", err);
    } else {
        info!("Booking request rejected: {}", err);
    }
    (status, err.to_string())
}

/// Handler listing the free slots of one day.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Free one-hour slots of the day", body = FreeSlotsResponse),
        (status = 400, description = "Invalid date or date outside the booking window"),
        (status = 502, description = "Calendar could not be read"),
        (status = 504, description = "Calendar read timed out")
    ),
    tag = "Booking"
))]
pub async fn get_availability_handler(
    State(state): State<Arc<BookingState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<FreeSlotsResponse>, (StatusCode, String)> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d").map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            "Invalid date format (YYYY-MM-DD)".to_string(),
        )
    })?;

    let slots = state
        .coordinator
        .compute_free_slots(date)
        .await
        .map_err(error_response)?;

    Ok(Json(FreeSlotsResponse {
        date: date.format("%Y-%m-%d").to_string(),
        slots: slots.iter().map(SlotView::from).collect(),
    }))
}

/// Handler to book one of the offered slots.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/book",
    request_body = BookSlotRequest,
    responses(
        (status = 200, description = "Event created", body = BookingResponse),
        (status = 400, description = "Missing name or email, or malformed start_time"),
        (status = 409, description = "Slot is no longer available"),
        (status = 502, description = "Calendar write failed"),
        (status = 504, description = "Calendar call timed out")
    ),
    tag = "Booking"
))]
pub async fn book_slot_handler(
    State(state): State<Arc<BookingState>>,
    Json(payload): Json<BookSlotRequest>,
) -> Result<Json<BookingResponse>, (StatusCode, String)> {
    let start = DateTime::parse_from_rfc3339(&payload.start_time).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            "Invalid start_time format".to_string(),
        )
    })?;

    let confirmation = state
        .coordinator
        .submit_booking(BookingRequest {
            name: payload.name,
            email: payload.email,
            slot: TimeSlot::new(start),
            request_id: payload.request_id,
        })
        .await
        .map_err(error_response)?;

    Ok(Json(BookingResponse {
        success: true,
        event_id: confirmation.event_id,
        message: confirmation.message,
    }))
}
