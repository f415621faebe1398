// --- File: crates/slotbook_gcal/src/routes.rs ---

use crate::booking::BookingCoordinator;
use crate::handlers::{book_slot_handler, get_availability_handler, BookingState};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router with the availability and booking routes.
pub fn routes(coordinator: Arc<BookingCoordinator>) -> Router {
    let state = Arc::new(BookingState { coordinator });

    Router::new()
        .route("/availability", get(get_availability_handler))
        .route("/book", post(book_slot_handler))
        .with_state(state)
}
