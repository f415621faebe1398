// --- File: crates/slotbook_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Gateway errors and HTTP status mapping
pub mod logging; // Tracing subscriber bootstrap
pub mod services; // Calendar gateway abstraction

// Re-export error types and utilities for easier access
pub use error::{GatewayError, HttpStatusCode};

// Re-export the gateway seam
pub use services::{
    BookingEvent, CalendarGateway, CreatedEvent, EventStart, ReminderOverride, UpcomingEvent,
};

#[cfg(any(test, feature = "mock"))]
pub use services::MockCalendarGateway;

// This crate holds what the booking core and its outer surfaces share: the gateway
// trait with its wire types, the error taxonomy at that seam, and logging setup.
