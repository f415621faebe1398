// File: crates/slotbook_gcal/src/doc.rs

#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::{__path_book_slot_handler, __path_get_availability_handler};
use crate::logic::{BookSlotRequest, BookingResponse, FreeSlotsResponse, SlotView};

#[derive(OpenApi)]
#[openapi(
    paths(get_availability_handler, book_slot_handler),
    components(schemas(FreeSlotsResponse, SlotView, BookSlotRequest, BookingResponse)),
    tags(
        (name = "Booking", description = "Appointment availability and booking API")
    ),
    servers(
        (url = "/api", description = "Booking API server")
    )
)]
pub struct BookingApiDoc;
