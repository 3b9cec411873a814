// File: crates/cantacal_cantamen/src/doc.rs
#![allow(dead_code)] // Allow dead code for doc functions

#[cfg(feature = "openapi")]
use utoipa::OpenApi;
#[cfg(feature = "openapi")]
use crate::models::FeedQuery;

// Dummy function carrying the handler's attributes for utoipa
#[cfg(feature = "openapi")]
#[utoipa::path(
    get,
    path = "/cantamen_to_ical",
    params(FeedQuery),
    responses(
        (status = 200, description = "iCalendar feed of the user's upcoming bookings", content_type = "text/calendar", body = String),
        (status = 401, description = "Missing user parameter or no secret configured for it"),
        (status = 500, description = "Service misconfigured (no API key, or months_ahead out of range)"),
        (status = 502, description = "Cantamen rejected a request or answered with an unexpected payload"),
        (status = 504, description = "Cantamen did not answer in time")
    ),
    tag = "Cantamen"
)]
fn doc_cantamen_to_ical_handler() {}

#[cfg(feature = "openapi")]
#[derive(OpenApi)]
#[openapi(
    paths(doc_cantamen_to_ical_handler),
    tags(
        (name = "Cantamen", description = "Cantamen bookings as calendar feed")
    )
)]
pub struct CantamenApiDoc;
