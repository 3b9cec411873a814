// --- File: crates/cantacal_cantamen/src/logic.rs ---
use cantacal_config::CantamenConfig;
use chrono::{DateTime, Months, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::client::{CantamenApi, Session};
use crate::credentials::Credential;
use crate::error::{CantamenError, Stage};
use crate::models::{Booking, EnrichedBooking};

/// Knobs of one feed build, taken from [`CantamenConfig`].
#[derive(Debug, Clone, Copy)]
pub struct FeedSettings {
    pub months_ahead: u32,
    pub enrichment_concurrency: usize,
}

impl From<&CantamenConfig> for FeedSettings {
    fn from(config: &CantamenConfig) -> Self {
        Self {
            months_ahead: config.months_ahead,
            enrichment_concurrency: config.enrichment_concurrency,
        }
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self::from(&CantamenConfig::default())
    }
}

/// `[now, now + months]`, using calendar months.
///
/// An end past chrono's calendar range means `months_ahead` is misconfigured.
pub fn booking_window(
    now: DateTime<Utc>,
    months: u32,
) -> Result<(DateTime<Utc>, DateTime<Utc>), CantamenError> {
    let end = now.checked_add_months(Months::new(months)).ok_or_else(|| {
        CantamenError::Config(format!("months_ahead = {months} is out of range"))
    })?;
    Ok((now, end))
}

/// Parses an upstream timestamp carrying its own offset and converts it to UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, CantamenError> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CantamenError::payload(Stage::Bookings, format!("invalid timestamp '{value}': {e}")))
}

/// Formats a UTC instant in iCalendar basic form, e.g. `20240601T080000Z`.
pub fn to_ical_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Resolves vehicle and location names of a single booking.
async fn enrich_booking(
    api: &dyn CantamenApi,
    session: &Session,
    booking: Booking,
) -> Result<EnrichedBooking, CantamenError> {
    let start = parse_timestamp(&booking.time_range.start)?;
    let end = parse_timestamp(&booking.time_range.end)?;

    let vehicle = api.vehicle_name(session, &booking.bookee_id).await?;
    let location = api.location_name(session, &booking.bookee_id).await?;

    Ok(EnrichedBooking {
        id: booking.id,
        vehicle,
        location,
        start,
        end,
    })
}

/// Drops cancelled bookings and enriches the rest.
///
/// Up to `concurrency` bookings are enriched at once; the result keeps the
/// input order. The first failure aborts the whole batch.
pub async fn enrich_bookings(
    api: &dyn CantamenApi,
    session: &Session,
    bookings: Vec<Booking>,
    concurrency: usize,
) -> Result<Vec<EnrichedBooking>, CantamenError> {
    let total = bookings.len();
    let active: Vec<Booking> = bookings.into_iter().filter(|b| !b.cancelled).collect();
    debug!("{} of {} bookings are active", active.len(), total);

    stream::iter(active)
        .map(|booking| enrich_booking(api, session, booking))
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

/// Authenticates, lists the bookings of the coming months and enriches them.
pub async fn fetch_feed_bookings(
    api: &dyn CantamenApi,
    credential: &Credential,
    settings: FeedSettings,
    now: DateTime<Utc>,
) -> Result<Vec<EnrichedBooking>, CantamenError> {
    let (start, end) = booking_window(now, settings.months_ahead)?;

    let session = api.authorize(credential).await?;
    let bookings = api.list_bookings(&session, start, end).await?;

    let enriched =
        enrich_bookings(api, &session, bookings, settings.enrichment_concurrency).await?;
    info!(
        "Fetched {} active bookings for user {}",
        enriched.len(),
        credential.user_id
    );
    Ok(enriched)
}
