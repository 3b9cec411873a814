// --- File: crates/cantacal_cantamen/src/models.rs ---
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[cfg(feature = "openapi")]
use utoipa::IntoParams;

/// Query string of the feed endpoint.
#[derive(Debug, Default)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct FeedQuery {
    /// URL-safe base64 encoding of the Cantamen login
    #[cfg_attr(feature = "openapi", param(example = "am9obkBleGFtcGxlLmNvbQ"))]
    pub user: Option<String>,
}

impl FeedQuery {
    /// Builds the query from raw pairs; a repeated `user` keeps its first value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let user = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "user").then_some(value));
        Self { user }
    }
}

// --- Structures for the Cantamen API payloads ---

/// Body of `POST /tokens`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest<'a> {
    pub login: &'a str,
    pub credential: &'a str,
    pub prov_id: &'a str,
    pub store_login: bool,
}

#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

/// A booking as listed by `GET /bookings?expand=bookeeId`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub time_range: TimeRange,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(deserialize_with = "string_or_number")]
    pub bookee_id: String,
}

/// Any resource we only need the display name of (bookee products, bookees).
#[derive(Deserialize, Debug)]
pub struct NamedResource {
    pub name: String,
}

// --- Feed data ---

/// A non-cancelled booking with its vehicle and location names resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedBooking {
    pub id: String,
    pub vehicle: String,
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Ids are accepted as JSON strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
