// File: crates/cantacal_cantamen/src/handlers.rs
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use cantacal_common::{log_error, CantacalError};
use cantacal_config::AppConfig;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, warn};

use crate::client::CantamenApi;
use crate::credentials::{resolve_credential, SecretResolver};
use crate::ical::{render_calendar, ICAL_CONTENT_TYPE};
use crate::logic::{fetch_feed_bookings, FeedSettings};
use crate::models::FeedQuery;

// Shared state needed by the Cantamen handlers
#[derive(Clone)]
pub struct CantamenState {
    pub config: Arc<AppConfig>,
    pub api: Arc<dyn CantamenApi>,
    pub secrets: Arc<dyn SecretResolver>,
}

/// Handler serving the bookings of one user as an iCalendar feed.
#[axum::debug_handler]
pub async fn cantamen_to_ical_handler(
    State(state): State<Arc<CantamenState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, CantacalError> {
    let cantamen_config = &state.config.cantamen;
    let query = FeedQuery::from_pairs(params);

    let credential = resolve_credential(
        query.user.as_deref(),
        state.secrets.as_ref(),
        cantamen_config.api_key.as_deref(),
    )
    .map_err(|e| {
        if e.is_unauthorized() {
            warn!("Rejecting feed request: {}", e);
        } else {
            error!("Cannot serve feed: {}", e);
        }
        e
    })?;

    let bookings = fetch_feed_bookings(
        state.api.as_ref(),
        &credential,
        FeedSettings::from(cantamen_config),
        Utc::now(),
    )
    .await
    .map_err(|e| {
        log_error(&e, &format!("Building feed for user {} failed", credential.user_id));
        e
    })?;

    let body = render_calendar(&bookings, Utc::now());
    Ok(([(header::CONTENT_TYPE, ICAL_CONTENT_TYPE)], body).into_response())
}
