// --- File: crates/cantacal_cantamen/src/routes.rs ---

use axum::{routing::get, Router};
use cantacal_common::create_client;
use cantacal_config::AppConfig;
use std::sync::Arc;
use tracing::warn;

use crate::client::CantamenClient;
use crate::credentials::UserSecrets;
use crate::handlers::{cantamen_to_ical_handler, CantamenState};

/// Creates a router with the Cantamen feed route.
///
/// Builds the HTTP client and captures the user secrets from `config`.
///
/// # Errors
/// Fails if the HTTP client cannot be built (e.g. no TLS backend).
pub fn routes(config: Arc<AppConfig>) -> Result<Router, reqwest::Error> {
    let cantamen_config = &config.cantamen;

    let http = create_client(cantamen_config.timeout_secs, true)?;
    let api = CantamenClient::from_config(http, cantamen_config);
    let secrets = UserSecrets::from_config(cantamen_config);

    if cantamen_config.api_key.is_none() {
        warn!("CANTAMEN_API_KEY is not set; feed requests will fail");
    }
    if secrets.is_empty() {
        warn!("No CANTAMEN_PWD_* users configured; every feed request will be rejected");
    }

    let state = Arc::new(CantamenState {
        config,
        api: Arc::new(api),
        secrets: Arc::new(secrets),
    });

    Ok(routes_with_state(state))
}

/// Router over an already assembled state; lets callers swap the client or secrets.
pub fn routes_with_state(state: Arc<CantamenState>) -> Router {
    Router::new()
        .route("/cantamen_to_ical", get(cantamen_to_ical_handler))
        .with_state(state)
}
