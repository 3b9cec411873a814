// --- File: crates/cantacal_cantamen/src/client.rs ---
//! Cantamen casirest v3 client.
//!
//! [`CantamenApi`] is the seam between the feed logic and the network, so the
//! logic can be driven by a fake in tests. [`CantamenClient`] is the reqwest
//! implementation used by the service.

use base64::engine::general_purpose::STANDARD as base64_engine;
use base64::Engine as _;
use cantacal_config::CantamenConfig;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, error};
use uuid::Uuid;

use crate::credentials::Credential;
use crate::error::{CantamenError, Stage};
use crate::models::{Booking, NamedResource, TokenRequest, TokenResponse};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// An authenticated Cantamen session, valid for one feed request.
#[derive(Clone)]
pub struct Session {
    /// `base64("<token id>:")`, sent as HTTP basic authorization
    pub token: String,
    pub api_key: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Session(***)")
    }
}

impl Session {
    /// Encodes a token id the way the booking endpoints expect it.
    pub fn from_token_id(token_id: &str, api_key: impl Into<String>) -> Self {
        Self {
            token: base64_engine.encode(format!("{token_id}:")),
            api_key: api_key.into(),
        }
    }
}

/// The Cantamen operations the feed needs.
pub trait CantamenApi: Send + Sync {
    /// Exchanges login and password for a session.
    fn authorize<'a>(&'a self, credential: &'a Credential) -> BoxFuture<'a, Session, CantamenError>;

    /// Lists the bookings intersecting `[start, end]`, sorted by start, end and id.
    fn list_bookings<'a>(
        &'a self,
        session: &'a Session,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'a, Vec<Booking>, CantamenError>;

    /// Display name of the vehicle behind a bookee.
    fn vehicle_name<'a>(
        &'a self,
        session: &'a Session,
        bookee_id: &'a str,
    ) -> BoxFuture<'a, String, CantamenError>;

    /// Display name of the place a bookee is parked at.
    fn location_name<'a>(
        &'a self,
        session: &'a Session,
        bookee_id: &'a str,
    ) -> BoxFuture<'a, String, CantamenError>;
}

/// Formats a query timestamp: UTC with microseconds, e.g. `2024-06-01T08:00:00.000000Z`.
pub fn to_query_timestamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// reqwest implementation of [`CantamenApi`].
#[derive(Clone)]
pub struct CantamenClient {
    http: Client,
    base_url: String,
    provider_id: String,
}

impl CantamenClient {
    pub fn new(http: Client, base_url: impl Into<String>, provider_id: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            provider_id: provider_id.into(),
        }
    }

    pub fn from_config(http: Client, config: &CantamenConfig) -> Self {
        Self::new(http, config.base_url.clone(), config.provider_id.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Headers every call carries; each request gets its own idempotency key.
    fn base_request(&self, builder: RequestBuilder, api_key: &str) -> RequestBuilder {
        builder
            .header(header::ACCEPT, "application/json")
            .header("X-API-Key", api_key)
            .header("Idempotency-Key", Uuid::new_v4().to_string())
    }

    fn authorized_get(&self, session: &Session, url: &str) -> RequestBuilder {
        self.base_request(self.http.get(url), &session.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Basic {}", session.token))
    }

    async fn fetch_name(
        &self,
        session: &Session,
        stage: Stage,
        path: String,
        expand: &str,
    ) -> Result<String, CantamenError> {
        let url = self.url(&path);
        let response = self
            .authorized_get(session, &url)
            .query(&[("expand", expand)])
            .send()
            .await
            .map_err(|e| CantamenError::from_reqwest(stage, e))?;

        let resource: NamedResource = read_json(stage, &url, response).await?;
        Ok(resource.name)
    }
}

/// Reads a successful JSON response, mapping non-2xx answers to [`CantamenError::Api`].
async fn read_json<T: DeserializeOwned>(
    stage: Stage,
    url: &str,
    response: Response,
) -> Result<T, CantamenError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| CantamenError::from_reqwest(stage, e))?;
    debug!("{} {} -> {} ({} bytes)", stage, url, status, body.len());

    if !status.is_success() {
        error!("Cantamen {} request to {} failed with {}: {}", stage, url, status, body);
        return Err(match stage {
            Stage::Authenticate => CantamenError::Auth {
                status: status.as_u16(),
                message: body,
            },
            _ => CantamenError::Api {
                stage,
                status: status.as_u16(),
                message: body,
            },
        });
    }

    serde_json::from_str(&body).map_err(|e| CantamenError::payload(stage, e))
}

impl CantamenApi for CantamenClient {
    fn authorize<'a>(&'a self, credential: &'a Credential) -> BoxFuture<'a, Session, CantamenError> {
        Box::pin(async move {
            let url = self.url("tokens");
            let body = TokenRequest {
                login: &credential.login,
                credential: credential.secret.expose(),
                prov_id: &self.provider_id,
                store_login: true,
            };

            let response = self
                .base_request(self.http.post(&url), &credential.api_key)
                .query(&[("expand", "customerId")])
                .json(&body)
                .send()
                .await
                .map_err(|e| CantamenError::from_reqwest(Stage::Authenticate, e))?;

            let token: TokenResponse = read_json(Stage::Authenticate, &url, response).await?;
            Ok(Session::from_token_id(&token.id, credential.api_key.clone()))
        })
    }

    fn list_bookings<'a>(
        &'a self,
        session: &'a Session,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'a, Vec<Booking>, CantamenError> {
        Box::pin(async move {
            let url = self.url("bookings");
            let start = to_query_timestamp(start);
            let end = to_query_timestamp(end);

            let response = self
                .authorized_get(session, &url)
                .query(&[
                    ("expand", "bookeeId"),
                    ("start", start.as_str()),
                    ("end", end.as_str()),
                    ("sort", "timeRange.start,timeRange.end,id"),
                ])
                .send()
                .await
                .map_err(|e| CantamenError::from_reqwest(Stage::Bookings, e))?;

            read_json(Stage::Bookings, &url, response).await
        })
    }

    fn vehicle_name<'a>(
        &'a self,
        session: &'a Session,
        bookee_id: &'a str,
    ) -> BoxFuture<'a, String, CantamenError> {
        Box::pin(self.fetch_name(
            session,
            Stage::Vehicle,
            format!("bookeeproducts/{bookee_id}"),
            "bookeeTypeId",
        ))
    }

    fn location_name<'a>(
        &'a self,
        session: &'a Session,
        bookee_id: &'a str,
    ) -> BoxFuture<'a, String, CantamenError> {
        Box::pin(self.fetch_name(
            session,
            Stage::Location,
            format!("bookees/{bookee_id}"),
            "placeId",
        ))
    }
}
