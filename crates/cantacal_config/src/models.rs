// --- File: crates/cantacal_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_CANTAMEN_BASE_URL: &str = "https://de1.cantamen.de/casirest/v3";
pub const DEFAULT_PROVIDER_ID: &str = "79";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MONTHS_AHEAD: u32 = 6;

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

// --- Stored user credential ---
// `id` is the url-safe base64 form of the login, the same string the feed URL carries.
#[derive(Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct UserCredential {
    pub id: String,
    #[serde(skip_serializing)]
    pub secret: String,
}

impl fmt::Debug for UserCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredential")
            .field("id", &self.id)
            .field("secret", &"***")
            .finish()
    }
}

// --- Cantamen Config ---
// Non-secret settings plus the secrets injected at startup:
// CANTAMEN_API_KEY and one CANTAMEN_PWD_<encoded user> per user.
#[derive(Deserialize, Serialize, Clone)]
pub struct CantamenConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_provider_id")]
    pub provider_id: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_months_ahead")]
    pub months_ahead: u32,
    /// Upper bound on bookings enriched at the same time. 1 keeps it sequential.
    #[serde(default = "default_enrichment_concurrency")]
    pub enrichment_concurrency: usize,
    #[serde(default, skip_serializing)]
    pub users: Vec<UserCredential>,
}

impl fmt::Debug for CantamenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CantamenConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("provider_id", &self.provider_id)
            .field("timeout_secs", &self.timeout_secs)
            .field("months_ahead", &self.months_ahead)
            .field("enrichment_concurrency", &self.enrichment_concurrency)
            .field("users", &self.users)
            .finish()
    }
}

impl Default for CantamenConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            provider_id: default_provider_id(),
            timeout_secs: default_timeout_secs(),
            months_ahead: default_months_ahead(),
            enrichment_concurrency: default_enrichment_concurrency(),
            users: Vec::new(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_CANTAMEN_BASE_URL.to_string()
}

fn default_provider_id() -> String {
    DEFAULT_PROVIDER_ID.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_months_ahead() -> u32 {
    DEFAULT_MONTHS_AHEAD
}

fn default_enrichment_concurrency() -> usize {
    1
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub cantamen: CantamenConfig,
}
