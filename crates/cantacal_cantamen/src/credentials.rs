// --- File: crates/cantacal_cantamen/src/credentials.rs ---
//! Credential resolution.
//!
//! The feed URL carries the login as URL-safe base64 so that it survives both
//! a query string and an environment variable name. The encoding stays at this
//! boundary: everything past [`resolve_credential`] works with a [`Credential`].

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use cantacal_config::CantamenConfig;
use std::collections::HashMap;
use std::fmt;

use crate::error::CantamenError;

/// Encoded user id as it appears in the feed URL and the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Decodes the login. Padding is optional.
    pub fn decode_login(&self) -> Option<String> {
        let trimmed = self.0.trim_end_matches('=');
        let bytes = URL_SAFE_NO_PAD.decode(trimmed).ok()?;
        String::from_utf8(bytes).ok()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A password. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Looks up the stored secret of a user.
pub trait SecretResolver: Send + Sync {
    fn resolve_secret(&self, user_id: &UserId) -> Option<Secret>;
}

/// Secrets captured from the configuration at startup.
#[derive(Debug, Default, Clone)]
pub struct UserSecrets {
    secrets: HashMap<UserId, Secret>,
}

impl UserSecrets {
    pub fn from_config(config: &CantamenConfig) -> Self {
        config
            .users
            .iter()
            .map(|user| (UserId::new(user.id.clone()), Secret::new(user.secret.clone())))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl FromIterator<(UserId, Secret)> for UserSecrets {
    fn from_iter<T: IntoIterator<Item = (UserId, Secret)>>(iter: T) -> Self {
        Self {
            secrets: iter.into_iter().collect(),
        }
    }
}

impl SecretResolver for UserSecrets {
    fn resolve_secret(&self, user_id: &UserId) -> Option<Secret> {
        self.secrets.get(user_id).cloned()
    }
}

/// Everything needed to talk to Cantamen on behalf of one user.
#[derive(Debug, Clone)]
pub struct Credential {
    pub user_id: UserId,
    pub login: String,
    pub secret: Secret,
    pub api_key: String,
}

/// Turns the raw `user` parameter into a [`Credential`].
///
/// Missing or empty parameters, unknown users and ids that do not decode are
/// all authorization failures. A missing API key is a configuration error.
pub fn resolve_credential(
    user: Option<&str>,
    resolver: &dyn SecretResolver,
    api_key: Option<&str>,
) -> Result<Credential, CantamenError> {
    let user_id = match user {
        Some(user) if !user.is_empty() => UserId::new(user),
        _ => return Err(CantamenError::MissingParameter),
    };

    let secret = resolver
        .resolve_secret(&user_id)
        .ok_or_else(|| CantamenError::UnknownUser(user_id.to_string()))?;

    let login = user_id
        .decode_login()
        .ok_or_else(|| CantamenError::UnknownUser(user_id.to_string()))?;

    let api_key = api_key
        .filter(|key| !key.is_empty())
        .ok_or_else(|| CantamenError::Config("api_key is not set".to_string()))?
        .to_string();

    Ok(Credential {
        user_id,
        login,
        secret,
        api_key,
    })
}
