// --- File: crates/cantacal_cantamen/src/error.rs ---
use cantacal_common::{config_error, external_service_error, timeout_error, CantacalError};
use thiserror::Error;

/// Which upstream call failed; used in messages and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authenticate,
    Bookings,
    Vehicle,
    Location,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Authenticate => "token",
            Stage::Bookings => "bookings",
            Stage::Vehicle => "bookee product",
            Stage::Location => "bookee",
        };
        f.write_str(name)
    }
}

/// Cantamen feed errors.
#[derive(Error, Debug)]
pub enum CantamenError {
    /// No `user` query parameter, or an empty one
    #[error("Missing user parameter")]
    MissingParameter,

    /// No secret configured for the user, or the id does not decode to a login
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    /// Network failure talking to Cantamen
    #[error("Cantamen {stage} request failed: {source}")]
    Transport {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    /// The configured request timeout elapsed
    #[error("Cantamen {0} request timed out")]
    Timeout(Stage),

    /// Token issuance answered with a non-success status
    #[error("Cantamen rejected the credentials (Status: {status}): {message}")]
    Auth { status: u16, message: String },

    /// Any other call answered with a non-success status
    #[error("Cantamen {stage} request returned an error (Status: {status}): {message}")]
    Api {
        stage: Stage,
        status: u16,
        message: String,
    },

    /// The response body did not have the expected shape
    #[error("Unexpected Cantamen {stage} response: {message}")]
    Payload { stage: Stage, message: String },

    /// Missing or incomplete configuration
    #[error("Cantamen configuration error: {0}")]
    Config(String),
}

impl CantamenError {
    pub(crate) fn from_reqwest(stage: Stage, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CantamenError::Timeout(stage)
        } else {
            CantamenError::Transport { stage, source: err }
        }
    }

    pub(crate) fn payload(stage: Stage, message: impl std::fmt::Display) -> Self {
        CantamenError::Payload {
            stage,
            message: message.to_string(),
        }
    }

    /// True for the failures answered with 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            CantamenError::MissingParameter | CantamenError::UnknownUser(_)
        )
    }
}

/// Convert CantamenError to CantacalError
impl From<CantamenError> for CantacalError {
    fn from(err: CantamenError) -> Self {
        let message = err.to_string();
        match err {
            CantamenError::MissingParameter | CantamenError::UnknownUser(_) => {
                CantacalError::AuthError(message)
            }
            CantamenError::Timeout(_) => timeout_error(message),
            CantamenError::Config(msg) => config_error(msg),
            CantamenError::Transport { .. } => CantacalError::HttpError(message),
            // Upstream bodies are logged where they are read; callers only get stage and status
            CantamenError::Auth { status, .. } => external_service_error(
                "Cantamen",
                format!("{} request returned status {}", Stage::Authenticate, status),
            ),
            CantamenError::Api { stage, status, .. } => external_service_error(
                "Cantamen",
                format!("{stage} request returned status {status}"),
            ),
            CantamenError::Payload { .. } => external_service_error("Cantamen", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cantacal_common::HttpStatusCode;

    #[test]
    fn user_errors_become_unauthorized() {
        let missing: CantacalError = CantamenError::MissingParameter.into();
        let unknown: CantacalError = CantamenError::UnknownUser("dXNlcg".into()).into();
        assert_eq!(missing.status_code(), 401);
        assert_eq!(unknown.status_code(), 401);
    }

    #[test]
    fn upstream_errors_become_gateway_errors() {
        let auth: CantacalError = CantamenError::Auth {
            status: 403,
            message: "forbidden".into(),
        }
        .into();
        let api: CantacalError = CantamenError::Api {
            stage: Stage::Vehicle,
            status: 500,
            message: String::new(),
        }
        .into();
        let payload: CantacalError = CantamenError::payload(Stage::Bookings, "not a list").into();
        let timeout: CantacalError = CantamenError::Timeout(Stage::Location).into();

        assert_eq!(auth.status_code(), 502);
        assert_eq!(api.status_code(), 502);
        assert_eq!(payload.status_code(), 502);
        assert_eq!(timeout.status_code(), 504);
    }

    #[test]
    fn upstream_bodies_stay_out_of_the_response_message() {
        let auth: CantacalError = CantamenError::Auth {
            status: 401,
            message: "{\"error\":\"wrong password for john@example.com\"}".into(),
        }
        .into();
        let api: CantacalError = CantamenError::Api {
            stage: Stage::Location,
            status: 500,
            message: "stack trace".into(),
        }
        .into();

        assert_eq!(
            auth.to_string(),
            "External service error: Cantamen - token request returned status 401"
        );
        assert_eq!(
            api.to_string(),
            "External service error: Cantamen - bookee request returned status 500"
        );
    }

    #[test]
    fn missing_api_key_is_a_server_error() {
        let err: CantacalError = CantamenError::Config("api_key is not set".into()).into();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn stage_names_follow_endpoints() {
        assert_eq!(
            CantamenError::Timeout(Stage::Vehicle).to_string(),
            "Cantamen bookee product request timed out"
        );
    }
}
