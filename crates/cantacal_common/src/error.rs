// --- File: crates/cantacal_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by all cantacal crates.
///
/// Feature crates keep their own error enums and implement
/// `From<TheirError> for CantacalError` so handlers can turn any failure into
/// an HTTP response the same way.
#[derive(Error, Debug)]
pub enum CantacalError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The caller could not be authenticated
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for CantacalError {
    fn status_code(&self) -> u16 {
        match self {
            CantacalError::HttpError(_) => 502,
            CantacalError::ConfigError(_) => 500,
            CantacalError::AuthError(_) => 401,
            CantacalError::ExternalServiceError { .. } => 502,
            CantacalError::TimeoutError(_) => 504,
        }
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> CantacalError {
    CantacalError::ConfigError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> CantacalError {
    CantacalError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn timeout_error<T: fmt::Display>(message: T) -> CantacalError {
    CantacalError::TimeoutError(message.to_string())
}
