//! Error types for the venue client core.
//!
//! # Design
//! `NotFound` gets its own variant because a missing venue id is the one
//! failure a host may want to word differently. Every other non-200 status
//! lands in `HttpError` with the raw status and body. The search coordinator
//! collapses all of these into a single `on_error` event; the detail only
//! shows up in logs and in the FFI error strings.

use thiserror::Error;

/// Errors returned by `VenueClient` parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The gateway returned 404.
    #[error("resource not found")]
    NotFound,

    /// The gateway returned a non-200 status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body was not JSON.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The body was JSON but lacked a field the operation needs.
    #[error("response is missing `{0}`")]
    MissingField(&'static str),
}

/// The host could not complete the HTTP round-trip at all
/// (DNS, TLS, connection reset, offline...).
#[derive(Debug, Clone, Error)]
#[error("transport failed: {0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Errors raised while loading or applying a `GatewayConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid gateway base URL {0}")]
    InvalidBaseUrl(String),

    #[error("invalid API version '{0}': expected YYYYMMDD")]
    InvalidApiVersion(String),
}

/// Anything that ends a single gateway call unsuccessfully.
#[derive(Debug, Error)]
pub enum GatewayFailure {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
