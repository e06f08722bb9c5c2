//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! The core never opens a socket. `VenueClient` describes each gateway call
//! as an `HttpRequest`; the host runs it with whatever stack the platform
//! offers and hands back an `HttpResponse` (or a `TransportError` when no
//! response arrived at all).
//!
//! All fields are owned so values can cross the FFI boundary without
//! lifetime concerns.

/// HTTP method for a request. The venue API is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

/// An HTTP request described as plain data.
///
/// `url` is absolute, with every query parameter already percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// A response with no headers, the common case for hosts and tests.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}
