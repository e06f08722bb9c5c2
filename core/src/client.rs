//! Stateless request builder and response parser for the venue gateway.
//!
//! # Design
//! `VenueClient` holds only its configuration. Each gateway call is split into
//! a `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. The host executes the round-trip in
//! between, so the client stays deterministic and free of I/O.
//!
//! Bodies go through the generic mapper, never through a strict serde derive:
//! the gateway adds and drops keys between API versions and a missing photo
//! block must not cost us the venue.

use tracing::debug;
use url::Url;

use crate::config::{is_api_version, GatewayConfig};
use crate::error::{ApiError, ConfigError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::mapper::map_model;
use crate::types::{ApiEnvelope, Coordinate, Group, Venue};

const EXPLORE_PATH: &str = "/v2/venues/explore";
const VENUE_PATH: &str = "/v2/venues";

#[derive(Debug, Clone)]
pub struct VenueClient {
    config: GatewayConfig,
    base_url: Url,
}

impl VenueClient {
    /// A base URL may carry a path prefix (e.g. a proxy mount point); API
    /// paths are appended after it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if `config.base_url` is not an
    /// absolute URL, and [`ConfigError::InvalidApiVersion`] if
    /// `config.api_version` is not `YYYYMMDD`.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(format!("'{}': {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl(config.base_url));
        }
        if !is_api_version(&config.api_version) {
            return Err(ConfigError::InvalidApiVersion(config.api_version));
        }
        Ok(Self { config, base_url })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Explore venues near a place name, e.g. "melbourne".
    pub fn build_search_by_text(&self, term: &str, offset: usize) -> HttpRequest {
        self.build_explore(offset, ("near", term.to_string()))
    }

    /// Explore venues around a coordinate.
    pub fn build_search_by_location(&self, at: Coordinate, offset: usize) -> HttpRequest {
        let ll = format!("{},{}", at.latitude, at.longitude);
        self.build_explore(offset, ("ll", ll))
    }

    pub fn build_fetch_venue(&self, id: &str) -> HttpRequest {
        let mut url = self.base(VENUE_PATH);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        self.append_credentials(&mut url);
        debug!(venue_id = id, "built venue request");
        get(url)
    }

    /// Parse an explore response into its result groups. A body without
    /// `response.groups` is an empty result, not an error.
    pub fn parse_search(&self, response: HttpResponse) -> Result<Vec<Group>, ApiError> {
        let envelope = parse_envelope(response)?;
        Ok(envelope
            .response
            .and_then(|r| r.groups)
            .unwrap_or_default())
    }

    pub fn parse_venue(&self, response: HttpResponse) -> Result<Venue, ApiError> {
        let envelope = parse_envelope(response)?;
        envelope
            .response
            .and_then(|r| r.venue)
            .ok_or(ApiError::MissingField("response.venue"))
    }

    fn build_explore(&self, offset: usize, query: (&str, String)) -> HttpRequest {
        let mut url = self.base(EXPLORE_PATH);
        self.append_credentials(&mut url);
        url.query_pairs_mut()
            .append_pair("offset", &offset.to_string())
            .append_pair("limit", &self.config.page_size.to_string())
            .append_pair("venuePhotos", "1")
            .append_pair(query.0, &query.1);
        debug!(url = %redact(&url), offset, "built explore request");
        get(url)
    }

    fn base(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let prefix = self.base_url.path().trim_end_matches('/');
        url.set_path(&format!("{prefix}{path}"));
        url
    }

    fn append_credentials(&self, url: &mut Url) {
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("client_secret", &self.config.client_secret)
            .append_pair("v", &self.config.api_version);
    }
}

fn get(url: Url) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        url: url.into(),
        headers: vec![("accept".to_string(), "application/json".to_string())],
    }
}

/// Map non-200 statuses to errors, then run the body through the mapper.
fn parse_envelope(response: HttpResponse) -> Result<ApiEnvelope, ApiError> {
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    if response.status != 200 {
        return Err(ApiError::HttpError {
            status: response.status,
            body: response.body,
        });
    }
    let json: serde_json::Value = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    Ok(map_model(&json))
}

/// The URL with `client_secret` masked, for logs.
fn redact(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "client_secret" { "***".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.into()
}
