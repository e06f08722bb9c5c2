//! Gateway configuration: host, credentials and API version.

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.foursquare.com";
pub const DEFAULT_API_VERSION: &str = "20170701";
/// Results per explore page. Paging offsets advance by the number of items
/// the host already holds, so this is only an upper bound per request.
pub const PAGE_SIZE: usize = 30;

/// Everything `VenueClient` needs to compose request URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub api_version: String,
    pub page_size: usize,
}

impl GatewayConfig {
    /// Production defaults with the given credentials.
    pub fn new(client_id: &str, client_secret: &str) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            page_size: PAGE_SIZE,
        }
    }

    /// Point the client somewhere else, e.g. a mock server in tests.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Load configuration from the environment, reading a `.env` file first
    /// if one exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value is
    /// invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        build_config(|key| std::env::var(key))
    }
}

/// The gateway versions its API by date: `YYYYMMDD`.
pub fn is_api_version(version: &str) -> bool {
    version.len() == 8 && version.bytes().all(|b| b.is_ascii_digit())
}

/// Parse configuration through `lookup` so tests can feed a map instead of
/// mutating the process environment.
fn build_config<F>(lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };
    let or_default =
        |var: &str, default: &str| -> String { lookup(var).unwrap_or_else(|_| default.to_string()) };

    let client_id = require("VENUES_CLIENT_ID")?;
    let client_secret = require("VENUES_CLIENT_SECRET")?;
    let api_version = or_default("VENUES_API_VERSION", DEFAULT_API_VERSION);
    if !is_api_version(&api_version) {
        return Err(ConfigError::InvalidEnvVar {
            var: "VENUES_API_VERSION".to_string(),
            reason: format!("expected YYYYMMDD, got '{api_version}'"),
        });
    }

    let base_url = or_default("VENUES_BASE_URL", DEFAULT_BASE_URL);
    url::Url::parse(&base_url).map_err(|e| ConfigError::InvalidEnvVar {
        var: "VENUES_BASE_URL".to_string(),
        reason: e.to_string(),
    })?;

    Ok(GatewayConfig {
        base_url: base_url.trim_end_matches('/').to_string(),
        client_id,
        client_secret,
        api_version,
        page_size: PAGE_SIZE,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn defaults_apply_when_only_credentials_are_set() {
        let map = HashMap::from([("VENUES_CLIENT_ID", "id"), ("VENUES_CLIENT_SECRET", "secret")]);
        let config = build_config(lookup_from_map(&map)).unwrap();
        assert_eq!(config, GatewayConfig::new("id", "secret"));
    }

    #[test]
    fn base_url_override_drops_trailing_slash() {
        let map = HashMap::from([
            ("VENUES_CLIENT_ID", "id"),
            ("VENUES_CLIENT_SECRET", "secret"),
            ("VENUES_BASE_URL", "http://127.0.0.1:3000/"),
            ("VENUES_API_VERSION", "20240101"),
        ]);
        let config = build_config(lookup_from_map(&map)).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.api_version, "20240101");
    }

    #[test]
    fn missing_secret_is_an_error() {
        let map = HashMap::from([("VENUES_CLIENT_ID", "id")]);
        let err = build_config(lookup_from_map(&map)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "VENUES_CLIENT_SECRET"));
    }

    #[test]
    fn empty_client_id_counts_as_missing() {
        let map = HashMap::from([("VENUES_CLIENT_ID", ""), ("VENUES_CLIENT_SECRET", "s")]);
        let err = build_config(lookup_from_map(&map)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "VENUES_CLIENT_ID"));
    }

    #[test]
    fn api_version_must_be_eight_digits() {
        assert!(is_api_version(DEFAULT_API_VERSION));
        assert!(!is_api_version("2017070"));
        assert!(!is_api_version("2017-07-01"));
        assert!(!is_api_version(""));
    }

    #[test]
    fn malformed_version_and_url_are_rejected() {
        let map = HashMap::from([
            ("VENUES_CLIENT_ID", "id"),
            ("VENUES_CLIENT_SECRET", "secret"),
            ("VENUES_API_VERSION", "latest"),
        ]);
        let err = build_config(lookup_from_map(&map)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "VENUES_API_VERSION"));

        let map = HashMap::from([
            ("VENUES_CLIENT_ID", "id"),
            ("VENUES_CLIENT_SECRET", "secret"),
            ("VENUES_BASE_URL", "api.foursquare.com"),
        ]);
        let err = build_config(lookup_from_map(&map)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "VENUES_BASE_URL"));
    }
}
