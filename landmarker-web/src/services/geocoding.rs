//! Reverse-geocoding client (Nominatim)
//!
//! Resolves a coordinate into city/country strings. Transient failures get a
//! bounded retry with doubling backoff instead of a presentation-layer
//! refresh; after the retries are spent the failure is terminal.

use crate::config::GeocodingConfig;
use landmarker_common::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for geocoding requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Address keys tried in order when resolving the city component
const CITY_KEYS: [&str; 4] = ["city", "town", "village", "suburb"];
/// Address keys tried in order when resolving the country component
const COUNTRY_KEYS: [&str; 3] = ["country", "state", "county"];

/// City/country pair for a coordinate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub city: String,
    pub country: String,
}

/// Nominatim reverse-geocoding client
pub struct GeocodingClient {
    http_client: Client,
    endpoint: String,
    max_retries: u32,
    initial_backoff: Duration,
}

impl GeocodingClient {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| Error::Geolocation(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
        })
    }

    /// Reverse-geocode a coordinate with bounded retry
    pub async fn reverse(&self, latitude: f64, longitude: f64) -> Result<ResolvedLocation> {
        let mut delay = self.initial_backoff;
        let mut attempt = 0;
        loop {
            match self.reverse_once(latitude, longitude).await {
                Ok(location) => return Ok(location),
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries = self.max_retries,
                        "Reverse geocode failed ({}), retrying in {:?}",
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn reverse_once(&self, latitude: f64, longitude: f64) -> Result<ResolvedLocation> {
        debug!(latitude, longitude, "Reverse geocoding");

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
            ])
            .send()
            .await
            .map_err(|e| Error::Geolocation(format!("reverse geocode request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::Geolocation("geocoder rate limit exceeded".into()));
        }
        if !status.is_success() {
            return Err(Error::Geolocation(format!(
                "geocoder returned {}",
                status
            )));
        }

        let reverse: ReverseResponse = response
            .json()
            .await
            .map_err(|e| Error::Geolocation(format!("failed to parse geocoder response: {}", e)))?;

        Ok(ResolvedLocation {
            city: first_present(&reverse.address, &CITY_KEYS),
            country: first_present(&reverse.address, &COUNTRY_KEYS),
        })
    }
}

/// First value present for any of the given keys, or empty
fn first_present(address: &HashMap<String, String>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| address.get(*key))
        .cloned()
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn city_prefers_city_over_fallbacks() {
        let addr = address(&[("city", "Baku"), ("suburb", "İçərişəhər")]);
        assert_eq!(first_present(&addr, &CITY_KEYS), "Baku");
    }

    #[test]
    fn city_falls_back_in_key_order() {
        let addr = address(&[("village", "Lahıc")]);
        assert_eq!(first_present(&addr, &CITY_KEYS), "Lahıc");
        let addr = address(&[("suburb", "Old Town"), ("town", "Sheki")]);
        assert_eq!(first_present(&addr, &CITY_KEYS), "Sheki");
    }

    #[test]
    fn country_falls_back_to_state_then_county() {
        let addr = address(&[("state", "Catalonia")]);
        assert_eq!(first_present(&addr, &COUNTRY_KEYS), "Catalonia");
        let addr = address(&[("country", "Azerbaijan"), ("state", "Absheron")]);
        assert_eq!(first_present(&addr, &COUNTRY_KEYS), "Azerbaijan");
    }

    #[test]
    fn missing_keys_yield_empty_strings() {
        let addr = address(&[("postcode", "AZ1000")]);
        assert_eq!(first_present(&addr, &CITY_KEYS), "");
        assert_eq!(first_present(&addr, &COUNTRY_KEYS), "");
    }

    #[test]
    fn response_parsing_ignores_extra_fields() {
        let reverse: ReverseResponse = serde_json::from_str(
            r#"{
                "place_id": 12345,
                "display_name": "Maiden Tower, Baku, Azerbaijan",
                "address": {"city": "Baku", "country": "Azerbaijan", "country_code": "az"}
            }"#,
        )
        .unwrap();
        assert_eq!(first_present(&reverse.address, &CITY_KEYS), "Baku");
        assert_eq!(first_present(&reverse.address, &COUNTRY_KEYS), "Azerbaijan");
    }
}
