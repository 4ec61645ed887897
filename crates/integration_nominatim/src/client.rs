//! Nominatim geocoding client
//!
//! Converts free-form address strings to places and coordinates back to
//! places using the [Nominatim](https://nominatim.openstreetmap.org) API.
//!
//! Implements rate limiting (Nominatim usage policy) and forward lookup
//! caching to minimize API calls.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::{Client, Response, StatusCode};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::config::NominatimConfig;
use crate::error::GeocodingError;
use crate::models::{NominatimPlace, ReverseResponse};

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Look up places matching a free-form address, best match first
    async fn search(&self, address: &str) -> Result<Vec<NominatimPlace>, GeocodingError>;

    /// Look up the place at the given coordinates
    async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<NominatimPlace, GeocodingError>;
}

/// Nominatim-based geocoding client with rate limiting and caching
#[derive(Debug)]
pub struct NominatimGeocodingClient {
    client: Client,
    config: NominatimConfig,
    cache: Option<Cache<String, Vec<NominatimPlace>>>,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl NominatimGeocodingClient {
    /// Create a new Nominatim geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        let cache = (config.cache_ttl_hours > 0).then(|| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(Duration::from_secs(config.cache_ttl_hours * 3600))
                .build()
        });

        Ok(Self {
            client,
            config: config.clone(),
            cache,
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    /// Enforce the minimum spacing between requests
    async fn rate_limit(&self) {
        let min_interval = Duration::from_millis(self.config.min_request_interval_ms);
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < min_interval {
                let wait = min_interval.saturating_sub(elapsed);
                debug!(?wait, "Rate limiting geocoding request");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Response, GeocodingError> {
        self.rate_limit().await;

        let url = format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(params)
            .header("Accept-Language", &self.config.language)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodingError::Timeout
                } else {
                    GeocodingError::ConnectionFailed(e.to_string())
                }
            })?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::TOO_MANY_REQUESTS => Err(GeocodingError::RateLimitExceeded),
            status => Err(GeocodingError::RequestFailed(format!("HTTP {status}"))),
        }
    }
}

#[async_trait]
impl GeocodingClient for NominatimGeocodingClient {
    #[instrument(skip(self))]
    async fn search(&self, address: &str) -> Result<Vec<NominatimPlace>, GeocodingError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodingError::NotFound(
                "Address must not be empty".to_string(),
            ));
        }

        let cache_key = address.to_lowercase();
        if let Some(ref cache) = self.cache {
            if let Some(places) = cache.get(&cache_key).await {
                debug!(%address, "Geocoding cache hit");
                return Ok(places);
            }
        }

        let mut params = vec![
            ("q", address.to_string()),
            ("format", "jsonv2".to_string()),
            ("addressdetails", "1".to_string()),
            ("limit", self.config.result_limit.to_string()),
        ];
        if !self.config.country_filter.is_empty() {
            params.push(("countrycodes", self.config.country_filter.clone()));
        }

        debug!(%address, "Geocoding address");
        let places: Vec<NominatimPlace> = self
            .get("search", &params)
            .await?
            .json()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        if places.is_empty() {
            return Err(GeocodingError::NotFound(address.to_string()));
        }

        if let Some(ref cache) = self.cache {
            cache.insert(cache_key, places.clone()).await;
        }
        debug!(%address, count = places.len(), "Geocoded address");
        Ok(places)
    }

    #[instrument(skip(self))]
    async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<NominatimPlace, GeocodingError> {
        let params = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("format", "jsonv2".to_string()),
            ("addressdetails", "1".to_string()),
        ];

        debug!(%latitude, %longitude, "Reverse geocoding");
        let response: ReverseResponse = self
            .get("reverse", &params)
            .await?
            .json()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        match response {
            ReverseResponse::Place(place) => Ok(place),
            ReverseResponse::Error { error } => {
                debug!(%error, "Nominatim found nothing at coordinates");
                Err(GeocodingError::NotFound(format!("{latitude},{longitude}")))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(NominatimGeocodingClient::new(&NominatimConfig::default()).is_ok());
    }

    #[test]
    fn test_cache_disabled_with_zero_ttl() {
        let client =
            NominatimGeocodingClient::new(&NominatimConfig::for_testing("http://localhost"))
                .unwrap();
        assert!(client.cache.is_none());
    }

    #[tokio::test]
    async fn test_empty_address_rejected_without_request() {
        let client =
            NominatimGeocodingClient::new(&NominatimConfig::for_testing("http://127.0.0.1:1"))
                .unwrap();
        let err = client.search("   ").await.unwrap_err();
        assert!(matches!(err, GeocodingError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rate_limit_spaces_requests() {
        let config = NominatimConfig {
            min_request_interval_ms: 50,
            ..NominatimConfig::for_testing("http://localhost")
        };
        let client = NominatimGeocodingClient::new(&config).unwrap();

        let start = Instant::now();
        client.rate_limit().await;
        client.rate_limit().await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
