//! Free-text geocoding against a Nominatim-style search endpoint

use crate::geo::Coordinates;
use crate::{NimbusError, Result};
use serde::Deserialize;
use tracing::debug;

const USER_AGENT: &str = concat!("nimbus/", env!("CARGO_PKG_VERSION"));

/// One search hit; Nominatim reports coordinates as strings
#[derive(Debug, Clone, Deserialize)]
struct GeocodeHit {
    lat: String,
    lon: String,
}

/// Client for the external geocoding service
pub struct GeocodeClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeocodeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Resolve a free-text query to the top match's coordinates.
    ///
    /// Returns `Ok(None)` when the service has no match for the query.
    pub async fn search(&self, query: &str) -> Result<Option<Coordinates>> {
        if query.trim().is_empty() {
            return Ok(None);
        }

        let url = format!("{}/search", self.base_url);
        debug!("GET {} q={:?}", url, query);

        let response = self
            .http
            .get(url)
            .query(&[("format", "json"), ("q", query), ("limit", "1")])
            .send()
            .await
            .map_err(|e| NimbusError::RequestFailed {
                endpoint: "geocode".to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(NimbusError::RequestFailed {
                endpoint: "geocode".to_string(),
                reason: format!("status {}", response.status()),
            });
        }

        let hits: Vec<GeocodeHit> =
            response
                .json()
                .await
                .map_err(|e| NimbusError::DecodeFailed {
                    endpoint: "geocode".to_string(),
                    reason: e.to_string(),
                })?;

        Ok(hits.first().and_then(|hit| {
            let latitude = hit.lat.parse::<f64>().ok()?;
            let longitude = hit.lon.parse::<f64>().ok()?;
            Some(Coordinates {
                latitude,
                longitude,
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_parsing() {
        let hits: Vec<GeocodeHit> =
            serde_json::from_str(r#"[{"lat": "48.8566", "lon": "2.3522", "name": "Paris"}]"#)
                .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].lat, "48.8566");
    }

    #[test]
    fn test_unparseable_coordinates_yield_no_match() {
        let hit = GeocodeHit {
            lat: "not-a-number".to_string(),
            lon: "2.3522".to_string(),
        };
        let parsed = hit.lat.parse::<f64>().ok();
        assert!(parsed.is_none());
    }
}
