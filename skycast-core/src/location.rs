use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};

use crate::error::LocationError;

const DEFAULT_BASE_URL: &str = "http://ip-api.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Approximate device position.
#[derive(Debug, Clone, Copy)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Platform capability the coordinator's geolocation path depends on.
#[async_trait]
pub trait LocationSource: Send + Sync + Debug {
    async fn current_location(&self) -> Result<Coordinates, LocationError>;
}

/// Resolves an approximate position from the caller's public IP address.
/// Coarse (city-level at best) but needs no permission prompt or API key.
#[derive(Debug, Clone)]
pub struct IpLocationSource {
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

impl IpLocationSource {
    pub fn new() -> Result<Self, LocationError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| LocationError::Other(err.to_string()))?;

        Ok(Self { http, base_url: DEFAULT_BASE_URL.to_string() })
    }

    /// Point the source at a different host. Used by tests to stub the API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl LocationSource for IpLocationSource {
    async fn current_location(&self) -> Result<Coordinates, LocationError> {
        let url = format!("{}/json", self.base_url);

        let res = self.http.get(&url).send().await.map_err(|err| {
            if err.is_timeout() {
                LocationError::Timeout
            } else {
                LocationError::Other(err.to_string())
            }
        })?;

        if !res.status().is_success() {
            return Err(LocationError::ServiceUnavailable);
        }

        let body: IpApiResponse = res
            .json()
            .await
            .map_err(|err| LocationError::Other(err.to_string()))?;

        if body.status != "success" {
            let reason = body.message.unwrap_or_else(|| "lookup failed".to_string());
            tracing::debug!(%reason, "ip geolocation refused");
            return Err(LocationError::ServiceUnavailable);
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinates { lat, lon }),
            _ => Err(LocationError::Other("response carried no coordinates".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn source_against(server: &MockServer) -> IpLocationSource {
        IpLocationSource::new().expect("client must build").with_base_url(server.uri())
    }

    #[tokio::test]
    async fn successful_lookup_returns_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "lat": 51.5072,
                "lon": -0.1276
            })))
            .mount(&server)
            .await;

        let coords = source_against(&server).await.current_location().await.expect("lookup");
        assert!((coords.lat - 51.5072).abs() < 1e-9);
        assert!((coords.lon + 0.1276).abs() < 1e-9);
    }

    #[tokio::test]
    async fn refused_lookup_maps_to_service_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "fail",
                "message": "private range"
            })))
            .mount(&server)
            .await;

        let err = source_against(&server).await.current_location().await.unwrap_err();
        assert!(matches!(err, LocationError::ServiceUnavailable));
    }

    #[tokio::test]
    async fn http_failure_maps_to_service_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = source_against(&server).await.current_location().await.unwrap_err();
        assert!(matches!(err, LocationError::ServiceUnavailable));
    }
}
