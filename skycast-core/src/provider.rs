use crate::{
    error::WeatherError,
    model::{Units, WeatherBundle},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Whether a query needs both provider endpoints to succeed.
///
/// The default mirrors the intended behavior: current conditions and
/// forecast are published together or not at all. `AllowPartial` keeps
/// whichever half succeeded and fails only when both legs fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    #[default]
    RequireBoth,
    AllowPartial,
}

/// Abstraction over the external weather-data provider. The coordinator
/// only sees this seam, which keeps it testable without HTTP.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions and the 5-day forecast for a city name.
    async fn fetch_by_city(
        &self,
        city: &str,
        units: Units,
    ) -> Result<WeatherBundle, WeatherError>;

    /// Fetch the same pair for a latitude/longitude position.
    async fn fetch_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
        units: Units,
    ) -> Result<WeatherBundle, WeatherError>;
}
