use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    error::WeatherError,
    model::{CurrentWeather, ForecastEntry, Units, WeatherBundle},
    provider::FetchPolicy,
};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the image URL for a provider icon code, e.g. "10d".
pub fn icon_url(icon_code: &str) -> String {
    format!("{ICON_BASE_URL}/{icon_code}@2x.png")
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
    base_url: String,
    policy: FetchPolicy,
}

/// Query parameters identifying the location, shared by both endpoints.
#[derive(Debug, Clone)]
enum Place {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl Place {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Place::City(name) => vec![("q", name.clone())],
            Place::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }

    /// Human-readable form used in "not found" messages.
    fn label(&self) -> String {
        match self {
            Place::City(name) => name.clone(),
            Place::Coordinates { lat, lon } => format!("{lat:.4},{lon:.4}"),
        }
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            api_key,
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            policy: FetchPolicy::default(),
        })
    }

    /// Point the provider at a different host. Used by tests to stub the API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    async fn get_json(&self, path: &str, place: &Place, units: Units) -> Result<String, WeatherError> {
        let mut query = place.query_pairs();
        query.push(("appid", self.api_key.clone()));
        query.push(("units", units.as_query_param().to_string()));

        let url = format!("{}{path}", self.base_url);
        let res = self.http.get(&url).query(&query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::from_status(status, &place.label(), truncate_body(&body)));
        }

        Ok(body)
    }

    async fn fetch_current(&self, place: &Place, units: Units) -> Result<CurrentWeather, WeatherError> {
        let body = self.get_json("/data/2.5/weather", place, units).await?;
        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;

        let observed_at = unix_to_utc(parsed.dt).unwrap_or_else(Utc::now);
        let condition = parsed.weather.into_iter().next().unwrap_or_default();

        Ok(CurrentWeather {
            location_name: parsed.name,
            country_code: parsed.sys.country.unwrap_or_default(),
            observed_at,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            wind_speed: parsed.wind.speed,
            condition_main: condition.main,
            condition_description: condition.description,
            icon_code: condition.icon,
        })
    }

    async fn fetch_forecast(&self, place: &Place, units: Units) -> Result<Vec<ForecastEntry>, WeatherError> {
        let body = self.get_json("/data/2.5/forecast", place, units).await?;
        let parsed: OwForecastResponse = serde_json::from_str(&body)?;

        let mut entries: Vec<ForecastEntry> = parsed
            .list
            .into_iter()
            .map(|entry| {
                let condition = entry.weather.into_iter().next().unwrap_or_default();
                ForecastEntry {
                    forecast_at: unix_to_utc(entry.dt).unwrap_or_else(Utc::now),
                    temperature: entry.main.temp,
                    humidity_pct: entry.main.humidity,
                    wind_speed: entry.wind.speed,
                    condition_main: condition.main,
                    condition_description: condition.description,
                    icon_code: condition.icon,
                }
            })
            .collect();

        // Timestamp order is not contractual on the wire.
        entries.sort_by_key(|entry| entry.forecast_at);

        Ok(entries)
    }

    async fn fetch_pair(&self, place: Place, units: Units) -> Result<WeatherBundle, WeatherError> {
        tracing::debug!(place = %place.label(), %units, policy = ?self.policy, "querying provider");

        match self.policy {
            FetchPolicy::RequireBoth => {
                let (current, forecast) = tokio::try_join!(
                    self.fetch_current(&place, units),
                    self.fetch_forecast(&place, units),
                )?;

                Ok(WeatherBundle { current: Some(current), forecast })
            }
            FetchPolicy::AllowPartial => {
                let (current, forecast) = tokio::join!(
                    self.fetch_current(&place, units),
                    self.fetch_forecast(&place, units),
                );

                match (current, forecast) {
                    (Err(err), Err(_)) => Err(err),
                    (current, forecast) => Ok(WeatherBundle {
                        current: current.ok(),
                        forecast: forecast.unwrap_or_default(),
                    }),
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    feels_like: f64,
    humidity: u8,
    #[serde(default)]
    pressure: u32,
}

#[derive(Debug, Deserialize, Default)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize, Default)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_by_city(&self, city: &str, units: Units) -> Result<WeatherBundle, WeatherError> {
        self.fetch_pair(Place::City(city.to_string()), units).await
    }

    async fn fetch_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
        units: Units,
    ) -> Result<WeatherBundle, WeatherError> {
        self.fetch_pair(Place::Coordinates { lat, lon }, units).await
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_url_embeds_the_code() {
        assert_eq!(icon_url("10d"), "https://openweathermap.org/img/wn/10d@2x.png");
    }

    #[test]
    fn current_response_maps_all_fields() {
        let body = r#"{
            "name": "London",
            "dt": 1700000000,
            "main": {"temp": 8.4, "feels_like": 6.1, "humidity": 81, "pressure": 1012},
            "weather": [{"main": "Clouds", "description": "overcast clouds", "icon": "04d"}],
            "wind": {"speed": 4.6},
            "sys": {"country": "GB"}
        }"#;

        let parsed: OwCurrentResponse = serde_json::from_str(body).expect("fixture must parse");
        assert_eq!(parsed.name, "London");
        assert_eq!(parsed.main.pressure, 1012);
        assert_eq!(parsed.sys.country.as_deref(), Some("GB"));
        assert_eq!(parsed.weather[0].icon, "04d");
    }

    #[test]
    fn missing_weather_array_entry_falls_back_to_empty_condition() {
        let condition = Vec::<OwWeather>::new().into_iter().next().unwrap_or_default();
        assert!(condition.main.is_empty());
        assert!(condition.icon.is_empty());
    }
}
