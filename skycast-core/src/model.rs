use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Measurement system applied to temperature and wind speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// Value of the provider's `units` query parameter.
    pub fn as_query_param(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn wind_speed_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_query_param())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

/// Current conditions for one location, replaced wholesale on every
/// successful query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location_name: String,
    pub country_code: String,
    pub observed_at: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed: f64,
    pub condition_main: String,
    pub condition_description: String,
    pub icon_code: String,
}

/// One 3-hourly snapshot from the 5-day forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub forecast_at: DateTime<Utc>,
    pub temperature: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub condition_main: String,
    pub condition_description: String,
    pub icon_code: String,
}

/// User-bookmarked snapshot of a past query result. Not a live reference:
/// the values do not move until the city is re-fetched and re-saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCity {
    pub name: String,
    pub country_code: String,
    pub temperature: f64,
    pub condition_main: String,
}

impl SavedCity {
    pub fn from_current(current: &CurrentWeather) -> Self {
        Self {
            name: current.location_name.clone(),
            country_code: current.country_code.clone(),
            temperature: current.temperature,
            condition_main: current.condition_main.clone(),
        }
    }
}

/// Joined result of the two per-query provider calls. Under the default
/// fetch policy both halves are present; with partial fetches allowed a
/// half that failed stays empty.
#[derive(Debug, Clone, Default)]
pub struct WeatherBundle {
    pub current: Option<CurrentWeather>,
    pub forecast: Vec<ForecastEntry>,
}

/// The forecast arrives at 3-hour resolution; every 8th entry approximates
/// one point per day.
pub fn daily_digest(entries: &[ForecastEntry]) -> Vec<&ForecastEntry> {
    entries.iter().step_by(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry_at(hours: i64) -> ForecastEntry {
        ForecastEntry {
            forecast_at: Utc.timestamp_opt(hours * 3600, 0).unwrap(),
            temperature: 10.0,
            humidity_pct: 50,
            wind_speed: 3.0,
            condition_main: "Clouds".to_string(),
            condition_description: "scattered clouds".to_string(),
            icon_code: "03d".to_string(),
        }
    }

    #[test]
    fn units_default_is_metric() {
        assert_eq!(Units::default(), Units::Metric);
    }

    #[test]
    fn units_roundtrip_through_query_param() {
        for units in [Units::Metric, Units::Imperial] {
            let parsed = Units::try_from(units.as_query_param()).expect("roundtrip");
            assert_eq!(units, parsed);
        }
    }

    #[test]
    fn unknown_units_error() {
        let err = Units::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
    }

    #[test]
    fn daily_digest_takes_every_eighth_entry() {
        let entries: Vec<ForecastEntry> = (0..40).map(|i| entry_at(i * 3)).collect();
        let digest = daily_digest(&entries);

        assert_eq!(digest.len(), 5);
        assert_eq!(digest[0].forecast_at, entries[0].forecast_at);
        assert_eq!(digest[1].forecast_at, entries[8].forecast_at);
        assert_eq!(digest[4].forecast_at, entries[32].forecast_at);
    }

    #[test]
    fn daily_digest_of_short_list_keeps_first_entry() {
        let entries = vec![entry_at(0), entry_at(3)];
        let digest = daily_digest(&entries);
        assert_eq!(digest.len(), 1);
    }
}
