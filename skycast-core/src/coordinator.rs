use crate::{
    error::WeatherError,
    model::WeatherBundle,
    provider::WeatherProvider,
    store::AppStore,
};

/// Most-recent-first search history, capped at this many distinct names.
pub const RECENT_SEARCH_CAP: usize = 5;

/// Issues weather queries and publishes their outcome into the store.
///
/// Every query is stamped with a monotonically increasing token; an outcome
/// is applied only while its token is still the latest issued, so a slow
/// response can never overwrite the result of a query started after it.
#[derive(Debug)]
pub struct Coordinator {
    provider: Box<dyn WeatherProvider>,
    recent_searches: Vec<String>,
    next_token: u64,
}

impl Coordinator {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider, recent_searches: Vec::new(), next_token: 0 }
    }

    /// Session-local search history, most recent first.
    pub fn recent_searches(&self) -> &[String] {
        &self.recent_searches
    }

    /// Query by city name. The outcome lands in the store: results and a
    /// recents entry on success, a displayable error message on failure.
    pub async fn query_city(&mut self, store: &mut AppStore, city: &str) {
        let token = self.issue_token();
        store.set_loading(true);

        tracing::info!(%city, units = %store.units, token, "weather query by city");
        let result = self.provider.fetch_by_city(city, store.units).await;
        self.apply(token, store, Some(city), result);
    }

    /// Query by coordinates (geolocation path). No recents entry is added;
    /// the history tracks typed searches only.
    pub async fn query_coordinates(&mut self, store: &mut AppStore, lat: f64, lon: f64) {
        let token = self.issue_token();
        store.set_loading(true);

        tracing::info!(lat, lon, units = %store.units, token, "weather query by coordinates");
        let result = self.provider.fetch_by_coordinates(lat, lon, store.units).await;
        self.apply(token, store, None, result);
    }

    fn issue_token(&mut self) -> u64 {
        let token = self.next_token;
        self.next_token += 1;
        token
    }

    fn is_latest(&self, token: u64) -> bool {
        token + 1 == self.next_token
    }

    fn apply(
        &mut self,
        token: u64,
        store: &mut AppStore,
        searched_name: Option<&str>,
        result: Result<WeatherBundle, WeatherError>,
    ) {
        if !self.is_latest(token) {
            // A newer query owns the store now; its own apply call manages
            // the loading flag.
            tracing::debug!(token, latest = self.next_token - 1, "discarding stale query result");
            return;
        }

        match result {
            Ok(bundle) => {
                if let Some(current) = bundle.current {
                    store.set_current_weather(current);
                }
                if !bundle.forecast.is_empty() {
                    store.set_forecast(bundle.forecast);
                }
                store.clear_error();
                if let Some(name) = searched_name {
                    self.push_recent(name);
                }
            }
            Err(err) => {
                tracing::warn!(%err, "weather query failed");
                store.set_error(err.to_string());
            }
        }

        store.set_loading(false);
    }

    /// Exact-match dedup: re-searching a known name moves it to the front
    /// without growing the list.
    fn push_recent(&mut self, name: &str) {
        self.recent_searches.retain(|existing| existing != name);
        self.recent_searches.insert(0, name.to_string());
        self.recent_searches.truncate(RECENT_SEARCH_CAP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrentWeather, ForecastEntry, Units, WeatherBundle};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use reqwest::StatusCode;

    /// Canned provider: city queries succeed with a fixed bundle unless the
    /// city is listed as failing.
    #[derive(Debug)]
    struct FakeProvider {
        failing_city: Option<String>,
    }

    fn bundle_for(city: &str) -> WeatherBundle {
        let current = CurrentWeather {
            location_name: city.to_string(),
            country_code: "GB".to_string(),
            observed_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            temperature: 8.4,
            feels_like: 6.1,
            humidity_pct: 81,
            pressure_hpa: 1012,
            wind_speed: 4.6,
            condition_main: "Clouds".to_string(),
            condition_description: "overcast clouds".to_string(),
            icon_code: "04d".to_string(),
        };
        let forecast = vec![ForecastEntry {
            forecast_at: Utc.timestamp_opt(1_700_010_800, 0).unwrap(),
            temperature: 7.9,
            humidity_pct: 84,
            wind_speed: 5.0,
            condition_main: "Rain".to_string(),
            condition_description: "light rain".to_string(),
            icon_code: "10d".to_string(),
        }];
        WeatherBundle { current: Some(current), forecast }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn fetch_by_city(
            &self,
            city: &str,
            _units: Units,
        ) -> Result<WeatherBundle, WeatherError> {
            if self.failing_city.as_deref() == Some(city) {
                return Err(WeatherError::NotFound { query: city.to_string() });
            }
            Ok(bundle_for(city))
        }

        async fn fetch_by_coordinates(
            &self,
            _lat: f64,
            _lon: f64,
            _units: Units,
        ) -> Result<WeatherBundle, WeatherError> {
            Ok(bundle_for("Geolocated"))
        }
    }

    fn coordinator() -> Coordinator {
        Coordinator::new(Box::new(FakeProvider { failing_city: None }))
    }

    fn failing_coordinator(city: &str) -> Coordinator {
        Coordinator::new(Box::new(FakeProvider { failing_city: Some(city.to_string()) }))
    }

    #[tokio::test]
    async fn successful_query_publishes_results_and_recents() {
        let mut coordinator = coordinator();
        let mut store = AppStore::default();

        coordinator.query_city(&mut store, "London").await;

        let current = store.current_weather.as_ref().expect("current weather published");
        assert_eq!(current.location_name, "London");
        assert_eq!(store.forecast.len(), 1);
        assert!(!store.loading);
        assert!(store.error.is_none());
        assert_eq!(coordinator.recent_searches(), ["London"]);
    }

    #[tokio::test]
    async fn failed_query_sets_error_and_leaves_previous_data() {
        let mut coordinator = failing_coordinator("Lndon");
        let mut store = AppStore::default();

        coordinator.query_city(&mut store, "London").await;
        let before = store.current_weather.clone().expect("first query succeeded");

        coordinator.query_city(&mut store, "Lndon").await;

        let error = store.error.as_ref().expect("error message set");
        assert!(!error.is_empty());
        assert_eq!(
            store.current_weather.as_ref().map(|w| w.location_name.clone()),
            Some(before.location_name)
        );
        assert!(!store.loading);
        // Failed searches do not enter the history.
        assert_eq!(coordinator.recent_searches(), ["London"]);
    }

    #[tokio::test]
    async fn next_success_dismisses_previous_error() {
        let mut coordinator = failing_coordinator("Lndon");
        let mut store = AppStore::default();

        coordinator.query_city(&mut store, "Lndon").await;
        assert!(store.error.is_some());

        coordinator.query_city(&mut store, "London").await;
        assert!(store.error.is_none());
    }

    #[tokio::test]
    async fn coordinate_query_does_not_touch_recents() {
        let mut coordinator = coordinator();
        let mut store = AppStore::default();

        coordinator.query_coordinates(&mut store, 51.5, -0.12).await;

        assert!(store.current_weather.is_some());
        assert!(coordinator.recent_searches().is_empty());
    }

    #[tokio::test]
    async fn recents_cap_and_move_to_front() {
        let mut coordinator = coordinator();
        let mut store = AppStore::default();

        for city in ["A", "B", "C", "D", "E", "F"] {
            coordinator.query_city(&mut store, city).await;
        }
        assert_eq!(coordinator.recent_searches(), ["F", "E", "D", "C", "B"]);

        coordinator.query_city(&mut store, "D").await;
        assert_eq!(coordinator.recent_searches(), ["D", "F", "E", "C", "B"]);
        assert_eq!(coordinator.recent_searches().len(), RECENT_SEARCH_CAP);
    }

    #[tokio::test]
    async fn recents_are_case_sensitive() {
        let mut coordinator = coordinator();
        let mut store = AppStore::default();

        coordinator.query_city(&mut store, "london").await;
        coordinator.query_city(&mut store, "London").await;

        assert_eq!(coordinator.recent_searches(), ["London", "london"]);
    }

    #[test]
    fn stale_token_result_is_discarded() {
        let mut coordinator = coordinator();
        let mut store = AppStore::default();

        let stale = coordinator.issue_token();
        let fresh = coordinator.issue_token();

        coordinator.apply(fresh, &mut store, Some("London"), Ok(bundle_for("London")));
        coordinator.apply(stale, &mut store, Some("Paris"), Ok(bundle_for("Paris")));

        // The slower, older query must not overwrite the newer result.
        assert_eq!(
            store.current_weather.as_ref().map(|w| w.location_name.as_str()),
            Some("London")
        );
        assert_eq!(coordinator.recent_searches(), ["London"]);
    }

    #[test]
    fn stale_error_is_discarded_too() {
        let mut coordinator = coordinator();
        let mut store = AppStore::default();

        let stale = coordinator.issue_token();
        let fresh = coordinator.issue_token();

        coordinator.apply(fresh, &mut store, Some("London"), Ok(bundle_for("London")));
        coordinator.apply(
            stale,
            &mut store,
            Some("Paris"),
            Err(WeatherError::Api {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: String::new(),
            }),
        );

        assert!(store.error.is_none());
    }
}
