//! Core library for the `skycast` weather app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather provider client (OpenWeather) behind a trait seam
//! - The query coordinator (dual fetch, request tokens, recent searches)
//! - The application state store with saved cities and persistence
//! - Geolocation and per-condition advice
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;
pub mod store;
pub mod tips;

pub use config::Config;
pub use coordinator::{Coordinator, RECENT_SEARCH_CAP};
pub use error::{LocationError, WeatherError};
pub use location::{Coordinates, IpLocationSource, LocationSource};
pub use model::{CurrentWeather, ForecastEntry, SavedCity, Units, WeatherBundle, daily_digest};
pub use provider::{FetchPolicy, WeatherProvider, openweather::OpenWeatherProvider};
pub use store::AppStore;
