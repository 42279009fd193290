use reqwest::StatusCode;

/// Failures of the query pipeline, distinguished at the type level so the
/// CLI can hint accordingly while the store still only keeps a display
/// string.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error while contacting the weather service: {0}")]
    Network(#[from] reqwest::Error),

    #[error("No weather data found for '{query}'. Check the spelling and try again.")]
    NotFound { query: String },

    #[error(
        "The weather service rejected the API key.\n\
         Hint: run `skycast configure` or set OPENWEATHER_API_KEY."
    )]
    Unauthorized,

    #[error("Weather service request failed with status {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("Failed to parse the weather service response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(
        "No API key configured.\n\
         Hint: run `skycast configure` or set OPENWEATHER_API_KEY."
    )]
    MissingApiKey,
}

impl WeatherError {
    /// Map a non-2xx response to the taxonomy. 404 means the query itself
    /// was bad; 401 means the credential is bad.
    pub fn from_status(status: StatusCode, query: &str, body: String) -> Self {
        match status {
            StatusCode::NOT_FOUND => WeatherError::NotFound { query: query.to_string() },
            StatusCode::UNAUTHORIZED => WeatherError::Unauthorized,
            _ => WeatherError::Api { status, body },
        }
    }
}

/// Failures of geolocation acquisition, kept separate from HTTP failures
/// so the two surface different messages.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}
