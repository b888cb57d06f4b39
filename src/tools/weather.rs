//! Current-weather lookup against weatherapi.com.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use super::Tool;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Current conditions for one location, as handed to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub city: String,
    /// Degrees Celsius
    pub temperature: f64,
    pub condition: String,
    /// Relative humidity, percent
    pub humidity: u8,
    /// km/h
    pub wind_speed: f64,
    pub is_day: bool,
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Failed to get weather data for {location}: HTTP {status}")]
    Status { location: String, status: StatusCode },

    #[error("Weather request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected weather response: {0}")]
    Decode(#[from] serde_json::Error),
}

// Subset of the `current.json` payload we read.
#[derive(Deserialize)]
struct CurrentResponse {
    location: ApiLocation,
    current: ApiCurrent,
}

#[derive(Deserialize)]
struct ApiLocation {
    name: String,
}

#[derive(Deserialize)]
struct ApiCurrent {
    temp_c: f64,
    is_day: u8,
    condition: ApiCondition,
    wind_kph: f64,
    humidity: u8,
}

#[derive(Deserialize)]
struct ApiCondition {
    text: String,
}

impl From<CurrentResponse> for WeatherObservation {
    fn from(r: CurrentResponse) -> Self {
        Self {
            city: r.location.name,
            temperature: r.current.temp_c,
            condition: r.current.condition.text,
            humidity: r.current.humidity,
            wind_speed: r.current.wind_kph,
            is_day: r.current.is_day == 1,
        }
    }
}

/// HTTP client for the weather provider.
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl WeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: crate::config::DEFAULT_WEATHER_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Fetch current conditions for a free-text location.
    pub async fn current(&self, location: &str) -> Result<WeatherObservation, WeatherError> {
        let url = format!("{}/current.json", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", location), ("aqi", "no")])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                location: location.to_string(),
                status,
            });
        }

        let body = response.bytes().await?;
        let parsed: CurrentResponse = serde_json::from_slice(&body)?;
        Ok(parsed.into())
    }
}

/// The `get_current_weather` tool.
pub struct GetCurrentWeather {
    client: WeatherClient,
}

impl GetCurrentWeather {
    pub fn new(client: WeatherClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetCurrentWeather {
    fn name(&self) -> &str {
        "get_current_weather"
    }

    fn description(&self) -> &str {
        "Get the current weather for a location. Returns the city name, temperature in Celsius, condition text, humidity percentage, wind speed in km/h and whether it is currently daytime."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "City or place name, e.g. 'London' or 'Paris, France'"
                }
            },
            "required": ["location"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let location = args["location"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'location' argument"))?;

        match self.client.current(location).await {
            Ok(observation) => Ok(serde_json::to_string(&observation)?),
            // The model gets a readable message instead of a tool error.
            Err(e @ WeatherError::Status { .. }) => {
                tracing::warn!("{}", e);
                Ok(e.to_string())
            }
            Err(e) => Err(e.into()),
        }
    }
}
