use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

pub const OPENWEATHER_API_BASE: &str = "http://api.openweathermap.org/data/2.5";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("weather api returned status {status} for {city}: {body}")]
    Status {
        city: String,
        status: StatusCode,
        body: String,
    },
}

/// Boundary for anything that can produce a raw current-weather payload.
#[async_trait]
pub trait WeatherSource {
    async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, FetchError>;
}

/// OpenWeatherMap current-weather client. Requests metric units so payload
/// temperatures arrive in Celsius.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: OPENWEATHER_API_BASE.to_owned(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, FetchError> {
        let url = format!("{}/weather", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                city: city.to_owned(),
                status,
                body,
            });
        }

        Ok(response.json::<CurrentConditions>().await?)
    }
}

/// Raw OpenWeatherMap current-weather payload. Missing fields decode to
/// `None` and are rejected during normalization, not here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub weather: Vec<WeatherEntry>,
    #[serde(default)]
    pub main: Option<MainReadings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherEntry {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub temp_min: Option<f64>,
    #[serde(default)]
    pub temp_max: Option<f64>,
}
