use crate::fetcher::OPENWEATHER_API_BASE;
use std::{env, num::ParseFloatError, path::PathBuf, time::Duration};
use thiserror::Error;

pub const DEFAULT_CITIES: [&str; 6] = [
    "Delhi",
    "Mumbai",
    "Chennai",
    "Bangalore",
    "Kolkata",
    "Hyderabad",
];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub api_base_url: String,
    pub cities: Vec<String>,
    pub temperature_threshold: f64,
    pub alert_consecutive: u32,
    pub poll_interval: Duration,
    pub sqlite_path: PathBuf,
    pub chart_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing env var: {0}")]
    MissingEnv(String),
    #[error("invalid float in env var {name}: {source}")]
    InvalidFloat { name: String, source: ParseFloatError },
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = read_required("OPENWEATHER_API_KEY")?;

        let api_base_url = env::var("WEATHER_WATCH_API_BASE_URL")
            .unwrap_or_else(|_| OPENWEATHER_API_BASE.to_owned());

        let cities = env::var("WEATHER_WATCH_CITIES")
            .map(|raw| {
                raw.split(',')
                    .map(|city| city.trim().to_owned())
                    .filter(|city| !city.is_empty())
                    .collect::<Vec<_>>()
            })
            .ok()
            .filter(|cities| !cities.is_empty())
            .unwrap_or_else(|| DEFAULT_CITIES.iter().map(|city| (*city).to_owned()).collect());

        let temperature_threshold = read_f64_or("WEATHER_WATCH_TEMP_THRESHOLD", 35.0)?;

        let alert_consecutive = env::var("WEATHER_WATCH_ALERT_CONSECUTIVE")
            .ok()
            .and_then(|raw| raw.parse::<u32>().ok())
            .unwrap_or(2);

        let poll_seconds = env::var("WEATHER_WATCH_POLL_SECONDS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(300);

        let sqlite_path = PathBuf::from(
            env::var("WEATHER_WATCH_SQLITE_PATH")
                .unwrap_or_else(|_| "weather-watch.sqlite".to_owned()),
        );

        let chart_dir =
            PathBuf::from(env::var("WEATHER_WATCH_CHART_DIR").unwrap_or_else(|_| ".".to_owned()));

        Ok(Self {
            api_key,
            api_base_url,
            cities,
            temperature_threshold,
            alert_consecutive,
            poll_interval: Duration::from_secs(poll_seconds),
            sqlite_path,
            chart_dir,
        })
    }
}

fn read_required(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingEnv(name.to_owned()))
}

fn read_f64_or(name: &str, default: f64) -> Result<f64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.parse::<f64>().map_err(|source| ConfigError::InvalidFloat {
            name: name.to_owned(),
            source,
        }),
        Err(_) => Ok(default),
    }
}
