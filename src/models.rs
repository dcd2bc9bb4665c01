use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized current-weather observation for one city. Temperatures are
/// rounded to two decimals once, at normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub city: String,
    pub temperature_c: f64,
    pub min_temperature_c: f64,
    pub max_temperature_c: f64,
    pub condition: String,
    pub observed_at: DateTime<Utc>,
}

/// Running aggregate over every reading appended for a city so far.
/// Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub city: String,
    pub avg_temperature: f64,
    pub max_temperature: f64,
    pub min_temperature: f64,
    pub dominant_condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureAlert {
    pub city: String,
    pub temperature_c: f64,
    pub observed_at: DateTime<Utc>,
}
