use crate::fetcher::CurrentConditions;
use crate::models::WeatherReading;
use chrono::Utc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("payload missing field: {0}")]
    MissingField(&'static str),
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Maps a raw payload into a canonical reading. Temperatures are rounded to
/// two decimals here, once; the timestamp is the wall clock at
/// normalization, never taken from the payload.
pub fn normalize(payload: CurrentConditions) -> Result<WeatherReading, NormalizeError> {
    let city = payload.name.ok_or(NormalizeError::MissingField("name"))?;
    let condition = payload
        .weather
        .into_iter()
        .next()
        .and_then(|entry| entry.description)
        .ok_or(NormalizeError::MissingField("weather[0].description"))?;
    let main = payload.main.ok_or(NormalizeError::MissingField("main"))?;
    let temperature = main.temp.ok_or(NormalizeError::MissingField("main.temp"))?;
    let min_temperature = main
        .temp_min
        .ok_or(NormalizeError::MissingField("main.temp_min"))?;
    let max_temperature = main
        .temp_max
        .ok_or(NormalizeError::MissingField("main.temp_max"))?;

    Ok(WeatherReading {
        city,
        temperature_c: round2(temperature),
        min_temperature_c: round2(min_temperature),
        max_temperature_c: round2(max_temperature),
        condition,
        observed_at: Utc::now(),
    })
}
