use crate::models::{DailySummary, WeatherReading};
use crate::normalize::round2;
use indexmap::IndexMap;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct CityRollup {
    temperatures: Vec<f64>,
    conditions: Vec<String>,
}

/// Per-city accumulation of every reading observed since process start.
/// There is no calendar-day reset; summaries are running aggregates.
#[derive(Debug, Default)]
pub struct RollupStore {
    cities: HashMap<String, CityRollup>,
}

impl RollupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one reading to the city's rollup, creating it on first use.
    pub fn append(&mut self, reading: &WeatherReading) {
        let rollup = self.cities.entry(reading.city.clone()).or_default();
        rollup.temperatures.push(reading.temperature_c);
        rollup.conditions.push(reading.condition.clone());
    }

    /// Computes the summary for a city, or `None` when nothing has been
    /// appended for it. Pure read; calling it twice yields equal results.
    pub fn summarize(&self, city: &str) -> Option<DailySummary> {
        let rollup = self.cities.get(city)?;
        if rollup.temperatures.is_empty() {
            return None;
        }

        let mut sum = 0.0;
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        for &temperature in &rollup.temperatures {
            sum += temperature;
            max = max.max(temperature);
            min = min.min(temperature);
        }
        let count = rollup.temperatures.len() as f64;

        Some(DailySummary {
            city: city.to_owned(),
            avg_temperature: round2(sum / count),
            max_temperature: round2(max),
            min_temperature: round2(min),
            dominant_condition: dominant_condition(&rollup.conditions)?,
        })
    }
}

/// Most frequent condition; ties go to the condition seen first.
fn dominant_condition(conditions: &[String]) -> Option<String> {
    let mut counts: IndexMap<&str, u32> = IndexMap::new();
    for condition in conditions {
        *counts.entry(condition.as_str()).or_insert(0) += 1;
    }

    let mut dominant: Option<(&str, u32)> = None;
    for (condition, count) in counts {
        match dominant {
            Some((_, best)) if count <= best => {}
            _ => dominant = Some((condition, count)),
        }
    }

    dominant.map(|(condition, _)| condition.to_owned())
}
