use crate::models::TemperatureAlert;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Tracks consecutive above-threshold readings per city and emits an alert
/// on every observation at or beyond the consecutive limit, not only on the
/// crossing edge.
#[derive(Debug)]
pub struct AlertTracker {
    temperature_threshold: f64,
    consecutive_limit: u32,
    streaks: HashMap<String, u32>,
}

impl AlertTracker {
    pub fn new(temperature_threshold: f64, consecutive_limit: u32) -> Self {
        Self {
            temperature_threshold,
            consecutive_limit,
            streaks: HashMap::new(),
        }
    }

    /// Strict `>` raises the streak; `<=` resets it to zero.
    pub fn observe(
        &mut self,
        city: &str,
        temperature_c: f64,
        observed_at: DateTime<Utc>,
    ) -> Option<TemperatureAlert> {
        let streak = self.streaks.entry(city.to_owned()).or_insert(0);

        if temperature_c > self.temperature_threshold {
            *streak += 1;
            if *streak >= self.consecutive_limit {
                return Some(TemperatureAlert {
                    city: city.to_owned(),
                    temperature_c,
                    observed_at,
                });
            }
        } else {
            *streak = 0;
        }

        None
    }
}
