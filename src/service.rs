use crate::alerts::AlertTracker;
use crate::fetcher::WeatherSource;
use crate::models::WeatherReading;
use crate::normalize::normalize;
use crate::rollup::RollupStore;
use crate::storage::WeatherRepository;
use tracing::{info, warn};

/// Runs one polling cycle over the configured cities, strictly in order,
/// and returns the readings collected for charting. Every per-city failure
/// is logged and skips only that city; nothing here aborts the cycle.
pub async fn run_cycle(
    source: &impl WeatherSource,
    rollups: &mut RollupStore,
    alerts: &mut AlertTracker,
    repository: &WeatherRepository,
    cities: &[String],
) -> Vec<WeatherReading> {
    let mut readings = Vec::new();

    for city in cities {
        info!(city = %city, "fetching current weather");

        let payload = match source.fetch_current(city).await {
            Ok(payload) => payload,
            Err(error) => {
                warn!(city = %city, error = %error, "fetch failed");
                continue;
            }
        };

        let reading = match normalize(payload) {
            Ok(reading) => reading,
            Err(error) => {
                warn!(city = %city, error = %error, "normalization failed");
                continue;
            }
        };

        rollups.append(&reading);

        if let Err(error) = repository.insert_summary(&reading) {
            warn!(city = %city, error = %error, "failed to store summary");
        }

        if let Some(alert) = alerts.observe(&reading.city, reading.temperature_c, reading.observed_at) {
            warn!(
                city = %city,
                temperature_c = reading.temperature_c,
                "temperature exceeded threshold on consecutive updates"
            );
            match repository.insert_alert(&alert) {
                Ok(alert_id) => info!(alert_id, city = %city, "alert stored"),
                Err(error) => warn!(city = %city, error = %error, "failed to store alert"),
            }
        }

        if let Some(summary) = rollups.summarize(&reading.city) {
            info!(
                city = %city,
                avg = summary.avg_temperature,
                max = summary.max_temperature,
                min = summary.min_temperature,
                dominant = %summary.dominant_condition,
                "running summary"
            );
        }

        readings.push(reading);
    }

    readings
}
