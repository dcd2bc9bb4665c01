use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;
use tempfile::NamedTempFile;
use weather_watch::{
    alerts::AlertTracker,
    fetcher::{CurrentConditions, FetchError, MainReadings, WeatherEntry, WeatherSource},
    rollup::RollupStore,
    service::run_cycle,
    storage::WeatherRepository,
};

/// Hands out scripted payloads per city, one per fetch; a city with no
/// remaining payloads fails like an unknown city would.
struct ScriptedSource {
    responses: Mutex<HashMap<String, Vec<CurrentConditions>>>,
}

impl ScriptedSource {
    fn new(script: Vec<(&str, Vec<CurrentConditions>)>) -> Self {
        let responses = script
            .into_iter()
            .map(|(city, payloads)| (city.to_owned(), payloads))
            .collect();
        Self {
            responses: Mutex::new(responses),
        }
    }
}

#[async_trait]
impl WeatherSource for ScriptedSource {
    async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, FetchError> {
        let not_found = || FetchError::Status {
            city: city.to_owned(),
            status: StatusCode::NOT_FOUND,
            body: "city not found".to_owned(),
        };

        let mut guard = match self.responses.lock() {
            Ok(guard) => guard,
            Err(_) => return Err(not_found()),
        };
        let queue = guard.get_mut(city).ok_or_else(not_found)?;
        if queue.is_empty() {
            return Err(not_found());
        }
        Ok(queue.remove(0))
    }
}

fn payload(city: &str, temperature: f64, condition: &str) -> CurrentConditions {
    CurrentConditions {
        name: Some(city.to_owned()),
        weather: vec![WeatherEntry {
            description: Some(condition.to_owned()),
        }],
        main: Some(MainReadings {
            temp: Some(temperature),
            temp_min: Some(temperature - 2.0),
            temp_max: Some(temperature + 2.0),
        }),
    }
}

#[tokio::test]
async fn delhi_alerts_on_second_consecutive_hot_reading() {
    let file = match NamedTempFile::new() {
        Ok(file) => file,
        Err(_) => return,
    };
    let repository = match WeatherRepository::open(file.path()) {
        Ok(repository) => repository,
        Err(_) => return,
    };

    let source = ScriptedSource::new(vec![(
        "Delhi",
        vec![payload("Delhi", 36.5, "haze"), payload("Delhi", 37.0, "haze")],
    )]);
    let cities = vec!["Delhi".to_owned()];
    let mut rollups = RollupStore::new();
    let mut alerts = AlertTracker::new(35.0, 2);

    let first_cycle = run_cycle(&source, &mut rollups, &mut alerts, &repository, &cities).await;
    assert_eq!(first_cycle.len(), 1);

    let alerts_after_first = match repository.recent_alerts("Delhi", 10) {
        Ok(rows) => rows,
        Err(_) => return,
    };
    assert!(alerts_after_first.is_empty());

    let second_cycle = run_cycle(&source, &mut rollups, &mut alerts, &repository, &cities).await;
    assert_eq!(second_cycle.len(), 1);

    let alert_rows = match repository.recent_alerts("Delhi", 10) {
        Ok(rows) => rows,
        Err(_) => return,
    };
    assert_eq!(alert_rows.len(), 1);
    assert_eq!(alert_rows.first().map(|row| row.temperature), Some(37.0));

    let summary_rows = match repository.recent_summaries("Delhi", 10) {
        Ok(rows) => rows,
        Err(_) => return,
    };
    assert_eq!(summary_rows.len(), 2);
}

#[tokio::test]
async fn failing_city_does_not_block_later_cities() {
    let file = match NamedTempFile::new() {
        Ok(file) => file,
        Err(_) => return,
    };
    let repository = match WeatherRepository::open(file.path()) {
        Ok(repository) => repository,
        Err(_) => return,
    };

    let source = ScriptedSource::new(vec![("Mumbai", vec![payload("Mumbai", 30.2, "rain")])]);
    let cities = vec!["Atlantis".to_owned(), "Mumbai".to_owned()];
    let mut rollups = RollupStore::new();
    let mut alerts = AlertTracker::new(35.0, 2);

    let readings = run_cycle(&source, &mut rollups, &mut alerts, &repository, &cities).await;

    assert_eq!(readings.len(), 1);
    assert_eq!(readings.first().map(|reading| reading.city.as_str()), Some("Mumbai"));

    let mumbai_rows = match repository.recent_summaries("Mumbai", 10) {
        Ok(rows) => rows,
        Err(_) => return,
    };
    assert_eq!(mumbai_rows.len(), 1);

    let atlantis_rows = match repository.recent_summaries("Atlantis", 10) {
        Ok(rows) => rows,
        Err(_) => return,
    };
    assert!(atlantis_rows.is_empty());
}

#[tokio::test]
async fn malformed_payload_skips_the_city() {
    let file = match NamedTempFile::new() {
        Ok(file) => file,
        Err(_) => return,
    };
    let repository = match WeatherRepository::open(file.path()) {
        Ok(repository) => repository,
        Err(_) => return,
    };

    let broken = CurrentConditions {
        name: Some("Chennai".to_owned()),
        weather: vec![],
        main: Some(MainReadings {
            temp: Some(33.0),
            temp_min: Some(31.0),
            temp_max: Some(35.0),
        }),
    };
    let source = ScriptedSource::new(vec![
        ("Chennai", vec![broken]),
        ("Kolkata", vec![payload("Kolkata", 29.0, "rain")]),
    ]);
    let cities = vec!["Chennai".to_owned(), "Kolkata".to_owned()];
    let mut rollups = RollupStore::new();
    let mut alerts = AlertTracker::new(35.0, 2);

    let readings = run_cycle(&source, &mut rollups, &mut alerts, &repository, &cities).await;

    assert_eq!(readings.len(), 1);
    assert_eq!(readings.first().map(|reading| reading.city.as_str()), Some("Kolkata"));
    assert!(rollups.summarize("Chennai").is_none());
}
