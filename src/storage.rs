use crate::models::{TemperatureAlert, WeatherReading};
use rusqlite::{Connection, params};
use std::path::Path;
use thiserror::Error;

/// Storage format for reading timestamps; sorts chronologically as text.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub id: i64,
    pub city: String,
    pub recorded_at: String,
    pub avg_temperature: f64,
    pub max_temperature: f64,
    pub min_temperature: f64,
    pub weather_condition: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertRow {
    pub id: i64,
    pub city: String,
    pub temperature: f64,
    pub alert_time: String,
}

#[derive(Debug)]
pub struct WeatherRepository {
    connection: Connection,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl WeatherRepository {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let connection = Connection::open(path)?;
        let repository = Self { connection };
        repository.ensure_schema()?;
        Ok(repository)
    }

    fn ensure_schema(&self) -> Result<(), StorageError> {
        self.connection.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS weather_summary (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                city TEXT NOT NULL,
                recorded_at TEXT NOT NULL,
                avg_temperature REAL NOT NULL,
                max_temperature REAL NOT NULL,
                min_temperature REAL NOT NULL,
                weather_condition TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS weather_alerts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                city TEXT NOT NULL,
                temperature REAL NOT NULL,
                alert_time TEXT NOT NULL DEFAULT (datetime('now'))
            );
            ",
        )?;

        Ok(())
    }

    /// Appends one row per reading; the current temperature lands in the
    /// avg_temperature column, mirroring what the loop observed this cycle.
    pub fn insert_summary(&self, reading: &WeatherReading) -> Result<i64, StorageError> {
        self.connection.execute(
            "
            INSERT INTO weather_summary
                (city, recorded_at, avg_temperature, max_temperature, min_temperature, weather_condition)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![
                reading.city,
                reading.observed_at.format(TIMESTAMP_FORMAT).to_string(),
                reading.temperature_c,
                reading.max_temperature_c,
                reading.min_temperature_c,
                reading.condition,
            ],
        )?;

        Ok(self.connection.last_insert_rowid())
    }

    /// alert_time is assigned by the store, not the caller.
    pub fn insert_alert(&self, alert: &TemperatureAlert) -> Result<i64, StorageError> {
        self.connection.execute(
            "INSERT INTO weather_alerts (city, temperature) VALUES (?1, ?2)",
            params![alert.city, alert.temperature_c],
        )?;

        Ok(self.connection.last_insert_rowid())
    }

    /// Last `limit` summaries for a city, newest first.
    pub fn recent_summaries(&self, city: &str, limit: usize) -> Result<Vec<SummaryRow>, StorageError> {
        let mut statement = self.connection.prepare(
            "
            SELECT id, city, recorded_at, avg_temperature, max_temperature, min_temperature, weather_condition
            FROM weather_summary
            WHERE city = ?1
            ORDER BY recorded_at DESC, id DESC
            LIMIT ?2
            ",
        )?;

        let rows = statement.query_map(params![city, limit as i64], |row| {
            Ok(SummaryRow {
                id: row.get(0)?,
                city: row.get(1)?,
                recorded_at: row.get(2)?,
                avg_temperature: row.get(3)?,
                max_temperature: row.get(4)?,
                min_temperature: row.get(5)?,
                weather_condition: row.get(6)?,
            })
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?);
        }

        Ok(summaries)
    }

    pub fn recent_alerts(&self, city: &str, limit: usize) -> Result<Vec<AlertRow>, StorageError> {
        let mut statement = self.connection.prepare(
            "
            SELECT id, city, temperature, alert_time
            FROM weather_alerts
            WHERE city = ?1
            ORDER BY id DESC
            LIMIT ?2
            ",
        )?;

        let rows = statement.query_map(params![city, limit as i64], |row| {
            Ok(AlertRow {
                id: row.get(0)?,
                city: row.get(1)?,
                temperature: row.get(2)?,
                alert_time: row.get(3)?,
            })
        })?;

        let mut alerts = Vec::new();
        for row in rows {
            alerts.push(row?);
        }

        Ok(alerts)
    }
}
