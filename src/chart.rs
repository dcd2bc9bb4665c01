use crate::models::WeatherReading;
use crate::storage::{SummaryRow, TIMESTAMP_FORMAT};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use plotters::coord::types::RangedDateTime;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// One plotted observation: the per-cycle reading (live loop) or a stored
/// summary row (trend report).
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub at: DateTime<Utc>,
    pub avg_temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub condition: String,
}

impl From<&WeatherReading> for TrendPoint {
    fn from(reading: &WeatherReading) -> Self {
        Self {
            at: reading.observed_at,
            avg_temperature: reading.temperature_c,
            min_temperature: reading.min_temperature_c,
            max_temperature: reading.max_temperature_c,
            condition: reading.condition.clone(),
        }
    }
}

impl TrendPoint {
    /// `None` when the stored timestamp does not parse.
    pub fn from_summary(row: &SummaryRow) -> Option<Self> {
        let at = NaiveDateTime::parse_from_str(&row.recorded_at, TIMESTAMP_FORMAT).ok()?;
        Some(Self {
            at: DateTime::<Utc>::from_naive_utc_and_offset(at, Utc),
            avg_temperature: row.avg_temperature,
            min_temperature: row.min_temperature,
            max_temperature: row.max_temperature,
            condition: row.weather_condition.clone(),
        })
    }
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("chart rendering failed: {0}")]
    Render(String),
}

struct Bounds {
    time: (NaiveDateTime, NaiveDateTime),
    temperature: (f64, f64),
}

fn bounds(points: &[TrendPoint]) -> Option<Bounds> {
    let first = points.first()?;
    let mut min_at = first.at.naive_utc();
    let mut max_at = min_at;
    let mut min_temp = f64::INFINITY;
    let mut max_temp = f64::NEG_INFINITY;

    for point in points {
        let at = point.at.naive_utc();
        min_at = min_at.min(at);
        max_at = max_at.max(at);
        min_temp = min_temp.min(point.min_temperature);
        max_temp = max_temp.max(point.max_temperature);
    }

    // A zero-width axis range is unbuildable; widen degenerate ranges.
    if max_at == min_at {
        min_at = min_at - Duration::minutes(30);
        max_at = max_at + Duration::minutes(30);
    }
    let padding = if (max_temp - min_temp).abs() > 1e-6 {
        (max_temp - min_temp) * 0.1
    } else {
        1.0
    };

    Some(Bounds {
        time: (min_at, max_at),
        temperature: (min_temp - padding, max_temp + padding),
    })
}

/// Renders avg/min/max temperature series with condition annotations.
/// Returns `Ok(false)` without touching the filesystem when there is
/// nothing to plot.
pub fn render_trend(points: &[TrendPoint], output: &Path) -> Result<bool, ChartError> {
    let Some(bounds) = bounds(points) else {
        info!("no readings to plot, skipping chart");
        return Ok(false);
    };

    let root = BitMapBackend::new(output, (1024, 768)).into_drawing_area();
    root.fill(&WHITE).map_err(to_render_error)?;

    let (min_at, max_at) = bounds.time;
    let (low, high) = bounds.temperature;

    let mut chart = ChartBuilder::on(&root)
        .caption("Temperature Trends with Weather Conditions", ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(50)
        .build_cartesian_2d(RangedDateTime::from(min_at..max_at), low..high)
        .map_err(to_render_error)?;

    chart
        .configure_mesh()
        .x_label_formatter(&|at| at.format("%Y-%m-%d %H:%M").to_string())
        .x_labels(8)
        .y_desc("Temperature (°C)")
        .draw()
        .map_err(to_render_error)?;

    chart
        .draw_series(LineSeries::new(
            points.iter().map(|point| (point.at.naive_utc(), point.avg_temperature)),
            &BLUE,
        ))
        .map_err(to_render_error)?
        .label("Avg Temperature")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .draw_series(LineSeries::new(
            points.iter().map(|point| (point.at.naive_utc(), point.min_temperature)),
            &GREEN,
        ))
        .map_err(to_render_error)?
        .label("Min Temperature")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));

    chart
        .draw_series(LineSeries::new(
            points.iter().map(|point| (point.at.naive_utc(), point.max_temperature)),
            &RED,
        ))
        .map_err(to_render_error)?
        .label("Max Temperature")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .draw_series(
            points
                .iter()
                .map(|point| Circle::new((point.at.naive_utc(), point.avg_temperature), 3, BLUE.filled())),
        )
        .map_err(to_render_error)?;

    chart
        .draw_series(points.iter().map(|point| {
            Text::new(
                point.condition.clone(),
                (point.at.naive_utc(), point.avg_temperature),
                ("sans-serif", 14),
            )
        }))
        .map_err(to_render_error)?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(to_render_error)?;

    root.present().map_err(to_render_error)?;
    Ok(true)
}

fn to_render_error(error: impl std::fmt::Display) -> ChartError {
    ChartError::Render(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(second: i64, avg: f64, min: f64, max: f64) -> TrendPoint {
        TrendPoint {
            at: DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(second),
            avg_temperature: avg,
            min_temperature: min,
            max_temperature: max,
            condition: "haze".to_owned(),
        }
    }

    #[test]
    fn empty_input_writes_nothing() {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(_) => return,
        };
        let output = dir.path().join("trends.png");

        let result = render_trend(&[], &output);
        assert!(matches!(result, Ok(false)));
        assert!(!output.exists());
    }

    #[test]
    fn bounds_cover_min_and_max_series() {
        let points = [point(0, 30.0, 28.0, 33.0), point(600, 31.0, 27.5, 35.0)];
        let bounds = match bounds(&points) {
            Some(bounds) => bounds,
            None => return,
        };

        let (low, high) = bounds.temperature;
        assert!(low < 27.5);
        assert!(high > 35.0);
        assert!(bounds.time.0 < bounds.time.1);
    }

    #[test]
    fn single_point_widens_the_time_axis() {
        let points = [point(0, 30.0, 28.0, 33.0)];
        let bounds = match bounds(&points) {
            Some(bounds) => bounds,
            None => return,
        };

        assert!(bounds.time.0 < bounds.time.1);
    }

    #[test]
    fn summary_row_with_unparsable_timestamp_is_skipped() {
        let row = SummaryRow {
            id: 1,
            city: "Delhi".to_owned(),
            recorded_at: "not a timestamp".to_owned(),
            avg_temperature: 30.0,
            max_temperature: 32.0,
            min_temperature: 28.0,
            weather_condition: "haze".to_owned(),
        };
        assert_eq!(TrendPoint::from_summary(&row), None);

        let row = SummaryRow {
            recorded_at: "1970-01-01 00:10:00".to_owned(),
            ..row
        };
        let parsed = TrendPoint::from_summary(&row);
        assert_eq!(
            parsed.map(|p| p.at),
            Some(DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(600))
        );
    }
}
