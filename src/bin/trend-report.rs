use std::env;
use std::path::PathBuf;
use weather_watch::chart::{self, TrendPoint};
use weather_watch::storage::WeatherRepository;

fn main() {
    let args: Vec<String> = env::args().collect();
    let city = match args.get(1) {
        Some(city) => city.clone(),
        None => {
            print_usage();
            return;
        }
    };
    let limit = args
        .get(2)
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(10);

    let db_path = env::var("WEATHER_WATCH_SQLITE_PATH")
        .unwrap_or_else(|_| "weather-watch.sqlite".to_owned());
    let repository = match WeatherRepository::open(&db_path) {
        Ok(repository) => repository,
        Err(error) => {
            eprintln!("failed to open sqlite: {error}");
            return;
        }
    };

    let summaries = match repository.recent_summaries(&city, limit) {
        Ok(summaries) => summaries,
        Err(error) => {
            eprintln!("failed to query summaries: {error}");
            return;
        }
    };

    if summaries.is_empty() {
        println!("no stored summaries for {city}");
        return;
    }

    for row in &summaries {
        println!(
            "#{} {} {} avg={:.2} max={:.2} min={:.2} ({})",
            row.id,
            row.city,
            row.recorded_at,
            row.avg_temperature,
            row.max_temperature,
            row.min_temperature,
            row.weather_condition
        );
    }

    match repository.recent_alerts(&city, limit) {
        Ok(alerts) => {
            for alert in alerts {
                println!(
                    "alert #{} {} {:.2} at {}",
                    alert.id, alert.city, alert.temperature, alert.alert_time
                );
            }
        }
        Err(error) => eprintln!("failed to query alerts: {error}"),
    }

    // Rows come back newest-first; the chart wants chronological order.
    let mut points: Vec<TrendPoint> = summaries.iter().filter_map(TrendPoint::from_summary).collect();
    points.reverse();

    let output = PathBuf::from(format!(
        "temperature_trends_{}_{}.png",
        city.to_lowercase().replace(' ', "_"),
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    ));
    match chart::render_trend(&points, &output) {
        Ok(true) => println!("temperature trends chart saved as {}", output.display()),
        Ok(false) => println!("no plottable rows for {city}"),
        Err(error) => eprintln!("failed to render chart: {error}"),
    }
}

fn print_usage() {
    eprintln!("usage:");
    eprintln!("  trend-report <city> [limit]");
}
