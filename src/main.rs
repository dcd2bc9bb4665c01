use tokio::time;
use tracing::{error, info, warn};
use weather_watch::{
    alerts::AlertTracker,
    chart::{self, TrendPoint},
    config::AppConfig,
    fetcher::OpenWeatherClient,
    rollup::RollupStore,
    service,
    storage::WeatherRepository,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(error) = run().await {
        error!(error = %error, "weather-watch startup failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let config = AppConfig::from_env().map_err(|error| error.to_string())?;

    info!(
        cities = ?config.cities,
        temperature_threshold = config.temperature_threshold,
        alert_consecutive = config.alert_consecutive,
        poll_seconds = config.poll_interval.as_secs(),
        sqlite_path = %config.sqlite_path.display(),
        "weather-watch started"
    );

    let source = OpenWeatherClient::new(config.api_key.clone())
        .with_base_url(config.api_base_url.clone());
    let repository = WeatherRepository::open(&config.sqlite_path).map_err(|error| error.to_string())?;
    let mut rollups = RollupStore::new();
    let mut alerts = AlertTracker::new(config.temperature_threshold, config.alert_consecutive);

    let mut ticker = time::interval(config.poll_interval);

    loop {
        // The only cancellation point: interrupts land between cycles,
        // never mid-cycle.
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, stopping weather monitoring");
                break;
            }
            _ = ticker.tick() => {}
        }

        let readings =
            service::run_cycle(&source, &mut rollups, &mut alerts, &repository, &config.cities).await;

        let points: Vec<TrendPoint> = readings.iter().map(TrendPoint::from).collect();
        let output = config.chart_dir.join(format!(
            "temperature_trends_{}.png",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        ));
        match chart::render_trend(&points, &output) {
            Ok(true) => info!(path = %output.display(), "temperature trends chart saved"),
            Ok(false) => {}
            Err(error) => warn!(error = %error, "failed to render temperature trends"),
        }
    }

    info!("closing sqlite connection");
    drop(repository);
    Ok(())
}
