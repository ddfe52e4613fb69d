use city_records::infra::config::AppConfig;
use city_records::infra::providers::{self, OpenWeatherMapClient, RestCountriesClient};
use city_records::{extract_codes, storage, CityStore, CountryFetcher, WeatherFetcher};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--city <name>] [--country <name>]\n\
         \n\
         Requires env vars:\n\
           OPENWEATHERMAP_API_KEY\n\
         Optional:\n\
           DATABASE_URL, WEATHER_API_URL, COUNTRY_API_URL, HTTP_TIMEOUT_SECS\n"
    );
    std::process::exit(2);
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let city = flag_value(&args, "--city").unwrap_or_else(|| "London".to_string());
    let country = flag_value(&args, "--country").unwrap_or_else(|| "United Kingdom".to_string());

    // Force-read config (nice error messages if missing)
    let config = AppConfig::from_env()?;

    println!("> Preflight:");
    println!("  WEATHER_API_URL={}", config.weather_api_url);
    println!("  COUNTRY_API_URL={}", config.country_api_url);
    println!("  HTTP_TIMEOUT_SECS={}", config.http_timeout.as_secs());

    // Store connectivity
    match config.database_url.as_deref() {
        Some(_) => {
            let store = storage::store_from_url(config.database_url.as_deref()).await?;
            store
                .ping()
                .await
                .map_err(|e| anyhow::anyhow!("Database unreachable: {}", e))?;
            println!("  Database reachable, `cities` table present.");
        }
        None => println!("  DATABASE_URL not set: the API server will keep records in memory."),
    }

    let client = providers::http_client(config.http_timeout)?;

    // Weather provider
    let weather = OpenWeatherMapClient::new(
        client.clone(),
        config.weather_api_url.clone(),
        config.weather_api_key.clone(),
    );
    let report = weather
        .fetch(&city, &country)
        .await
        .map_err(|e| anyhow::anyhow!("Weather lookup for {}, {} failed: {}", city, country, e))?;
    println!(
        "  Weather for {}, {}: {} ({})",
        city, country, report.temperature, report.description
    );

    // Country provider
    let countries = RestCountriesClient::new(client, config.country_api_url.clone());
    let payload = countries
        .fetch(&country)
        .await
        .map_err(|e| anyhow::anyhow!("Country lookup for {} failed: {}", country, e))?;
    let codes = extract_codes(&payload);
    println!(
        "  Country {}: alpha-2={} alpha-3={} currency={}",
        country, codes.code2, codes.code3, codes.currency_code
    );

    println!("> Preflight OK.");
    Ok(())
}
