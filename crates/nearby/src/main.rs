use clap::Parser;
use nearby::client::GOOGLE_PLACES_URL;
use nearby::{ApiKey, Coordinate, PlacesClient};

#[derive(Parser, Debug)]
#[command(name = "nearby", version, about, long_about = None)]
struct Cli {
    /// Latitude of the search center
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude of the search center
    #[arg(long, allow_hyphen_values = true)]
    lng: f64,

    /// Search radius in miles
    #[arg(short, long, default_value_t = 5.0)]
    radius: f64,

    /// Search endpoint (a local proxy route works too)
    #[arg(short, long, default_value = GOOGLE_PLACES_URL)]
    endpoint: String,

    /// Print the normalized restaurants as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let api_key = ApiKey::from_env();
    if api_key.is_none() && cli.endpoint == GOOGLE_PLACES_URL {
        log::warn!("GOOGLE_PLACES_API_KEY is not set; the request will likely be rejected");
    }

    let client = PlacesClient::new(cli.endpoint, api_key);
    let restaurants = client
        .search_nearby(Coordinate::new(cli.lat, cli.lng), cli.radius)
        .await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&restaurants)?);
        return Ok(());
    }

    for r in &restaurants {
        let status = match r.open_now {
            Some(true) => "open",
            Some(false) => "closed",
            None => "",
        };
        println!(
            "{:<32} {:<14} {:>5.1} mi  {:<4} {}",
            r.name,
            r.cuisine.label(),
            r.distance_miles,
            r.price_level.map(|p| p.symbol()).unwrap_or(""),
            status
        );
    }
    log::info!("{} restaurants found", restaurants.len());
    Ok(())
}
