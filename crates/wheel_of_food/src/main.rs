use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use nearby::{Coordinate, Cuisine, PlaceId, Restaurant};
use parking_lot::Mutex;
use rand::Rng;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use wheel_of_food::config::{self, Config};
use wheel_of_food::events::AppEvent;
use wheel_of_food::fetch::FetchCoordinator;
use wheel_of_food::picker::{self, ResultCard};
use wheel_of_food::prefs::{FileStorage, PreferenceStore};
use wheel_of_food::sys::{runtime, server};
use wheel_of_food::wheel::view::{self, FrameRenderer};
use wheel_of_food::wheel::Wheel;

type Store = PreferenceStore<FileStorage>;

#[derive(Parser, Debug)]
#[command(name = "wheel-of-food", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct SearchArgs {
    /// Latitude to search around (defaults to [location] in the config)
    #[arg(long, allow_hyphen_values = true, requires = "lng")]
    lat: Option<f64>,

    /// Longitude to search around
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lng: Option<f64>,

    /// Set and save the search radius in miles
    #[arg(short, long)]
    radius: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch nearby restaurants and spin the wheel
    Spin(SearchArgs),
    /// List nearby restaurants with their filter state
    List(SearchArgs),
    /// Show or change saved preferences
    Prefs {
        #[command(subcommand)]
        action: Option<PrefsAction>,
    },
    /// Run the proxy that keeps the API key server-side
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Write a default config file and print its path
    Init,
}

#[derive(Subcommand, Debug)]
enum PrefsAction {
    Show,
    /// Search radius in miles
    Radius { miles: f64 },
    /// Toggle a cuisine filter (no cuisines selected means all are shown)
    Cuisine { cuisine: Cuisine },
    /// Hide a restaurant from the wheel
    Exclude { id: String },
    /// Bring back an excluded restaurant
    Include { id: String },
    /// Tick sound while spinning
    Sound {
        #[arg(value_parser = ["on", "off"])]
        state: String,
    },
    /// Reset everything to defaults
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = config::load_or_default();

    match cli.command {
        Commands::Spin(args) => spin(&config, &open_store()?, &args).await,
        Commands::List(args) => list(&config, &open_store()?, &args).await,
        Commands::Prefs { action } => prefs(&open_store()?, action.unwrap_or(PrefsAction::Show)),
        Commands::Serve { port } => {
            let mut proxy = config.proxy.clone();
            if let Some(port) = port {
                proxy.port = port;
            }
            server::run_server(&proxy, config.api_key()).await?;
            Ok(())
        }
        Commands::Init => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn open_store() -> anyhow::Result<Store> {
    Ok(PreferenceStore::load(FileStorage::open_default()?))
}

fn resolve_location(args: &SearchArgs, config: &Config) -> anyhow::Result<Coordinate> {
    match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => Ok(Coordinate::new(lat, lng)),
        _ => config.location.ok_or_else(|| {
            anyhow::anyhow!(
                "Could not get your location: no coordinates given. \
                 Pass --lat and --lng, or set [location] in the config file."
            )
        }),
    }
}

async fn load_restaurants(
    config: &Config,
    store: &Store,
    args: &SearchArgs,
    coordinator: &FetchCoordinator,
) -> anyhow::Result<Vec<Restaurant>> {
    let origin = resolve_location(args, config)?;
    if let Some(radius) = args.radius {
        store.set_radius(radius)?;
    }

    println!("Loading restaurants...");
    coordinator
        .fetch(origin, store.snapshot().radius)
        .await
        .map_err(|e| anyhow::anyhow!("Error: {e}"))
}

async fn spin(config: &Config, store: &Store, args: &SearchArgs) -> anyhow::Result<()> {
    let (tx, rx) = async_channel::bounded(64);
    let coordinator = FetchCoordinator::new(config.places_client()).with_events(tx.clone());
    let restaurants = load_restaurants(config, store, args, &coordinator).await?;

    let wheel = Arc::new(Mutex::new(Wheel::new(&[])));
    let mut rng = rand::rng();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let prefs = store.snapshot();
        let visible = picker::wheel_restaurants(&restaurants, &prefs);
        wheel.lock().set_restaurants(&visible);

        if visible.is_empty() {
            println!("No restaurants");
            return Ok(());
        }
        println!("{}\n", view::legend(&wheel.lock()));

        let winner = run_spin(&wheel, &mut rng, &tx, &rx, prefs.sound_enabled).await?;
        println!("\n{}\n", ResultCard::new(&winner));

        print!("[s]pin again  e[x]clude & spin again  [q]uit > ");
        std::io::stdout().flush()?;

        match stdin.next_line().await? {
            Some(line) => match line.trim() {
                "" | "s" => continue,
                "x" => {
                    store.exclude(&winner.id)?;
                    println!("Excluded {}", winner.name);
                }
                _ => return Ok(()),
            },
            None => return Ok(()),
        }
    }
}

async fn run_spin<R: Rng + ?Sized>(
    wheel: &Arc<Mutex<Wheel>>,
    rng: &mut R,
    tx: &async_channel::Sender<AppEvent>,
    rx: &async_channel::Receiver<AppEvent>,
    sound: bool,
) -> anyhow::Result<Restaurant> {
    let _spin = runtime::start_spin(wheel.clone(), rng, tx.clone())
        .context("The wheel refused to spin")?;
    let mut renderer = FrameRenderer::new(sound);
    let mut out = std::io::stdout();

    loop {
        match rx.recv().await? {
            AppEvent::Frame { .. } => {
                write!(out, "{}", renderer.render(&wheel.lock()))?;
                out.flush()?;
            }
            AppEvent::SpinFinished(winner) => {
                writeln!(out, "{}", renderer.render(&wheel.lock()))?;
                return Ok(winner);
            }
            other => log::debug!("Ignoring {:?} during spin", other),
        }
    }
}

async fn list(config: &Config, store: &Store, args: &SearchArgs) -> anyhow::Result<()> {
    let coordinator = FetchCoordinator::new(config.places_client());
    let restaurants = load_restaurants(config, store, args, &coordinator).await?;
    let prefs = store.snapshot();

    let included = restaurants
        .iter()
        .filter(|r| !prefs.is_excluded(&r.id))
        .count();
    println!("Restaurant List ({included})");

    for r in &restaurants {
        let mark = if prefs.is_excluded(&r.id) { ' ' } else { 'x' };
        let status = picker::open_status(r.open_now).unwrap_or("");
        println!(
            "[{mark}] {:<32} {:<14} {:>5} mi  {:<9} {}",
            r.name,
            r.cuisine.label(),
            r.distance_miles,
            status,
            r.id
        );
    }

    println!("\nRadius: {} mi", prefs.radius);
    let cuisines: Vec<String> = picker::available_cuisines(&restaurants)
        .into_iter()
        .map(|c| {
            let mark = if prefs.cuisine_enabled(c) { '*' } else { ' ' };
            format!("{mark}{}", c.label())
        })
        .collect();
    println!("Cuisines: {}", cuisines.join("  "));

    let excluded = picker::excluded_names(&restaurants, &prefs);
    if !excluded.is_empty() {
        let names: Vec<&str> = excluded.iter().map(|(_, name)| name.as_str()).collect();
        println!("Excluded: {}", names.join(", "));
    }
    Ok(())
}

fn prefs(store: &Store, action: PrefsAction) -> anyhow::Result<()> {
    match action {
        PrefsAction::Show => {}
        PrefsAction::Radius { miles } => {
            store.set_radius(miles)?;
        }
        PrefsAction::Cuisine { cuisine } => {
            store.toggle_cuisine(cuisine)?;
        }
        PrefsAction::Exclude { id } => {
            store.exclude(&PlaceId::new(id))?;
        }
        PrefsAction::Include { id } => {
            let id = PlaceId::new(id);
            if store.snapshot().is_excluded(&id) {
                store.toggle_exclusion(&id)?;
            }
        }
        PrefsAction::Sound { state } => {
            let wanted = state == "on";
            if store.snapshot().sound_enabled != wanted {
                store.toggle_sound()?;
            }
        }
        PrefsAction::Clear => {
            store.clear()?;
            println!("Preferences cleared");
        }
    }

    let p = store.snapshot();
    println!("Radius:    {} mi", p.radius);
    if p.enabled_cuisines.is_empty() {
        println!("Cuisines:  all");
    } else {
        let labels: Vec<&str> = p.enabled_cuisines.iter().map(|c| c.label()).collect();
        println!("Cuisines:  {}", labels.join(", "));
    }
    let excluded: Vec<&str> = p.excluded_place_ids.iter().map(|id| id.as_str()).collect();
    println!(
        "Excluded:  {}",
        if excluded.is_empty() {
            "none".to_string()
        } else {
            excluded.join(", ")
        }
    );
    println!("Sound:     {}", if p.sound_enabled { "on" } else { "off" });
    Ok(())
}
