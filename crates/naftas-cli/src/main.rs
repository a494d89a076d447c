mod lookup;
mod store;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "naftas-cli")]
#[command(about = "Fuel prices from the Argentine open-data dataset")]
struct Cli {
    /// Client store file (selected city and bookmarks)
    #[arg(long, global = true, env = "NAFTAS_STORE_PATH")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Latest price per brand and fuel for a city
    Prices {
        /// City name as published in the dataset; defaults to the stored city
        #[arg(long)]
        city: Option<String>,
        /// Print the raw JSON board instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Locality closest to a coordinate
    Nearest {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        long: f64,
    },
    /// One station per brand around a zone (norte, sur, este, oeste)
    Stations {
        #[arg(long, default_value = "este")]
        zone: String,
    },
    /// Search the bundled city list
    Search { query: String },
    /// Upcoming price increases
    Increases,
    /// Show or change the selected city
    City {
        #[command(subcommand)]
        command: CityCommands,
    },
    /// Manage saved prices
    Bookmarks {
        #[command(subcommand)]
        command: BookmarkCommands,
    },
}

#[derive(Debug, Subcommand)]
enum CityCommands {
    Show,
    Set { name: String },
}

#[derive(Debug, Subcommand)]
enum BookmarkCommands {
    List,
    Add {
        #[arg(long)]
        brand: String,
        #[arg(long)]
        fuel: String,
        #[arg(long)]
        price: Decimal,
        /// Effective date of the price
        #[arg(long)]
        date: String,
        /// Defaults to the stored city
        #[arg(long)]
        city: Option<String>,
        /// Liters to fill; stores the total cost as well
        #[arg(long)]
        liters: Option<Decimal>,
    },
    Remove { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = naftas_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let store_path = match cli.store {
        Some(path) => path,
        None => store::default_store_path()?,
    };

    match cli.command {
        Some(Commands::Prices { city, json }) => {
            lookup::run_prices(&config, &store_path, city.as_deref(), json).await?;
        }
        Some(Commands::Nearest { lat, long }) => lookup::run_nearest(&config, lat, long).await?,
        Some(Commands::Stations { zone }) => lookup::run_stations(&config, &zone).await?,
        Some(Commands::Search { query }) => lookup::run_search(&config.cities_path, &query)?,
        Some(Commands::Increases) => lookup::run_increases(&config).await?,
        Some(Commands::City { command }) => match command {
            CityCommands::Show => store::run_city_show(&store_path)?,
            CityCommands::Set { name } => store::run_city_set(&store_path, &name)?,
        },
        Some(Commands::Bookmarks { command }) => match command {
            BookmarkCommands::List => store::run_bookmarks_list(&store_path)?,
            BookmarkCommands::Add {
                brand,
                fuel,
                price,
                date,
                city,
                liters,
            } => store::run_bookmarks_add(
                &store_path,
                &store::NewBookmark {
                    brand: &brand,
                    fuel: &fuel,
                    price,
                    date: &date,
                    city: city.as_deref(),
                    liters,
                },
            )?,
            BookmarkCommands::Remove { id } => store::run_bookmarks_remove(&store_path, &id)?,
        },
        None => println!("naftas-cli: run with --help to list commands"),
    }

    Ok(())
}
