use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use globo_travel::links::{BOOKING_FORM_URL, CHAT_URL, REVIEW_FORM_URL};
use globo_travel::{
    source_for_path, AppConfig, Answer, BrowsingSession, CatalogCache, FilterSpec,
    InclusiveRange, ShareLinks, SortKey, TravelOffer, TravelType, WitClient,
};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Fees,
    PeoplePerTrip,
    TripLocation,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Fees => SortKey::Fee,
            SortArg::PeoplePerTrip => SortKey::GroupSizeCapacity,
            SortArg::TripLocation => SortKey::Location,
        }
    }
}

/// Browse the GLOBO Travel catalog from the terminal.
///
/// Every filter starts at the sidebar default and is narrowed by the flags given.
#[derive(Debug, Parser)]
#[command(name = "globo_travel", version)]
struct Cli {
    /// Catalog export (.json or .xml); overrides GLOBO_CATALOG_PATH
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Trip locations to keep (repeatable)
    #[arg(long = "location")]
    locations: Vec<String>,

    #[arg(long)]
    people_min: Option<u32>,
    #[arg(long)]
    people_max: Option<u32>,

    #[arg(long)]
    fee_min: Option<f64>,
    #[arg(long)]
    fee_max: Option<f64>,

    /// Minimum star rating (sidebar default is 5)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    min_stars: Option<u8>,

    #[arg(long)]
    departure_from: Option<NaiveDate>,
    #[arg(long)]
    departure_to: Option<NaiveDate>,
    #[arg(long)]
    return_from: Option<NaiveDate>,
    #[arg(long)]
    return_to: Option<NaiveDate>,

    /// Solo, Business, Leisure or Family (repeatable)
    #[arg(long = "travel-type")]
    travel_types: Vec<TravelType>,

    /// Amenity keyword (repeatable)
    #[arg(long = "amenity")]
    amenities: Vec<String>,

    #[arg(long, value_enum, default_value_t = SortArg::Fees)]
    sort_by: SortArg,

    /// Add a location to the wish list (repeatable)
    #[arg(long = "save")]
    save: Vec<String>,

    /// Travel question for the intent service
    #[arg(long)]
    ask: Option<String>,
}

impl Cli {
    fn filter_spec(&self, defaults: FilterSpec) -> FilterSpec {
        let mut spec = defaults;
        if !self.locations.is_empty() {
            spec.locations = self.locations.iter().cloned().collect();
        }
        spec.group_size = InclusiveRange::new(
            self.people_min.unwrap_or(spec.group_size.min),
            self.people_max.unwrap_or(spec.group_size.max),
        );
        spec.fee = InclusiveRange::new(
            self.fee_min.unwrap_or(spec.fee.min),
            self.fee_max.unwrap_or(spec.fee.max),
        );
        if let Some(stars) = self.min_stars {
            spec.min_star_rating = stars;
        }
        spec.departure = InclusiveRange::new(
            self.departure_from.unwrap_or(spec.departure.min),
            self.departure_to.unwrap_or(spec.departure.max),
        );
        spec.return_window = InclusiveRange::new(
            self.return_from.unwrap_or(spec.return_window.min),
            self.return_to.unwrap_or(spec.return_window.max),
        );
        if !self.travel_types.is_empty() {
            spec.travel_types = self.travel_types.iter().copied().collect();
        }
        if !self.amenities.is_empty() {
            spec.amenities = self.amenities.clone();
        }
        spec.sort_key = self.sort_by.into();
        spec
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn print_offer(offer: &TravelOffer) {
    println!("---");
    println!("### {}", offer.company);
    println!("Trip Location: {}", offer.location);
    println!("People per Trip: {}", offer.group_size_capacity);
    println!("Fees: ₹{}", offer.fee);
    println!("Details: {}", offer.details);
    println!("Departure Date: {}", offer.departure_date.format("%Y-%m-%d"));
    println!("Return Date: {}", offer.return_date.format("%Y-%m-%d"));
    println!("Star Rating: {} stars", offer.star_rating);
    println!("Amenities: {}", offer.amenities);
    println!("Travel Type: {}", offer.travel_type);
    println!("Travel ID: {}", offer.travel_id);
    if let Some(image) = &offer.image_url {
        println!("Image: {}", image);
    }

    let share = ShareLinks::for_offer(offer);
    println!("Book: {}", BOOKING_FORM_URL);
    println!("Chat: {}", CHAT_URL);
    println!("Review: {}", REVIEW_FORM_URL);
    println!("Share on Facebook: {}", share.facebook);
    println!("Share on WhatsApp: {}", share.whatsapp);
    println!("Instagram: {}", share.instagram);
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("Invalid environment configuration")?;
    if let Some(path) = &cli.catalog {
        config.catalog_path = path.clone();
    }

    // Loading failures are fatal: no partial catalog is ever browsed
    let cache = CatalogCache::new();
    let source = source_for_path(&config.catalog_path);
    let catalog = cache
        .get_or_load(source.as_ref())
        .with_context(|| format!("Failed to load catalog {}", config.catalog_path.display()))?;

    let mut session = BrowsingSession::new(catalog);
    let spec = cli.filter_spec(FilterSpec::sidebar_defaults(session.catalog()));
    if let Err(e) = spec.check() {
        eprintln!("{}", e);
    }

    let results = session.search(&spec);
    if results.is_empty() {
        println!("No trips match your criteria.");
    } else {
        println!("Filtered Travel Plans ({})", results.len());
        for offer in &results {
            print_offer(offer);
        }
        println!("---");
    }

    for location in &cli.save {
        if session.save_location(location) {
            println!("{} added to your Wish List!", location);
        }
    }
    if !session.wish_list().is_empty() {
        println!("Wish List: {}", session.wish_list().locations().join(", "));
    }

    if let Some(question) = &cli.ask {
        if !config.intent.is_enabled() {
            eprintln!("Set WIT_AI_TOKEN to ask travel questions.");
        } else {
            let client = WitClient::new(&config.intent)?;
            match session.ask(&client, question).await {
                Some(Answer::Text(answer)) => println!("Answer:\n> {}", answer),
                Some(Answer::Error(message)) => eprintln!("{}", message),
                None => {}
            }
        }
    }

    Ok(())
}
