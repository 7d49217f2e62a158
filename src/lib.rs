// GLOBO Travel: catalog loading, filtering and question answering for travel offers

pub mod cache;
pub mod catalog;
pub mod config;
pub mod filter;
pub mod intent;
pub mod links;
pub mod offer;
pub mod session;
pub mod wishlist;

// Re-export key types for convenience
pub use cache::{CacheStatsReport, CatalogCache};
pub use catalog::{
    load, load_rows, source_for_path, Catalog, CatalogSource, InMemorySource, JsonFileSource,
    LoadError, Row, XmlFileSource, SAMPLE_JSON_PATH, SAMPLE_XML_PATH,
};
pub use config::{AppConfig, ConfigError, IntentConfig};
pub use filter::{apply, FilterError, FilterSpec, InclusiveRange, SortKey};
pub use intent::{IntentClassifier, IntentResult, ServiceError, WitClient};
pub use links::ShareLinks;
pub use offer::{TravelOffer, TravelType};
pub use session::{Answer, BrowsingSession};
pub use wishlist::WishList;
