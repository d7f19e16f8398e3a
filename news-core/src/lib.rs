pub mod config;
pub mod error;
pub mod favorites;
pub mod feed;
pub mod fetch;
pub mod search;
pub mod state;
pub mod store;

pub use config::{AppConfig, FavoritesConfig, FeedConfig, ThemeConfig, UiConfig};
pub use error::{ConfigError, FetchError, LookupError, PersistenceError};
pub use favorites::{Favorites, FavoritesFile};
pub use feed::{decode_feed, records_from_document, FeedDocument, FeedRecord, RecordMap};
pub use fetch::{fetch_records, spawn_fetch, FetchConfig, FetchHandle, FetchOutcome};
pub use search::SearchState;
pub use state::AppState;
pub use store::RecordStore;
