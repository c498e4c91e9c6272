//! Appx - API directory browser
//!
//! Lists a catalog of apps, each with a name and an API endpoint URL, and
//! filters it by name as you type.
//!
//! # Features
//!
//! - **Instant search**: case-insensitive literal substring match on the app name
//! - **Highlighting**: matched parts of each name are split out for emphasis
//! - **Client or server filtering**: one session interface, one matcher
//! - **Copy / open**: copy an endpoint to the clipboard or open it in a browser
//! - **Catalog service**: serve a JSON catalog over `/api/apps`
//!
//! # Example
//!
//! ```no_run
//! use appx::{search, AppSource, HttpSource};
//!
//! fn main() -> appx::Result<()> {
//!     let source = HttpSource::new("http://localhost:5000")?;
//!     let apps = source.fetch_all()?;
//!
//!     for app in search::filter(&apps, "academy") {
//!         let name: String = search::highlight(&app.name, "academy")
//!             .iter()
//!             .map(|s| if s.is_match { format!("[{}]", s.text) } else { s.text.to_string() })
//!             .collect();
//!         println!("{} -> {}", name, app.api);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod clipboard;
pub mod error;
pub mod logging;
pub mod search;
pub mod server;
pub mod session;
pub mod source;
pub mod tui;

// Re-export main types
pub use catalog::{AppId, AppRecord};
pub use error::{AppxError, Result};
pub use search::{filter, highlight, Matcher, Segment};
pub use session::{FetchRequest, FetchResponse, Fetcher, FilterMode, RequestKind, Session};
pub use source::{AppSource, FetchState, HttpSource, StaticSource};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default catalog service location
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the catalog service
    pub base_url: String,
    /// Read the catalog from this JSON file instead of the service
    pub catalog_file: Option<PathBuf>,
    /// Where the name filter runs
    pub filter_mode: FilterMode,
    /// How long "Copied!" stays on a card
    pub copy_feedback: Duration,
    /// Event loop tick
    pub tick_rate: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            catalog_file: None,
            filter_mode: FilterMode::Client,
            copy_feedback: Duration::from_secs(2),
            tick_rate: Duration::from_millis(50),
        }
    }
}

impl AppConfig {
    /// Build the data source this configuration points at
    pub fn source(&self) -> Result<Arc<dyn AppSource>> {
        match &self.catalog_file {
            Some(path) => {
                let records = catalog::load_catalog(path)?;
                Ok(Arc::new(StaticSource::new(records, path.display().to_string())))
            }
            None => Ok(Arc::new(HttpSource::new(&self.base_url)?)),
        }
    }
}
