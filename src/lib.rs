//! # Michraz Scraper
//!
//! Automated harvesting of tender-committee results from the Israel Land
//! Authority tender site: drives a browser through the site's search
//! filters, fires a search, and parses structured lot records out of the
//! free-form result text.
//!
//! ## Architecture
//!
//! Four strict layers:
//!
//! ### ① Infrastructure
//! - `browser/` - session lifecycle: launch with anti-detection state, close
//! - `infrastructure/` - holds the scarce page resource, exposes capabilities
//!   only: `PageDriver` (navigate / eval / click / type / keys / scroll) and
//!   the randomized delay provider
//!
//! ### ② Business capabilities (Services)
//! - `services/` - one capability each, no flow knowledge
//! - `FilterPanel` - the three multiselect filters
//! - `DatePicker` - the three-tier calendar widget
//! - `Harvester` - scroll, discover, expand, window the detail text
//! - `record_parser` - pure text → records, sentinel-valued fields
//! - `csv_export` - flat-file output
//!
//! ### ③ Workflow
//! - `workflow/SearchFlow` - the ordered steps from landing page to a fired
//!   search; fail-fast on selector timeouts, fallback chains where the site
//!   demands them
//!
//! ### ④ Orchestration
//! - `app::App` - bounded retry loop; a failed or empty attempt restarts the
//!   browser session from clean state

pub mod app;
pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod model;
pub mod services;
pub mod utils;
pub mod workflow;

// Re-export the common types
pub use app::App;
pub use browser::Session;
pub use config::Config;
pub use error::{Result, ScrapeError};
pub use infrastructure::PageDriver;
pub use model::{CommitteeDate, District, FieldValue, FilterSelection, TenderRecord};
pub use services::{Harvester, HarvestMode};
pub use workflow::SearchFlow;
