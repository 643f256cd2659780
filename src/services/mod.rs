pub mod csv_export;
pub mod date_picker;
pub mod filter_panel;
pub mod harvester;
pub mod record_parser;

pub use date_picker::DatePicker;
pub use filter_panel::FilterPanel;
pub use harvester::{Harvester, HarvestMode};
