pub mod filter;
pub mod record;

pub use filter::{CommitteeDate, District, FilterSelection};
pub use record::{FieldValue, TenderRecord};
