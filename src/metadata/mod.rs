//! Item records and the JSON metadata file
//!
//! The metadata file is the only artifact shared between the scrape and
//! download commands.

mod record;
mod store;

pub use record::ItemRecord;
pub use store::{load_records, normalize_paragraph_separators, save_records, to_json_string};
