pub mod admin;
pub mod goal;
pub mod record;
pub mod stats;
pub mod sweep;

use codestreak_core::{JsonStore, Settings, Tracker};

/// Open the tracker over the configured data file.
pub fn open_tracker() -> Result<Tracker<JsonStore>, Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    let store = JsonStore::new(settings.data_path()?);
    Ok(Tracker::open(store))
}
