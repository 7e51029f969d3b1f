//! Utility to set the tracking start date in settings.json
//!
//! Usage: `set_start_date YYYY-MM-DD` (or `set_start_date today`)

use mealtrack::db::{self, SettingsStore, SETTINGS_FILE};
use mealtrack::models::{date, parse_date, Settings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let arg = std::env::args()
        .nth(1)
        .ok_or("usage: set_start_date <YYYY-MM-DD | today>")?;

    let start_date = if arg.eq_ignore_ascii_case("today") {
        date::today()
    } else {
        parse_date(&arg)?
    };

    let data_dir = db::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let settings_path = data_dir.join(SETTINGS_FILE);
    println!("Settings path: {}", settings_path.display());

    let mut store = SettingsStore::load(&settings_path)?;
    let settings = Settings {
        start_date: Some(start_date),
        ..store.get().clone()
    };
    store.save(settings)?;

    println!("Tracking start date set:");
    println!("  Start date: {}", date::format_date(start_date));

    Ok(())
}
