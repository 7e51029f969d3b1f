//! Meal Tracker
//!
//! An MCP server for daily meal completion tracking.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use mealtrack::build_info;
use mealtrack::db::{self, Database};
use mealtrack::mcp::MealTrackerService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("mealtrack=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let data_dir = db::data_dir();
    eprintln!("Data directory: {}", data_dir.display());

    let database = Database::open(&data_dir)?;

    let load_warning = database.with_records(|records| {
        eprintln!("Loaded {} recorded days", records.len());
        Ok(records.load_warning().map(str::to_string))
    })?;
    if let Some(warning) = load_warning {
        tracing::warn!(%warning, "meal data could not be loaded; starting with an empty store");
    }
    if let Some(warning) = database.with_settings(|s| Ok(s.load_warning().map(str::to_string)))? {
        tracing::warn!(%warning, "settings could not be loaded; using defaults");
    }

    // Create the meal tracker service
    let service = MealTrackerService::new(database);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
