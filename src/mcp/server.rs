//! Meal Tracker MCP Server Implementation
//!
//! Implements the MCP server with all meal tracker tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::db::Database;
use crate::models::date::today;
use crate::tools::meals;
use crate::tools::reports;
use crate::tools::settings::{self, MealTimesUpdate, MealWindowUpdate};
use crate::tools::stats;
use crate::tools::status::StatusTracker;

/// Meal Tracker MCP Service
#[derive(Clone)]
pub struct MealTrackerService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<MealTrackerService>,
}

impl MealTrackerService {
    pub fn new(database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database.clone()))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetMealsParams {
    /// Date (ISO format: YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MarkMealCompleteParams {
    /// Date (ISO format: YYYY-MM-DD)
    pub date: String,
    /// Meal: breakfast, lunch, or dinner
    pub meal_type: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetStatsParams {
    /// Period: daily, weekly, or monthly
    pub period: String,
    /// Tracking start date (YYYY-MM-DD). Defaults to the saved start date, then today.
    pub start_date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetAllStatsParams {
    /// Tracking start date (YYYY-MM-DD). Defaults to the saved start date, then today.
    pub start_date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetCalendarMonthParams {
    /// Year (defaults to the current year)
    pub year: Option<i32>,
    /// Month 1-12 (defaults to the current month)
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MealWindowParams {
    /// Window start (HH:MM)
    pub start: Option<String>,
    /// Window end (HH:MM)
    pub end: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MealTimesParams {
    pub breakfast: Option<MealWindowParams>,
    pub lunch: Option<MealWindowParams>,
    pub dinner: Option<MealWindowParams>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateSettingsParams {
    /// Tracking start date (YYYY-MM-DD). Empty string clears it.
    pub start_date: Option<String>,
    /// Meal time windows to change (omitted meals keep their window)
    pub meal_times: Option<MealTimesParams>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateMonthlyReportParams {
    /// Year of the report
    pub year: i32,
    /// Month of the report (1-12)
    pub month: u32,
    /// Output file path for the PDF (e.g., "C:/Reports/meals_2024_01.pdf")
    pub output_path: String,
}

impl From<MealWindowParams> for MealWindowUpdate {
    fn from(p: MealWindowParams) -> Self {
        Self { start: p.start, end: p.end }
    }
}

impl From<MealTimesParams> for MealTimesUpdate {
    fn from(p: MealTimesParams) -> Self {
        Self {
            breakfast: p.breakfast.map(Into::into),
            lunch: p.lunch.map(Into::into),
            dinner: p.dinner.map(Into::into),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl MealTrackerService {
    // --- Status ---

    #[tool(description = "Get the current status of the meal tracker including build info, data file status, and process information")]
    async fn meal_tracker_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status().map_err(|e| McpError::internal_error(e, None))?;
        json_result(&status)
    }

    #[tool(description = "Get instructions for using the meal tracker tools. Call this when starting a session or when unsure how statistics are computed.")]
    fn meal_tracker_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::MEAL_TRACKER_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(MEAL_TRACKER_INSTRUCTIONS)]))
    }

    // --- Meals ---

    #[tool(description = "Get breakfast, lunch, and dinner completion for a date. Days without records show all meals as not completed.")]
    fn get_meals(&self, Parameters(p): Parameters<GetMealsParams>) -> Result<CallToolResult, McpError> {
        let result = meals::get_meals(&self.database, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Mark a meal (breakfast, lunch, or dinner) as completed on a date")]
    fn mark_meal_complete(&self, Parameters(p): Parameters<MarkMealCompleteParams>) -> Result<CallToolResult, McpError> {
        let result = meals::mark_meal_complete(&self.database, &p.date, &p.meal_type).map_err(|e| {
            warn!(date = %p.date, meal_type = %p.meal_type, error = %e, "mark_meal_complete failed");
            McpError::internal_error(e, None)
        })?;
        info!(date = %result.date, meal_type = %result.meal_type, "meal marked complete");
        json_result(&result)
    }

    #[tool(description = "Get a single date's completion summary (meals completed out of 3 and percentage)")]
    fn get_daily_stats(&self, Parameters(p): Parameters<GetMealsParams>) -> Result<CallToolResult, McpError> {
        let result = meals::get_daily_stats(&self.database, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete ALL meal records. Cannot be undone; confirm with the user first.")]
    fn clear_all_data(&self) -> Result<CallToolResult, McpError> {
        let result = meals::clear_all_data(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        info!(days_removed = result.days_removed, "all meal data cleared");
        json_result(&result)
    }

    // --- Statistics ---

    #[tool(description = "Get completed vs expected meals for the daily, weekly, or monthly period. Days before the tracking start date are not counted as missed.")]
    fn get_stats(&self, Parameters(p): Parameters<GetStatsParams>) -> Result<CallToolResult, McpError> {
        let result = stats::get_stats(&self.database, &p.period, p.start_date.as_deref(), today())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get daily, weekly, and monthly statistics in one call")]
    fn get_all_stats(&self, Parameters(p): Parameters<GetAllStatsParams>) -> Result<CallToolResult, McpError> {
        let result = stats::get_all_stats(&self.database, p.start_date.as_deref(), today())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get the calendar breakdown for a month: per-day completion, misses per meal, most missed meal, perfect days, and average daily score")]
    fn get_calendar_month(&self, Parameters(p): Parameters<GetCalendarMonthParams>) -> Result<CallToolResult, McpError> {
        let result = stats::get_calendar_month(&self.database, p.year, p.month, today())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Settings ---

    #[tool(description = "Get tracker settings: tracking start date and meal time windows")]
    fn get_settings(&self) -> Result<CallToolResult, McpError> {
        let result = settings::get_settings(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update the tracking start date and/or meal time windows")]
    fn update_settings(&self, Parameters(p): Parameters<UpdateSettingsParams>) -> Result<CallToolResult, McpError> {
        let result = settings::update_settings(
            &self.database,
            p.start_date.as_deref(),
            p.meal_times.map(Into::into),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Reports ---

    #[tool(description = "Generate a PDF report for a month with a summary, a per-day completion table, and a completion chart")]
    fn generate_monthly_report(&self, Parameters(p): Parameters<GenerateMonthlyReportParams>) -> Result<CallToolResult, McpError> {
        let result = reports::generate_monthly_report(&self.database, p.year, p.month, &p.output_path, today())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

#[tool_handler]
impl ServerHandler for MealTrackerService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mealtrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Meal Tracker".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Meal Tracker - daily breakfast/lunch/dinner completion tracking. \
                 IMPORTANT: Call meal_tracker_instructions before first use. Dates are YYYY-MM-DD. \
                 Meals: get_meals, mark_meal_complete, get_daily_stats, clear_all_data (confirm first). \
                 Stats: get_stats (daily/weekly/monthly), get_all_stats, get_calendar_month. \
                 Settings: get_settings, update_settings (tracking start date, meal windows). \
                 Reports: generate_monthly_report (PDF). Status: meal_tracker_status."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_info_names_server() {
        let dir = tempfile::tempdir().unwrap();
        let service = MealTrackerService::new(Database::open(dir.path()).unwrap());
        let info = service.get_info();
        assert_eq!(info.server_info.name, "mealtrack");
        assert!(info.instructions.unwrap().contains("mark_meal_complete"));
    }

    #[test]
    fn test_meal_times_params_conversion() {
        let params: UpdateSettingsParams = serde_json::from_str(
            r#"{"meal_times": {"dinner": {"start": "17:30"}}}"#,
        )
        .unwrap();
        let update: MealTimesUpdate = params.meal_times.unwrap().into();
        assert!(update.breakfast.is_none());
        let dinner = update.dinner.unwrap();
        assert_eq!(dinner.start.as_deref(), Some("17:30"));
        assert!(dinner.end.is_none());
    }
}
