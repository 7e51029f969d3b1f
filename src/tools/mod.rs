//! Meal Tracker Tools module
//!
//! MCP tool implementations. Each function validates its input, works on the
//! shared `Database`, and returns a serializable response or an error message.

pub mod meals;
pub mod reports;
pub mod settings;
pub mod stats;
pub mod status;
