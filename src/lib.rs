//! Meal Tracker Library
//!
//! Core functionality for tracking daily breakfast, lunch, and dinner
//! completion and computing adherence statistics.

pub mod build_info;
pub mod db;
pub mod mcp;
pub mod models;
pub mod stats;
pub mod tools;
