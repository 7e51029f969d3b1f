//! Compile-time build metadata.
//!
//! `build.rs` bumps `build_number.txt` on every recompile and exports two
//! environment variables to rustc:
//!
//! - `MEALTRACK_BUILD_NUMBER`: the new build number
//! - `MEALTRACK_BUILD_TIMESTAMP`: UTC compile time, `YYYY-MM-DDTHH:MM:SSZ`
//!
//! Builds that skip the script (for example `rust-analyzer` checks) fall back
//! to build 0 and an `"unknown"` timestamp.

use serde::Serialize;

const RAW_BUILD_NUMBER: Option<&str> = option_env!("MEALTRACK_BUILD_NUMBER");

pub const BUILD_TIMESTAMP: &str = match option_env!("MEALTRACK_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build number exported by `build.rs`, or 0 when missing or malformed
pub fn build_number() -> u64 {
    RAW_BUILD_NUMBER
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

/// Snapshot reported by `meal_tracker_status`
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            build_number: build_number(),
            build_timestamp: BUILD_TIMESTAMP,
        }
    }

    fn banner(&self) -> String {
        let rule = "=".repeat(47);
        format!(
            "{rule}\n  Meal Tracker (mealtrack)\n  Version: {} | Build: {}\n  Compiled: {}\n{rule}",
            self.version, self.build_number, self.build_timestamp
        )
    }
}

/// stdout is the MCP transport, so the banner goes to stderr.
pub fn print_startup_banner() {
    eprintln!("{}", BuildInfo::current().banner());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_uses_package_version() {
        let info = BuildInfo::current();
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(info.build_number, build_number());
    }

    #[test]
    fn test_banner_lists_version_and_build() {
        let info = BuildInfo {
            version: "1.2.3",
            build_number: 17,
            build_timestamp: "2024-01-10T08:00:00Z",
        };
        let banner = info.banner();
        assert!(banner.contains("Version: 1.2.3 | Build: 17"));
        assert!(banner.contains("Compiled: 2024-01-10T08:00:00Z"));
        assert_eq!(banner.lines().count(), 5);
    }
}
