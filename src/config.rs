//! Runtime configuration
//!
//! Read from environment variables, falling back to defaults when a variable
//! is missing or does not parse:
//!   OUTRIGHTS_YEAR, OUTRIGHTS_CASES_FILE, OUTRIGHTS_DEFAULT_RATE

use std::env;
use std::path::PathBuf;

use crate::simulation::DEFAULT_YEAR;

pub const DEFAULT_CASES_FILE: &str = "cases.json";
pub const DEFAULT_BASE_RATE: &str = "5.25%";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Calendar year every simulation runs over
    pub year: i32,
    /// JSON document holding saved cases
    pub cases_path: PathBuf,
    /// Rate text used when a request omits `effr`
    pub default_base_rate: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            year: DEFAULT_YEAR,
            cases_path: PathBuf::from(DEFAULT_CASES_FILE),
            default_base_rate: DEFAULT_BASE_RATE.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let year: i32 = env::var("OUTRIGHTS_YEAR")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.year);

        let cases_path = env::var("OUTRIGHTS_CASES_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.cases_path);

        let default_base_rate = env::var("OUTRIGHTS_DEFAULT_RATE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.default_base_rate);

        Self { year, cases_path, default_base_rate }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn with_cases_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cases_path = path.into();
        self
    }

    /// Download file name for an export, e.g. `outrights_2026.csv`
    pub fn export_file_name(&self, extension: &str) -> String {
        format!("outrights_{}.{}", self.year, extension)
    }
}
