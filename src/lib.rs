//! Funds Outrights - Daily policy-rate path simulation and monthly futures pricing
//!
//! This library provides:
//! - Daily rate-path simulation from a starting rate and meeting-date steps
//! - Month-end, quarter-end and year-end turn premia with weekend carry
//! - Monthly average rates and outrights (100 - average rate)
//! - Rate text parsing (bps, percent, bare basis points)
//! - Saved cases in a JSON document store
//! - CSV and workbook export, batch scenarios and an HTTP router

pub mod simulation;
pub mod input;
pub mod cases;
pub mod export;
pub mod scenario;
pub mod api;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use simulation::{RatePathSimulator, RateEvent, AdjustmentMagnitudes, MonthlySummary, SimulationInput};
pub use input::{ComputeRequest, parse_rate};
pub use cases::{Case, CaseStore};
pub use scenario::ScenarioRunner;
pub use config::AppConfig;
pub use error::{OutrightError, RateParseError};
