//! Policy-rate path simulation over a calendar year

pub mod calendar;
mod turn;
mod engine;
mod summary;

pub use turn::{AdjustmentMagnitudes, TurnKind, TurnState};
pub use engine::{RatePathSimulator, RateEvent, SimulationInput, DailyPath, DEFAULT_YEAR};
pub use summary::{DailyRate, MonthlySummary, MONTH_LABELS, round4};
