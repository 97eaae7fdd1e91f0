//! Output structures for a simulated year

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Effective simulated rate for one calendar day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRate {
    pub date: NaiveDate,
    /// Rate in percent, turn adjustment included
    pub rate_pct: f64,
}

/// Monthly average rate and the matching futures outright
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Label such as "Jan 2026"
    pub month: String,
    pub avg_rate: f64,
    pub outright: f64,
}

impl MonthlySummary {
    /// Build a summary from an unrounded monthly average.
    ///
    /// The outright is derived from the rounded average so that
    /// `outright == round4(100 - avg_rate)` holds exactly.
    pub fn from_average(month_index: usize, year: i32, avg: f64) -> Self {
        let avg_rate = round4(avg);
        Self {
            month: format!("{} {}", MONTH_LABELS[month_index], year),
            avg_rate,
            outright: round4(100.0 - avg_rate),
        }
    }
}

/// Round to 4 decimal places, ties away from zero
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Running sum/count for one month
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MonthAccumulator {
    pub sum: f64,
    pub count: u32,
}

impl MonthAccumulator {
    pub fn add(&mut self, rate_pct: f64) {
        self.sum += rate_pct;
        self.count += 1;
    }

    /// Average, or `fallback` when no day was recorded
    pub fn average_or(&self, fallback: f64) -> f64 {
        if self.count == 0 {
            fallback
        } else {
            self.sum / self.count as f64
        }
    }
}
