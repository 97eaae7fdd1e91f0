//! Month-end, quarter-end and year-end turn premium
//!
//! The premium switches on at a month's last working day and stays on through
//! any following weekend days, including weekend days that belong to the next
//! month. The first weekday that is not itself a last working day clears it.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::calendar::is_weekend;

/// Turn premia in percentage points; zero disables a turn
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AdjustmentMagnitudes {
    #[serde(default)]
    pub month_end_pts: f64,
    #[serde(default)]
    pub quarter_end_pts: f64,
    #[serde(default)]
    pub year_end_pts: f64,
}

impl AdjustmentMagnitudes {
    pub fn new(month_end_pts: f64, quarter_end_pts: f64, year_end_pts: f64) -> Self {
        Self { month_end_pts, quarter_end_pts, year_end_pts }
    }

    pub fn magnitude(&self, kind: TurnKind) -> f64 {
        match kind {
            TurnKind::MonthEnd => self.month_end_pts,
            TurnKind::QuarterEnd => self.quarter_end_pts,
            TurnKind::YearEnd => self.year_end_pts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    MonthEnd,
    QuarterEnd,
    YearEnd,
}

impl TurnKind {
    /// Turn that applies at the end of `month` (1-12)
    pub fn for_month(month: u32) -> Self {
        match month {
            12 => TurnKind::YearEnd,
            3 | 6 | 9 => TurnKind::QuarterEnd,
            _ => TurnKind::MonthEnd,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TurnState {
    #[default]
    Inactive,
    Active {
        kind: TurnKind,
        pts: f64,
    },
}

impl TurnState {
    /// Advance the automaton to `date`.
    ///
    /// `last_working_day` is the last working day of `date`'s own month.
    pub fn step(
        self,
        date: NaiveDate,
        last_working_day: NaiveDate,
        adjustments: &AdjustmentMagnitudes,
    ) -> Self {
        if date == last_working_day {
            let kind = TurnKind::for_month(date.month());
            TurnState::Active { kind, pts: adjustments.magnitude(kind) }
        } else if !is_weekend(date) {
            TurnState::Inactive
        } else {
            self
        }
    }

    /// Premium added to the day's rate
    pub fn premium(&self) -> f64 {
        match self {
            TurnState::Inactive => 0.0,
            TurnState::Active { pts, .. } => *pts,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, TurnState::Active { .. })
    }
}
