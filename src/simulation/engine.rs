//! Daily rate-path simulation and monthly aggregation

use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

use super::calendar::last_working_days;
use super::summary::{DailyRate, MonthAccumulator, MonthlySummary};
use super::turn::{AdjustmentMagnitudes, TurnState};

/// Default target year
pub const DEFAULT_YEAR: i32 = 2026;

/// One discrete step applied to the cumulative rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateEvent {
    /// Meeting date; the change takes effect the following calendar day
    #[serde(rename = "date")]
    pub effective_date: NaiveDate,
    /// Signed change in percentage points
    #[serde(rename = "change_pct", default)]
    pub change: f64,
}

impl RateEvent {
    pub fn new(effective_date: NaiveDate, change: f64) -> Self {
        Self { effective_date, change }
    }
}

/// Everything the simulator needs for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub base_rate_pct: f64,
    #[serde(default)]
    pub events: Vec<RateEvent>,
    #[serde(flatten)]
    pub adjustments: AdjustmentMagnitudes,
    #[serde(default = "default_year")]
    pub year: i32,
}

fn default_year() -> i32 { DEFAULT_YEAR }

impl SimulationInput {
    pub fn run(&self) -> Vec<MonthlySummary> {
        RatePathSimulator::new(self.year).simulate(self.base_rate_pct, &self.events, &self.adjustments)
    }
}

/// Projects a year of daily rates and folds them into monthly summaries
#[derive(Debug, Clone, Copy)]
pub struct RatePathSimulator {
    year: i32,
}

impl RatePathSimulator {
    pub fn new(year: i32) -> Self {
        Self { year }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Iterator over every calendar day of the year
    pub fn daily_path(
        &self,
        base_rate_pct: f64,
        events: &[RateEvent],
        adjustments: &AdjustmentMagnitudes,
    ) -> DailyPath {
        DailyPath::new(self.year, base_rate_pct, events, *adjustments)
    }

    /// Twelve monthly summaries, January first
    pub fn simulate(
        &self,
        base_rate_pct: f64,
        events: &[RateEvent],
        adjustments: &AdjustmentMagnitudes,
    ) -> Vec<MonthlySummary> {
        debug!("Simulating {} with {} rate events", self.year, events.len());

        let mut months = [MonthAccumulator::default(); 12];
        for day in self.daily_path(base_rate_pct, events, adjustments) {
            months[day.date.month0() as usize].add(day.rate_pct);
        }

        months
            .iter()
            .enumerate()
            .map(|(i, acc)| MonthlySummary::from_average(i, self.year, acc.average_or(base_rate_pct)))
            .collect()
    }
}

/// Lazily produced daily rate path.
///
/// Events are applied in date order, each from the day after its date. The
/// turn automaton is stepped exactly once per day.
#[derive(Debug, Clone)]
pub struct DailyPath {
    base_rate_pct: f64,
    events: Vec<RateEvent>,
    next_event: usize,
    cumulative_change: f64,
    adjustments: AdjustmentMagnitudes,
    last_working_days: [NaiveDate; 12],
    turn: TurnState,
    current: Option<NaiveDate>,
    end: NaiveDate,
}

impl DailyPath {
    fn new(year: i32, base_rate_pct: f64, events: &[RateEvent], adjustments: AdjustmentMagnitudes) -> Self {
        let mut events = events.to_vec();
        // Stable: same-day events keep their input order
        events.sort_by_key(|e| e.effective_date);

        let start = NaiveDate::from_ymd_opt(year, 1, 1);
        let end = NaiveDate::from_ymd_opt(year, 12, 31);
        let lwds = last_working_days(year);

        let (current, end, last_working_days) = match (start, end, lwds) {
            (Some(s), Some(e), Some(l)) => (Some(s), e, l),
            _ => (None, NaiveDate::MIN, [NaiveDate::MIN; 12]),
        };

        Self {
            base_rate_pct,
            events,
            next_event: 0,
            cumulative_change: 0.0,
            adjustments,
            last_working_days,
            turn: TurnState::Inactive,
            current,
            end,
        }
    }

    /// Cumulative change applied so far
    pub fn cumulative_change(&self) -> f64 {
        self.cumulative_change
    }

    fn apply_events_before(&mut self, date: NaiveDate) {
        while let Some(event) = self.events.get(self.next_event) {
            if event.effective_date >= date {
                break;
            }
            self.cumulative_change += event.change;
            self.next_event += 1;
        }
    }
}

impl Iterator for DailyPath {
    type Item = DailyRate;

    fn next(&mut self) -> Option<DailyRate> {
        let date = self.current?;
        if date > self.end {
            self.current = None;
            return None;
        }
        self.current = date.succ_opt();

        self.apply_events_before(date);

        let lwd = self.last_working_days[date.month0() as usize];
        self.turn = self.turn.step(date, lwd, &self.adjustments);

        Some(DailyRate {
            date,
            rate_pct: self.base_rate_pct + self.cumulative_change + self.turn.premium(),
        })
    }
}
