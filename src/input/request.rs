//! Caller-facing compute request
//!
//! Rates arrive as text (or bare JSON numbers) and are normalised through
//! [`parse_rate`] before the simulator sees them.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::{OutrightError, Result};
use crate::simulation::{AdjustmentMagnitudes, RateEvent, SimulationInput};
use super::rate_text::parse_rate;

/// A rate given either as text ("25bps", "0.25%") or as a JSON number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RateText {
    Text(String),
    Number(f64),
}

impl RateText {
    pub fn parse(&self) -> Result<f64> {
        let pct = match self {
            RateText::Text(s) => parse_rate(s)?,
            RateText::Number(n) => parse_rate(&n.to_string())?,
        };
        Ok(pct)
    }
}

impl From<&str> for RateText {
    fn from(s: &str) -> Self {
        RateText::Text(s.to_string())
    }
}

/// Meeting schedule: either date → rate text, or explicit percent changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeetingsInput {
    ByDate(BTreeMap<String, Option<RateText>>),
    List(Vec<MeetingEntry>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingEntry {
    pub date: String,
    #[serde(default)]
    pub change_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputeRequest {
    /// Starting effective rate. Absent uses the configured rate; an explicit
    /// `null` parses as zero like any other missing rate text.
    #[serde(default, deserialize_with = "present")]
    pub effr: Option<Option<RateText>>,
    #[serde(default)]
    pub meetings: Option<MeetingsInput>,
    /// Month-end turn
    #[serde(default)]
    pub me: Option<RateText>,
    /// Quarter-end turn
    #[serde(default)]
    pub qe: Option<RateText>,
    /// Year-end turn
    #[serde(default)]
    pub ye: Option<RateText>,
    /// Target year; defaults to the configured year
    #[serde(default)]
    pub year: Option<i32>,
    /// Case name, used when saving
    #[serde(default)]
    pub name: Option<String>,
}

impl ComputeRequest {
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Resolve text inputs into a simulator run
    pub fn to_input(&self, config: &AppConfig) -> Result<SimulationInput> {
        let base_rate_pct = match &self.effr {
            Some(rate) => parse_optional(rate)?,
            None => parse_rate(&config.default_base_rate)?,
        };

        Ok(SimulationInput {
            base_rate_pct,
            events: self.events()?,
            adjustments: AdjustmentMagnitudes::new(
                parse_optional(&self.me)?,
                parse_optional(&self.qe)?,
                parse_optional(&self.ye)?,
            ),
            year: self.year.unwrap_or(config.year),
        })
    }

    fn events(&self) -> Result<Vec<RateEvent>> {
        match &self.meetings {
            None => Ok(Vec::new()),
            Some(MeetingsInput::ByDate(map)) => map
                .iter()
                .map(|(date, raw)| -> Result<RateEvent> {
                    let change = match raw {
                        Some(rate) => rate.parse()?,
                        None => 0.0,
                    };
                    Ok(RateEvent::new(parse_date(date)?, change))
                })
                .collect(),
            Some(MeetingsInput::List(items)) => items
                .iter()
                .map(|item| -> Result<RateEvent> {
                    Ok(RateEvent::new(parse_date(&item.date)?, item.change_pct))
                })
                .collect(),
        }
    }
}

/// Marks a field as present even when its value is `null`
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Option<RateText>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<RateText>::deserialize(deserializer).map(Some)
}

fn parse_optional(rate: &Option<RateText>) -> Result<f64> {
    rate.as_ref().map_or(Ok(0.0), RateText::parse)
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| OutrightError::InvalidDate(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use serde_json::json;

    fn config() -> AppConfig {
        AppConfig::default()
    }

    #[test]
    fn test_meetings_by_date_use_rate_text() {
        let request = ComputeRequest::from_value(json!({
            "effr": "5.25%",
            "meetings": {"2026-03-18": "-25", "2026-01-28": "-25bps", "2026-04-29": "", "2026-06-17": null},
            "me": "2",
            "qe": "5bps",
            "ye": 10
        }))
        .unwrap();

        let input = request.to_input(&config()).unwrap();
        assert_eq!(input.base_rate_pct, 5.25);
        assert_eq!(input.year, 2026);
        assert_eq!(input.events.len(), 4);
        assert_eq!(input.events[0].effective_date, NaiveDate::from_ymd_opt(2026, 1, 28).unwrap());
        assert_abs_diff_eq!(input.events[0].change, -0.25);
        assert_abs_diff_eq!(input.events[1].change, -0.25);
        assert_eq!(input.events[2].change, 0.0);
        assert_eq!(input.events[3].change, 0.0);
        assert_abs_diff_eq!(input.adjustments.month_end_pts, 0.02);
        assert_abs_diff_eq!(input.adjustments.quarter_end_pts, 0.05);
        assert_abs_diff_eq!(input.adjustments.year_end_pts, 0.10);
    }

    #[test]
    fn test_meeting_list_takes_percent_verbatim() {
        let request = ComputeRequest::from_value(json!({
            "effr": "525bps",
            "meetings": [{"date": "2026-01-28", "change_pct": -0.25}, {"date": "2026-03-18"}]
        }))
        .unwrap();

        let input = request.to_input(&config()).unwrap();
        assert_eq!(input.base_rate_pct, 5.25);
        assert_eq!(input.events[0].change, -0.25);
        assert_eq!(input.events[1].change, 0.0);
        assert_eq!(input.adjustments, AdjustmentMagnitudes::default());
    }

    #[test]
    fn test_missing_effr_uses_configured_default() {
        let input = ComputeRequest::default().to_input(&config()).unwrap();
        assert_eq!(input.base_rate_pct, 5.25);
        assert!(input.events.is_empty());
    }

    #[test]
    fn test_null_effr_is_zero_but_absent_effr_is_default() {
        let null = ComputeRequest::from_value(json!({"effr": null})).unwrap();
        assert_eq!(null.effr, Some(None));
        assert_eq!(null.to_input(&config()).unwrap().base_rate_pct, 0.0);

        let absent = ComputeRequest::from_value(json!({})).unwrap();
        assert_eq!(absent.effr, None);
        assert_eq!(absent.to_input(&config()).unwrap().base_rate_pct, 5.25);
    }

    #[test]
    fn test_request_year_overrides_config() {
        let request = ComputeRequest::from_value(json!({"effr": "5%", "year": 2028})).unwrap();
        assert_eq!(request.to_input(&config()).unwrap().year, 2028);
        assert_eq!(request.to_input(&config().with_year(2030)).unwrap().year, 2028);

        let unset = ComputeRequest::from_value(json!({"effr": "5%"})).unwrap();
        assert_eq!(unset.to_input(&config().with_year(2030)).unwrap().year, 2030);
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let request = ComputeRequest::from_value(json!({"meetings": {"2026-02-30": "25"}})).unwrap();
        match request.to_input(&config()) {
            Err(OutrightError::InvalidDate(d)) => assert_eq!(d, "2026-02-30"),
            other => panic!("expected InvalidDate, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_rate_text_is_rejected() {
        let request = ComputeRequest::from_value(json!({"effr": "abc"})).unwrap();
        let err = request.to_input(&config()).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Invalid numeric value: abc");
    }
}
