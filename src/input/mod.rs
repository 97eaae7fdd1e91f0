//! Caller input: rate text notation and compute requests

mod rate_text;
mod request;

pub use rate_text::parse_rate;
pub use request::{ComputeRequest, MeetingEntry, MeetingsInput, RateText, parse_date};
