use chrono::{DateTime, NaiveDate};

use crate::error::RecommendationError;

/// Parses a join date given as `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_join_date(raw: &str) -> Result<NaiveDate, RecommendationError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|ts| ts.date_naive()))
        .map_err(|_| RecommendationError::InvalidDate(raw.to_string()))
}

/// Whole days between joining and `today`; negative for future join dates
pub fn days_since_joined(join_date: NaiveDate, today: NaiveDate) -> i64 {
    (today - join_date).num_days()
}
