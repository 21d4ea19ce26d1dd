//! Recency classification of inspection-due dates

use chrono::{Duration, Local, NaiveDate};
use fleetsheet_types::{Error, Result};

use crate::model::fields::parse_date;
use crate::model::RecencyBand;

const RECENT_DAYS: i64 = 90;
const AGING_DAYS: i64 = 365;

/// Classify a date relative to `today`. First matching band wins and both
/// boundaries are inclusive.
pub fn classify_date(date: NaiveDate, today: NaiveDate) -> RecencyBand {
    if date >= today - Duration::days(RECENT_DAYS) {
        RecencyBand::Recent
    } else if date >= today - Duration::days(AGING_DAYS) {
        RecencyBand::Aging
    } else {
        RecencyBand::Stale
    }
}

/// Parse an ISO date string and classify it relative to `today`
pub fn classify_at(date: &str, today: NaiveDate) -> Result<RecencyBand> {
    let parsed = parse_date(date)
        .map_err(|_| Error::Format(format!("'{}' is not a valid calendar date", date)))?;
    Ok(classify_date(parsed, today))
}

/// Classify against the local wall-clock date
pub fn classify(date: &str) -> Result<RecencyBand> {
    classify_at(date, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn days_ago(days: i64) -> String {
        (today() - Duration::days(days)).format("%Y-%m-%d").to_string()
    }

    #[test]
    fn test_today_is_recent() {
        assert_eq!(classify_at(&days_ago(0), today()).unwrap(), RecencyBand::Recent);
    }

    #[test]
    fn test_recent_boundary_inclusive() {
        assert_eq!(classify_at(&days_ago(89), today()).unwrap(), RecencyBand::Recent);
        assert_eq!(classify_at(&days_ago(90), today()).unwrap(), RecencyBand::Recent);
        assert_eq!(classify_at(&days_ago(91), today()).unwrap(), RecencyBand::Aging);
    }

    #[test]
    fn test_aging_and_stale() {
        assert_eq!(classify_at(&days_ago(365), today()).unwrap(), RecencyBand::Aging);
        assert_eq!(classify_at(&days_ago(366), today()).unwrap(), RecencyBand::Stale);
    }

    #[test]
    fn test_future_date_is_recent() {
        assert_eq!(classify_at("2027-06-01", today()).unwrap(), RecencyBand::Recent);
    }

    #[test]
    fn test_invalid_date_is_format_error() {
        assert!(matches!(classify_at("2024-02-30", today()), Err(Error::Format(_))));
        assert!(matches!(classify_at("soon", today()), Err(Error::Format(_))));
    }

    #[test]
    fn test_band_colors() {
        assert_eq!(RecencyBand::Recent.color(), "007500");
        assert_eq!(RecencyBand::Aging.color(), "FFA500");
        assert_eq!(RecencyBand::Stale.color(), "b30000");
    }
}
