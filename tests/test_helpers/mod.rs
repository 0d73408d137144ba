//! Shared clock and calendar helpers for integration tests.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parses an ISO date (`2024-01-09`) as midnight UTC.
///
/// # Errors
///
/// Returns an error when the date is malformed.
pub fn parse_midnight(date: &str) -> Result<DateTime<Utc>, eyre::Report> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|err| eyre::eyre!("invalid date {date}: {err}"))?;
    let midnight = parsed
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| eyre::eyre!("invalid midnight for {date}"))?;
    Ok(Utc.from_utc_datetime(&midnight))
}
