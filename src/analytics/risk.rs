//! Deadline risk classification.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Deadline standing of a job or task at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Past its deadline and not finished.
    Overdue,
    /// Due within the at-risk window and not finished.
    AtRisk,
    /// Finished, or comfortably ahead of its deadline.
    OnTrack,
}

impl RiskLevel {
    /// Returns `true` for [`RiskLevel::Overdue`].
    #[must_use]
    pub const fn is_overdue(self) -> bool {
        matches!(self, Self::Overdue)
    }

    /// Returns `true` for [`RiskLevel::AtRisk`].
    #[must_use]
    pub const fn is_at_risk(self) -> bool {
        matches!(self, Self::AtRisk)
    }

    /// Returns `true` for overdue and at-risk items.
    #[must_use]
    pub const fn needs_attention(self) -> bool {
        !matches!(self, Self::OnTrack)
    }
}

/// Classifies a deadline.
///
/// Terminal items are always on track. Otherwise a deadline strictly before
/// `now` is overdue, and one no further than `window` ahead is at risk.
/// Overdue takes precedence over at risk.
#[must_use]
pub fn classify(
    deadline: DateTime<Utc>,
    is_terminal: bool,
    now: DateTime<Utc>,
    window: TimeDelta,
) -> RiskLevel {
    if is_terminal {
        return RiskLevel::OnTrack;
    }
    if deadline < now {
        return RiskLevel::Overdue;
    }
    if deadline - now <= window {
        return RiskLevel::AtRisk;
    }
    RiskLevel::OnTrack
}

/// Rounds `part / whole * 100` to the nearest integer, halves rounding up.
///
/// Returns 0 when `whole` is 0.
#[must_use]
pub fn percentage(part: usize, whole: usize) -> u8 {
    let scaled = part.saturating_mul(200).saturating_add(whole);
    let rounded = scaled.checked_div(whole.saturating_mul(2)).unwrap_or(0);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}
