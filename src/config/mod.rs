//! Runtime configuration for scheduling and risk classification.
//!
//! Every setting has a default, so an empty JSON object is a valid
//! configuration.
//!
//! # Examples
//!
//! ```
//! use printflow::config::PrintflowConfig;
//! use printflow::workflow::domain::StagePolicy;
//!
//! let config = PrintflowConfig::from_json_str(r#"{"scheduling": {"stage_policy": "per_job_type"}}"#)
//!     .expect("valid configuration");
//! assert_eq!(config.scheduling.stage_policy, StagePolicy::PerJobType);
//! assert_eq!(config.risk.at_risk_window_hours, 24);
//! ```

use crate::workflow::domain::StagePolicy;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings governing job creation and task generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Which stages a job passes through.
    pub stage_policy: StagePolicy,
    /// Whether new jobs must have a delivery deadline after their creation
    /// time.
    pub require_future_deadline: bool,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            stage_policy: StagePolicy::FullSequence,
            require_future_deadline: true,
        }
    }
}

impl SchedulingConfig {
    /// Per-job-type stage subsets instead of the full sequence.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            stage_policy: StagePolicy::PerJobType,
            ..Default::default()
        }
    }

    /// Accepts delivery deadlines in the past, e.g. when back-filling
    /// historical jobs.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            require_future_deadline: false,
            ..Default::default()
        }
    }
}

/// Thresholds used to classify jobs and tasks as at risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    /// A deadline this many hours away or closer counts as at risk.
    pub at_risk_window_hours: u32,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            at_risk_window_hours: 24,
        }
    }
}

impl RiskPolicy {
    /// Returns the at-risk window as a duration.
    #[must_use]
    pub fn at_risk_window(self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.at_risk_window_hours))
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintflowConfig {
    /// Job creation and task generation settings.
    pub scheduling: SchedulingConfig,
    /// Risk classification settings.
    pub risk: RiskPolicy,
}

impl PrintflowConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is not valid JSON or
    /// contains unknown enum values.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
