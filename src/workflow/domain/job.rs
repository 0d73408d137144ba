//! Print job aggregate and its classification types.

use super::{JobId, JobNumber, ParseJobStatusError, Stage, WorkflowDomainError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Product category of a job. Immutable once the job is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum JobType {
    /// Folding cartons and boxes.
    Carton,
    /// Stitched or perfect-bound booklets.
    Booklet,
    /// Business cards.
    BusinessCards,
    /// Folded brochures.
    Brochure,
    /// Single-sheet flyers.
    Flyer,
    /// Large-format posters.
    Poster,
    /// Letterheads and stationery.
    Letterhead,
    /// Any product type the catalog does not recognise.
    Other(String),
}

impl JobType {
    /// Parses a job type label, keeping unrecognised labels as
    /// [`JobType::Other`].
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyJobType`] when the label is blank.
    pub fn parse(label: &str) -> Result<Self, WorkflowDomainError> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(WorkflowDomainError::EmptyJobType);
        }
        let normalized: String = trimmed
            .chars()
            .filter(|ch| !matches!(ch, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        let job_type = match normalized.as_str() {
            "carton" | "cartons" => Self::Carton,
            "booklet" | "booklets" => Self::Booklet,
            "businesscard" | "businesscards" => Self::BusinessCards,
            "brochure" | "brochures" => Self::Brochure,
            "flyer" | "flyers" => Self::Flyer,
            "poster" | "posters" => Self::Poster,
            "letterhead" | "letterheads" => Self::Letterhead,
            _ => Self::Other(trimmed.to_owned()),
        };
        Ok(job_type)
    }

    /// Returns the human-facing label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Carton => "Carton",
            Self::Booklet => "Booklet",
            Self::BusinessCards => "Business Cards",
            Self::Brochure => "Brochure",
            Self::Flyer => "Flyer",
            Self::Poster => "Poster",
            Self::Letterhead => "Letterhead",
            Self::Other(label) => label,
        }
    }
}

impl TryFrom<String> for JobType {
    type Error = WorkflowDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<JobType> for String {
    fn from(value: JobType) -> Self {
        match value {
            JobType::Other(label) => label,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job status: the stage the job is currently in, or a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum JobStatus {
    /// The job is being worked on in the given stage.
    InStage(Stage),
    /// The job has been handed to the customer.
    Delivered,
    /// The job is closed.
    Completed,
}

impl JobStatus {
    /// Status assigned to newly created jobs.
    pub const INITIAL: Self = Self::InStage(Stage::PrePress);

    /// Returns `true` for statuses that end the job's lifecycle.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Completed)
    }

    /// Returns the stage the job is in, if it is not terminal.
    #[must_use]
    pub const fn stage(self) -> Option<Stage> {
        match self {
            Self::InStage(stage) => Some(stage),
            Self::Delivered | Self::Completed => None,
        }
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InStage(stage) => stage.as_str(),
            Self::Delivered => "delivered",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for JobStatus {
    type Error = ParseJobStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "delivered" => Ok(Self::Delivered),
            "completed" => Ok(Self::Completed),
            _ => Stage::try_from(value)
                .map(Self::InStage)
                .map_err(|_| ParseJobStatusError(value.to_owned())),
        }
    }
}

impl TryFrom<String> for JobStatus {
    type Error = ParseJobStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<JobStatus> for String {
    fn from(value: JobStatus) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InStage(stage) => write!(f, "{stage}"),
            Self::Delivered => f.write_str("Delivered"),
            Self::Completed => f.write_str("Completed"),
        }
    }
}

/// Validated job parameters supplied when a job is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpecification {
    job_type: JobType,
    quantity: u32,
    delivery_deadline: DateTime<Utc>,
    stage_deadlines: BTreeMap<Stage, DateTime<Utc>>,
}

impl JobSpecification {
    /// Creates a job specification.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::ZeroQuantity`] when `quantity` is zero.
    pub fn new(
        job_type: JobType,
        quantity: u32,
        delivery_deadline: DateTime<Utc>,
    ) -> Result<Self, WorkflowDomainError> {
        if quantity == 0 {
            return Err(WorkflowDomainError::ZeroQuantity);
        }
        Ok(Self {
            job_type,
            quantity,
            delivery_deadline,
            stage_deadlines: BTreeMap::new(),
        })
    }

    /// Sets an explicit deadline for one stage.
    ///
    /// Overrides are not checked against each other or against the delivery
    /// deadline; [`super::StageSchedule::quality_issues`] reports such cases.
    #[must_use]
    pub fn with_stage_deadline(mut self, stage: Stage, deadline: DateTime<Utc>) -> Self {
        self.stage_deadlines.insert(stage, deadline);
        self
    }

    /// Sets explicit deadlines for several stages.
    #[must_use]
    pub fn with_stage_deadlines(
        mut self,
        deadlines: impl IntoIterator<Item = (Stage, DateTime<Utc>)>,
    ) -> Self {
        self.stage_deadlines.extend(deadlines);
        self
    }

    /// Returns the job type.
    #[must_use]
    pub const fn job_type(&self) -> &JobType {
        &self.job_type
    }

    /// Returns the delivery deadline.
    #[must_use]
    pub const fn delivery_deadline(&self) -> DateTime<Utc> {
        self.delivery_deadline
    }

    /// Rejects a delivery deadline that is not strictly after `now`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::DeliveryDeadlineNotInFuture`].
    pub fn ensure_deadline_after(&self, now: DateTime<Utc>) -> Result<(), WorkflowDomainError> {
        if self.delivery_deadline <= now {
            return Err(WorkflowDomainError::DeliveryDeadlineNotInFuture {
                deadline: self.delivery_deadline,
                now,
            });
        }
        Ok(())
    }
}

/// Print job aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    number: JobNumber,
    job_type: JobType,
    quantity: u32,
    status: JobStatus,
    delivery_deadline: DateTime<Utc>,
    stage_deadlines: BTreeMap<Stage, DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedJobData {
    /// Persisted job identifier.
    pub id: JobId,
    /// Persisted display number.
    pub number: JobNumber,
    /// Persisted job type.
    pub job_type: JobType,
    /// Persisted quantity.
    pub quantity: u32,
    /// Persisted status.
    pub status: JobStatus,
    /// Persisted delivery deadline.
    pub delivery_deadline: DateTime<Utc>,
    /// Persisted per-stage deadline overrides.
    pub stage_deadlines: BTreeMap<Stage, DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Creates a new job in the initial stage.
    #[must_use]
    pub fn new(number: JobNumber, specification: JobSpecification, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let JobSpecification {
            job_type,
            quantity,
            delivery_deadline,
            stage_deadlines,
        } = specification;

        Self {
            id: JobId::new(),
            number,
            job_type,
            quantity,
            status: JobStatus::INITIAL,
            delivery_deadline,
            stage_deadlines,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a job from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedJobData) -> Self {
        Self {
            id: data.id,
            number: data.number,
            job_type: data.job_type,
            quantity: data.quantity,
            status: data.status,
            delivery_deadline: data.delivery_deadline,
            stage_deadlines: data.stage_deadlines,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the job identifier.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Returns the display number.
    #[must_use]
    pub const fn number(&self) -> JobNumber {
        self.number
    }

    /// Returns the job type.
    #[must_use]
    pub const fn job_type(&self) -> &JobType {
        &self.job_type
    }

    /// Returns the ordered quantity.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        self.status
    }

    /// Returns the delivery deadline.
    #[must_use]
    pub const fn delivery_deadline(&self) -> DateTime<Utc> {
        self.delivery_deadline
    }

    /// Returns the explicit per-stage deadline overrides.
    #[must_use]
    pub const fn stage_deadlines(&self) -> &BTreeMap<Stage, DateTime<Utc>> {
        &self.stage_deadlines
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the job to a new status.
    pub fn set_status(&mut self, status: JobStatus, clock: &impl Clock) {
        self.status = status;
        self.updated_at = clock.utc();
    }
}
