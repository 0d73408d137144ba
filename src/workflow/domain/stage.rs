//! Production stages and the catalog that maps job types to stage sequences.

use super::{JobType, ParseStageError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step in the fixed production sequence.
///
/// Variants are declared in process order, so the derived [`Ord`] is the
/// production order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Artwork preparation, proofing and plate making.
    PrePress,
    /// Press run.
    Printing,
    /// Trimming printed sheets to size.
    Cutting,
    /// Folding sheets into their final layout.
    Folding,
    /// Stitching, gluing or otherwise binding.
    Binding,
    /// Quality control inspection.
    QualityControl,
    /// Packing finished goods.
    Packaging,
    /// Handing the job over for delivery.
    Dispatch,
}

/// The full production sequence in process order.
const ALL_STAGES: [Stage; 8] = [
    Stage::PrePress,
    Stage::Printing,
    Stage::Cutting,
    Stage::Folding,
    Stage::Binding,
    Stage::QualityControl,
    Stage::Packaging,
    Stage::Dispatch,
];

const CARTON_STAGES: [Stage; 7] = [
    Stage::PrePress,
    Stage::Printing,
    Stage::Cutting,
    Stage::Folding,
    Stage::QualityControl,
    Stage::Packaging,
    Stage::Dispatch,
];

const FLAT_SHEET_STAGES: [Stage; 6] = [
    Stage::PrePress,
    Stage::Printing,
    Stage::Cutting,
    Stage::QualityControl,
    Stage::Packaging,
    Stage::Dispatch,
];

const LEAFLET_STAGES: [Stage; 7] = [
    Stage::PrePress,
    Stage::Printing,
    Stage::Cutting,
    Stage::Folding,
    Stage::QualityControl,
    Stage::Packaging,
    Stage::Dispatch,
];

const POSTER_STAGES: [Stage; 5] = [
    Stage::PrePress,
    Stage::Printing,
    Stage::QualityControl,
    Stage::Packaging,
    Stage::Dispatch,
];

impl Stage {
    /// Returns every stage in production order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &ALL_STAGES
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PrePress => "pre_press",
            Self::Printing => "printing",
            Self::Cutting => "cutting",
            Self::Folding => "folding",
            Self::Binding => "binding",
            Self::QualityControl => "quality_control",
            Self::Packaging => "packaging",
            Self::Dispatch => "dispatch",
        }
    }

    /// Returns the human-facing stage name, which is also the name of the
    /// department that performs the stage.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::PrePress => "Pre-Press",
            Self::Printing => "Printing",
            Self::Cutting => "Cutting",
            Self::Folding => "Folding",
            Self::Binding => "Binding",
            Self::QualityControl => "Quality Control",
            Self::Packaging => "Packaging",
            Self::Dispatch => "Dispatch",
        }
    }
}

impl TryFrom<&str> for Stage {
    type Error = ParseStageError;

    /// Parses storage names as well as the display names used for
    /// departments (`"Pre-Press"`, `"QC"`, `"quality control"`, ...).
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "prepress" => Ok(Self::PrePress),
            "printing" => Ok(Self::Printing),
            "cutting" => Ok(Self::Cutting),
            "folding" => Ok(Self::Folding),
            "binding" => Ok(Self::Binding),
            "qualitycontrol" | "qc" => Ok(Self::QualityControl),
            "packaging" => Ok(Self::Packaging),
            "dispatch" => Ok(Self::Dispatch),
            _ => Err(ParseStageError(value.to_owned())),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Rule selecting which stages a job passes through.
///
/// The catalog is static; the policy only decides whether the job type
/// narrows the sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagePolicy {
    /// Every job type receives the full eight-stage sequence.
    #[default]
    FullSequence,
    /// Legacy behaviour: each job type receives its own subset of stages.
    PerJobType,
}

impl StagePolicy {
    /// Returns the ordered stages a job of `job_type` passes through.
    ///
    /// Unrecognised job types always fall back to the full sequence.
    #[must_use]
    pub fn stages_for(self, job_type: &JobType) -> &'static [Stage] {
        match self {
            Self::FullSequence => Stage::all(),
            Self::PerJobType => legacy_stages_for(job_type),
        }
    }
}

fn legacy_stages_for(job_type: &JobType) -> &'static [Stage] {
    match job_type {
        JobType::Carton => &CARTON_STAGES,
        JobType::BusinessCards | JobType::Letterhead => &FLAT_SHEET_STAGES,
        JobType::Flyer | JobType::Brochure => &LEAFLET_STAGES,
        JobType::Poster => &POSTER_STAGES,
        JobType::Booklet | JobType::Other(_) => Stage::all(),
    }
}
