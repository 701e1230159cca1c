mod levels;
mod rules;

pub use levels::{education_rank, language_rank, EDUCATION_LEVELS, LANGUAGE_LEVELS};

use tracing::{debug, warn};

use super::catalog::{Criteria, CriteriaError, RequirementKind, RequirementSet};
use super::domain::CandidateProfile;

/// Why a single (candidate, requirement) pair fell back to a zero score.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    #[error("candidate profile has no `{0}` field")]
    MissingField(&'static str),
    #[error("candidate profile field `{field}` is not {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
    #[error("cannot read years of experience from {0:?}")]
    UnreadableExperience(String),
    #[error(transparent)]
    Criteria(#[from] CriteriaError),
    #[error("no scorer for requirement kind {0:?}")]
    UnrecognizedKind(String),
}

/// Contribution of one requirement to a candidate's average, kept for audits.
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionScore {
    pub kind: RequirementKind,
    pub weight: u8,
    pub mandatory: bool,
    pub score: f64,
    pub error: Option<ScoreError>,
}

/// Routes typed criteria to the scorer for their kind; unknown kinds never score.
pub fn score_criteria(criteria: &Criteria, profile: &CandidateProfile) -> Result<f64, ScoreError> {
    match criteria {
        Criteria::Experience(criteria) => rules::experience(profile, criteria),
        Criteria::Skills(criteria) => rules::skills(profile, criteria),
        Criteria::Education(criteria) => rules::education(profile, criteria),
        Criteria::Languages(criteria) => rules::languages(profile, criteria),
        Criteria::Age(criteria) => rules::age(profile, criteria),
        Criteria::Salary(criteria) => rules::salary(profile, criteria),
        Criteria::Location(criteria) => rules::location(profile, criteria),
        Criteria::Availability(criteria) => rules::availability(profile, criteria),
        Criteria::Unrecognized(name) => Err(ScoreError::UnrecognizedKind(name.clone())),
    }
}

struct PlanStep {
    kind: RequirementKind,
    weight: u8,
    mandatory: bool,
    criteria: Result<Criteria, CriteriaError>,
}

/// A job's requirements with criteria decoded once and shared read-only across candidates.
pub struct ScoringPlan {
    steps: Vec<PlanStep>,
}

impl ScoringPlan {
    pub fn new(requirements: &RequirementSet) -> Self {
        let steps = requirements
            .iter()
            .map(|requirement| {
                let criteria = Criteria::decode(&requirement.kind, &requirement.criteria);
                match &criteria {
                    Err(err) => warn!(
                        category = "degraded",
                        kind = %requirement.kind,
                        error = %err,
                        "criteria unreadable; requirement scores zero for every candidate"
                    ),
                    Ok(Criteria::Unrecognized(name)) => warn!(
                        category = "degraded",
                        kind = %name,
                        "unrecognized requirement kind; requirement scores zero for every candidate"
                    ),
                    Ok(_) => {}
                }
                PlanStep {
                    kind: requirement.kind.clone(),
                    weight: requirement.weight,
                    mandatory: requirement.mandatory,
                    criteria,
                }
            })
            .collect();

        Self { steps }
    }

    /// Scores every requirement against `profile`; failures become zero with a reason.
    pub fn evaluate(&self, profile: &CandidateProfile) -> Vec<CriterionScore> {
        self.steps
            .iter()
            .map(|step| {
                let outcome = match &step.criteria {
                    Ok(criteria) => score_criteria(criteria, profile),
                    Err(err) => Err(ScoreError::from(err.clone())),
                };
                let (score, error) = match outcome {
                    Ok(score) => (score, None),
                    Err(error) => {
                        debug!(
                            category = "degraded",
                            kind = %step.kind,
                            reason = %error,
                            "requirement scored zero"
                        );
                        (0.0, Some(error))
                    }
                };
                CriterionScore {
                    kind: step.kind.clone(),
                    weight: step.weight,
                    mandatory: step.mandatory,
                    score,
                    error,
                }
            })
            .collect()
    }
}
