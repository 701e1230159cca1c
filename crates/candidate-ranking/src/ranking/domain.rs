use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::scoring::CriterionScore;

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub i64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for the user behind an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub i64);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who applied, as exposed by the application feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateIdentity {
    pub id: CandidateId,
    pub first_name: String,
    pub last_name: String,
}

impl CandidateIdentity {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Why a stored profile payload could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("candidate profile is missing")]
    Missing,
    #[error("candidate profile is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Self-reported attributes submitted with an application.
///
/// The payload is kept as loosely-typed JSON; each scorer pulls out the
/// fields it needs and treats a missing or mistyped field as its own failure.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateProfile(Value);

impl CandidateProfile {
    pub fn parse(raw: &str) -> Result<Self, ProfileError> {
        let value = serde_json::from_str(raw)?;
        Ok(Self(value))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Field lookup; JSON `null` counts as absent.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|value| !value.is_null())
    }
}

/// One entry of the ranked output; the only shape that crosses the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingResult {
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub average_score: f64,
    pub rank: u32,
}

/// Candidate that made it through profile parsing, with its score trail.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: CandidateIdentity,
    pub average_score: f64,
    pub breakdown: Vec<CriterionScore>,
}

impl ScoredCandidate {
    /// Requirement evaluations that fell back to a zero score.
    pub fn degraded_evaluations(&self) -> usize {
        self.breakdown
            .iter()
            .filter(|criterion| criterion.error.is_some())
            .count()
    }
}

/// Candidate dropped from the ranking because its profile was unusable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedCandidate {
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub reason: String,
}

/// Per-application result of the scoring pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RankingEntry {
    Scored(ScoredCandidate),
    Skipped(SkippedCandidate),
}
