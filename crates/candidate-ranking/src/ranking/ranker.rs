use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::domain::{CandidateIdentity, RankingResult, ScoredCandidate};

/// How candidates with equal scores are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Lower candidate id first.
    #[default]
    CandidateId,
    /// Keep the order the application source returned.
    InputOrder,
}

impl TieBreak {
    pub const fn label(self) -> &'static str {
        match self {
            TieBreak::CandidateId => "candidate_id",
            TieBreak::InputOrder => "input_order",
        }
    }

    fn compare(self, left: &ScoredCandidate, right: &ScoredCandidate) -> Ordering {
        match self {
            TieBreak::CandidateId => left.candidate.id.cmp(&right.candidate.id),
            TieBreak::InputOrder => Ordering::Equal,
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "candidate_id" | "candidate-id" | "id" => Ok(TieBreak::CandidateId),
            "input_order" | "input-order" | "input" | "stable" => Ok(TieBreak::InputOrder),
            other => Err(format!("unknown tie-break '{other}'")),
        }
    }
}

/// Orders scored candidates best-first and assigns dense 1-based ranks.
///
/// The sort is stable, so candidates the tie-break considers equal keep their input order.
pub fn rank(scored: &[ScoredCandidate], tie_break: TieBreak) -> Vec<RankingResult> {
    let mut ordered: Vec<&ScoredCandidate> = scored.iter().collect();
    ordered.sort_by(|left, right| {
        right
            .average_score
            .total_cmp(&left.average_score)
            .then_with(|| tie_break.compare(left, right))
    });

    ordered
        .into_iter()
        .enumerate()
        .map(|(position, candidate)| RankingResult {
            candidate_id: candidate.candidate.id,
            candidate_name: candidate.candidate.display_name(),
            average_score: candidate.average_score,
            rank: position as u32 + 1,
        })
        .collect()
}

/// Result for a job without requirements: input order, zero score, rank 0 for everyone.
pub fn unranked<'a, I>(candidates: I) -> Vec<RankingResult>
where
    I: IntoIterator<Item = &'a CandidateIdentity>,
{
    candidates
        .into_iter()
        .map(|candidate| RankingResult {
            candidate_id: candidate.id,
            candidate_name: candidate.display_name(),
            average_score: 0.0,
            rank: 0,
        })
        .collect()
}
