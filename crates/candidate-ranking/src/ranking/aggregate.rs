use super::domain::CandidateProfile;
use super::scoring::{CriterionScore, ScoringPlan};

/// Weighted average and the per-requirement scores behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    pub average: f64,
    pub breakdown: Vec<CriterionScore>,
}

/// Runs one scorer per requirement and folds the results into a weighted average.
pub fn score_candidate(plan: &ScoringPlan, profile: &CandidateProfile) -> CandidateScore {
    let breakdown = plan.evaluate(profile);
    let average = weighted_average(&breakdown);
    CandidateScore { average, breakdown }
}

/// `Σ(score × weight) / Σ(weight)`; `0.0` when there is nothing to weigh.
///
/// `mandatory` is carried on each criterion but never changes the result: a mandatory
/// requirement scored zero dilutes the average like any other.
pub fn weighted_average(breakdown: &[CriterionScore]) -> f64 {
    let total_weight: u32 = breakdown
        .iter()
        .map(|criterion| u32::from(criterion.weight))
        .sum();
    if total_weight == 0 {
        return 0.0;
    }

    let weighted: f64 = breakdown
        .iter()
        .map(|criterion| criterion.score * f64::from(criterion.weight))
        .sum();
    weighted / f64::from(total_weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::catalog::RequirementKind;

    fn criterion(kind: RequirementKind, weight: u8, score: f64) -> CriterionScore {
        CriterionScore {
            kind,
            weight,
            mandatory: false,
            score,
            error: None,
        }
    }

    #[test]
    fn empty_breakdown_averages_to_zero() {
        assert_eq!(weighted_average(&[]), 0.0);
    }

    #[test]
    fn weights_pull_the_average_toward_heavier_requirements() {
        let breakdown = vec![
            criterion(RequirementKind::Skills, 9, 10.0),
            criterion(RequirementKind::Location, 1, 0.0),
        ];
        assert!((weighted_average(&breakdown) - 9.0).abs() < 1e-9);
    }

    #[test]
    fn mandatory_zero_only_dilutes_the_average() {
        let mut mandatory = criterion(RequirementKind::Age, 5, 0.0);
        mandatory.mandatory = true;
        let breakdown = vec![mandatory, criterion(RequirementKind::Salary, 5, 10.0)];
        assert!((weighted_average(&breakdown) - 5.0).abs() < 1e-9);
    }
}
