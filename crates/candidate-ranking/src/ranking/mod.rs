//! Candidate ranking for a single job posting.
//!
//! Requirements are read from the job, every application's stored profile is scored against
//! them, the per-requirement scores are folded into a weighted average and the candidates are
//! ordered best first. Failures are contained at the smallest scope that makes sense: a broken
//! requirement scores zero, a broken profile drops only that candidate, and only a missing job
//! or an unavailable source fails the whole call.

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod domain;
pub(crate) mod lenient;
pub mod ranker;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use aggregate::{score_candidate, weighted_average, CandidateScore};
pub use catalog::{
    Criteria, CriteriaError, Requirement, RequirementFeed, RequirementKind, RequirementSet,
};
pub use config::RankingConfig;
pub use dataset::{Dataset, DatasetError};
pub use domain::{
    CandidateId, CandidateIdentity, CandidateProfile, JobId, ProfileError, RankingEntry,
    RankingResult, ScoredCandidate, SkippedCandidate,
};
pub use ranker::TieBreak;
pub use repository::{
    ApplicationRecord, ApplicationSource, JobRecord, RequirementSource, SourceError,
};
pub use router::ranking_router;
pub use scoring::{CriterionScore, ScoreError, ScoringPlan};
pub use service::{CandidateRankingService, RankingError, RankingOutcome, RankingReport};
