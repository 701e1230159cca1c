use std::sync::Arc;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::aggregate::score_candidate;
use super::catalog::RequirementSet;
use super::config::RankingConfig;
use super::domain::{
    JobId, RankingEntry, RankingResult, ScoredCandidate, SkippedCandidate,
};
use super::ranker;
use super::repository::{ApplicationRecord, ApplicationSource, RequirementSource, SourceError};
use super::scoring::ScoringPlan;

/// Service composing the two collaborator feeds with the scoring plan and ranker.
pub struct CandidateRankingService<J, A> {
    jobs: Arc<J>,
    applications: Arc<A>,
    config: RankingConfig,
    pool: Option<ThreadPool>,
}

impl<J, A> CandidateRankingService<J, A>
where
    J: RequirementSource + 'static,
    A: ApplicationSource + 'static,
{
    pub fn new(jobs: Arc<J>, applications: Arc<A>, config: RankingConfig) -> Self {
        let pool = build_pool(&config);
        Self {
            jobs,
            applications,
            config,
            pool,
        }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Rank every applicant of `job_id` against the job's requirements.
    pub fn rank_candidates(&self, job_id: JobId) -> Result<RankingOutcome, RankingError> {
        let applications = self.applications.applications_for_job(job_id)?;
        if applications.is_empty() {
            debug!(%job_id, "no applications to rank");
            return Ok(RankingOutcome::empty(job_id));
        }

        let job = self.jobs.find_job(job_id)?.ok_or_else(|| {
            error!(category = "fatal", %job_id, "job not found while ranking candidates");
            RankingError::JobNotFound(job_id)
        })?;

        let requirements = RequirementSet::from_feed(&job.requirements);
        if requirements.is_empty() {
            info!(
                %job_id,
                applications = applications.len(),
                "job has no requirements; returning applicants unranked"
            );
            let results =
                ranker::unranked(applications.iter().map(|application| &application.candidate));
            return Ok(RankingOutcome {
                job_id,
                results,
                entries: Vec::new(),
            });
        }

        let plan = ScoringPlan::new(&requirements);
        let entries = self.score_applications(&plan, &applications);

        let scored: Vec<ScoredCandidate> = entries
            .iter()
            .filter_map(|entry| match entry {
                RankingEntry::Scored(scored) => Some(scored.clone()),
                RankingEntry::Skipped(_) => None,
            })
            .collect();
        let results = ranker::rank(&scored, self.config.tie_break);

        let outcome = RankingOutcome {
            job_id,
            results,
            entries,
        };
        info!(
            %job_id,
            requirements = requirements.len(),
            total_weight = requirements.total_weight(),
            ranked = outcome.results.len(),
            skipped = outcome.skipped().count(),
            degraded = outcome.degraded_evaluations(),
            "ranked candidates"
        );
        Ok(outcome)
    }

    fn score_applications(
        &self,
        plan: &ScoringPlan,
        applications: &[ApplicationRecord],
    ) -> Vec<RankingEntry> {
        match &self.pool {
            Some(pool) if applications.len() >= self.config.parallel_threshold => {
                pool.install(|| {
                    applications
                        .par_iter()
                        .map(|application| evaluate_application(plan, application))
                        .collect()
                })
            }
            _ => applications
                .iter()
                .map(|application| evaluate_application(plan, application))
                .collect(),
        }
    }
}

fn build_pool(config: &RankingConfig) -> Option<ThreadPool> {
    if config.worker_threads <= 1 {
        return None;
    }

    match ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .thread_name(|index| format!("ranking-worker-{index}"))
        .build()
    {
        Ok(pool) => Some(pool),
        Err(err) => {
            warn!(
                error = %err,
                workers = config.worker_threads,
                "failed to start ranking worker pool; scoring sequentially"
            );
            None
        }
    }
}

fn evaluate_application(plan: &ScoringPlan, application: &ApplicationRecord) -> RankingEntry {
    let candidate = &application.candidate;
    match application.profile() {
        Ok(profile) => {
            let score = score_candidate(plan, &profile);
            RankingEntry::Scored(ScoredCandidate {
                candidate: candidate.clone(),
                average_score: score.average,
                breakdown: score.breakdown,
            })
        }
        Err(err) => {
            warn!(
                category = "excluded",
                candidate_id = %candidate.id,
                reason = %err,
                "candidate profile unreadable; excluding from ranking"
            );
            RankingEntry::Skipped(SkippedCandidate {
                candidate_id: candidate.id,
                candidate_name: candidate.display_name(),
                reason: err.to_string(),
            })
        }
    }
}

/// Everything one ranking call produced: the ordered results plus the per-application trail.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingOutcome {
    pub job_id: JobId,
    pub results: Vec<RankingResult>,
    /// Scoring entries in application-source order; empty when the job has no requirements.
    pub entries: Vec<RankingEntry>,
}

impl RankingOutcome {
    pub fn empty(job_id: JobId) -> Self {
        Self {
            job_id,
            results: Vec::new(),
            entries: Vec::new(),
        }
    }

    pub fn scored(&self) -> impl Iterator<Item = &ScoredCandidate> {
        self.entries.iter().filter_map(|entry| match entry {
            RankingEntry::Scored(scored) => Some(scored),
            RankingEntry::Skipped(_) => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = &SkippedCandidate> {
        self.entries.iter().filter_map(|entry| match entry {
            RankingEntry::Skipped(skipped) => Some(skipped),
            RankingEntry::Scored(_) => None,
        })
    }

    /// Count of (candidate, requirement) pairs that fell back to zero.
    pub fn degraded_evaluations(&self) -> usize {
        self.scored()
            .map(ScoredCandidate::degraded_evaluations)
            .sum()
    }

    pub fn into_results(self) -> Vec<RankingResult> {
        self.results
    }

    pub fn report(&self) -> RankingReport {
        RankingReport {
            job_id: self.job_id,
            generated_at: Utc::now(),
            results: self.results.clone(),
            skipped: self.skipped().cloned().collect(),
            degraded_evaluations: self.degraded_evaluations(),
        }
    }
}

/// Audit view of a ranking call, including the candidates that were left out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingReport {
    pub job_id: JobId,
    pub generated_at: DateTime<Utc>,
    pub results: Vec<RankingResult>,
    pub skipped: Vec<SkippedCandidate>,
    pub degraded_evaluations: usize,
}

/// Error raised by the ranking service.
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    #[error("job {0} not found")]
    JobNotFound(JobId),
    #[error(transparent)]
    Source(#[from] SourceError),
}
