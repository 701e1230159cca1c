use serde::{Deserialize, Serialize};

use super::catalog::RequirementFeed;
use super::domain::{CandidateIdentity, CandidateProfile, JobId, ProfileError};

/// Job posting as exposed by the requirement source.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub id: JobId,
    pub title: String,
    pub requirements: RequirementFeed,
}

/// Application as exposed by the application source; the profile is the stored JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub job_id: JobId,
    pub candidate: CandidateIdentity,
    pub candidate_profile: Option<String>,
}

impl ApplicationRecord {
    pub fn profile(&self) -> Result<CandidateProfile, ProfileError> {
        let raw = self
            .candidate_profile
            .as_deref()
            .ok_or(ProfileError::Missing)?;
        CandidateProfile::parse(raw)
    }
}

/// Read-only access to jobs and their requirement lists.
pub trait RequirementSource: Send + Sync {
    fn find_job(&self, job_id: JobId) -> Result<Option<JobRecord>, SourceError>;
}

/// Read-only access to the applications submitted to a job.
pub trait ApplicationSource: Send + Sync {
    fn applications_for_job(&self, job_id: JobId)
        -> Result<Vec<ApplicationRecord>, SourceError>;
}

/// Error enumeration for collaborator feed failures.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),
}
