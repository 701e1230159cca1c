//! JSON seed files standing in for the job and application stores.
//!
//! Requirements and profiles are kept in their stored spelling (JSON text) so the ranking
//! path sees exactly what a database-backed source would hand it.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use super::catalog::RequirementFeed;
use super::domain::{CandidateIdentity, JobId};
use super::repository::{ApplicationRecord, JobRecord};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub jobs: Vec<DatasetJob>,
    #[serde(default)]
    pub applications: Vec<DatasetApplication>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetJob {
    pub id: JobId,
    #[serde(default)]
    pub title: String,
    /// Array of requirement records, a JSON string literal, or absent.
    #[serde(default)]
    pub requirements: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetApplication {
    pub job_id: JobId,
    pub candidate: CandidateIdentity,
    /// Stored JSON text or an inline object.
    #[serde(default)]
    pub candidate_profile: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to open dataset {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("dataset lists job {0} more than once")]
    DuplicateJob(JobId),
}

impl Dataset {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let dataset: Dataset = serde_json::from_reader(reader)?;
        dataset.validate()?;
        Ok(dataset)
    }

    fn validate(&self) -> Result<(), DatasetError> {
        let mut seen = HashSet::new();
        for job in &self.jobs {
            if !seen.insert(job.id) {
                return Err(DatasetError::DuplicateJob(job.id));
            }
        }
        Ok(())
    }

    pub fn job_records(&self) -> Vec<JobRecord> {
        self.jobs
            .iter()
            .map(|job| JobRecord {
                id: job.id,
                title: job.title.clone(),
                requirements: RequirementFeed::Json(stored_text(&job.requirements)),
            })
            .collect()
    }

    pub fn application_records(&self) -> Vec<ApplicationRecord> {
        self.applications
            .iter()
            .map(|application| ApplicationRecord {
                job_id: application.job_id,
                candidate: application.candidate.clone(),
                candidate_profile: stored_text(&application.candidate_profile),
            })
            .collect()
    }
}

fn stored_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
