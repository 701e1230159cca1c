use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::ranking::catalog::{Requirement, RequirementFeed, RequirementKind};
use crate::ranking::domain::{CandidateId, CandidateIdentity, CandidateProfile, JobId};
use crate::ranking::repository::{
    ApplicationRecord, ApplicationSource, JobRecord, RequirementSource, SourceError,
};
use crate::ranking::{CandidateRankingService, RankingConfig};

pub(super) const JOB: JobId = JobId(42);

pub(super) fn candidate(id: i64, first_name: &str, last_name: &str) -> CandidateIdentity {
    CandidateIdentity {
        id: CandidateId(id),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    }
}

pub(super) fn profile(value: Value) -> CandidateProfile {
    CandidateProfile::from_value(value)
}

pub(super) fn application(candidate: CandidateIdentity, profile: Value) -> ApplicationRecord {
    ApplicationRecord {
        job_id: JOB,
        candidate,
        candidate_profile: Some(profile.to_string()),
    }
}

pub(super) fn raw_application(candidate: CandidateIdentity, raw: Option<&str>) -> ApplicationRecord {
    ApplicationRecord {
        job_id: JOB,
        candidate,
        candidate_profile: raw.map(str::to_string),
    }
}

pub(super) fn job(requirements: Vec<Requirement>) -> JobRecord {
    JobRecord {
        id: JOB,
        title: "Backend Engineer".to_string(),
        requirements: RequirementFeed::Records(requirements),
    }
}

/// EXPERIENCE >= 4 years and SKILLS [Java, SQL], both weight 10.
pub(super) fn backend_requirements() -> Vec<Requirement> {
    vec![
        Requirement::new(
            RequirementKind::Experience,
            10,
            json!({ "minExperience": "4" }),
        ),
        Requirement::new(
            RequirementKind::Skills,
            10,
            json!({ "skills": ["Java", "SQL"] }),
        ),
    ]
}

pub(super) fn strong_applicant() -> ApplicationRecord {
    application(
        candidate(1, "An", "Nguyen"),
        json!({ "experience": "5", "skills": ["Java", "SQL"] }),
    )
}

pub(super) fn partial_applicant() -> ApplicationRecord {
    application(
        candidate(2, "Binh", "Tran"),
        json!({ "experience": "2", "skills": ["Java"] }),
    )
}

pub(super) fn sequential_config() -> RankingConfig {
    RankingConfig::sequential()
}

pub(super) fn build_service(
    job: JobRecord,
    applications: Vec<ApplicationRecord>,
    config: RankingConfig,
) -> CandidateRankingService<MemoryJobs, MemoryApplications> {
    let jobs = Arc::new(MemoryJobs::default());
    jobs.insert(job);
    let store = Arc::new(MemoryApplications::default());
    for record in applications {
        store.insert(record);
    }
    CandidateRankingService::new(jobs, store, config)
}

#[derive(Default, Clone)]
pub(super) struct MemoryJobs {
    records: Arc<Mutex<HashMap<JobId, JobRecord>>>,
}

impl MemoryJobs {
    pub(super) fn insert(&self, record: JobRecord) {
        self.records
            .lock()
            .expect("job mutex poisoned")
            .insert(record.id, record);
    }
}

impl RequirementSource for MemoryJobs {
    fn find_job(&self, job_id: JobId) -> Result<Option<JobRecord>, SourceError> {
        let guard = self.records.lock().expect("job mutex poisoned");
        Ok(guard.get(&job_id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryApplications {
    records: Arc<Mutex<HashMap<JobId, Vec<ApplicationRecord>>>>,
}

impl MemoryApplications {
    pub(super) fn insert(&self, record: ApplicationRecord) {
        self.records
            .lock()
            .expect("application mutex poisoned")
            .entry(record.job_id)
            .or_default()
            .push(record);
    }
}

impl ApplicationSource for MemoryApplications {
    fn applications_for_job(&self, job_id: JobId) -> Result<Vec<ApplicationRecord>, SourceError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard.get(&job_id).cloned().unwrap_or_default())
    }
}

pub(super) struct UnavailableSource;

impl RequirementSource for UnavailableSource {
    fn find_job(&self, _job_id: JobId) -> Result<Option<JobRecord>, SourceError> {
        Err(SourceError::Unavailable("database offline".to_string()))
    }
}

impl ApplicationSource for UnavailableSource {
    fn applications_for_job(
        &self,
        _job_id: JobId,
    ) -> Result<Vec<ApplicationRecord>, SourceError> {
        Err(SourceError::Unavailable("database offline".to_string()))
    }
}

/// Holds every request long enough to trip a short deadline.
pub(super) struct SlowApplications {
    pub(super) inner: MemoryApplications,
    pub(super) delay: std::time::Duration,
}

impl ApplicationSource for SlowApplications {
    fn applications_for_job(&self, job_id: JobId) -> Result<Vec<ApplicationRecord>, SourceError> {
        std::thread::sleep(self.delay);
        self.inner.applications_for_job(job_id)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
