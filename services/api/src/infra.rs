use candidate_ranking::ranking::{
    ApplicationRecord, ApplicationSource, Dataset, JobId, JobRecord, RequirementSource,
    SourceError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryJobStore {
    records: Arc<Mutex<HashMap<JobId, JobRecord>>>,
}

impl InMemoryJobStore {
    pub(crate) fn insert(&self, record: JobRecord) -> Result<(), SourceError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        guard.insert(record.id, record);
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.records
            .lock()
            .map(|guard| guard.len())
            .unwrap_or_default()
    }
}

impl RequirementSource for InMemoryJobStore {
    fn find_job(&self, job_id: JobId) -> Result<Option<JobRecord>, SourceError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.get(&job_id).cloned())
    }
}

/// Applications grouped per job, kept in submission order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationStore {
    records: Arc<Mutex<HashMap<JobId, Vec<ApplicationRecord>>>>,
}

impl InMemoryApplicationStore {
    pub(crate) fn insert(&self, record: ApplicationRecord) -> Result<(), SourceError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        guard.entry(record.job_id).or_default().push(record);
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.records
            .lock()
            .map(|guard| guard.values().map(Vec::len).sum())
            .unwrap_or_default()
    }
}

impl ApplicationSource for InMemoryApplicationStore {
    fn applications_for_job(&self, job_id: JobId) -> Result<Vec<ApplicationRecord>, SourceError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.get(&job_id).cloned().unwrap_or_default())
    }
}

fn poisoned<T>(_: PoisonError<T>) -> SourceError {
    SourceError::Unavailable("in-memory store lock poisoned".to_string())
}

/// Loads a dataset into fresh stores.
pub(crate) fn seed_stores(
    dataset: &Dataset,
) -> Result<(InMemoryJobStore, InMemoryApplicationStore), SourceError> {
    let jobs = InMemoryJobStore::default();
    for record in dataset.job_records() {
        jobs.insert(record)?;
    }

    let applications = InMemoryApplicationStore::default();
    for record in dataset.application_records() {
        applications.insert(record)?;
    }

    Ok((jobs, applications))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_stores_keep_submission_order_per_job() {
        let raw = r#"{
            "jobs": [{ "id": 3, "title": "Support", "requirements": [] }],
            "applications": [
                { "jobId": 3, "candidate": { "id": 9, "firstName": "Quan", "lastName": "Mac" }, "candidateProfile": {} },
                { "jobId": 4, "candidate": { "id": 8, "firstName": "Phuong", "lastName": "Ta" }, "candidateProfile": {} },
                { "jobId": 3, "candidate": { "id": 2, "firstName": "Son", "lastName": "Lam" }, "candidateProfile": {} }
            ]
        }"#;
        let dataset = Dataset::from_reader(raw.as_bytes()).expect("dataset parses");

        let (jobs, applications) = seed_stores(&dataset).expect("stores seed");

        assert_eq!(jobs.len(), 1);
        assert_eq!(applications.len(), 3);
        let order: Vec<i64> = applications
            .applications_for_job(JobId(3))
            .expect("applications load")
            .iter()
            .map(|record| record.candidate.id.0)
            .collect();
        assert_eq!(order, vec![9, 2]);
        assert!(jobs.find_job(JobId(4)).expect("lookup succeeds").is_none());
    }
}
