use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::listings::domain::{
    Job, JobCategory, JobCategoryId, JobId, JobStatus, JobType, JobTypeId, NewJob,
};
use crate::listings::repository::{
    JobNotification, JobRepository, NotificationError, NotificationPublisher, RepositoryError,
};
use crate::listings::service::{JobBoardService, WorkflowSettings};

pub(super) fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn memphis_job() -> NewJob {
    NewJob::draft("Backend Engineer", "Beale Street Labs", "Memphis", Some("TN"), "USA")
}

pub(super) fn stored_job(id: u64, status: JobStatus, minutes_after: i64) -> Job {
    let created = reference_now() + Duration::minutes(minutes_after);
    Job::from_new(JobId(id), created, memphis_job().with_status(status))
}

pub(super) fn build_service() -> (
    JobBoardService<MemoryRepository, MemoryOutbox>,
    Arc<MemoryRepository>,
    Arc<MemoryOutbox>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let outbox = Arc::new(MemoryOutbox::default());
    let service =
        JobBoardService::new(repository.clone(), outbox.clone(), WorkflowSettings::default());
    (service, repository, outbox)
}

#[derive(Default)]
struct Tables {
    jobs: BTreeMap<JobId, Job>,
    job_types: BTreeMap<JobTypeId, JobType>,
    categories: BTreeMap<JobCategoryId, JobCategory>,
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl JobRepository for MemoryRepository {
    fn insert(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        if guard.jobs.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    fn update(&self, job: Job) -> Result<(), RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        guard.jobs.insert(job.id, job);
        Ok(())
    }

    fn fetch(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.jobs.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<Job>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.jobs.values().cloned().collect())
    }

    fn insert_job_type(&self, job_type: JobType) -> Result<JobType, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        guard.job_types.insert(job_type.id, job_type.clone());
        Ok(job_type)
    }

    fn fetch_job_type(&self, id: JobTypeId) -> Result<Option<JobType>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.job_types.get(&id).cloned())
    }

    fn job_types(&self) -> Result<Vec<JobType>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.job_types.values().cloned().collect())
    }

    fn insert_category(&self, category: JobCategory) -> Result<JobCategory, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        guard.categories.insert(category.id, category.clone());
        Ok(category)
    }

    fn fetch_category(&self, id: JobCategoryId) -> Result<Option<JobCategory>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.categories.get(&id).cloned())
    }

    fn categories(&self) -> Result<Vec<JobCategory>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.categories.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryOutbox {
    sent: Arc<Mutex<Vec<JobNotification>>>,
}

impl MemoryOutbox {
    pub(super) fn sent(&self) -> Vec<JobNotification> {
        self.sent.lock().expect("outbox mutex poisoned").clone()
    }

    pub(super) fn clear(&self) {
        self.sent.lock().expect("outbox mutex poisoned").clear();
    }
}

impl NotificationPublisher for MemoryOutbox {
    fn publish(&self, notification: JobNotification) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .expect("outbox mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct FailingOutbox;

impl NotificationPublisher for FailingOutbox {
    fn publish(&self, _notification: JobNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp relay refused".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl JobRepository for UnavailableRepository {
    fn insert(&self, _job: Job) -> Result<Job, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _job: Job) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: JobId) -> Result<Option<Job>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<Job>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_job_type(&self, _job_type: JobType) -> Result<JobType, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_job_type(&self, _id: JobTypeId) -> Result<Option<JobType>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn job_types(&self) -> Result<Vec<JobType>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_category(&self, _category: JobCategory) -> Result<JobCategory, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_category(&self, _id: JobCategoryId) -> Result<Option<JobCategory>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn categories(&self) -> Result<Vec<JobCategory>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
