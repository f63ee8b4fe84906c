use chrono::{DateTime, Utc};
use job_board::listings::{
    self, Job, JobCategory, JobCategoryId, JobId, JobNotification, JobRepository, JobType,
    JobTypeId, NotificationError, NotificationPublisher, RepositoryError,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Default, Clone)]
pub(crate) struct InMemoryJobRepository {
    jobs: Arc<Mutex<HashMap<JobId, Job>>>,
    job_types: Arc<Mutex<HashMap<JobTypeId, JobType>>>,
    categories: Arc<Mutex<HashMap<JobCategoryId, JobCategory>>>,
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> RepositoryError {
    RepositoryError::Unavailable("in-memory store poisoned".to_string())
}

impl JobRepository for InMemoryJobRepository {
    fn insert(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut guard = self.jobs.lock().map_err(poisoned)?;
        if guard.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(job.id, job.clone());
        Ok(job)
    }

    fn update(&self, job: Job) -> Result<(), RepositoryError> {
        let mut guard = self.jobs.lock().map_err(poisoned)?;
        if guard.contains_key(&job.id) {
            guard.insert(job.id, job);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let guard = self.jobs.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<Job>, RepositoryError> {
        let guard = self.jobs.lock().map_err(poisoned)?;
        Ok(guard.values().cloned().collect())
    }

    fn insert_job_type(&self, job_type: JobType) -> Result<JobType, RepositoryError> {
        let mut guard = self.job_types.lock().map_err(poisoned)?;
        if guard.values().any(|existing| existing.slug == job_type.slug) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(job_type.id, job_type.clone());
        Ok(job_type)
    }

    fn fetch_job_type(&self, id: JobTypeId) -> Result<Option<JobType>, RepositoryError> {
        let guard = self.job_types.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }

    fn job_types(&self) -> Result<Vec<JobType>, RepositoryError> {
        let guard = self.job_types.lock().map_err(poisoned)?;
        Ok(guard.values().cloned().collect())
    }

    fn insert_category(&self, category: JobCategory) -> Result<JobCategory, RepositoryError> {
        let mut guard = self.categories.lock().map_err(poisoned)?;
        if guard.values().any(|existing| existing.slug == category.slug) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(category.id, category.clone());
        Ok(category)
    }

    fn fetch_category(&self, id: JobCategoryId) -> Result<Option<JobCategory>, RepositoryError> {
        let guard = self.categories.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }

    fn categories(&self) -> Result<Vec<JobCategory>, RepositoryError> {
        let guard = self.categories.lock().map_err(poisoned)?;
        Ok(guard.values().cloned().collect())
    }
}

/// Notifier that logs each message and keeps it for the end-of-run summary.
#[derive(Default, Clone)]
pub(crate) struct LoggingOutbox {
    sent: Arc<Mutex<Vec<JobNotification>>>,
}

impl NotificationPublisher for LoggingOutbox {
    fn publish(&self, notification: JobNotification) -> Result<(), NotificationError> {
        info!(
            job_id = %notification.job_id,
            recipients = %notification.recipients.join(", "),
            subject = %notification.subject,
            "notification queued"
        );
        let mut guard = self
            .sent
            .lock()
            .map_err(|_| NotificationError::Transport("outbox poisoned".to_string()))?;
        guard.push(notification);
        Ok(())
    }
}

impl LoggingOutbox {
    pub(crate) fn sent(&self) -> Result<Vec<JobNotification>, NotificationError> {
        let guard = self
            .sent
            .lock()
            .map_err(|_| NotificationError::Transport("outbox poisoned".to_string()))?;
        Ok(guard.clone())
    }
}

/// `clap` value parser over the library's timestamp rules.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    listings::parse_timestamp(raw)
        .ok_or_else(|| format!("failed to parse '{raw}' as RFC 3339 or YYYY-MM-DD"))
}
