use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Job, JobCategory, JobCategoryId, JobId, JobType, JobTypeId};

/// Storage abstraction so the service can run against any backend.
pub trait JobRepository: Send + Sync {
    fn insert(&self, job: Job) -> Result<Job, RepositoryError>;
    fn update(&self, job: Job) -> Result<(), RepositoryError>;
    fn fetch(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;
    fn all(&self) -> Result<Vec<Job>, RepositoryError>;

    fn insert_job_type(&self, job_type: JobType) -> Result<JobType, RepositoryError>;
    fn fetch_job_type(&self, id: JobTypeId) -> Result<Option<JobType>, RepositoryError>;
    fn job_types(&self) -> Result<Vec<JobType>, RepositoryError>;

    fn insert_category(&self, category: JobCategory) -> Result<JobCategory, RepositoryError>;
    fn fetch_category(&self, id: JobCategoryId) -> Result<Option<JobCategory>, RepositoryError>;
    fn categories(&self) -> Result<Vec<JobCategory>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound message hook (e-mail, chat, queue adapters).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: JobNotification) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobNotification {
    pub template: String,
    pub job_id: JobId,
    pub sender: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Flattened, display-ready view of a posting.
#[derive(Debug, Clone, Serialize)]
pub struct JobListingView {
    pub id: JobId,
    pub display_name: String,
    pub display_location: String,
    pub location_slug: String,
    pub status: &'static str,
    pub is_new: bool,
    pub is_featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
}

impl JobListingView {
    pub fn from_job(job: &Job, now: DateTime<Utc>, new_threshold: Duration) -> Self {
        Self {
            id: job.id,
            display_name: job.display_name(),
            display_location: job.display_location(),
            location_slug: job.location_slug(),
            status: job.status.label(),
            is_new: job.is_new_at(now, new_threshold),
            is_featured: job.is_featured,
            expires: job.expires,
        }
    }
}
