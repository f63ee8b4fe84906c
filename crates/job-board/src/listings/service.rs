use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use super::domain::{
    slugify, Job, JobCategory, JobCategoryId, JobId, JobStatus, JobType, JobTypeId, NewJob,
    DEFAULT_NEW_THRESHOLD_DAYS,
};
use super::notify::{submission_notification, NotificationSettings};
use super::query::{with_active_jobs, JobSet};
use super::repository::{
    JobListingView, JobRepository, NotificationError, NotificationPublisher, RepositoryError,
};

/// Tunables for the moderation workflow.
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    pub new_threshold: Duration,
    pub notifications: NotificationSettings,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            new_threshold: Duration::days(DEFAULT_NEW_THRESHOLD_DAYS),
            notifications: NotificationSettings::default(),
        }
    }
}

/// Service composing the job repository and the moderation notifier.
pub struct JobBoardService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    settings: WorkflowSettings,
}

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static TAG_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    JobId(JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

fn next_tag_id() -> u64 {
    TAG_SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

impl<R, N> JobBoardService<R, N>
where
    R: JobRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, settings: WorkflowSettings) -> Self {
        Self {
            repository,
            notifier,
            settings,
        }
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// Store a new draft or review posting. Creating in review counts as a submission.
    pub fn create(&self, new_job: NewJob) -> Result<Job, JobBoardError> {
        self.create_at(new_job, Utc::now())
    }

    pub fn create_at(&self, new_job: NewJob, created: DateTime<Utc>) -> Result<Job, JobBoardError> {
        if !new_job.status.is_initial() {
            return Err(JobBoardError::InvalidInitialStatus(new_job.status));
        }

        for type_id in &new_job.job_types {
            self.require_job_type(*type_id)?;
        }
        if let Some(category_id) = new_job.category {
            self.require_category(category_id)?;
        }

        let job = Job::from_new(next_job_id(), created, new_job);
        let stored = self.repository.insert(job)?;
        info!(job_id = %stored.id, status = %stored.status, "job created");

        if stored.status == JobStatus::Review {
            self.notify_submitted(&stored)?;
        }

        Ok(stored)
    }

    pub fn get(&self, id: JobId) -> Result<Job, JobBoardError> {
        let job = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(job)
    }

    /// Move a posting to `status`, notifying moderators when it enters review.
    ///
    /// The change is persisted before the notification is sent, so a transport failure
    /// leaves the new status in place and surfaces as [`JobBoardError::Notification`].
    pub fn set_status(&self, id: JobId, status: JobStatus) -> Result<Job, JobBoardError> {
        let mut job = self.get(id)?;
        let previous = job.status;
        if previous == status {
            debug!(job_id = %id, %status, "status unchanged");
            return Ok(job);
        }

        job.status = status;
        self.repository.update(job.clone())?;
        info!(job_id = %id, from = %previous, to = %status, "job status changed");

        if status == JobStatus::Review {
            self.notify_submitted(&job)?;
        }

        Ok(job)
    }

    pub fn submit_for_review(&self, id: JobId) -> Result<Job, JobBoardError> {
        self.set_status(id, JobStatus::Review)
    }

    pub fn approve(&self, id: JobId) -> Result<Job, JobBoardError> {
        self.set_status(id, JobStatus::Approved)
    }

    pub fn reject(&self, id: JobId) -> Result<Job, JobBoardError> {
        self.set_status(id, JobStatus::Rejected)
    }

    pub fn archive(&self, id: JobId) -> Result<Job, JobBoardError> {
        self.set_status(id, JobStatus::Archived)
    }

    pub fn remove(&self, id: JobId) -> Result<Job, JobBoardError> {
        self.set_status(id, JobStatus::Removed)
    }

    /// Snapshot of every posting in listing order.
    pub fn jobs(&self) -> Result<JobSet, JobBoardError> {
        Ok(JobSet::new(self.repository.all()?))
    }

    pub fn visible(&self) -> Result<JobSet, JobBoardError> {
        Ok(self.jobs()?.visible(Utc::now()))
    }

    pub fn featured(&self) -> Result<JobSet, JobBoardError> {
        Ok(self.jobs()?.featured(Utc::now()))
    }

    pub fn is_new(&self, job: &Job) -> bool {
        job.is_new_at(Utc::now(), self.settings.new_threshold)
    }

    pub fn listing_view(&self, job: &Job) -> JobListingView {
        JobListingView::from_job(job, Utc::now(), self.settings.new_threshold)
    }

    /// Next approved posting after `id` in listing order.
    pub fn next_listing(&self, id: JobId) -> Result<Option<Job>, JobBoardError> {
        let job = self.get(id)?;
        let approved = self.jobs()?.approved();
        Ok(approved.next_after(&job).cloned())
    }

    /// Previous approved posting before `id` in listing order.
    pub fn previous_listing(&self, id: JobId) -> Result<Option<Job>, JobBoardError> {
        let job = self.get(id)?;
        let approved = self.jobs()?.approved();
        Ok(approved.previous_before(&job).cloned())
    }

    pub fn create_job_type(&self, name: &str) -> Result<JobType, JobBoardError> {
        let job_type = JobType {
            id: JobTypeId(next_tag_id()),
            name: name.trim().to_string(),
            slug: slugify(name),
        };
        Ok(self.repository.insert_job_type(job_type)?)
    }

    pub fn create_job_category(&self, name: &str) -> Result<JobCategory, JobBoardError> {
        let category = JobCategory {
            id: JobCategoryId(next_tag_id()),
            name: name.trim().to_string(),
            slug: slugify(name),
        };
        Ok(self.repository.insert_category(category)?)
    }

    pub fn assign_job_type(&self, id: JobId, type_id: JobTypeId) -> Result<Job, JobBoardError> {
        self.require_job_type(type_id)?;
        let mut job = self.get(id)?;
        if job.job_types.insert(type_id) {
            self.repository.update(job.clone())?;
        }
        Ok(job)
    }

    pub fn set_category(
        &self,
        id: JobId,
        category: Option<JobCategoryId>,
    ) -> Result<Job, JobBoardError> {
        if let Some(category_id) = category {
            self.require_category(category_id)?;
        }
        let mut job = self.get(id)?;
        if job.category != category {
            job.category = category;
            self.repository.update(job.clone())?;
        }
        Ok(job)
    }

    pub fn job_types_with_active_jobs(&self) -> Result<Vec<JobType>, JobBoardError> {
        let jobs = self.jobs()?;
        Ok(with_active_jobs(self.repository.job_types()?, &jobs))
    }

    pub fn job_categories_with_active_jobs(&self) -> Result<Vec<JobCategory>, JobBoardError> {
        let jobs = self.jobs()?;
        Ok(with_active_jobs(self.repository.categories()?, &jobs))
    }

    /// Move approved postings whose expiry is before `now` into the expired state.
    pub fn expire_stale(&self, now: DateTime<Utc>) -> Result<Vec<JobId>, JobBoardError> {
        let stale: Vec<Job> = self
            .jobs()?
            .approved()
            .into_iter()
            .filter(|job| job.expires.is_some_and(|expires| expires < now))
            .collect();

        let mut expired = Vec::with_capacity(stale.len());
        for mut job in stale {
            job.status = JobStatus::Expired;
            self.repository.update(job.clone())?;
            expired.push(job.id);
        }

        info!(count = expired.len(), "expired stale job listings");
        Ok(expired)
    }

    fn notify_submitted(&self, job: &Job) -> Result<(), JobBoardError> {
        let notification = submission_notification(job, &self.settings.notifications);
        let subject = notification.subject.clone();
        self.notifier.publish(notification).map_err(|err| {
            warn!(job_id = %job.id, error = %err, "failed to send review notification");
            err
        })?;
        info!(job_id = %job.id, %subject, "review notification sent");
        Ok(())
    }

    fn require_job_type(&self, id: JobTypeId) -> Result<JobType, JobBoardError> {
        let job_type = self
            .repository
            .fetch_job_type(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(job_type)
    }

    fn require_category(&self, id: JobCategoryId) -> Result<JobCategory, JobBoardError> {
        let category = self
            .repository
            .fetch_category(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(category)
    }
}

/// Error raised by the job board service.
#[derive(Debug, thiserror::Error)]
pub enum JobBoardError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
    #[error("jobs must be created as draft or review, not {0}")]
    InvalidInitialStatus(JobStatus),
}
