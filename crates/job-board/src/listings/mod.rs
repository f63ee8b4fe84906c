//! Job posting moderation: status queries, listing navigation, and submit notifications.

pub mod domain;
pub mod import;
pub(crate) mod notify;
pub mod query;
pub mod repository;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    slugify, Job, JobCategory, JobCategoryId, JobId, JobStatus, JobType, JobTypeId, NewJob,
    UnknownJobStatus, DEFAULT_NEW_THRESHOLD_DAYS,
};
pub use import::{parse_timestamp, JobCsvImporter, JobImportError};
pub use notify::{submission_subject, NotificationSettings, SUBMITTED_FOR_APPROVAL_TEMPLATE};
pub use query::{with_active_jobs, JobSet, JobTag};
pub use repository::{
    JobListingView, JobNotification, JobRepository, NotificationError, NotificationPublisher,
    RepositoryError,
};
pub use service::{JobBoardError, JobBoardService, WorkflowSettings};
