//! End-to-end scenarios for the moderation workflow, driven only through the public
//! service facade with in-memory storage and an outbox notifier.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use job_board::listings::{
        Job, JobBoardService, JobCategory, JobCategoryId, JobId, JobNotification, JobRepository,
        JobStatus, JobType, JobTypeId, NewJob, NotificationError, NotificationPublisher,
        RepositoryError, WorkflowSettings,
    };

    pub type Board = JobBoardService<MemoryRepository, Outbox>;

    pub fn board() -> (Board, Arc<Outbox>) {
        let outbox = Arc::new(Outbox::default());
        let service = JobBoardService::new(
            Arc::new(MemoryRepository::default()),
            outbox.clone(),
            WorkflowSettings::default(),
        );
        (service, outbox)
    }

    pub fn memphis(status: JobStatus) -> NewJob {
        NewJob::draft("Python Developer", "Riverside Co", "Memphis", Some("TN"), "USA")
            .with_status(status)
    }

    /// Create a job, then push it to `status` the way a moderator would.
    pub fn job_in(board: &Board, status: JobStatus) -> Job {
        let initial = if status.is_initial() {
            status
        } else {
            JobStatus::Draft
        };
        let job = board.create(memphis(initial)).expect("job created");
        board.set_status(job.id, status).expect("status applied")
    }

    #[derive(Default)]
    pub struct MemoryRepository {
        jobs: Mutex<HashMap<JobId, Job>>,
        job_types: Mutex<Vec<JobType>>,
        categories: Mutex<Vec<JobCategory>>,
    }

    impl JobRepository for MemoryRepository {
        fn insert(&self, job: Job) -> Result<Job, RepositoryError> {
            let mut jobs = self.jobs.lock().expect("jobs mutex poisoned");
            if jobs.contains_key(&job.id) {
                return Err(RepositoryError::Conflict);
            }
            jobs.insert(job.id, job.clone());
            Ok(job)
        }

        fn update(&self, job: Job) -> Result<(), RepositoryError> {
            let mut jobs = self.jobs.lock().expect("jobs mutex poisoned");
            match jobs.get_mut(&job.id) {
                Some(slot) => {
                    *slot = job;
                    Ok(())
                }
                None => Err(RepositoryError::NotFound),
            }
        }

        fn fetch(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
            Ok(self.jobs.lock().expect("jobs mutex poisoned").get(&id).cloned())
        }

        fn all(&self) -> Result<Vec<Job>, RepositoryError> {
            Ok(self
                .jobs
                .lock()
                .expect("jobs mutex poisoned")
                .values()
                .cloned()
                .collect())
        }

        fn insert_job_type(&self, job_type: JobType) -> Result<JobType, RepositoryError> {
            self.job_types
                .lock()
                .expect("types mutex poisoned")
                .push(job_type.clone());
            Ok(job_type)
        }

        fn fetch_job_type(&self, id: JobTypeId) -> Result<Option<JobType>, RepositoryError> {
            let types = self.job_types.lock().expect("types mutex poisoned");
            Ok(types.iter().find(|job_type| job_type.id == id).cloned())
        }

        fn job_types(&self) -> Result<Vec<JobType>, RepositoryError> {
            Ok(self.job_types.lock().expect("types mutex poisoned").clone())
        }

        fn insert_category(&self, category: JobCategory) -> Result<JobCategory, RepositoryError> {
            self.categories
                .lock()
                .expect("categories mutex poisoned")
                .push(category.clone());
            Ok(category)
        }

        fn fetch_category(
            &self,
            id: JobCategoryId,
        ) -> Result<Option<JobCategory>, RepositoryError> {
            let categories = self.categories.lock().expect("categories mutex poisoned");
            Ok(categories.iter().find(|category| category.id == id).cloned())
        }

        fn categories(&self) -> Result<Vec<JobCategory>, RepositoryError> {
            Ok(self.categories.lock().expect("categories mutex poisoned").clone())
        }
    }

    #[derive(Default)]
    pub struct Outbox {
        messages: Mutex<Vec<JobNotification>>,
    }

    impl Outbox {
        pub fn messages(&self) -> Vec<JobNotification> {
            self.messages.lock().expect("outbox mutex poisoned").clone()
        }

        pub fn clear(&self) {
            self.messages.lock().expect("outbox mutex poisoned").clear();
        }
    }

    impl NotificationPublisher for Outbox {
        fn publish(&self, notification: JobNotification) -> Result<(), NotificationError> {
            self.messages
                .lock()
                .expect("outbox mutex poisoned")
                .push(notification);
            Ok(())
        }
    }
}

use chrono::{Duration, Utc};
use common::{board, job_in, memphis};
use job_board::listings::{submission_subject, JobStatus};

#[test]
fn fresh_listing_is_new_and_ages_out() {
    let (board, _) = board();
    let mut job = board.create(memphis(JobStatus::Review)).expect("created");
    assert!(board.is_new(&job));

    let threshold = board.settings().new_threshold;
    job.created = Utc::now() - threshold * 2;
    assert!(!board.is_new(&job));
}

#[test]
fn location_formatting_matches_listing_pages() {
    let (board, _) = board();
    let job = board.create(memphis(JobStatus::Draft)).expect("created");
    assert_eq!(job.location_slug(), "memphis-tn-usa");
    assert_eq!(job.display_location(), "Memphis, TN, USA");

    let mut no_region = memphis(JobStatus::Draft);
    no_region.region = Some(String::new());
    let job = board.create(no_region).expect("created");
    assert!(job.region.is_none());
    assert_eq!(job.display_location(), "Memphis, USA");
}

#[test]
fn status_managers_track_each_state() {
    let (board, _) = board();
    let jobs = board.jobs().expect("jobs");
    assert_eq!(jobs.approved().count(), 0);
    assert_eq!(jobs.review().count(), 0);

    job_in(&board, JobStatus::Approved);
    job_in(&board, JobStatus::Archived);
    job_in(&board, JobStatus::Draft);
    job_in(&board, JobStatus::Expired);
    job_in(&board, JobStatus::Rejected);
    job_in(&board, JobStatus::Removed);
    job_in(&board, JobStatus::Review);

    let jobs = board.jobs().expect("jobs");
    assert_eq!(jobs.approved().count(), 1);
    assert_eq!(jobs.archived().count(), 1);
    assert_eq!(jobs.draft().count(), 1);
    assert_eq!(jobs.expired().count(), 1);
    assert_eq!(jobs.rejected().count(), 1);
    assert_eq!(jobs.removed().count(), 1);
    assert_eq!(jobs.review().count(), 1);

    job_in(&board, JobStatus::Review);
    assert_eq!(board.jobs().expect("jobs").review().count(), 2);
}

#[test]
fn visible_listings_are_approved_and_unexpired() {
    let (board, _) = board();
    let j1 = job_in(&board, JobStatus::Approved);
    let j2 = board.create(memphis(JobStatus::Review)).expect("created");
    let j3 = board
        .create(memphis(JobStatus::Draft).with_expires(Utc::now() - Duration::days(1)))
        .expect("created");
    board.approve(j3.id).expect("approved");

    let visible = board.visible().expect("visible");
    assert_eq!(visible.count(), 1);
    assert!(visible.contains(j1.id));
    assert!(!visible.contains(j2.id));
    assert!(!visible.contains(j3.id));
}

#[test]
fn tags_are_active_only_with_approved_jobs() {
    let (board, _) = board();
    let t1 = board.create_job_type("Full Time").expect("type");
    let t2 = board.create_job_type("Contract").expect("type");
    let c1 = board.create_job_category("Web Development").expect("category");
    let c2 = board.create_job_category("Scientific Computing").expect("category");

    let job = job_in(&board, JobStatus::Approved);
    board.assign_job_type(job.id, t1.id).expect("type attached");
    board.set_category(job.id, Some(c1.id)).expect("category set");

    let types = board.job_types_with_active_jobs().expect("types");
    assert_eq!(types.len(), 1);
    assert!(types.contains(&t1));
    assert!(!types.contains(&t2));

    let categories = board.job_categories_with_active_jobs().expect("categories");
    assert_eq!(categories.len(), 1);
    assert!(categories.contains(&c1));
    assert!(!categories.contains(&c2));
}

#[test]
fn sibling_navigation_walks_approved_listings() {
    let (board, _) = board();
    let job1 = job_in(&board, JobStatus::Approved);
    let job2 = board.create(memphis(JobStatus::Review)).expect("created");
    let job3 = job_in(&board, JobStatus::Approved);

    let next = |job: &job_board::listings::Job| {
        board
            .next_listing(job.id)
            .expect("next")
            .map(|found| found.id)
    };
    let previous = |job: &job_board::listings::Job| {
        board
            .previous_listing(job.id)
            .expect("previous")
            .map(|found| found.id)
    };

    assert_eq!(next(&job1), Some(job3.id));
    assert_eq!(previous(&job3), Some(job1.id));

    board.approve(job2.id).expect("approved");

    assert_eq!(next(&job1), Some(job2.id));
    assert_eq!(next(&job2), Some(job3.id));
    assert_eq!(previous(&job3), Some(job2.id));
    assert_eq!(previous(&job2), Some(job1.id));
}

#[test]
fn submitting_for_review_emails_moderators_once() {
    let (board, outbox) = board();
    let job = board.create(memphis(JobStatus::Draft)).expect("created");
    outbox.clear();
    assert!(outbox.messages().is_empty());

    board.set_status(job.id, JobStatus::Review).expect("review");
    assert_eq!(outbox.messages().len(), 1);

    board.set_status(job.id, JobStatus::Draft).expect("draft");
    assert_eq!(outbox.messages().len(), 1);

    let expected = format!("Job Submitted for Approval: {}", job.display_name());
    assert_eq!(outbox.messages()[0].subject, expected);
    assert_eq!(submission_subject(&job), expected);
}
