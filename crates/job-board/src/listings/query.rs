//! Status filters and derived queries over a snapshot of job postings.
//!
//! A [`JobSet`] is always held in listing order (creation time, then id) so that
//! filtered subsets and sibling navigation agree on a single ordering.

use chrono::{DateTime, Utc};

use super::domain::{Job, JobCategory, JobCategoryId, JobId, JobStatus, JobType, JobTypeId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSet {
    jobs: Vec<Job>,
}

impl JobSet {
    pub fn new(mut jobs: Vec<Job>) -> Self {
        jobs.sort_by_key(Job::sort_key);
        Self { jobs }
    }

    pub fn with_status(&self, status: JobStatus) -> Self {
        self.filter(|job| job.status == status)
    }

    pub fn approved(&self) -> Self {
        self.with_status(JobStatus::Approved)
    }

    pub fn archived(&self) -> Self {
        self.with_status(JobStatus::Archived)
    }

    pub fn draft(&self) -> Self {
        self.with_status(JobStatus::Draft)
    }

    pub fn expired(&self) -> Self {
        self.with_status(JobStatus::Expired)
    }

    pub fn rejected(&self) -> Self {
        self.with_status(JobStatus::Rejected)
    }

    pub fn removed(&self) -> Self {
        self.with_status(JobStatus::Removed)
    }

    pub fn review(&self) -> Self {
        self.with_status(JobStatus::Review)
    }

    /// Approved postings whose expiry, if any, has not passed as of `now`.
    pub fn visible(&self, now: DateTime<Utc>) -> Self {
        self.filter(|job| job.is_visible_at(now))
    }

    pub fn featured(&self, now: DateTime<Utc>) -> Self {
        self.filter(|job| job.is_featured && job.is_visible_at(now))
    }

    pub fn count(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn contains(&self, id: JobId) -> bool {
        self.jobs.iter().any(|job| job.id == id)
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Job> {
        self.jobs.iter()
    }

    pub fn ids(&self) -> Vec<JobId> {
        self.jobs.iter().map(|job| job.id).collect()
    }

    pub fn into_vec(self) -> Vec<Job> {
        self.jobs
    }

    /// First posting in this set that sorts after `job`.
    pub fn next_after(&self, job: &Job) -> Option<&Job> {
        let key = job.sort_key();
        self.jobs.iter().find(|candidate| candidate.sort_key() > key)
    }

    /// Last posting in this set that sorts before `job`.
    pub fn previous_before(&self, job: &Job) -> Option<&Job> {
        let key = job.sort_key();
        self.jobs
            .iter()
            .rev()
            .find(|candidate| candidate.sort_key() < key)
    }

    fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&Job) -> bool,
    {
        Self {
            jobs: self.jobs.iter().filter(|job| predicate(job)).cloned().collect(),
        }
    }
}

impl IntoIterator for JobSet {
    type Item = Job;
    type IntoIter = std::vec::IntoIter<Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.into_iter()
    }
}

impl<'a> IntoIterator for &'a JobSet {
    type Item = &'a Job;
    type IntoIter = std::slice::Iter<'a, Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.iter()
    }
}

impl FromIterator<Job> for JobSet {
    fn from_iter<I: IntoIterator<Item = Job>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Tag-like entity that postings reference.
pub trait JobTag: Clone {
    type Id: Ord + Copy;

    fn tag_id(&self) -> Self::Id;
    fn tag_name(&self) -> &str;
    fn is_attached_to(&self, job: &Job) -> bool;
}

impl JobTag for JobType {
    type Id = JobTypeId;

    fn tag_id(&self) -> Self::Id {
        self.id
    }

    fn tag_name(&self) -> &str {
        &self.name
    }

    fn is_attached_to(&self, job: &Job) -> bool {
        job.job_types.contains(&self.id)
    }
}

impl JobTag for JobCategory {
    type Id = JobCategoryId;

    fn tag_id(&self) -> Self::Id {
        self.id
    }

    fn tag_name(&self) -> &str {
        &self.name
    }

    fn is_attached_to(&self, job: &Job) -> bool {
        job.category == Some(self.id)
    }
}

/// Tags referenced by at least one approved posting, deduplicated and ordered by name.
pub fn with_active_jobs<T, I>(tags: I, jobs: &JobSet) -> Vec<T>
where
    T: JobTag,
    I: IntoIterator<Item = T>,
{
    let active = jobs.approved();
    let mut matched: Vec<T> = tags
        .into_iter()
        .filter(|tag| active.iter().any(|job| tag.is_attached_to(job)))
        .collect();

    matched.sort_by(|a, b| {
        a.tag_name()
            .cmp(b.tag_name())
            .then_with(|| a.tag_id().cmp(&b.tag_id()))
    });
    matched.dedup_by_key(|tag| tag.tag_id());
    matched
}
