use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default age below which a posting is flagged as new.
pub const DEFAULT_NEW_THRESHOLD_DAYS: i64 = 14;

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobTypeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobCategoryId(pub u64);

/// Moderation state of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Draft,
    Review,
    Approved,
    Rejected,
    Archived,
    Removed,
    Expired,
}

impl JobStatus {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Draft,
            Self::Review,
            Self::Approved,
            Self::Rejected,
            Self::Archived,
            Self::Removed,
            Self::Expired,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Review => "review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Archived => "archived",
            Self::Removed => "removed",
            Self::Expired => "expired",
        }
    }

    /// Statuses a posting may be created in.
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::Draft | Self::Review)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job status '{0}'")]
pub struct UnknownJobStatus(pub String);

impl FromStr for JobStatus {
    type Err = UnknownJobStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|status| status.label() == normalized)
            .ok_or_else(|| UnknownJobStatus(value.to_string()))
    }
}

/// A stored job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company_name: String,
    pub city: String,
    pub region: Option<String>,
    pub country: String,
    pub description: String,
    pub contact_email: Option<String>,
    pub url: Option<String>,
    pub telecommuting: bool,
    pub is_featured: bool,
    pub status: JobStatus,
    pub created: DateTime<Utc>,
    pub expires: Option<DateTime<Utc>>,
    pub job_types: BTreeSet<JobTypeId>,
    pub category: Option<JobCategoryId>,
}

impl Job {
    pub(crate) fn from_new(id: JobId, created: DateTime<Utc>, new_job: NewJob) -> Self {
        let NewJob {
            title,
            company_name,
            city,
            region,
            country,
            description,
            contact_email,
            url,
            telecommuting,
            is_featured,
            status,
            expires,
            job_types,
            category,
        } = new_job;

        Self {
            id,
            title,
            company_name,
            city,
            region: normalize_optional(region),
            country,
            description,
            contact_email: normalize_optional(contact_email),
            url: normalize_optional(url),
            telecommuting,
            is_featured,
            status,
            created,
            expires,
            job_types,
            category,
        }
    }

    pub fn display_name(&self) -> String {
        let company = self.company_name.trim();
        if company.is_empty() {
            self.title.clone()
        } else {
            format!("{}, {}", self.title, company)
        }
    }

    pub fn display_location(&self) -> String {
        self.location_parts().join(", ")
    }

    pub fn location_slug(&self) -> String {
        self.location_parts()
            .into_iter()
            .map(slugify)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Whether the posting is younger than `threshold` as of `now`.
    pub fn is_new_at(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        now.signed_duration_since(self.created) < threshold
    }

    pub fn is_new(&self) -> bool {
        self.is_new_at(Utc::now(), Duration::days(DEFAULT_NEW_THRESHOLD_DAYS))
    }

    /// Approved and not past its expiry as of `now`.
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        self.status == JobStatus::Approved && self.expires.map_or(true, |expires| expires >= now)
    }

    /// Stable ordering used for listing navigation.
    pub fn sort_key(&self) -> (DateTime<Utc>, JobId) {
        (self.created, self.id)
    }

    fn location_parts(&self) -> Vec<&str> {
        [
            Some(self.city.as_str()),
            self.region.as_deref(),
            Some(self.country.as_str()),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
    }
}

/// Posting details supplied at creation time; the service assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub company_name: String,
    pub city: String,
    pub region: Option<String>,
    pub country: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub telecommuting: bool,
    #[serde(default)]
    pub is_featured: bool,
    pub status: JobStatus,
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
    #[serde(default)]
    pub job_types: BTreeSet<JobTypeId>,
    #[serde(default)]
    pub category: Option<JobCategoryId>,
}

impl NewJob {
    pub fn draft(
        title: impl Into<String>,
        company_name: impl Into<String>,
        city: impl Into<String>,
        region: Option<&str>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            company_name: company_name.into(),
            city: city.into(),
            region: region.map(str::to_string),
            country: country.into(),
            description: String::new(),
            contact_email: None,
            url: None,
            telecommuting: false,
            is_featured: false,
            status: JobStatus::Draft,
            expires: None,
            job_types: BTreeSet::new(),
            category: None,
        }
    }

    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn featured(mut self) -> Self {
        self.is_featured = true;
        self
    }
}

/// Employment arrangement tag (full time, contract, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobType {
    pub id: JobTypeId,
    pub name: String,
    pub slug: String,
}

/// Subject-area grouping for postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCategory {
    pub id: JobCategoryId,
    pub name: String,
    pub slug: String,
}

/// Lowercase ASCII slug with runs of other characters collapsed to a single hyphen.
///
/// Non-ASCII letters are transliterated first, so `São Paulo` becomes `sao-paulo`.
pub fn slugify(value: &str) -> String {
    let ascii = deunicode::deunicode(value.trim());
    let mut slug = String::with_capacity(ascii.len());
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|inner| !inner.trim().is_empty())
}
