//! CSV import of job postings into a [`JobBoardService`].

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use tracing::info;

use super::domain::{Job, JobStatus, NewJob};
use super::repository::{JobRepository, NotificationPublisher};
use super::service::{JobBoardError, JobBoardService};

#[derive(Debug)]
pub enum JobImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: u64, message: String },
    Service(JobBoardError),
}

impl std::fmt::Display for JobImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobImportError::Io(err) => write!(f, "failed to read job export: {}", err),
            JobImportError::Csv(err) => write!(f, "invalid job CSV data: {}", err),
            JobImportError::InvalidRow { line, message } => {
                write!(f, "invalid job row on line {}: {}", line, message)
            }
            JobImportError::Service(err) => write!(f, "could not store imported job: {}", err),
        }
    }
}

impl std::error::Error for JobImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JobImportError::Io(err) => Some(err),
            JobImportError::Csv(err) => Some(err),
            JobImportError::InvalidRow { .. } => None,
            JobImportError::Service(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for JobImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for JobImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<JobBoardError> for JobImportError {
    fn from(err: JobBoardError) -> Self {
        Self::Service(err)
    }
}

pub struct JobCsvImporter;

impl JobCsvImporter {
    pub fn from_path<P, R, N>(
        path: P,
        service: &JobBoardService<R, N>,
    ) -> Result<Vec<Job>, JobImportError>
    where
        P: AsRef<Path>,
        R: JobRepository + 'static,
        N: NotificationPublisher + 'static,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, service)
    }

    /// Parse every row first, then create the postings, so a bad row imports nothing.
    pub fn from_reader<Src, R, N>(
        reader: Src,
        service: &JobBoardService<R, N>,
    ) -> Result<Vec<Job>, JobImportError>
    where
        Src: Read,
        R: JobRepository + 'static,
        N: NotificationPublisher + 'static,
    {
        let drafts = parse_rows(reader)?;
        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            created.push(service.create(draft)?);
        }

        info!(count = created.len(), "imported job listings");
        Ok(created)
    }
}

fn parse_rows<R: Read>(reader: R) -> Result<Vec<NewJob>, JobImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut drafts = Vec::new();

    for (index, record) in csv_reader.deserialize::<JobRow>().enumerate() {
        let row = record?;
        // header occupies line 1
        let line = index as u64 + 2;
        drafts.push(row.into_new_job(line)?);
    }

    Ok(drafts)
}

#[derive(Debug, Deserialize)]
struct JobRow {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Company", default)]
    company: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "Region", default, deserialize_with = "empty_string_as_none")]
    region: Option<String>,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(
        rename = "Contact Email",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    contact_email: Option<String>,
    #[serde(rename = "URL", default, deserialize_with = "empty_string_as_none")]
    url: Option<String>,
    #[serde(
        rename = "Telecommuting",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    telecommuting: Option<String>,
    #[serde(rename = "Expires", default, deserialize_with = "empty_string_as_none")]
    expires: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
}

impl JobRow {
    fn into_new_job(self, line: u64) -> Result<NewJob, JobImportError> {
        let invalid = |message: String| JobImportError::InvalidRow { line, message };

        if self.title.trim().is_empty() {
            return Err(invalid("title is required".to_string()));
        }

        let status = match self.status.as_deref() {
            Some(raw) => raw
                .parse::<JobStatus>()
                .map_err(|err| invalid(err.to_string()))?,
            None => JobStatus::Draft,
        };
        if !status.is_initial() {
            return Err(invalid(format!(
                "status must be draft or review, got {status}"
            )));
        }

        let expires = match self.expires.as_deref() {
            Some(raw) => Some(
                parse_timestamp(raw)
                    .ok_or_else(|| invalid(format!("unrecognized expiry '{raw}'")))?,
            ),
            None => None,
        };

        let telecommuting = match self.telecommuting.as_deref() {
            Some(raw) => parse_flag(raw)
                .ok_or_else(|| invalid(format!("unrecognized telecommuting flag '{raw}'")))?,
            None => false,
        };

        let mut job = NewJob::draft(
            self.title,
            self.company,
            self.city,
            self.region.as_deref(),
            self.country,
        )
        .with_status(status);
        job.description = self.description;
        job.contact_email = self.contact_email;
        job.url = self.url;
        job.telecommuting = telecommuting;
        job.expires = expires;
        Ok(job)
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts RFC 3339 timestamps or `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}
