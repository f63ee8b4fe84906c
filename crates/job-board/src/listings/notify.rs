use std::fmt::Write as _;

use super::domain::Job;
use super::repository::JobNotification;

pub const SUBMITTED_FOR_APPROVAL_TEMPLATE: &str = "job_submitted_for_approval";

/// Who moderation notices go to and who they come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSettings {
    pub sender: String,
    pub recipients: Vec<String>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            sender: "noreply@localhost".to_string(),
            recipients: vec!["jobs@localhost".to_string()],
        }
    }
}

pub fn submission_subject(job: &Job) -> String {
    format!("Job Submitted for Approval: {}", job.display_name())
}

pub(crate) fn submission_notification(
    job: &Job,
    settings: &NotificationSettings,
) -> JobNotification {
    JobNotification {
        template: SUBMITTED_FOR_APPROVAL_TEMPLATE.to_string(),
        job_id: job.id,
        sender: settings.sender.clone(),
        recipients: settings.recipients.clone(),
        subject: submission_subject(job),
        body: submission_body(job),
    }
}

fn submission_body(job: &Job) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "A job listing has been submitted for review.");
    let _ = writeln!(body);
    let _ = writeln!(body, "Title: {}", job.title);
    if !job.company_name.trim().is_empty() {
        let _ = writeln!(body, "Company: {}", job.company_name);
    }
    let _ = writeln!(body, "Location: {}", job.display_location());
    if job.telecommuting {
        let _ = writeln!(body, "Telecommuting: yes");
    }
    if let Some(expires) = job.expires {
        let _ = writeln!(body, "Expires: {}", expires.format("%B %d, %Y"));
    }
    if let Some(contact) = &job.contact_email {
        let _ = writeln!(body, "Contact: {contact}");
    }
    let _ = writeln!(body);
    let _ = write!(
        body,
        "Approve or reject listing #{} from the moderation queue.",
        job.id
    );
    body
}
