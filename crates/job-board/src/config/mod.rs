use std::env;
use std::fmt;

use chrono::Duration;

use crate::listings::{NotificationSettings, WorkflowSettings, DEFAULT_NEW_THRESHOLD_DAYS};

/// Distinguishes runtime behavior for different stages of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the job board.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub notifications: NotificationConfig,
    pub listings: ListingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let recipients = parse_recipients(
            &env::var("JOBS_NOTIFY_RECIPIENTS").unwrap_or_else(|_| "jobs@localhost".to_string()),
        );
        if recipients.is_empty() {
            return Err(ConfigError::MissingRecipients);
        }
        let sender =
            env::var("JOBS_NOTIFY_SENDER").unwrap_or_else(|_| "noreply@localhost".to_string());

        let raw_threshold = env::var("JOBS_NEW_THRESHOLD_DAYS")
            .unwrap_or_else(|_| DEFAULT_NEW_THRESHOLD_DAYS.to_string());
        let new_threshold_days = raw_threshold
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|days| *days > 0)
            .ok_or(ConfigError::InvalidThreshold {
                value: raw_threshold,
            })?;

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            notifications: NotificationConfig { sender, recipients },
            listings: ListingConfig { new_threshold_days },
        })
    }

    pub fn workflow_settings(&self) -> WorkflowSettings {
        WorkflowSettings {
            new_threshold: Duration::days(self.listings.new_threshold_days),
            notifications: NotificationSettings {
                sender: self.notifications.sender.clone(),
                recipients: self.notifications.recipients.clone(),
            },
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Addresses used for moderation notices.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub sender: String,
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ListingConfig {
    pub new_threshold_days: i64,
}

fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidThreshold { value: String },
    MissingRecipients,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidThreshold { value } => write!(
                f,
                "JOBS_NEW_THRESHOLD_DAYS must be a positive number of days, got '{}'",
                value
            ),
            ConfigError::MissingRecipients => {
                write!(f, "JOBS_NOTIFY_RECIPIENTS must list at least one address")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
