use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub location: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub job_type: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// Request body for creating a job posting.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub requirements: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "type", default = "default_job_type")]
    pub job_type: String,
    #[serde(default = "default_job_status")]
    pub status: String,
}

fn default_job_type() -> String {
    "full-time".to_string()
}

fn default_job_status() -> String {
    "active".to_string()
}

impl NewJob {
    /// Returns the name of the first blank required field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("title", &self.title),
            ("description", &self.description),
            ("requirements", &self.requirements),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}
