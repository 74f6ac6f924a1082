use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::job::Job;

/// Lifecycle of an application on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Qualified,
    Rejected,
    Invited,
    InterviewScheduled,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Qualified => "qualified",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Invited => "invited",
            ApplicationStatus::InterviewScheduled => "interview_scheduled",
        }
    }

    /// Counted as "shortlisted" on the dashboard.
    pub fn is_shortlisted(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Qualified | ApplicationStatus::InterviewScheduled
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "qualified" => Ok(ApplicationStatus::Qualified),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "invited" => Ok(ApplicationStatus::Invited),
            "interview_scheduled" => Ok(ApplicationStatus::InterviewScheduled),
            other => Err(format!("unknown application status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub match_score: Option<i32>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub ai_summary: Option<String>,
    pub interview_questions: Vec<String>,
    pub status: ApplicationStatus,
    pub interview_scheduled: bool,
    pub interview_date: Option<DateTime<Utc>>,
    pub email_sent: bool,
    pub created_at: DateTime<Utc>,
}

/// Raw `applications` row. String lists live in JSONB columns.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub match_score: Option<i32>,
    pub strengths: Option<Json<Vec<String>>>,
    pub weaknesses: Option<Json<Vec<String>>>,
    pub ai_summary: Option<String>,
    pub interview_questions: Option<Json<Vec<String>>>,
    pub status: String,
    pub interview_scheduled: Option<bool>,
    pub interview_date: Option<DateTime<Utc>>,
    pub email_sent: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl From<ApplicationRow> for Application {
    fn from(row: ApplicationRow) -> Self {
        let status = row.status.parse().unwrap_or_else(|e| {
            tracing::warn!("Application {} has {e}; treating as pending", row.id);
            ApplicationStatus::Pending
        });
        Application {
            id: row.id,
            candidate_id: row.candidate_id,
            job_id: row.job_id,
            match_score: row.match_score,
            strengths: row.strengths.map(|j| j.0).unwrap_or_default(),
            weaknesses: row.weaknesses.map(|j| j.0).unwrap_or_default(),
            ai_summary: row.ai_summary,
            interview_questions: row.interview_questions.map(|j| j.0).unwrap_or_default(),
            status,
            interview_scheduled: row.interview_scheduled.unwrap_or(false),
            interview_date: row.interview_date,
            email_sent: row.email_sent.unwrap_or(false),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub match_score: i32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub ai_summary: String,
    pub interview_questions: Vec<String>,
    pub status: ApplicationStatus,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationPatch {
    pub status: Option<ApplicationStatus>,
    pub interview_scheduled: Option<bool>,
    pub interview_date: Option<DateTime<Utc>>,
    pub email_sent: Option<bool>,
}

impl ApplicationPatch {
    pub fn email_sent(sent: bool) -> Self {
        Self {
            email_sent: Some(sent),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, application: &mut Application) {
        if let Some(status) = self.status {
            application.status = status;
        }
        if let Some(scheduled) = self.interview_scheduled {
            application.interview_scheduled = scheduled;
        }
        if let Some(date) = self.interview_date {
            application.interview_date = Some(date);
        }
        if let Some(sent) = self.email_sent {
            application.email_sent = sent;
        }
    }
}

/// An application with its job embedded, as returned to the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: Application,
    pub job: Job,
}
