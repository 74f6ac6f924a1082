//! Recruiter-facing notification events. The screening pipeline only emits
//! into the registry and never reads it back.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// Oldest entries are evicted beyond this.
const MAX_RETAINED: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    CandidateApplied,
    HighScore,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub candidate_name: Option<String>,
    pub match_score: Option<u8>,
}

/// Builds the event announcing a newly scored candidate.
pub fn candidate_notification(candidate_name: &str, job_title: &str, score: u8) -> Notification {
    let (kind, title, message) = match score {
        90.. => (
            NotificationKind::HighScore,
            "Exceptional Candidate!",
            format!("{candidate_name} scored {score}% for {job_title} - Highly recommended!"),
        ),
        80..=89 => (
            NotificationKind::HighScore,
            "Strong Candidate",
            format!("{candidate_name} scored {score}% for {job_title} - Great fit!"),
        ),
        70..=79 => (
            NotificationKind::CandidateApplied,
            "Qualified Candidate",
            format!("{candidate_name} applied for {job_title} and meets requirements"),
        ),
        _ => (
            NotificationKind::CandidateApplied,
            "New Application",
            format!("{candidate_name} applied for {job_title}"),
        ),
    };

    Notification {
        id: Uuid::new_v4(),
        kind,
        title: title.to_string(),
        message,
        timestamp: Utc::now(),
        read: false,
        candidate_name: Some(candidate_name.to_string()),
        match_score: Some(score),
    }
}

/// Fire-and-forget sink for recruiter notifications.
#[async_trait]
pub trait NotificationRegistry: Send + Sync {
    async fn create_candidate_notification(&self, candidate_name: &str, job_title: &str, score: u8);
}

/// Keeps the most recent notifications in process memory.
#[derive(Default)]
pub struct InMemoryNotificationRegistry {
    entries: Mutex<VecDeque<Notification>>,
}

impl InMemoryNotificationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Newest first.
    #[cfg(test)]
    pub fn recent(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl NotificationRegistry for InMemoryNotificationRegistry {
    async fn create_candidate_notification(&self, candidate_name: &str, job_title: &str, score: u8) {
        let notification = candidate_notification(candidate_name, job_title, score);
        debug!("Notification: {}", notification.message);

        // a poisoned lock only loses notifications
        if let Ok(mut entries) = self.entries.lock() {
            entries.push_front(notification);
            entries.truncate(MAX_RETAINED);
        }
    }
}
