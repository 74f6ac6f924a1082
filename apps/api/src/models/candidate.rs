use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::application::ApplicationWithJob;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    /// Empty when the candidate supplied no address.
    pub email: String,
    pub phone: Option<String>,
    pub resume_text: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Candidate {
    /// An address is usable when it has a local part and a dotted domain.
    pub fn usable_email(&self) -> Option<&str> {
        let email = self.email.trim();
        let (local, domain) = email.split_once('@')?;
        let usable = !local.is_empty()
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !email.contains(char::is_whitespace);
        usable.then_some(email)
    }
}

#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub resume_text: String,
}

/// Dashboard row: a candidate with its application and the application's job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateWithApplication {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub application: ApplicationWithJob,
}
