use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Storage, StorageResult};
use crate::models::{
    Application, ApplicationPatch, ApplicationWithJob, Candidate, CandidateWithApplication, Job,
    NewApplication, NewCandidate, NewJob,
};

/// In-process storage for local runs without a database, and for tests.
/// Records are kept in insertion order; listings return newest first.
#[derive(Default)]
pub struct InMemoryStorage {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    jobs: Vec<Job>,
    candidates: Vec<Candidate>,
    applications: Vec<Application>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn list_jobs(&self) -> StorageResult<Vec<Job>> {
        let tables = self.inner.read().await;
        Ok(tables.jobs.iter().rev().cloned().collect())
    }

    async fn get_job(&self, id: Uuid) -> StorageResult<Option<Job>> {
        let tables = self.inner.read().await;
        Ok(tables.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn create_job(&self, job: NewJob) -> StorageResult<Job> {
        let created = Job {
            id: Uuid::new_v4(),
            title: job.title,
            description: job.description,
            requirements: job.requirements,
            location: job.location,
            job_type: job.job_type,
            status: job.status,
            created_at: Utc::now(),
        };
        self.inner.write().await.jobs.push(created.clone());
        Ok(created)
    }

    async fn get_candidate(&self, id: Uuid) -> StorageResult<Option<Candidate>> {
        let tables = self.inner.read().await;
        Ok(tables.candidates.iter().find(|c| c.id == id).cloned())
    }

    async fn create_candidate(&self, candidate: NewCandidate) -> StorageResult<Candidate> {
        let created = Candidate {
            id: Uuid::new_v4(),
            name: candidate.name,
            email: candidate.email,
            phone: candidate.phone,
            resume_text: Some(candidate.resume_text),
            status: "pending".to_string(),
            created_at: Utc::now(),
        };
        self.inner.write().await.candidates.push(created.clone());
        Ok(created)
    }

    async fn list_candidates_with_applications(
        &self,
    ) -> StorageResult<Vec<CandidateWithApplication>> {
        let tables = self.inner.read().await;
        let jobs: HashMap<Uuid, &Job> = tables.jobs.iter().map(|j| (j.id, j)).collect();

        Ok(tables
            .candidates
            .iter()
            .rev()
            .filter_map(|candidate| {
                let application = tables
                    .applications
                    .iter()
                    .rev()
                    .find(|a| a.candidate_id == candidate.id)?;
                let job = jobs.get(&application.job_id)?;
                Some(CandidateWithApplication {
                    candidate: candidate.clone(),
                    application: ApplicationWithJob {
                        application: application.clone(),
                        job: (*job).clone(),
                    },
                })
            })
            .collect())
    }

    async fn list_applications(&self) -> StorageResult<Vec<Application>> {
        let tables = self.inner.read().await;
        Ok(tables.applications.iter().rev().cloned().collect())
    }

    async fn get_application(&self, id: Uuid) -> StorageResult<Option<Application>> {
        let tables = self.inner.read().await;
        Ok(tables.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn create_application(&self, application: NewApplication) -> StorageResult<Application> {
        let created = Application {
            id: Uuid::new_v4(),
            candidate_id: application.candidate_id,
            job_id: application.job_id,
            match_score: Some(application.match_score),
            strengths: application.strengths,
            weaknesses: application.weaknesses,
            ai_summary: Some(application.ai_summary),
            interview_questions: application.interview_questions,
            status: application.status,
            interview_scheduled: false,
            interview_date: None,
            email_sent: false,
            created_at: Utc::now(),
        };
        self.inner.write().await.applications.push(created.clone());
        Ok(created)
    }

    async fn update_application(
        &self,
        id: Uuid,
        patch: ApplicationPatch,
    ) -> StorageResult<Option<Application>> {
        let mut tables = self.inner.write().await;
        Ok(tables
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .map(|application| {
                patch.apply_to(application);
                application.clone()
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApplicationStatus;

    fn new_job(title: &str) -> NewJob {
        NewJob {
            title: title.to_string(),
            description: "Build and operate services".to_string(),
            requirements: "Rust, PostgreSQL".to_string(),
            location: None,
            job_type: "full-time".to_string(),
            status: "active".to_string(),
        }
    }

    fn new_candidate(name: &str) -> NewCandidate {
        NewCandidate {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: None,
            resume_text: "Experienced engineer".to_string(),
        }
    }

    fn new_application(candidate_id: Uuid, job_id: Uuid) -> NewApplication {
        NewApplication {
            candidate_id,
            job_id,
            match_score: 81,
            strengths: vec!["Rust".to_string()],
            weaknesses: vec!["Kubernetes".to_string()],
            ai_summary: "Strong backend engineer.".to_string(),
            interview_questions: vec!["Tell us about ownership.".to_string()],
            status: ApplicationStatus::Qualified,
        }
    }

    #[tokio::test]
    async fn test_jobs_list_newest_first() {
        let storage = InMemoryStorage::new();
        storage.create_job(new_job("First")).await.unwrap();
        storage.create_job(new_job("Second")).await.unwrap();

        let jobs = storage.list_jobs().await.unwrap();
        assert_eq!(jobs[0].title, "Second");
        assert_eq!(jobs[1].title, "First");
    }

    #[tokio::test]
    async fn test_update_application_applies_patch() {
        let storage = InMemoryStorage::new();
        let job = storage.create_job(new_job("Backend")).await.unwrap();
        let candidate = storage.create_candidate(new_candidate("Ada")).await.unwrap();
        let app = storage
            .create_application(new_application(candidate.id, job.id))
            .await
            .unwrap();
        assert!(!app.interview_scheduled);
        assert!(!app.email_sent);

        let updated = storage
            .update_application(app.id, ApplicationPatch::email_sent(true))
            .await
            .unwrap()
            .unwrap();
        assert!(updated.email_sent);
        assert_eq!(updated.status, ApplicationStatus::Qualified);
    }

    #[tokio::test]
    async fn test_update_unknown_application_returns_none() {
        let storage = InMemoryStorage::new();
        let result = storage
            .update_application(Uuid::new_v4(), ApplicationPatch::email_sent(true))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_candidates_with_applications_skips_unapplied() {
        let storage = InMemoryStorage::new();
        let job = storage.create_job(new_job("Backend")).await.unwrap();
        let applied = storage.create_candidate(new_candidate("Ada")).await.unwrap();
        storage.create_candidate(new_candidate("Grace")).await.unwrap();
        storage
            .create_application(new_application(applied.id, job.id))
            .await
            .unwrap();

        let rows = storage.list_candidates_with_applications().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].candidate.name, "Ada");
        assert_eq!(rows[0].application.job.title, "Backend");
    }
}
