use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{Storage, StorageResult};
use crate::models::{
    Application, ApplicationPatch, ApplicationRow, ApplicationWithJob, Candidate,
    CandidateWithApplication, Job, NewApplication, NewCandidate, NewJob,
};

/// PostgreSQL-backed storage. Schema: `migrations/0001_init.sql`.
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Creates the connection pool and wraps it.
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn list_jobs(&self) -> StorageResult<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>("SELECT * FROM jobs ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }

    async fn get_job(&self, id: Uuid) -> StorageResult<Option<Job>> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn create_job(&self, job: NewJob) -> StorageResult<Job> {
        let created = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (id, title, description, requirements, location, type, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.location)
        .bind(&job.job_type)
        .bind(&job.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn get_candidate(&self, id: Uuid) -> StorageResult<Option<Candidate>> {
        let candidate = sqlx::query_as::<_, Candidate>("SELECT * FROM candidates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(candidate)
    }

    async fn create_candidate(&self, candidate: NewCandidate) -> StorageResult<Candidate> {
        let created = sqlx::query_as::<_, Candidate>(
            r#"
            INSERT INTO candidates (id, name, email, phone, resume_text, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&candidate.name)
        .bind(&candidate.email)
        .bind(&candidate.phone)
        .bind(&candidate.resume_text)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_candidates_with_applications(
        &self,
    ) -> StorageResult<Vec<CandidateWithApplication>> {
        let candidates =
            sqlx::query_as::<_, Candidate>("SELECT * FROM candidates ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        let applications = self.list_applications().await?;
        let jobs: HashMap<Uuid, Job> = self
            .list_jobs()
            .await?
            .into_iter()
            .map(|job| (job.id, job))
            .collect();

        let mut by_candidate: HashMap<Uuid, Application> = HashMap::new();
        for application in applications {
            // list_applications is newest first; keep the latest per candidate
            by_candidate
                .entry(application.candidate_id)
                .or_insert(application);
        }

        Ok(candidates
            .into_iter()
            .filter_map(|candidate| {
                let application = by_candidate.remove(&candidate.id)?;
                let job = jobs.get(&application.job_id)?.clone();
                Some(CandidateWithApplication {
                    candidate,
                    application: ApplicationWithJob { application, job },
                })
            })
            .collect())
    }

    async fn list_applications(&self) -> StorageResult<Vec<Application>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Application::from).collect())
    }

    async fn get_application(&self, id: Uuid) -> StorageResult<Option<Application>> {
        let row = sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Application::from))
    }

    async fn create_application(&self, application: NewApplication) -> StorageResult<Application> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications
                (id, candidate_id, job_id, match_score, strengths, weaknesses,
                 ai_summary, interview_questions, status, interview_scheduled, email_sent)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, FALSE, FALSE)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(application.candidate_id)
        .bind(application.job_id)
        .bind(application.match_score)
        .bind(Json(&application.strengths))
        .bind(Json(&application.weaknesses))
        .bind(&application.ai_summary)
        .bind(Json(&application.interview_questions))
        .bind(application.status.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update_application(
        &self,
        id: Uuid,
        patch: ApplicationPatch,
    ) -> StorageResult<Option<Application>> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            UPDATE applications SET
                status = COALESCE($2, status),
                interview_scheduled = COALESCE($3, interview_scheduled),
                interview_date = COALESCE($4, interview_date),
                email_sent = COALESCE($5, email_sent)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.interview_scheduled)
        .bind(patch.interview_date)
        .bind(patch.email_sent)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Application::from))
    }
}
