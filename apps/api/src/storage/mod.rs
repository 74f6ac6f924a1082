//! Storage collaborator. Each call commits independently; the pipeline does
//! not span transactions across calls.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Application, ApplicationPatch, Candidate, CandidateWithApplication, Job, NewApplication,
    NewCandidate, NewJob,
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStorage;
pub use postgres::PgStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Held as `Arc<dyn Storage>` so handlers and the pipeline never see the backend.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn list_jobs(&self) -> StorageResult<Vec<Job>>;
    async fn get_job(&self, id: Uuid) -> StorageResult<Option<Job>>;
    async fn create_job(&self, job: NewJob) -> StorageResult<Job>;

    async fn get_candidate(&self, id: Uuid) -> StorageResult<Option<Candidate>>;
    async fn create_candidate(&self, candidate: NewCandidate) -> StorageResult<Candidate>;
    /// Newest candidate first; candidates without an application are skipped.
    async fn list_candidates_with_applications(&self)
        -> StorageResult<Vec<CandidateWithApplication>>;

    async fn list_applications(&self) -> StorageResult<Vec<Application>>;
    async fn get_application(&self, id: Uuid) -> StorageResult<Option<Application>>;
    async fn create_application(&self, application: NewApplication)
        -> StorageResult<Application>;
    async fn update_application(
        &self,
        id: Uuid,
        patch: ApplicationPatch,
    ) -> StorageResult<Option<Application>>;
}
