//! Axum route handlers for the dashboard API.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    Application, ApplicationPatch, ApplicationStatus, Candidate, CandidateWithApplication, Job,
    NewJob,
};
use crate::recruiting::DashboardStats;
use crate::state::AppState;

/// Placeholder slot named in manually sent invites.
const MANUAL_INVITE_WHEN_LABEL: &str = "To be scheduled";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInterviewRequest {
    pub interview_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Jobs
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(state.storage.list_jobs().await?))
}

/// POST /api/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    payload: Result<Json<NewJob>, JsonRejection>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let Json(request) = payload?;
    if let Some(field) = request.missing_field() {
        return Err(AppError::Validation(format!("{field} is required")));
    }

    let job = state.storage.create_job(request).await?;
    info!("Created job {} ({})", job.id, job.title);
    Ok((StatusCode::CREATED, Json(job)))
}

// ────────────────────────────────────────────────────────────────────────────
// Candidates
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Result<Json<Vec<CandidateWithApplication>>, AppError> {
    Ok(Json(state.storage.list_candidates_with_applications().await?))
}

/// GET /api/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Candidate>, AppError> {
    let id = path_id(id, "Candidate")?;
    state
        .storage
        .get_candidate(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Candidate not found".to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Interview actions
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/schedule-interview/:id
pub async fn handle_schedule_interview(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ScheduleInterviewRequest>, JsonRejection>,
) -> Result<Json<Application>, AppError> {
    let id = path_id(id, "Application")?;
    let Json(request) = payload?;
    let patch = ApplicationPatch {
        status: Some(ApplicationStatus::InterviewScheduled),
        interview_scheduled: Some(true),
        interview_date: Some(request.interview_date),
        ..ApplicationPatch::default()
    };

    let application = state
        .storage
        .update_application(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
    info!(
        "Interview scheduled for application {id} at {}",
        request.interview_date
    );
    Ok(Json(application))
}

/// POST /api/send-invite/:id
///
/// Sends an interview invite outside the upload flow and marks the
/// application as invited.
pub async fn handle_send_invite(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<SendResponse>, AppError> {
    let id = path_id(id, "Application")?;
    let (application, candidate, job) = load_application(&state, id).await?;

    let delivered = match candidate.usable_email() {
        Some(email) => {
            state
                .dispatcher
                .send_interview_invite(
                    &candidate.name,
                    email,
                    &job.title,
                    MANUAL_INVITE_WHEN_LABEL,
                    &application.interview_questions,
                )
                .await
        }
        None => false,
    };

    record_send(&state, id, ApplicationStatus::Invited, delivered).await?;
    Ok(Json(SendResponse { success: delivered }))
}

/// POST /api/reject/:id
pub async fn handle_reject(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<SendResponse>, AppError> {
    let id = path_id(id, "Application")?;
    let (_, candidate, job) = load_application(&state, id).await?;

    let delivered = match candidate.usable_email() {
        Some(email) => {
            state
                .dispatcher
                .send_rejection(&candidate.name, email, &job.title)
                .await
        }
        None => false,
    };

    record_send(&state, id, ApplicationStatus::Rejected, delivered).await?;
    Ok(Json(SendResponse { success: delivered }))
}

/// GET /api/dashboard-stats
pub async fn handle_dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    let applications = state.storage.list_applications().await?;
    let jobs = state.storage.list_jobs().await?;
    Ok(Json(DashboardStats::compute(&applications, &jobs)))
}

/// An id that does not parse cannot name an existing record.
fn path_id(id: Result<Path<Uuid>, PathRejection>, resource: &str) -> Result<Uuid, AppError> {
    id.map(|Path(id)| id)
        .map_err(|_| AppError::NotFound(format!("{resource} not found")))
}

async fn load_application(
    state: &AppState,
    id: Uuid,
) -> Result<(Application, Candidate, Job), AppError> {
    let application = state
        .storage
        .get_application(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
    let candidate = state
        .storage
        .get_candidate(application.candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Candidate not found".to_string()))?;
    let job = state
        .storage
        .get_job(application.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    Ok((application, candidate, job))
}

async fn record_send(
    state: &AppState,
    id: Uuid,
    status: ApplicationStatus,
    delivered: bool,
) -> Result<(), AppError> {
    let patch = ApplicationPatch {
        status: Some(status),
        email_sent: Some(delivered),
        ..ApplicationPatch::default()
    };
    state.storage.update_application(id, patch).await?;
    Ok(())
}
