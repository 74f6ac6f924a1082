//! Axum handler for resume uploads.

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::screening::extractor::DocumentKind;
use crate::screening::pipeline::{ResumeUpload, UploadOutcome};
use crate::state::AppState;

/// Largest accepted resume file.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Request body limit for the upload route; leaves room for the form fields.
pub const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

/// POST /api/upload-resume
///
/// Multipart fields: `resume` (file), `jobId` (required), `candidateName`
/// and `candidateEmail` (optional).
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadOutcome>, AppError> {
    let mut multipart = multipart?;
    let mut resume: Option<(NamedTempFile, DocumentKind)> = None;
    let mut job_id: Option<String> = None;
    let mut candidate_name: Option<String> = None;
    let mut candidate_email: Option<String> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let kind = DocumentKind::from_upload(field.content_type(), field.file_name())?;
                let file = spool_to_temp_file(&mut field).await?;
                resume = Some((file, kind));
            }
            "jobId" => job_id = Some(field.text().await.map_err(multipart_error)?),
            "candidateName" => candidate_name = Some(field.text().await.map_err(multipart_error)?),
            "candidateEmail" => {
                candidate_email = Some(field.text().await.map_err(multipart_error)?)
            }
            _ => {}
        }
    }

    let (file, kind) = resume.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    let job_id = job_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Job ID is required".to_string()))?;
    // an id that cannot exist is reported like any other unknown job
    let job_id = Uuid::parse_str(job_id.trim())
        .map_err(|_| AppError::NotFound("Job not found".to_string()))?;

    info!("Processing resume upload for job {job_id}");
    let outcome = state
        .pipeline
        .run(ResumeUpload {
            file,
            kind,
            job_id,
            candidate_name,
            candidate_email,
        })
        .await?;

    Ok(Json(outcome))
}

/// Streams one multipart field into a fresh temp file, enforcing the size cap.
async fn spool_to_temp_file(field: &mut Field<'_>) -> Result<NamedTempFile, AppError> {
    let temp = NamedTempFile::new().map_err(|e| AppError::Internal(e.into()))?;
    let handle = temp.reopen().map_err(|e| AppError::Internal(e.into()))?;
    let mut out = tokio::fs::File::from_std(handle);

    let mut written = 0usize;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        written += chunk.len();
        if written > MAX_UPLOAD_BYTES {
            return Err(too_large());
        }
        out.write_all(&chunk)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
    }
    out.flush().await.map_err(|e| AppError::Internal(e.into()))?;

    Ok(temp)
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large()
    } else {
        AppError::Validation(format!("Malformed upload: {}", e.body_text()))
    }
}

fn too_large() -> AppError {
    AppError::PayloadTooLarge(format!(
        "Resume exceeds the {} MB upload limit",
        MAX_UPLOAD_BYTES / (1024 * 1024)
    ))
}
