//! Application Pipeline: one resume upload from raw file to scored, persisted
//! application.
//!
//! Stages run strictly in order:
//! `Received → Extracted → Scored → Decided → Notified → Persisted → Complete`.
//! Extraction failures abort before anything is written. Scoring never fails
//! (the scorer absorbs errors into its fallback). Email failures are recorded
//! on the application as `emailSent = false`. Storage failures surface as 500.

use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, Utc};
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    Application, ApplicationPatch, ApplicationStatus, ApplicationWithJob, Candidate, Job,
    NewApplication, NewCandidate,
};
use crate::notifications::{NotificationDispatcher, NotificationRegistry};
use crate::screening::contact::parse_contact_details;
use crate::screening::extractor::{self, DocumentKind, ExtractedDocument, ExtractionError};
use crate::screening::fit_scoring::{FitScorer, ScoringResult};
use crate::storage::Storage;

/// Scores at or above this qualify for an interview.
pub const QUALIFY_THRESHOLD: u8 = 70;

/// Placeholder slot named in automatically sent invites.
pub const AUTO_INVITE_WHEN_LABEL: &str = "Tomorrow at 2:00 PM";

const INTERVIEW_LEAD_HOURS: i64 = 24;
const UNKNOWN_CANDIDATE_NAME: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Qualify,
    Reject,
}

impl Decision {
    pub fn from_score(match_score: u8) -> Self {
        if match_score >= QUALIFY_THRESHOLD {
            Decision::Qualify
        } else {
            Decision::Reject
        }
    }

    pub fn initial_status(self) -> ApplicationStatus {
        match self {
            Decision::Qualify => ApplicationStatus::Qualified,
            Decision::Reject => ApplicationStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Received,
    Extracted,
    Scored,
    Decided,
    Notified,
    Persisted,
    Complete,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Extracted => "extracted",
            Stage::Scored => "scored",
            Stage::Decided => "decided",
            Stage::Notified => "notified",
            Stage::Persisted => "persisted",
            Stage::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// A validated upload request. The temp file is removed when this is dropped,
/// which happens on every exit path of [`ScreeningPipeline::run`].
#[derive(Debug)]
pub struct ResumeUpload {
    pub file: NamedTempFile,
    pub kind: DocumentKind,
    pub job_id: Uuid,
    pub candidate_name: Option<String>,
    pub candidate_email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub candidate: Candidate,
    pub application: ApplicationWithJob,
    pub analysis: ScoringResult,
}

#[derive(Clone)]
pub struct ScreeningPipeline {
    storage: Arc<dyn Storage>,
    scorer: Arc<dyn FitScorer>,
    dispatcher: NotificationDispatcher,
    registry: Arc<dyn NotificationRegistry>,
}

impl ScreeningPipeline {
    pub fn new(
        storage: Arc<dyn Storage>,
        scorer: Arc<dyn FitScorer>,
        dispatcher: NotificationDispatcher,
        registry: Arc<dyn NotificationRegistry>,
    ) -> Self {
        Self {
            storage,
            scorer,
            dispatcher,
            registry,
        }
    }

    pub async fn run(&self, upload: ResumeUpload) -> Result<UploadOutcome, AppError> {
        let job = self
            .storage
            .get_job(upload.job_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
        info!(stage = %Stage::Received, job_id = %job.id, kind = ?upload.kind, "Resume upload received");

        let document = self.extract(&upload).await?;
        info!(stage = %Stage::Extracted, chars = document.text.len(), "Resume text extracted");

        let outcome = self.scorer.score(&document.text, &job.description).await;
        if outcome.is_fallback() {
            warn!(stage = %Stage::Scored, "AI judge unavailable, using fallback analysis");
        } else {
            info!(stage = %Stage::Scored, match_score = outcome.result().match_score, "Resume scored");
        }
        let analysis = outcome.into_result();

        let decision = Decision::from_score(analysis.match_score);
        info!(stage = %Stage::Decided, ?decision, "Screening decision made");

        let contact = parse_contact_details(&document.text);
        let name = non_blank(upload.candidate_name.as_deref())
            .or(contact.name.as_deref())
            .unwrap_or(UNKNOWN_CANDIDATE_NAME)
            .to_string();
        if non_blank(upload.candidate_email.as_deref()).is_none() && contact.email.is_some() {
            info!("Resume lists an email address but none was submitted; no email will be sent");
        }

        let candidate = self
            .storage
            .create_candidate(NewCandidate {
                name,
                email: non_blank(upload.candidate_email.as_deref())
                    .unwrap_or_default()
                    .to_string(),
                phone: contact.phone,
                resume_text: document.text,
            })
            .await?;

        let application = self
            .storage
            .create_application(NewApplication {
                candidate_id: candidate.id,
                job_id: job.id,
                match_score: i32::from(analysis.match_score),
                strengths: analysis.strengths.clone(),
                weaknesses: analysis.weaknesses.clone(),
                ai_summary: analysis.summary.clone(),
                interview_questions: analysis.interview_questions.clone(),
                status: decision.initial_status(),
            })
            .await?;

        let application = self
            .notify(decision, &candidate, &job, &analysis, application)
            .await?;
        info!(stage = %Stage::Persisted, application_id = %application.id, "Application recorded");

        self.registry
            .create_candidate_notification(&candidate.name, &job.title, analysis.match_score)
            .await;

        info!(stage = %Stage::Complete, candidate_id = %candidate.id, "Resume screening complete");
        Ok(UploadOutcome {
            candidate,
            application: ApplicationWithJob { application, job },
            analysis,
        })
    }

    async fn extract(&self, upload: &ResumeUpload) -> Result<ExtractedDocument, AppError> {
        let bytes = tokio::fs::read(upload.file.path())
            .await
            .context("failed to read uploaded resume")?;

        let kind = upload.kind;
        let document = tokio::task::spawn_blocking(move || extractor::extract(&bytes, kind))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("resume extraction task failed: {e}")))??;

        if !document.is_valid {
            warn!("Extracted text failed resume plausibility check");
            return Err(ExtractionError::ContentImplausible.into());
        }
        Ok(document)
    }

    /// Sends the decision email when the candidate has a usable address and
    /// folds the result into the stored application.
    async fn notify(
        &self,
        decision: Decision,
        candidate: &Candidate,
        job: &Job,
        analysis: &ScoringResult,
        mut application: Application,
    ) -> Result<Application, AppError> {
        let Some(email) = candidate.usable_email() else {
            info!(stage = %Stage::Notified, candidate_id = %candidate.id, "No usable candidate email, skipping notification");
            return Ok(application);
        };

        let delivered = match decision {
            Decision::Qualify => {
                // scheduled before the invite goes out, whether or not it arrives
                let scheduled = ApplicationPatch {
                    interview_scheduled: Some(true),
                    interview_date: Some(Utc::now() + Duration::hours(INTERVIEW_LEAD_HOURS)),
                    ..ApplicationPatch::default()
                };
                application = self.update(application, scheduled).await?;

                self.dispatcher
                    .send_interview_invite(
                        &candidate.name,
                        email,
                        &job.title,
                        AUTO_INVITE_WHEN_LABEL,
                        &analysis.interview_questions,
                    )
                    .await
            }
            Decision::Reject => {
                self.dispatcher
                    .send_rejection(&candidate.name, email, &job.title)
                    .await
            }
        };
        info!(
            stage = %Stage::Notified,
            candidate_id = %candidate.id,
            application_id = %application.id,
            delivered,
            "Candidate notification attempted"
        );

        self.update(application, ApplicationPatch::email_sent(delivered))
            .await
    }

    async fn update(
        &self,
        mut application: Application,
        patch: ApplicationPatch,
    ) -> Result<Application, AppError> {
        match self.storage.update_application(application.id, patch.clone()).await? {
            Some(updated) => Ok(updated),
            None => {
                warn!("Application {} vanished during update", application.id);
                patch.apply_to(&mut application);
                Ok(application)
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
