//! Fit Scoring — asks the external AI judge how well a resume fits a job.
//!
//! The judge is untrusted: every response is deserialized into a pinned shape
//! and range-checked. Failed attempts are retried with exponential backoff,
//! and after the last one the scorer returns a fixed fallback instead of an
//! error, so an upload always reaches a decision.
//!
//! The screening pipeline holds an `Arc<dyn FitScorer>`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{CompletionBackend, LlmError};
use crate::screening::prompts::{FIT_SCORING_PROMPT_TEMPLATE, FIT_SCORING_SYSTEM};

pub const MAX_ATTEMPTS: u32 = 3;
pub const BASE_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_SCORE: f64 = 100.0;

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

/// Judge verdict for one resume against one job.
///
/// `match_score` is always within 0–100 and both `strengths` and
/// `weaknesses` are non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    pub match_score: u8,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub summary: String,
    pub interview_questions: Vec<String>,
}

impl ScoringResult {
    /// Returned when every attempt against the judge failed.
    pub fn fallback() -> Self {
        Self {
            match_score: 0,
            strengths: vec!["Unable to analyze resume - please try again".to_string()],
            weaknesses: vec!["AI analysis temporarily unavailable".to_string()],
            summary: "Resume analysis failed due to technical issues. \
                Please try uploading again or contact support."
                .to_string(),
            interview_questions: vec![
                "Can you walk me through your relevant experience for this role?".to_string(),
                "What interests you most about this position?".to_string(),
                "How do you approach learning new technologies?".to_string(),
                "What are your career goals for the next few years?".to_string(),
            ],
        }
    }
}

/// Whether the result came from the judge or from the fallback.
///
/// Both carry the same `ScoringResult` shape; downstream code only looks at
/// the distinction for logging.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutcome {
    Judged(ScoringResult),
    Fallback(ScoringResult),
}

impl ScoreOutcome {
    pub fn result(&self) -> &ScoringResult {
        match self {
            ScoreOutcome::Judged(r) | ScoreOutcome::Fallback(r) => r,
        }
    }

    pub fn into_result(self) -> ScoringResult {
        match self {
            ScoreOutcome::Judged(r) | ScoreOutcome::Fallback(r) => r,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ScoreOutcome::Fallback(_))
    }
}

/// Why a single attempt was discarded. Never leaves this module.
#[derive(Debug, Error)]
enum ScoringError {
    #[error("judge call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("judge did not answer within {0:?}")]
    Timeout(Duration),

    #[error("judge returned an empty body")]
    EmptyResponse,

    #[error("judge response did not match the expected shape: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("matchScore {0} is outside 0-100")]
    ScoreOutOfRange(f64),

    #[error("judge returned no strengths")]
    EmptyStrengths,

    #[error("judge returned no weaknesses")]
    EmptyWeaknesses,

    #[error("judge returned an empty summary")]
    EmptySummary,
}

/// The shape the judge is asked to produce, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JudgeResponse {
    match_score: f64,
    strengths: Vec<String>,
    weaknesses: Vec<String>,
    summary: String,
    interview_questions: Vec<String>,
}

impl JudgeResponse {
    fn validate(self) -> Result<ScoringResult, ScoringError> {
        let score = self.match_score;
        if !score.is_finite() || !(0.0..=MAX_SCORE).contains(&score) {
            return Err(ScoringError::ScoreOutOfRange(score));
        }

        let strengths = non_blank(self.strengths);
        if strengths.is_empty() {
            return Err(ScoringError::EmptyStrengths);
        }
        let weaknesses = non_blank(self.weaknesses);
        if weaknesses.is_empty() {
            return Err(ScoringError::EmptyWeaknesses);
        }
        let summary = self.summary.trim().to_string();
        if summary.is_empty() {
            return Err(ScoringError::EmptySummary);
        }

        Ok(ScoringResult {
            match_score: score.round() as u8,
            strengths,
            weaknesses,
            summary,
            interview_questions: non_blank(self.interview_questions),
        })
    }
}

fn non_blank(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Fills the template placeholders in a single pass, so placeholder-like text
/// inside either input is never substituted again.
fn render_prompt(job_description: &str, resume_text: &str) -> String {
    let mut out = String::with_capacity(
        FIT_SCORING_PROMPT_TEMPLATE.len() + job_description.len() + resume_text.len(),
    );
    let mut rest = FIT_SCORING_PROMPT_TEMPLATE;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        if let Some(after) = tail.strip_prefix("{job_description}") {
            out.push_str(job_description);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{resume_text}") {
            out.push_str(resume_text);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

/// `base * 2^(attempt-1)`: 1s before attempt 2, 2s before attempt 3.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base * (1u32 << attempt.saturating_sub(1))
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Infallible by contract: implementations absorb judge failures.
#[async_trait]
pub trait FitScorer: Send + Sync {
    async fn score(&self, resume_text: &str, job_description: &str) -> ScoreOutcome;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmFitScorer
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmFitScorer {
    backend: Arc<dyn CompletionBackend>,
    attempt_timeout: Duration,
    base_delay: Duration,
}

impl LlmFitScorer {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            backend,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            base_delay: BASE_DELAY,
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    async fn attempt(&self, prompt: &str, system: &str) -> Result<ScoringResult, ScoringError> {
        let raw = tokio::time::timeout(self.attempt_timeout, self.backend.complete(prompt, system))
            .await
            .map_err(|_| ScoringError::Timeout(self.attempt_timeout))??;

        if raw.trim().is_empty() {
            return Err(ScoringError::EmptyResponse);
        }

        let response: JudgeResponse = serde_json::from_str(raw.trim())?;
        response.validate()
    }
}

#[async_trait]
impl FitScorer for LlmFitScorer {
    async fn score(&self, resume_text: &str, job_description: &str) -> ScoreOutcome {
        let prompt = render_prompt(job_description, resume_text);
        let system = format!("{FIT_SCORING_SYSTEM}\n\n{JSON_ONLY_SYSTEM}");

        for attempt in 1..=MAX_ATTEMPTS {
            info!("Scoring resume (attempt {attempt}/{MAX_ATTEMPTS})");

            match self.attempt(&prompt, &system).await {
                Ok(result) => {
                    info!("Resume scored {} on attempt {attempt}", result.match_score);
                    return ScoreOutcome::Judged(result);
                }
                Err(e) if attempt < MAX_ATTEMPTS => {
                    let delay = backoff_delay(self.base_delay, attempt);
                    warn!(
                        "Scoring attempt {attempt} failed: {e}; retrying after {}ms",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    warn!("Scoring attempt {attempt} failed: {e}; all attempts exhausted");
                }
            }
        }

        warn!("Falling back to the default scoring result");
        ScoreOutcome::Fallback(ScoringResult::fallback())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
