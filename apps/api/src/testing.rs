//! Collaborator fakes shared by the unit and router tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing_subscriber::fmt::MakeWriter;

use crate::notifications::transport::{EmailMessage, MailTransport};
use crate::screening::fit_scoring::{FitScorer, ScoreOutcome, ScoringResult};

/// Returns the same outcome for every resume and counts calls.
pub struct FixedScorer {
    outcome: ScoreOutcome,
    calls: AtomicUsize,
}

impl FixedScorer {
    pub fn judged(match_score: u8) -> Arc<Self> {
        Arc::new(Self {
            outcome: ScoreOutcome::Judged(ScoringResult {
                match_score,
                strengths: vec![
                    "Strong Rust background".to_string(),
                    "Distributed systems".to_string(),
                    "PostgreSQL".to_string(),
                ],
                weaknesses: vec!["No Kafka".to_string(), "Limited frontend".to_string()],
                summary: "Experienced backend engineer with a solid systems background."
                    .to_string(),
                interview_questions: vec![
                    "How do you design for failure?".to_string(),
                    "Describe a hard migration.".to_string(),
                    "How do you test async code?".to_string(),
                ],
            }),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn fallback() -> Arc<Self> {
        Arc::new(Self {
            outcome: ScoreOutcome::Fallback(ScoringResult::fallback()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FitScorer for FixedScorer {
    async fn score(&self, _resume_text: &str, _job_description: &str) -> ScoreOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Records every message and reports a fixed delivery result.
pub struct RecordingTransport {
    sent: Mutex<Vec<EmailMessage>>,
    deliver: bool,
}

impl RecordingTransport {
    pub fn new(deliver: bool) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            deliver,
        })
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, message: &EmailMessage) -> bool {
        self.sent.lock().unwrap().push(message.clone());
        self.deliver
    }
}

/// Collects formatted log output while the returned guard is alive.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
