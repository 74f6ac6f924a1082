use std::sync::Arc;

use tracing::{info, warn};

use super::templates::{self, EmailContent};
use super::transport::{EmailMessage, MailTransport};

/// Sends the candidate-facing emails. Delivery failures come back as
/// `false` and are never raised.
#[derive(Clone)]
pub struct NotificationDispatcher {
    transport: Arc<dyn MailTransport>,
    from: String,
}

impl NotificationDispatcher {
    pub fn new(transport: Arc<dyn MailTransport>, from: impl Into<String>) -> Self {
        Self {
            transport,
            from: from.into(),
        }
    }

    pub async fn send_interview_invite(
        &self,
        candidate_name: &str,
        candidate_email: &str,
        job_title: &str,
        when_label: &str,
        questions: &[String],
    ) -> bool {
        let content = templates::interview_invite(candidate_name, job_title, when_label, questions);
        self.dispatch("interview invite", candidate_email, content)
            .await
    }

    pub async fn send_rejection(
        &self,
        candidate_name: &str,
        candidate_email: &str,
        job_title: &str,
    ) -> bool {
        let content = templates::rejection(candidate_name, job_title);
        self.dispatch("rejection", candidate_email, content).await
    }

    async fn dispatch(&self, label: &str, to: &str, content: EmailContent) -> bool {
        let message = EmailMessage {
            to: to.to_string(),
            from: self.from.clone(),
            subject: content.subject,
            text: content.text,
            html: content.html,
        };

        let delivered = self.transport.send(&message).await;
        if delivered {
            info!("Sent {label} email");
        } else {
            warn!("Failed to send {label} email");
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{LogCapture, RecordingTransport};

    fn dispatcher(deliver: bool) -> (NotificationDispatcher, Arc<RecordingTransport>) {
        let transport = RecordingTransport::new(deliver);
        (
            NotificationDispatcher::new(transport.clone(), "hr@company.com"),
            transport,
        )
    }

    #[tokio::test]
    async fn test_invite_is_addressed_and_delivered() {
        let (dispatcher, transport) = dispatcher(true);
        let delivered = dispatcher
            .send_interview_invite(
                "Ada",
                "ada@example.com",
                "Backend Engineer",
                "Tomorrow at 2:00 PM",
                &["Why Rust?".to_string()],
            )
            .await;

        assert!(delivered);
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ada@example.com");
        assert_eq!(sent[0].from, "hr@company.com");
        assert!(sent[0].subject.starts_with("Interview Invitation"));
    }

    #[tokio::test]
    async fn test_failed_rejection_returns_false() {
        let (dispatcher, transport) = dispatcher(false);
        let delivered = dispatcher
            .send_rejection("Grace", "grace@example.com", "Data Analyst")
            .await;

        assert!(!delivered);
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_logs_never_contain_the_address() {
        let (logs, _guard) = LogCapture::install();
        let (dispatcher, _) = dispatcher(false);
        dispatcher
            .send_rejection("Grace", "grace@example.com", "Data Analyst")
            .await;

        let output = logs.output();
        assert!(output.contains("Failed to send rejection email"));
        assert!(!output.contains("grace@example.com"));
    }
}
