//! Fixed email templates. Each renders a subject plus rich and plain bodies.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

pub fn interview_invite(
    candidate_name: &str,
    job_title: &str,
    when_label: &str,
    questions: &[String],
) -> EmailContent {
    let subject = format!("Interview Invitation - {job_title} Position");

    let question_items: String = questions
        .iter()
        .map(|q| format!("<li>{}</li>", escape_html(q)))
        .collect();
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #1976d2;">Congratulations {name}!</h2>
  <p>We're excited to inform you that you've been selected for an interview for the <strong>{title}</strong> position.</p>
  <div style="background-color: #f5f5f5; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3>Interview Details:</h3>
    <p><strong>Date &amp; Time:</strong> {when}</p>
    <p><strong>Format:</strong> Video Interview</p>
    <p><strong>Duration:</strong> Approximately 45-60 minutes</p>
  </div>
  <h3>Preparation Materials:</h3>
  <p>To help you prepare, here are some areas we'll be discussing:</p>
  <ul>{question_items}</ul>
  <p>Please confirm your availability by replying to this email.</p>
  <p>We look forward to speaking with you!</p>
  <p>Best regards,<br>The HR Team</p>
</div>"#,
        name = escape_html(candidate_name),
        title = escape_html(job_title),
        when = escape_html(when_label),
    );

    let numbered = questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {q}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    let text = format!(
        "Congratulations {candidate_name}!\n\n\
         You've been selected for an interview for the {job_title} position.\n\n\
         Interview Date: {when_label}\n\
         Format: Video Interview\n\
         Duration: 45-60 minutes\n\n\
         Preparation areas:\n{numbered}\n\n\
         Please confirm your availability by replying to this email.\n\n\
         Best regards,\n\
         The HR Team\n"
    );

    EmailContent {
        subject,
        text,
        html,
    }
}

pub fn rejection(candidate_name: &str, job_title: &str) -> EmailContent {
    let subject = format!("Thank you for your application - {job_title} Position");

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #1976d2;">Thank you {name}</h2>
  <p>Thank you for your interest in the <strong>{title}</strong> position and for taking the time to apply.</p>
  <p>After careful consideration, we have decided to move forward with other candidates whose experience more closely matches our current needs.</p>
  <p>We encourage you to apply for future opportunities that match your background and experience. We'll keep your resume on file for consideration.</p>
  <p>We wish you the best of luck in your job search.</p>
  <p>Best regards,<br>The HR Team</p>
</div>"#,
        name = escape_html(candidate_name),
        title = escape_html(job_title),
    );

    let text = format!(
        "Thank you {candidate_name}\n\n\
         Thank you for your interest in the {job_title} position.\n\n\
         After careful consideration, we have decided to move forward with other candidates \
         whose experience more closely matches our current needs.\n\n\
         We encourage you to apply for future opportunities and wish you the best of luck \
         in your job search.\n\n\
         Best regards,\n\
         The HR Team\n"
    );

    EmailContent {
        subject,
        text,
        html,
    }
}

/// Candidate names and AI-written questions are untrusted input.
fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_lists_every_question_in_both_bodies() {
        let questions = vec![
            "How do you handle backpressure?".to_string(),
            "Describe a migration you led.".to_string(),
            "What is your testing strategy?".to_string(),
        ];
        let email = interview_invite("Ada", "Backend Engineer", "Tomorrow at 2:00 PM", &questions);

        assert_eq!(email.subject, "Interview Invitation - Backend Engineer Position");
        assert!(email.text.contains("Interview Date: Tomorrow at 2:00 PM"));
        assert!(email.text.contains("3. What is your testing strategy?"));
        assert_eq!(email.html.matches("<li>").count(), 3);
    }

    #[test]
    fn test_rejection_mentions_job() {
        let email = rejection("Grace", "Data Analyst");
        assert_eq!(
            email.subject,
            "Thank you for your application - Data Analyst Position"
        );
        assert!(email.text.starts_with("Thank you Grace"));
        assert!(email.html.contains("<strong>Data Analyst</strong>"));
    }

    #[test]
    fn test_html_body_escapes_untrusted_input() {
        let email = rejection("<script>alert(1)</script>", "Ops & SRE");
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("&lt;script&gt;"));
        assert!(email.html.contains("Ops &amp; SRE"));
        // plain text is sent verbatim
        assert!(email.text.contains("Ops & SRE"));
    }
}
