//! Prompts for the resume-vs-job fit judge.

pub const FIT_SCORING_SYSTEM: &str = "You are an expert HR professional and resume analyzer. \
    Analyze the candidate's resume against the job description and provide a comprehensive evaluation. \
    Be precise with scoring. \
    You MUST respond with a single JSON object in the exact shape requested and nothing else.";

/// Placeholders: `{job_description}`, `{resume_text}`.
pub const FIT_SCORING_PROMPT_TEMPLATE: &str = r#"Job Description:
{job_description}

Resume:
{resume_text}

Analyze this resume against the job description and provide:
1. A match score from 0-100 (where 100 is a perfect match). Be realistic and precise.
2. Candidate strengths (2-5 items).
3. Areas for improvement or missing skills (2-5 items).
4. A brief summary of the candidate (2-3 sentences, at least 50 characters).
5. 3-4 relevant interview questions based on the analysis.

Consider technical skills, experience level, cultural fit indicators, and overall qualification level.
Score conservatively but fairly. Only exceptional matches should score above 90.

Return exactly this JSON shape:
{
  "matchScore": <integer 0-100>,
  "strengths": ["<string>", ...],
  "weaknesses": ["<string>", ...],
  "summary": "<string>",
  "interviewQuestions": ["<string>", ...]
}"#;
