// Dashboard API around the screening pipeline: job postings, candidate
// listings, manual interview actions, and summary statistics.

pub mod handlers;

use serde::Serialize;

use crate::models::{Application, Job};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_applications: usize,
    pub shortlisted: usize,
    pub interviews: usize,
    pub avg_score: i32,
    pub active_jobs: usize,
}

impl DashboardStats {
    /// `avg_score` is the rounded mean over scored applications, 0 when none.
    pub fn compute(applications: &[Application], jobs: &[Job]) -> Self {
        let scores: Vec<i32> = applications.iter().filter_map(|a| a.match_score).collect();
        let avg_score = if scores.is_empty() {
            0
        } else {
            let total: i64 = scores.iter().map(|&s| i64::from(s)).sum();
            (total as f64 / scores.len() as f64).round() as i32
        };

        Self {
            total_applications: applications.len(),
            shortlisted: applications
                .iter()
                .filter(|a| a.status.is_shortlisted())
                .count(),
            interviews: applications
                .iter()
                .filter(|a| a.interview_scheduled)
                .count(),
            avg_score,
            active_jobs: jobs.iter().filter(|j| j.is_active()).count(),
        }
    }
}
