pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::recruiting::handlers as recruiting;
use crate::screening::handlers::{self as screening, UPLOAD_BODY_LIMIT};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route(
            "/api/jobs",
            get(recruiting::handle_list_jobs).post(recruiting::handle_create_job),
        )
        // Candidates
        .route("/api/candidates", get(recruiting::handle_list_candidates))
        .route("/api/candidates/:id", get(recruiting::handle_get_candidate))
        // Screening
        .route(
            "/api/upload-resume",
            post(screening::handle_upload_resume).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        // Interview actions
        .route(
            "/api/schedule-interview/:id",
            post(recruiting::handle_schedule_interview),
        )
        .route("/api/send-invite/:id", post(recruiting::handle_send_invite))
        .route("/api/reject/:id", post(recruiting::handle_reject))
        .route(
            "/api/dashboard-stats",
            get(recruiting::handle_dashboard_stats),
        )
        .with_state(state)
}
