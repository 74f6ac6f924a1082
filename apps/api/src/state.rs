use std::sync::Arc;

use crate::notifications::NotificationDispatcher;
use crate::screening::ScreeningPipeline;
use crate::storage::Storage;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    /// Used directly by the manual invite and reject actions.
    pub dispatcher: NotificationDispatcher,
    pub pipeline: ScreeningPipeline,
}
