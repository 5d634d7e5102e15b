//! Shared state injected into HTTP handlers.

use std::sync::Arc;

use crate::application::services::ReportService;
use crate::domain::repositories::ReportRepository;

#[derive(Clone)]
pub struct AppState {
    pub report_service: Arc<ReportService<dyn ReportRepository>>,
}

impl AppState {
    /// Builds the state over any report repository.
    pub fn new(repository: Arc<dyn ReportRepository>) -> Self {
        Self {
            report_service: Arc::new(ReportService::new(repository)),
        }
    }
}
