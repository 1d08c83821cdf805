use std::sync::Arc;

use promptsheet_core::CoreError;
use promptsheet_pipeline::SheetOrchestrator;

use crate::error::AppError;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable. The orchestrator is built once at startup; when the
/// pipeline is misconfigured the server still starts and every run request
/// reports the stored configuration error.
#[derive(Clone)]
pub struct AppState {
    pipeline: Result<Arc<SheetOrchestrator>, CoreError>,
}

impl AppState {
    pub fn new(pipeline: Result<Arc<SheetOrchestrator>, CoreError>) -> Self {
        Self { pipeline }
    }

    /// The orchestrator, or the configuration error that prevented building it.
    pub fn orchestrator(&self) -> Result<Arc<SheetOrchestrator>, AppError> {
        self.pipeline.clone().map_err(AppError::Core)
    }
}
