//! Run settings and the collaborator bundle shared by every row task.

use std::sync::Arc;

use promptsheet_core::notification::NotifyMode;
use promptsheet_core::ports::{AssetStore, ImageGenerator, Notifier, PromptStore};
use promptsheet_core::row::DEFAULT_SIZE;
use promptsheet_core::CoreError;

/// Default number of rows processed at the same time.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Values that shape a run, resolved once from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Folder holding both the daily sheets and the uploaded images.
    pub asset_folder_id: String,
    /// Size used when a row's size cell is blank.
    pub default_size: String,
    /// Style text prepended to every prompt (may be empty).
    pub style_preset_default: String,
    /// Maximum rows in flight. Values below one are treated as one.
    pub concurrency: usize,
    pub notify_mode: NotifyMode,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            asset_folder_id: String::new(),
            default_size: DEFAULT_SIZE.to_string(),
            style_preset_default: String::new(),
            concurrency: DEFAULT_CONCURRENCY,
            notify_mode: NotifyMode::default(),
        }
    }
}

impl PipelineSettings {
    /// Reject settings that would fail every row.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.asset_folder_id.trim().is_empty() {
            return Err(CoreError::Configuration(
                "Missing DRIVE_PARENT_FOLDER_ID".to_string(),
            ));
        }
        Ok(())
    }

    /// Admission gate width, never zero.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

/// The four external collaborators, shared across concurrent row tasks.
#[derive(Clone)]
pub struct PipelinePorts {
    pub store: Arc<dyn PromptStore>,
    pub assets: Arc<dyn AssetStore>,
    pub generator: Arc<dyn ImageGenerator>,
    pub notifier: Arc<dyn Notifier>,
}
