//! Ports consumed by the pipeline.
//!
//! Each trait is the seam to one external collaborator: the spreadsheet
//! holding prompt rows, the storage receiving generated images, the image
//! model, and the chat channel. Adapters convert their own error types into
//! [`CoreError`] before returning.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::notification::Notification;

/// Tabular prompt storage (one spreadsheet per day).
#[async_trait]
pub trait PromptStore: Send + Sync {
    /// Return the id of the spreadsheet named `date` inside `folder_id`,
    /// creating it with the standard header layout when missing.
    async fn find_or_create_sheet(&self, date: &str, folder_id: &str)
        -> Result<String, CoreError>;

    /// All data rows (row 2 onward), as raw cell text.
    async fn list_rows(&self, spreadsheet_id: &str) -> Result<Vec<Vec<String>>, CoreError>;

    /// Overwrite `cells.len()` cells of one row starting at column A, in a
    /// single update.
    async fn write_row(
        &self,
        spreadsheet_id: &str,
        row_number: u32,
        cells: &[String],
    ) -> Result<(), CoreError>;

    /// Current variant-slot cells of one row (column K onward).
    async fn read_variant_slots(
        &self,
        spreadsheet_id: &str,
        row_number: u32,
    ) -> Result<Vec<String>, CoreError>;

    /// Overwrite a single cell (1-based column).
    async fn write_cell(
        &self,
        spreadsheet_id: &str,
        row_number: u32,
        column: usize,
        value: &str,
    ) -> Result<(), CoreError>;
}

/// Binary asset storage with public, embeddable links.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Upload PNG bytes as `file_name` into `folder_id`; returns the asset id.
    async fn upload_png(
        &self,
        folder_id: &str,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<String, CoreError>;

    /// Make the asset publicly readable and return its web link.
    async fn public_link(&self, asset_id: &str) -> Result<String, CoreError>;
}

/// Text-to-image generation.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate exactly one image and return its raw bytes.
    async fn generate(&self, prompt: &str, size: &str) -> Result<Vec<u8>, CoreError>;
}

/// Chat notification channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post an event. Implementations report failures, callers ignore them.
    async fn notify(&self, event: &Notification) -> Result<(), CoreError>;
}

/// Notifier that drops every event.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _event: &Notification) -> Result<(), CoreError> {
        Ok(())
    }
}
