//! Per-row processing: generate each variant, store it, record the result.
//!
//! Variants of one row run strictly in sequence. Failures never escape a
//! row: they are written back as an ERROR row and reported to the notifier.

use std::sync::Arc;

use promptsheet_core::layout::{next_variant_column, BaseColumns};
use promptsheet_core::links::image_formula;
use promptsheet_core::naming::asset_filename;
use promptsheet_core::notification::Notification;
use promptsheet_core::prompt::compose_final_prompt;
use promptsheet_core::row::{ProcessMode, PromptRow, RowStatus};
use promptsheet_core::CoreError;

use crate::settings::{PipelinePorts, PipelineSettings};

/// Why a row was left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    EmptyPrompt,
    /// Status not eligible for a normal run.
    Ineligible(RowStatus),
}

/// Result of processing one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Skipped(SkipReason),
    Processed { succeeded: u32, failed: u32 },
}

/// Processes single rows against the configured collaborators.
pub struct RowProcessor {
    ports: PipelinePorts,
    settings: Arc<PipelineSettings>,
}

impl RowProcessor {
    pub fn new(ports: PipelinePorts, settings: Arc<PipelineSettings>) -> Self {
        Self { ports, settings }
    }

    /// Process one row. Never returns an error; per-variant failures are
    /// recorded on the row and counted in the outcome.
    pub async fn process(
        &self,
        spreadsheet_id: &str,
        row: &PromptRow,
        mode: ProcessMode,
    ) -> RowOutcome {
        if !row.has_prompt() {
            tracing::debug!(row = row.row_number, "Skipping row without prompt");
            return RowOutcome::Skipped(SkipReason::EmptyPrompt);
        }
        if mode == ProcessMode::Normal && !row.status.is_eligible_for_run() {
            tracing::debug!(row = row.row_number, status = %row.status, "Skipping ineligible row");
            return RowOutcome::Skipped(SkipReason::Ineligible(row.status.clone()));
        }

        let final_prompt = compose_final_prompt(
            &self.settings.style_preset_default,
            &row.style_preset,
            &row.prompt,
        );
        tracing::info!(
            row = row.row_number,
            index = %row.index,
            variants = row.variant_count,
            ?mode,
            "Processing row"
        );

        let mut succeeded = 0;
        let mut failed = 0;
        for variant in 0..row.variant_count {
            let is_base = mode == ProcessMode::Normal && variant == 0;
            match self
                .generate_variant(spreadsheet_id, row, &final_prompt, variant, is_base)
                .await
            {
                Ok(file_id) => {
                    succeeded += 1;
                    self.notify(Notification::ImageReady {
                        spreadsheet_id: spreadsheet_id.to_string(),
                        row_number: row.row_number,
                        index: row.index.clone(),
                        file_id,
                        prompt: row.prompt.clone(),
                        is_base,
                    })
                    .await;
                }
                Err(e) => {
                    failed += 1;
                    self.record_failure(spreadsheet_id, row, variant, &e).await;
                }
            }
        }

        RowOutcome::Processed { succeeded, failed }
    }

    /// Generate, upload and record one variant. Returns the asset id.
    async fn generate_variant(
        &self,
        spreadsheet_id: &str,
        row: &PromptRow,
        final_prompt: &str,
        variant: u32,
        is_base: bool,
    ) -> Result<String, CoreError> {
        let png = self.ports.generator.generate(final_prompt, &row.size).await?;

        let file_name = asset_filename(&row.index, variant, row.variant_count);
        let file_id = self
            .ports
            .assets
            .upload_png(&self.settings.asset_folder_id, &file_name, png)
            .await?;
        let web_link = self.ports.assets.public_link(&file_id).await?;

        if is_base {
            let cells = BaseColumns::done(row, &file_id, &web_link).to_cells();
            self.ports
                .store
                .write_row(spreadsheet_id, row.row_number, &cells)
                .await?;
        }

        self.append_variant(spreadsheet_id, row.row_number, &file_id)
            .await?;

        tracing::info!(row = row.row_number, variant, file_id = %file_id, file_name, "Variant stored");
        Ok(file_id)
    }

    /// Place a preview formula in the leftmost free variant slot, read fresh
    /// from the store.
    async fn append_variant(
        &self,
        spreadsheet_id: &str,
        row_number: u32,
        file_id: &str,
    ) -> Result<(), CoreError> {
        let slots = self
            .ports
            .store
            .read_variant_slots(spreadsheet_id, row_number)
            .await?;
        let column = next_variant_column(&slots);
        self.ports
            .store
            .write_cell(spreadsheet_id, row_number, column, &image_formula(file_id))
            .await
    }

    async fn record_failure(
        &self,
        spreadsheet_id: &str,
        row: &PromptRow,
        variant: u32,
        error: &CoreError,
    ) {
        tracing::warn!(row = row.row_number, variant, error = %error, "Variant failed");

        let message = error.to_string();
        let cells = BaseColumns::error(row, &message).to_cells();
        if let Err(write_err) = self
            .ports
            .store
            .write_row(spreadsheet_id, row.row_number, &cells)
            .await
        {
            // The row keeps whatever it held before; only the log has the cause.
            tracing::error!(
                row = row.row_number,
                error = %write_err,
                original_error = %error,
                "Failed to write ERROR status"
            );
        }

        self.notify(Notification::GenerationFailed {
            spreadsheet_id: spreadsheet_id.to_string(),
            row_number: row.row_number,
            index: row.index.clone(),
            prompt: row.prompt.clone(),
            error: message,
        })
        .await;
    }

    /// Forward an event if the notify mode allows it. Delivery errors are dropped.
    async fn notify(&self, event: Notification) {
        if !self.settings.notify_mode.allows(&event) {
            return;
        }
        if let Err(e) = self.ports.notifier.notify(&event).await {
            tracing::debug!(row = event.row_number(), error = %e, "Notification dropped");
        }
    }
}
