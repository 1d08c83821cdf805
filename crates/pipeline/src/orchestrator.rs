//! Sheet-level runs: resolve the spreadsheet, list rows, and fan rows out
//! to the [`RowProcessor`] behind a fixed-size admission gate.

use std::collections::BTreeSet;
use std::sync::Arc;

use promptsheet_core::layout::FIRST_DATA_ROW;
use promptsheet_core::ports::PromptStore;
use promptsheet_core::row::{ProcessMode, PromptRow};
use promptsheet_core::CoreError;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::processor::{RowOutcome, RowProcessor};
use crate::settings::{PipelinePorts, PipelineSettings};

/// Which spreadsheet a run operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetTarget {
    /// A spreadsheet id supplied by the caller.
    Existing(String),
    /// The daily sheet named after this date, created when missing.
    ForDate(String),
}

/// Which rows a run processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSelection {
    /// Every eligible row, normal mode.
    All,
    /// Exactly these 1-based row numbers, regen mode. Duplicates collapse;
    /// numbers outside the sheet are ignored.
    Rows(Vec<u32>),
}

impl RowSelection {
    fn mode(&self) -> ProcessMode {
        match self {
            RowSelection::All => ProcessMode::Normal,
            RowSelection::Rows(_) => ProcessMode::Regen,
        }
    }
}

/// Counters for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub spreadsheet_id: String,
    /// Rows admitted to the gate.
    pub rows_admitted: usize,
    /// Rows that went through generation (possibly ending in ERROR).
    pub rows_processed: usize,
    pub rows_skipped: usize,
    pub variants_succeeded: u32,
    pub variants_failed: u32,
    /// Row tasks that panicked or were cancelled.
    pub tasks_failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Skipped(_) => self.rows_skipped += 1,
            RowOutcome::Processed { succeeded, failed } => {
                self.rows_processed += 1;
                self.variants_succeeded += succeeded;
                self.variants_failed += failed;
            }
        }
    }
}

/// Runs whole sheets. Cheap to share behind an [`Arc`].
pub struct SheetOrchestrator {
    store: Arc<dyn PromptStore>,
    processor: Arc<RowProcessor>,
    settings: Arc<PipelineSettings>,
}

impl std::fmt::Debug for SheetOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetOrchestrator").finish_non_exhaustive()
    }
}

impl SheetOrchestrator {
    pub fn new(ports: PipelinePorts, settings: PipelineSettings) -> Self {
        let settings = Arc::new(settings);
        Self {
            store: Arc::clone(&ports.store),
            processor: Arc::new(RowProcessor::new(ports, Arc::clone(&settings))),
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Turn a target into a spreadsheet id, creating the daily sheet if needed.
    pub async fn resolve_sheet(&self, target: &SheetTarget) -> Result<String, CoreError> {
        match target {
            SheetTarget::Existing(id) => Ok(id.clone()),
            SheetTarget::ForDate(date) => {
                self.store
                    .find_or_create_sheet(date, &self.settings.asset_folder_id)
                    .await
            }
        }
    }

    /// Process the selected rows of one spreadsheet and wait for every
    /// admitted row to finish.
    ///
    /// Only configuration and initial store failures are returned; per-row
    /// failures are recorded on the rows themselves.
    pub async fn run(
        &self,
        target: SheetTarget,
        selection: RowSelection,
    ) -> Result<RunSummary, CoreError> {
        self.settings.validate()?;

        let spreadsheet_id = self.resolve_sheet(&target).await?;
        let rows = self.store.list_rows(&spreadsheet_id).await?;
        let mode = selection.mode();
        let wanted: Option<BTreeSet<u32>> = match &selection {
            RowSelection::All => None,
            RowSelection::Rows(numbers) => Some(numbers.iter().copied().collect()),
        };

        let concurrency = self.settings.effective_concurrency();
        tracing::info!(
            spreadsheet_id = %spreadsheet_id,
            rows = rows.len(),
            ?mode,
            concurrency,
            "Starting sheet run"
        );

        let mut summary = RunSummary {
            spreadsheet_id: spreadsheet_id.clone(),
            ..Default::default()
        };
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut join_set: JoinSet<RowOutcome> = JoinSet::new();
        let sheet_id: Arc<str> = Arc::from(spreadsheet_id.as_str());

        for (offset, cells) in rows.into_iter().enumerate() {
            let row_number = FIRST_DATA_ROW + offset as u32;
            if wanted.as_ref().is_some_and(|w| !w.contains(&row_number)) {
                continue;
            }
            let row = PromptRow::from_cells(row_number, &cells, &self.settings.default_size);

            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| CoreError::Internal(format!("Row admission gate closed: {e}")))?;
            let processor = Arc::clone(&self.processor);
            let sheet_id = Arc::clone(&sheet_id);
            summary.rows_admitted += 1;

            join_set.spawn(async move {
                let _permit = permit;
                processor.process(&sheet_id, &row, mode).await
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(outcome) => summary.record(outcome),
                Err(e) => {
                    summary.tasks_failed += 1;
                    tracing::error!(spreadsheet_id = %spreadsheet_id, error = %e, "Row task failed");
                }
            }
        }

        tracing::info!(
            spreadsheet_id = %spreadsheet_id,
            processed = summary.rows_processed,
            skipped = summary.rows_skipped,
            variants_ok = summary.variants_succeeded,
            variants_failed = summary.variants_failed,
            "Sheet run finished"
        );
        Ok(summary)
    }
}
