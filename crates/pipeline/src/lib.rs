//! Batch orchestration: pick rows from a daily prompt sheet, generate their
//! images, and record results back to the sheet.
//!
//! All I/O goes through the ports in [`promptsheet_core::ports`]; this crate
//! holds no HTTP code.

pub mod orchestrator;
pub mod processor;
pub mod settings;

pub use orchestrator::{RowSelection, RunSummary, SheetOrchestrator, SheetTarget};
pub use processor::{RowOutcome, RowProcessor, SkipReason};
pub use settings::{PipelinePorts, PipelineSettings};
