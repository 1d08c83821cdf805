//! Handlers that trigger sheet runs.
//!
//! Routes:
//! - `POST /run`         process every eligible row of a daily or given sheet
//! - `POST /regenerate`  regenerate specific rows of a given sheet
//!
//! Both block until the run has finished. Row failures are recorded in the
//! sheet and do not change the response.

use axum::extract::State;
use axum::Json;
use promptsheet_core::CoreError;
use promptsheet_pipeline::{RowSelection, SheetTarget};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::state::AppState;

/// Status reported once a run has completed.
pub const STATUS_QUEUED_DONE: &str = "queued_done";

/// Date format of the default daily sheet name.
const SHEET_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    /// Daily sheet name, used verbatim; defaults to today's local date.
    pub date: Option<String>,
    /// Existing spreadsheet; takes precedence over `date`.
    pub spreadsheet_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    pub status: &'static str,
    pub spreadsheet_id: String,
    pub processed_rows: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateRequest {
    pub spreadsheet_id: String,
    pub rows: Vec<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateResponse {
    pub status: &'static str,
    pub spreadsheet_id: String,
    pub rows: Vec<u32>,
    pub processed_rows: usize,
}

impl RunRequest {
    /// Resolve the request into a sheet target. Blank fields count as absent.
    pub fn target(&self) -> SheetTarget {
        if let Some(id) = non_blank(&self.spreadsheet_id) {
            return SheetTarget::Existing(id.to_string());
        }
        let date = non_blank(&self.date).map_or_else(today, str::to_string);
        SheetTarget::ForDate(date)
    }
}

/// POST /run
pub async fn run(
    State(state): State<AppState>,
    Json(input): Json<RunRequest>,
) -> AppResult<Json<RunResponse>> {
    let orchestrator = state.orchestrator()?;
    let summary = orchestrator.run(input.target(), RowSelection::All).await?;

    Ok(Json(RunResponse {
        status: STATUS_QUEUED_DONE,
        spreadsheet_id: summary.spreadsheet_id,
        processed_rows: summary.rows_processed,
    }))
}

/// POST /regenerate
pub async fn regenerate(
    State(state): State<AppState>,
    Json(input): Json<RegenerateRequest>,
) -> AppResult<Json<RegenerateResponse>> {
    let orchestrator = state.orchestrator()?;
    let spreadsheet_id = input.spreadsheet_id.trim().to_string();
    if spreadsheet_id.is_empty() {
        return Err(CoreError::Validation("spreadsheetId must not be empty".into()).into());
    }

    let summary = orchestrator
        .run(
            SheetTarget::Existing(spreadsheet_id),
            RowSelection::Rows(input.rows.clone()),
        )
        .await?;

    Ok(Json(RegenerateResponse {
        status: STATUS_QUEUED_DONE,
        spreadsheet_id: summary.spreadsheet_id,
        rows: input.rows,
        processed_rows: summary.rows_processed,
    }))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Today's date in the server's local time zone.
fn today() -> String {
    chrono::Local::now()
        .date_naive()
        .format(SHEET_DATE_FORMAT)
        .to_string()
}
