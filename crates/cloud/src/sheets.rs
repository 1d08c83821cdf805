//! Google Sheets v4 client implementing the prompt store.

use async_trait::async_trait;
use promptsheet_core::layout::{
    cell_range, data_range, header_range, row_range, variant_header_range, variant_slots_range,
    HEADERS, SHEET_NAME, VARIANT_HEADERS,
};
use promptsheet_core::ports::PromptStore;
use promptsheet_core::CoreError;
use serde::Deserialize;

use crate::auth::AccessToken;
use crate::drive::DriveClient;
use crate::error::{ensure_success, CloudError};

/// Sheets API base.
pub const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// How written values are interpreted by Sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueInput {
    /// Stored verbatim.
    Raw,
    /// Parsed as if typed by a user (formulas such as `=IMAGE()` evaluate).
    UserEntered,
}

impl ValueInput {
    fn as_str(self) -> &'static str {
        match self {
            ValueInput::Raw => "RAW",
            ValueInput::UserEntered => "USER_ENTERED",
        }
    }
}

/// How read values are rendered by Sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRender {
    /// Display text. Cells whose only content is an image render empty.
    Formatted,
    /// Formulas as typed, e.g. `=IMAGE("...")`.
    Formula,
}

impl ValueRender {
    fn as_str(self) -> &'static str {
        match self {
            ValueRender::Formatted => "FORMATTED_VALUE",
            ValueRender::Formula => "FORMULA",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// HTTP client for the Sheets API. Uses Drive to locate daily sheets.
#[derive(Clone)]
pub struct SheetsClient {
    client: reqwest::Client,
    token: AccessToken,
    api_url: String,
    drive: DriveClient,
}

impl SheetsClient {
    pub fn new(client: reqwest::Client, token: AccessToken, drive: DriveClient) -> Self {
        Self {
            client,
            token,
            api_url: SHEETS_API_URL.to_string(),
            drive,
        }
    }

    /// Read a range as rows of cell text.
    pub async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        render: ValueRender,
    ) -> Result<Vec<Vec<String>>, CloudError> {
        let response = self
            .get_values_request(spreadsheet_id, range, render)
            .send()
            .await?;

        let value_range: ValueRange = ensure_success(response).await?.json().await?;
        Ok(into_text_rows(value_range))
    }

    fn get_values_request(
        &self,
        spreadsheet_id: &str,
        range: &str,
        render: ValueRender,
    ) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}/{spreadsheet_id}/values/{range}", self.api_url))
            .bearer_auth(self.token.as_str())
            .query(&[("valueRenderOption", render.as_str())])
    }

    /// Overwrite a range with `values`.
    pub async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<String>>,
        input: ValueInput,
    ) -> Result<(), CloudError> {
        let body = serde_json::json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": values,
        });

        let response = self
            .client
            .put(format!("{}/{spreadsheet_id}/values/{range}", self.api_url))
            .bearer_auth(self.token.as_str())
            .query(&[("valueInputOption", input.as_str())])
            .json(&body)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    /// Rename the first tab (sheet id 0) of a freshly created spreadsheet.
    pub async fn rename_first_tab(&self, spreadsheet_id: &str, title: &str) -> Result<(), CloudError> {
        let body = serde_json::json!({
            "requests": [{
                "updateSheetProperties": {
                    "properties": { "sheetId": 0, "title": title },
                    "fields": "title",
                }
            }]
        });

        let response = self
            .client
            .post(format!("{}/{spreadsheet_id}:batchUpdate", self.api_url))
            .bearer_auth(self.token.as_str())
            .json(&body)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    /// Prepare a new spreadsheet: tab name and both header ranges.
    async fn initialise_layout(&self, spreadsheet_id: &str) -> Result<(), CloudError> {
        self.rename_first_tab(spreadsheet_id, SHEET_NAME).await?;
        self.update_values(
            spreadsheet_id,
            &header_range(),
            vec![HEADERS.iter().map(|h| h.to_string()).collect()],
            ValueInput::Raw,
        )
        .await?;
        self.update_values(
            spreadsheet_id,
            &variant_header_range(),
            vec![VARIANT_HEADERS.iter().map(|h| h.to_string()).collect()],
            ValueInput::Raw,
        )
        .await
    }
}

#[async_trait]
impl PromptStore for SheetsClient {
    async fn find_or_create_sheet(&self, date: &str, folder_id: &str) -> Result<String, CoreError> {
        let existing = self
            .drive
            .find_spreadsheet(date, folder_id)
            .await
            .map_err(|e| CoreError::StoreRead(format!("looking up sheet '{date}': {e}")))?;

        if let Some(id) = existing {
            tracing::debug!(spreadsheet_id = %id, date, "Found existing daily sheet");
            return Ok(id);
        }

        let id = self
            .drive
            .create_spreadsheet(date, folder_id)
            .await
            .map_err(|e| CoreError::StoreWrite(format!("creating sheet '{date}': {e}")))?;
        self.initialise_layout(&id)
            .await
            .map_err(|e| CoreError::StoreWrite(format!("initialising sheet '{date}': {e}")))?;

        tracing::info!(spreadsheet_id = %id, date, "Created daily sheet");
        Ok(id)
    }

    async fn list_rows(&self, spreadsheet_id: &str) -> Result<Vec<Vec<String>>, CoreError> {
        self.get_values(spreadsheet_id, &data_range(), ValueRender::Formatted)
            .await
            .map_err(|e| CoreError::StoreRead(e.to_string()))
    }

    async fn write_row(
        &self,
        spreadsheet_id: &str,
        row_number: u32,
        cells: &[String],
    ) -> Result<(), CoreError> {
        self.update_values(
            spreadsheet_id,
            &row_range(row_number, cells.len()),
            vec![cells.to_vec()],
            ValueInput::UserEntered,
        )
        .await
        .map_err(|e| CoreError::StoreWrite(format!("row {row_number}: {e}")))
    }

    async fn read_variant_slots(
        &self,
        spreadsheet_id: &str,
        row_number: u32,
    ) -> Result<Vec<String>, CoreError> {
        // Slots hold `=IMAGE()` formulas, which have no formatted text.
        let rows = self
            .get_values(spreadsheet_id, &variant_slots_range(row_number), ValueRender::Formula)
            .await
            .map_err(|e| CoreError::StoreRead(format!("row {row_number} variants: {e}")))?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    async fn write_cell(
        &self,
        spreadsheet_id: &str,
        row_number: u32,
        column: usize,
        value: &str,
    ) -> Result<(), CoreError> {
        let range = cell_range(row_number, column);
        self.update_values(
            spreadsheet_id,
            &range,
            vec![vec![value.to_string()]],
            ValueInput::UserEntered,
        )
        .await
        .map_err(|e| CoreError::StoreWrite(format!("cell {range}: {e}")))
    }
}

/// Flatten JSON cell values into text. Formatted values are usually
/// strings already; numbers and booleans are stringified, nulls are blank.
fn into_text_rows(value_range: ValueRange) -> Vec<Vec<String>> {
    value_range
        .values
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect()
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
