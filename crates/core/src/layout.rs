//! Fixed sheet layout: tab name, header row, column positions, A1 ranges,
//! and the base-column record written back after each generation.

use crate::links::image_formula;
use crate::row::{PromptRow, RowStatus};
use crate::text::{truncate_chars, MAX_ERROR_CHARS};

/// Name of the tab holding prompt rows.
pub const SHEET_NAME: &str = "Prompts";

/// Header row for the ten base columns (A..J).
pub const HEADERS: [&str; 10] = [
    "index",
    "prompt",
    "size",
    "status",
    "file_id",
    "web_link",
    "preview",
    "last_error",
    "variants",
    "style",
];

/// Labels for the first variant slots (K..P). Values may extend further.
pub const VARIANT_HEADERS: [&str; 6] = ["V1", "V2", "V3", "V4", "V5", "V6"];

// 0-based positions within a row of cells.
pub const COL_INDEX: usize = 0;
pub const COL_PROMPT: usize = 1;
pub const COL_SIZE: usize = 2;
pub const COL_STATUS: usize = 3;
pub const COL_FILE_ID: usize = 4;
pub const COL_WEB_LINK: usize = 5;
pub const COL_PREVIEW: usize = 6;
pub const COL_LAST_ERROR: usize = 7;
pub const COL_VARIANTS: usize = 8;
pub const COL_STYLE: usize = 9;

/// Number of base columns.
pub const BASE_COLUMN_COUNT: usize = HEADERS.len();

/// 1-based column number of the first variant slot (`K`).
pub const FIRST_VARIANT_COL: usize = BASE_COLUMN_COUNT + 1;

/// Right-most column read or written by the pipeline.
pub const LAST_COLUMN: &str = "ZZ";

/// First data row (row 1 holds headers).
pub const FIRST_DATA_ROW: u32 = 2;

// ---------------------------------------------------------------------------
// A1 notation
// ---------------------------------------------------------------------------

/// Convert a 1-based column number to its letter form (`1 -> A`, `27 -> AA`).
pub fn column_letter(mut n: usize) -> String {
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// `Prompts!A1:J1`
pub fn header_range() -> String {
    format!(
        "{SHEET_NAME}!A1:{}1",
        column_letter(BASE_COLUMN_COUNT)
    )
}

/// `Prompts!K1:P1`
pub fn variant_header_range() -> String {
    format!(
        "{SHEET_NAME}!{}1:{}1",
        column_letter(FIRST_VARIANT_COL),
        column_letter(FIRST_VARIANT_COL + VARIANT_HEADERS.len() - 1)
    )
}

/// Every data row: `Prompts!A2:ZZ`
pub fn data_range() -> String {
    format!("{SHEET_NAME}!A{FIRST_DATA_ROW}:{LAST_COLUMN}")
}

/// Range covering `width` cells of one row starting at column A.
pub fn row_range(row_number: u32, width: usize) -> String {
    format!(
        "{SHEET_NAME}!A{row_number}:{}{row_number}",
        column_letter(width.max(1))
    )
}

/// Variant slots of one row: `Prompts!K{r}:ZZ{r}`
pub fn variant_slots_range(row_number: u32) -> String {
    format!(
        "{SHEET_NAME}!{}{row_number}:{LAST_COLUMN}{row_number}",
        column_letter(FIRST_VARIANT_COL)
    )
}

/// A single cell, 1-based column.
pub fn cell_range(row_number: u32, column: usize) -> String {
    format!("{SHEET_NAME}!{}{row_number}", column_letter(column))
}

// ---------------------------------------------------------------------------
// Variant slots
// ---------------------------------------------------------------------------

/// Pick the 1-based column for the next variant: the first blank slot from
/// the left, or one past the last occupied slot.
pub fn next_variant_column(slots: &[String]) -> usize {
    let offset = slots
        .iter()
        .position(|v| v.trim().is_empty())
        .unwrap_or(slots.len());
    FIRST_VARIANT_COL + offset
}

// ---------------------------------------------------------------------------
// Base columns
// ---------------------------------------------------------------------------

/// The ten base cells of a row. Always written as one range update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseColumns {
    pub index: String,
    pub prompt: String,
    pub size: String,
    pub status: RowStatus,
    pub file_id: String,
    pub web_link: String,
    pub preview: String,
    pub last_error: String,
    pub variant_cell: String,
    pub style_preset: String,
}

impl BaseColumns {
    /// Successful first variant: status DONE with the asset reference.
    pub fn done(row: &PromptRow, file_id: &str, web_link: &str) -> Self {
        Self {
            index: row.index.clone(),
            prompt: row.prompt.clone(),
            size: row.size.clone(),
            status: RowStatus::Done,
            file_id: file_id.to_string(),
            web_link: web_link.to_string(),
            preview: image_formula(file_id),
            last_error: String::new(),
            variant_cell: row.variant_cell.clone(),
            style_preset: row.style_preset.clone(),
        }
    }

    /// Failed variant: status ERROR, asset fields cleared, error truncated.
    pub fn error(row: &PromptRow, error: &str) -> Self {
        Self {
            index: row.index.clone(),
            prompt: row.prompt.clone(),
            size: row.size.clone(),
            status: RowStatus::Error,
            file_id: String::new(),
            web_link: String::new(),
            preview: String::new(),
            last_error: truncate_chars(error, MAX_ERROR_CHARS).to_string(),
            variant_cell: row.variant_cell.clone(),
            style_preset: row.style_preset.clone(),
        }
    }

    /// Cells in column order A..J.
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.index.clone(),
            self.prompt.clone(),
            self.size.clone(),
            self.status.as_str().to_string(),
            self.file_id.clone(),
            self.web_link.clone(),
            self.preview.clone(),
            self.last_error.clone(),
            self.variant_cell.clone(),
            self.style_preset.clone(),
        ]
    }
}
