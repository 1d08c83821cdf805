//! Prompt row model and parsing from raw sheet cells.
//!
//! Column positions come from [`crate::layout`]. Parsing is lenient: a
//! missing cell reads as empty, an unparseable variant count falls back to
//! one, and unknown status text is kept verbatim.

use std::fmt;

use crate::layout::{
    COL_INDEX, COL_PROMPT, COL_SIZE, COL_STATUS, COL_STYLE, COL_VARIANTS, FIRST_VARIANT_COL,
};

/// Image size used when the size cell is blank.
pub const DEFAULT_SIZE: &str = "1024x1792";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status stored in the `status` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowStatus {
    Empty,
    Pending,
    Regen,
    Error,
    Done,
    /// Any other text found in the cell, upper-cased.
    Other(String),
}

impl RowStatus {
    /// Parse a status cell (case-insensitive, surrounding whitespace ignored).
    pub fn parse(cell: &str) -> Self {
        let upper = cell.trim().to_uppercase();
        match upper.as_str() {
            "" => RowStatus::Empty,
            "PENDING" => RowStatus::Pending,
            "REGEN" => RowStatus::Regen,
            "ERROR" => RowStatus::Error,
            "DONE" => RowStatus::Done,
            _ => RowStatus::Other(upper),
        }
    }

    /// Whether a normal (non-regenerate) run may pick this row up.
    pub fn is_eligible_for_run(&self) -> bool {
        matches!(
            self,
            RowStatus::Empty | RowStatus::Pending | RowStatus::Regen | RowStatus::Error
        )
    }

    /// Cell text written back to the sheet.
    pub fn as_str(&self) -> &str {
        match self {
            RowStatus::Empty => "",
            RowStatus::Pending => "PENDING",
            RowStatus::Regen => "REGEN",
            RowStatus::Error => "ERROR",
            RowStatus::Done => "DONE",
            RowStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Process mode
// ---------------------------------------------------------------------------

/// How a row is being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessMode {
    /// Regular pass: status gate applies, first variant rewrites the base row.
    Normal,
    /// Explicit regeneration: no status gate, variants are only appended.
    Regen,
}

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One prompt row, read fresh from the sheet for every pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRow {
    /// 1-based sheet row number (data starts at row 2).
    pub row_number: u32,
    /// Display label; defaults to `row_number - 1`.
    pub index: String,
    pub prompt: String,
    pub size: String,
    pub status: RowStatus,
    /// Effective number of variants to generate (always >= 1).
    pub variant_count: u32,
    /// Raw variant-count cell, written back untouched.
    pub variant_cell: String,
    pub style_preset: String,
    /// Cells from column K onward.
    pub variant_slots: Vec<String>,
}

impl PromptRow {
    /// Build a row from the raw cells returned by the store.
    pub fn from_cells(row_number: u32, cells: &[String], default_size: &str) -> Self {
        let cell = |n: usize| cells.get(n).map(String::as_str).unwrap_or("");

        let index = match cell(COL_INDEX) {
            "" => row_number.saturating_sub(1).to_string(),
            s => s.to_string(),
        };
        let size = match cell(COL_SIZE) {
            "" => default_size.to_string(),
            s => s.to_string(),
        };
        let variant_cell = cell(COL_VARIANTS).to_string();

        Self {
            row_number,
            index,
            prompt: cell(COL_PROMPT).to_string(),
            size,
            status: RowStatus::parse(cell(COL_STATUS)),
            variant_count: parse_variant_count(&variant_cell),
            variant_cell,
            style_preset: cell(COL_STYLE).to_string(),
            variant_slots: cells
                .get(FIRST_VARIANT_COL - 1..)
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
        }
    }

    /// Rows without a prompt are never processed.
    pub fn has_prompt(&self) -> bool {
        !self.prompt.trim().is_empty()
    }
}

/// Parse the variant-count cell. Blank, non-numeric and non-positive
/// values all yield 1.
pub fn parse_variant_count(cell: &str) -> u32 {
    cell.trim()
        .parse::<i64>()
        .ok()
        .map(|n| n.clamp(1, u32::MAX as i64) as u32)
        .unwrap_or(1)
}
