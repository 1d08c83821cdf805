//! URL and formula builders for Drive assets and sheet rows.

/// Direct-view URL for a Drive file, embeddable in sheets and chat.
pub fn image_url(file_id: &str) -> String {
    format!("https://drive.google.com/uc?export=view&id={file_id}")
}

/// `=IMAGE(...)` formula rendering the asset inside a cell.
pub fn image_formula(file_id: &str) -> String {
    format!("=IMAGE(\"{}\")", image_url(file_id))
}

/// Link that opens the spreadsheet focused on a given row.
pub fn sheet_row_url(spreadsheet_id: &str, row_number: u32) -> String {
    format!("https://docs.google.com/spreadsheets/d/{spreadsheet_id}/edit#gid=0&range=A{row_number}")
}
