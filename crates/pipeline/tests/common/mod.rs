//! In-memory collaborators for pipeline integration tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use promptsheet_core::layout::{FIRST_DATA_ROW, FIRST_VARIANT_COL};
use promptsheet_core::notification::{Notification, NotifyMode};
use promptsheet_core::ports::{AssetStore, ImageGenerator, Notifier, PromptStore};
use promptsheet_core::CoreError;
use promptsheet_pipeline::{PipelinePorts, PipelineSettings, SheetOrchestrator};

pub const FOLDER: &str = "folder-1";
pub const SHEET: &str = "sheet-1";
pub const PNG: &[u8] = &[0x89, b'P', b'N', b'G'];

pub fn cells(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Prompt store
// ---------------------------------------------------------------------------

/// Spreadsheets held as data rows only; index 0 is sheet row 2.
#[derive(Default)]
pub struct MemoryStore {
    sheets: Mutex<HashMap<String, Vec<Vec<String>>>>,
    by_date: Mutex<HashMap<String, String>>,
    pub sheets_created: AtomicUsize,
    pub row_writes: Mutex<Vec<(u32, Vec<String>)>>,
    pub fail_list: AtomicBool,
    pub fail_cell_writes: AtomicBool,
    pub fail_row_writes: AtomicBool,
}

impl MemoryStore {
    pub fn with_rows(id: &str, rows: Vec<Vec<String>>) -> Self {
        let store = Self::default();
        store.sheets.lock().unwrap().insert(id.to_string(), rows);
        store
    }

    /// Register an existing daily sheet for `date`.
    pub fn with_daily_sheet(self, date: &str, id: &str) -> Self {
        self.by_date
            .lock()
            .unwrap()
            .insert(date.to_string(), id.to_string());
        self
    }

    pub fn row(&self, id: &str, row_number: u32) -> Vec<String> {
        let sheets = self.sheets.lock().unwrap();
        sheets
            .get(id)
            .and_then(|rows| rows.get((row_number - FIRST_DATA_ROW) as usize))
            .cloned()
            .unwrap_or_default()
    }

    /// 1-based column.
    pub fn cell(&self, id: &str, row_number: u32, column: usize) -> String {
        self.row(id, row_number)
            .get(column - 1)
            .cloned()
            .unwrap_or_default()
    }

    pub fn status(&self, id: &str, row_number: u32) -> String {
        self.cell(id, row_number, 4)
    }

    pub fn last_error(&self, id: &str, row_number: u32) -> String {
        self.cell(id, row_number, 8)
    }

    /// Non-blank variant slots, in column order.
    pub fn filled_slots(&self, id: &str, row_number: u32) -> Vec<String> {
        self.row(id, row_number)
            .into_iter()
            .skip(FIRST_VARIANT_COL - 1)
            .filter(|c| !c.is_empty())
            .collect()
    }

    pub fn row_write_count(&self) -> usize {
        self.row_writes.lock().unwrap().len()
    }

    fn with_row<R>(&self, id: &str, row_number: u32, f: impl FnOnce(&mut Vec<String>) -> R) -> R {
        let mut sheets = self.sheets.lock().unwrap();
        let rows = sheets.entry(id.to_string()).or_default();
        let idx = (row_number - FIRST_DATA_ROW) as usize;
        if rows.len() <= idx {
            rows.resize(idx + 1, Vec::new());
        }
        f(&mut rows[idx])
    }
}

#[async_trait]
impl PromptStore for MemoryStore {
    async fn find_or_create_sheet(&self, date: &str, _folder_id: &str) -> Result<String, CoreError> {
        let mut by_date = self.by_date.lock().unwrap();
        if let Some(id) = by_date.get(date) {
            return Ok(id.clone());
        }
        let id = format!("sheet-{date}");
        by_date.insert(date.to_string(), id.clone());
        self.sheets.lock().unwrap().entry(id.clone()).or_default();
        self.sheets_created.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    async fn list_rows(&self, spreadsheet_id: &str) -> Result<Vec<Vec<String>>, CoreError> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(CoreError::StoreRead("listing unavailable".into()));
        }
        Ok(self
            .sheets
            .lock()
            .unwrap()
            .get(spreadsheet_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn write_row(
        &self,
        spreadsheet_id: &str,
        row_number: u32,
        cells: &[String],
    ) -> Result<(), CoreError> {
        if self.fail_row_writes.load(Ordering::SeqCst) {
            return Err(CoreError::StoreWrite(format!("row {row_number} rejected")));
        }
        self.with_row(spreadsheet_id, row_number, |row| {
            if row.len() < cells.len() {
                row.resize(cells.len(), String::new());
            }
            row[..cells.len()].clone_from_slice(cells);
        });
        self.row_writes
            .lock()
            .unwrap()
            .push((row_number, cells.to_vec()));
        Ok(())
    }

    async fn read_variant_slots(
        &self,
        spreadsheet_id: &str,
        row_number: u32,
    ) -> Result<Vec<String>, CoreError> {
        Ok(self
            .row(spreadsheet_id, row_number)
            .into_iter()
            .skip(FIRST_VARIANT_COL - 1)
            .collect())
    }

    async fn write_cell(
        &self,
        spreadsheet_id: &str,
        row_number: u32,
        column: usize,
        value: &str,
    ) -> Result<(), CoreError> {
        if self.fail_cell_writes.load(Ordering::SeqCst) {
            return Err(CoreError::StoreWrite(format!("cell write for row {row_number} rejected")));
        }
        self.with_row(spreadsheet_id, row_number, |row| {
            if row.len() < column {
                row.resize(column, String::new());
            }
            row[column - 1] = value.to_string();
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Asset store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeAssets {
    next_id: AtomicUsize,
    pub uploads: Mutex<Vec<(String, String)>>,
    pub fail_uploads: AtomicBool,
}

impl FakeAssets {
    pub fn uploaded_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .uploads
            .lock()
            .unwrap()
            .iter()
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }
}

#[async_trait]
impl AssetStore for FakeAssets {
    async fn upload_png(
        &self,
        folder_id: &str,
        file_name: &str,
        _data: Vec<u8>,
    ) -> Result<String, CoreError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(CoreError::AssetUpload(format!("upload of {file_name} refused")));
        }
        self.uploads
            .lock()
            .unwrap()
            .push((folder_id.to_string(), file_name.to_string()));
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("file-{n}"))
    }

    async fn public_link(&self, asset_id: &str) -> Result<String, CoreError> {
        Ok(format!("https://drive.test/{asset_id}/view"))
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Succeeds unless the call number (1-based) or the prompt is scripted to fail.
#[derive(Default)]
pub struct FakeGenerator {
    pub calls: Mutex<Vec<(String, String)>>,
    failing_calls: Mutex<HashSet<usize>>,
    failing_prompts: Mutex<HashSet<String>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeGenerator {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn fail_call(self, call: usize) -> Self {
        self.failing_calls.lock().unwrap().insert(call);
        self
    }

    /// Fail every call whose final prompt ends with `prompt`.
    pub fn fail_prompt(self, prompt: &str) -> Self {
        self.failing_prompts.lock().unwrap().insert(prompt.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }
}

#[async_trait]
impl ImageGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str, size: &str) -> Result<Vec<u8>, CoreError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((prompt.to_string(), size.to_string()));
            calls.len()
        };
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let prompt_fails = self
            .failing_prompts
            .lock()
            .unwrap()
            .iter()
            .any(|p| prompt.ends_with(p.as_str()));
        if prompt_fails || self.failing_calls.lock().unwrap().contains(&call) {
            return Err(CoreError::Generation(format!(
                "OpenAI API error (HTTP 500): call {call} rejected prompt {prompt}"
            )));
        }
        Ok(PNG.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingNotifier {
    pub events: Mutex<Vec<Notification>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn events(&self) -> Vec<Notification> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, event: &Notification) -> Result<(), CoreError> {
        self.events.lock().unwrap().push(event.clone());
        if self.fail {
            return Err(CoreError::Notification("webhook returned HTTP 500".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub assets: Arc<FakeAssets>,
    pub generator: Arc<FakeGenerator>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new(store: MemoryStore, generator: FakeGenerator) -> Self {
        Self::with_notifier(store, generator, RecordingNotifier::default())
    }

    pub fn with_notifier(
        store: MemoryStore,
        generator: FakeGenerator,
        notifier: RecordingNotifier,
    ) -> Self {
        Self {
            store: Arc::new(store),
            assets: Arc::new(FakeAssets::default()),
            generator: Arc::new(generator),
            notifier: Arc::new(notifier),
        }
    }

    pub fn ports(&self) -> PipelinePorts {
        PipelinePorts {
            store: self.store.clone(),
            assets: self.assets.clone(),
            generator: self.generator.clone(),
            notifier: self.notifier.clone(),
        }
    }

    pub fn orchestrator(&self, settings: PipelineSettings) -> SheetOrchestrator {
        SheetOrchestrator::new(self.ports(), settings)
    }
}

pub fn settings() -> PipelineSettings {
    PipelineSettings {
        asset_folder_id: FOLDER.to_string(),
        ..Default::default()
    }
}

pub fn settings_with_mode(notify_mode: NotifyMode) -> PipelineSettings {
    PipelineSettings {
        notify_mode,
        ..settings()
    }
}
