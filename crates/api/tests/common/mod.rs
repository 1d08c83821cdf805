use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use promptsheet_core::layout::FIRST_DATA_ROW;
use promptsheet_core::ports::{AssetStore, ImageGenerator, NoopNotifier, PromptStore};
use promptsheet_core::CoreError;
use promptsheet_pipeline::{PipelinePorts, PipelineSettings, SheetOrchestrator};
use tower::ServiceExt;

use promptsheet_api::config::PipelineConfig;
use promptsheet_api::router::build_app_router;
use promptsheet_api::state::AppState;

pub const SHEET: &str = "sheet-1";

/// In-memory prompt store: data rows per spreadsheet, plus daily sheets by date.
#[derive(Default)]
pub struct MemoryStore {
    pub sheets: Mutex<HashMap<String, Vec<Vec<String>>>>,
    pub dates: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn with_rows(id: &str, rows: &[&[&str]]) -> Self {
        let store = Self::default();
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        store.sheets.lock().unwrap().insert(id.to_string(), rows);
        store
    }

    pub fn status(&self, id: &str, row_number: u32) -> String {
        self.sheets.lock().unwrap()[id]
            .get((row_number - FIRST_DATA_ROW) as usize)
            .and_then(|row| row.get(3))
            .cloned()
            .unwrap_or_default()
    }

    fn edit_row(&self, id: &str, row_number: u32, f: impl FnOnce(&mut Vec<String>)) {
        let mut sheets = self.sheets.lock().unwrap();
        let rows = sheets.entry(id.to_string()).or_default();
        let idx = (row_number - FIRST_DATA_ROW) as usize;
        if rows.len() <= idx {
            rows.resize(idx + 1, Vec::new());
        }
        f(&mut rows[idx]);
    }
}

#[async_trait]
impl PromptStore for MemoryStore {
    async fn find_or_create_sheet(&self, date: &str, _folder_id: &str) -> Result<String, CoreError> {
        let id = self
            .dates
            .lock()
            .unwrap()
            .entry(date.to_string())
            .or_insert_with(|| format!("sheet-{date}"))
            .clone();
        self.sheets.lock().unwrap().entry(id.clone()).or_default();
        Ok(id)
    }

    async fn list_rows(&self, spreadsheet_id: &str) -> Result<Vec<Vec<String>>, CoreError> {
        self.sheets
            .lock()
            .unwrap()
            .get(spreadsheet_id)
            .cloned()
            .ok_or_else(|| CoreError::StoreRead(format!("spreadsheet {spreadsheet_id} not found")))
    }

    async fn write_row(&self, spreadsheet_id: &str, row_number: u32, cells: &[String]) -> Result<(), CoreError> {
        self.edit_row(spreadsheet_id, row_number, |row| {
            if row.len() < cells.len() {
                row.resize(cells.len(), String::new());
            }
            row[..cells.len()].clone_from_slice(cells);
        });
        Ok(())
    }

    async fn read_variant_slots(&self, _spreadsheet_id: &str, _row_number: u32) -> Result<Vec<String>, CoreError> {
        Ok(Vec::new())
    }

    async fn write_cell(
        &self,
        spreadsheet_id: &str,
        row_number: u32,
        column: usize,
        value: &str,
    ) -> Result<(), CoreError> {
        self.edit_row(spreadsheet_id, row_number, |row| {
            if row.len() < column {
                row.resize(column, String::new());
            }
            row[column - 1] = value.to_string();
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct CountingGenerator {
    pub calls: AtomicUsize,
}

#[async_trait]
impl ImageGenerator for CountingGenerator {
    async fn generate(&self, _prompt: &str, _size: &str) -> Result<Vec<u8>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0x89, b'P', b'N', b'G'])
    }
}

pub struct StaticAssets;

#[async_trait]
impl AssetStore for StaticAssets {
    async fn upload_png(&self, _folder_id: &str, file_name: &str, _data: Vec<u8>) -> Result<String, CoreError> {
        Ok(format!("id-{file_name}"))
    }

    async fn public_link(&self, asset_id: &str) -> Result<String, CoreError> {
        Ok(format!("https://drive.test/{asset_id}"))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub generator: Arc<CountingGenerator>,
}

/// Build the full application router around in-memory collaborators.
pub fn build_test_app(store: MemoryStore) -> TestApp {
    let store = Arc::new(store);
    let generator = Arc::new(CountingGenerator::default());
    let ports = PipelinePorts {
        store: store.clone(),
        assets: Arc::new(StaticAssets),
        generator: generator.clone(),
        notifier: Arc::new(NoopNotifier),
    };
    let settings = PipelineSettings {
        asset_folder_id: "folder".to_string(),
        concurrency: 2,
        ..Default::default()
    };
    let orchestrator = Arc::new(SheetOrchestrator::new(ports, settings));

    TestApp {
        router: build_app_router(AppState::new(Ok(orchestrator))),
        store,
        generator,
    }
}

/// Router whose pipeline could not be configured.
pub fn build_unconfigured_app() -> Router {
    let pipeline =
        promptsheet_api::services::build_orchestrator(&PipelineConfig::default()).map(Arc::new);
    build_app_router(AppState::new(pipeline))
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
