//! Production wiring: Google, OpenAI and Slack adapters behind the
//! pipeline ports.

use std::sync::Arc;

use promptsheet_cloud::{AccessToken, DriveClient, SheetsClient};
use promptsheet_core::ports::{Notifier, NoopNotifier};
use promptsheet_core::CoreError;
use promptsheet_events::{SlackNotifier, WebhookDelivery};
use promptsheet_openai::retry::RetryConfig;
use promptsheet_openai::{GenerationClient, GenerationConfig};
use promptsheet_pipeline::{PipelinePorts, SheetOrchestrator};

use crate::config::PipelineConfig;

/// Validate `config` and assemble a ready-to-run orchestrator.
pub fn build_orchestrator(config: &PipelineConfig) -> Result<SheetOrchestrator, CoreError> {
    config.validate()?;

    let http = reqwest::Client::builder()
        .build()
        .map_err(|e| CoreError::Configuration(format!("Failed to build HTTP client: {e}")))?;
    let token = AccessToken::new(config.google_access_token.clone());
    let drive = DriveClient::new(http.clone(), token.clone());
    let sheets = SheetsClient::new(http, token, drive.clone());

    let generator = GenerationClient::new(GenerationConfig {
        api_keys: config.openai_api_keys.clone(),
        base_url: config.openai_base_url.clone(),
        model: config.openai_image_model.clone(),
        retry: RetryConfig::default(),
    })?;

    let notifier: Arc<dyn Notifier> = if config.slack_webhook_url.is_empty() {
        tracing::info!("SLACK_WEBHOOK_URL not set, notifications disabled");
        Arc::new(NoopNotifier)
    } else {
        let delivery = WebhookDelivery::new()
            .map_err(|e| CoreError::Configuration(format!("Failed to build webhook client: {e}")))?;
        Arc::new(SlackNotifier::new(config.slack_webhook_url.clone(), delivery))
    };

    let ports = PipelinePorts {
        store: Arc::new(sheets),
        assets: Arc::new(drive),
        generator: Arc::new(generator),
        notifier,
    };
    Ok(SheetOrchestrator::new(ports, config.settings()))
}
