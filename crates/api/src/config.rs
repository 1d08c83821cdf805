use std::net::{IpAddr, SocketAddr};

use promptsheet_core::notification::NotifyMode;
use promptsheet_core::row::DEFAULT_SIZE;
use promptsheet_core::CoreError;
use promptsheet_openai::api::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use promptsheet_pipeline::settings::DEFAULT_CONCURRENCY;
use promptsheet_pipeline::PipelineSettings;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    pub pipeline: PipelineConfig,
}

/// Everything the generation pipeline needs. Required values may be empty
/// here; [`PipelineConfig::validate`] reports them when a run is requested.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub drive_parent_folder_id: String,
    pub google_access_token: String,
    pub openai_api_keys: Vec<String>,
    pub openai_base_url: String,
    pub openai_image_model: String,
    pub default_size: String,
    pub concurrency: usize,
    pub style_preset_default: String,
    pub slack_webhook_url: String,
    pub slack_notify_mode: NotifyMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            drive_parent_folder_id: String::new(),
            google_access_token: String::new(),
            openai_api_keys: Vec::new(),
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            openai_image_model: DEFAULT_MODEL.to_string(),
            default_size: DEFAULT_SIZE.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            style_preset_default: String::new(),
            slack_webhook_url: String::new(),
            slack_notify_mode: NotifyMode::All,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                  | Default                  |
    /// |--------------------------|--------------------------|
    /// | `HOST`                   | `0.0.0.0`                |
    /// | `PORT`                   | `3000`                   |
    /// | `DRIVE_PARENT_FOLDER_ID` | (required for runs)      |
    /// | `GOOGLE_ACCESS_TOKEN`    | (required for runs)      |
    /// | `OPENAI_API_KEYS`        | comma-separated list     |
    /// | `OPENAI_API_KEY`         | used if the list is empty|
    /// | `OPENAI_BASE_URL`        | `https://api.openai.com` |
    /// | `OPENAI_IMAGE_MODEL`     | `gpt-image-1`            |
    /// | `DEFAULT_SIZE`           | `1024x1792`              |
    /// | `CONCURRENCY`            | `4`                      |
    /// | `STYLE_PRESET_DEFAULT`   | empty                    |
    /// | `SLACK_WEBHOOK_URL`      | empty (disabled)         |
    /// | `SLACK_NOTIFY_MODE`      | `all`                    |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CoreError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        host.parse::<IpAddr>()
            .map_err(|e| CoreError::Configuration(format!("HOST '{host}' is not an IP address: {e}")))?;

        let port = parse_number::<u16>("PORT", var("PORT"), 3000)?;
        let concurrency =
            parse_number::<usize>("CONCURRENCY", var("CONCURRENCY"), DEFAULT_CONCURRENCY)?.max(1);

        let slack_notify_mode = match var("SLACK_NOTIFY_MODE") {
            Some(mode) => mode.to_lowercase().parse()?,
            None => NotifyMode::All,
        };

        let defaults = PipelineConfig::default();
        let pipeline = PipelineConfig {
            drive_parent_folder_id: var("DRIVE_PARENT_FOLDER_ID").unwrap_or_default(),
            google_access_token: var("GOOGLE_ACCESS_TOKEN").unwrap_or_default(),
            openai_api_keys: parse_api_keys(
                var("OPENAI_API_KEYS").as_deref(),
                var("OPENAI_API_KEY").as_deref(),
            ),
            openai_base_url: var("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            openai_image_model: var("OPENAI_IMAGE_MODEL").unwrap_or(defaults.openai_image_model),
            default_size: var("DEFAULT_SIZE").unwrap_or(defaults.default_size),
            concurrency,
            style_preset_default: var("STYLE_PRESET_DEFAULT").unwrap_or_default(),
            slack_webhook_url: var("SLACK_WEBHOOK_URL").unwrap_or_default(),
            slack_notify_mode,
        };

        Ok(Self {
            host,
            port,
            pipeline,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, CoreError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| CoreError::Configuration(format!("Invalid HOST '{}': {e}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl PipelineConfig {
    /// Check the values a run cannot do without.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.drive_parent_folder_id.is_empty() {
            return Err(CoreError::Configuration("DRIVE_PARENT_FOLDER_ID missing.".into()));
        }
        if self.openai_api_keys.is_empty() {
            return Err(CoreError::Configuration("OPENAI_API_KEY(S) missing.".into()));
        }
        if self.google_access_token.is_empty() {
            return Err(CoreError::Configuration("GOOGLE_ACCESS_TOKEN missing.".into()));
        }
        Ok(())
    }

    pub fn settings(&self) -> PipelineSettings {
        PipelineSettings {
            asset_folder_id: self.drive_parent_folder_id.clone(),
            default_size: self.default_size.clone(),
            style_preset_default: self.style_preset_default.clone(),
            concurrency: self.concurrency,
            notify_mode: self.slack_notify_mode,
        }
    }
}

/// Comma-separated key list, falling back to a single key when the list
/// holds no usable entry.
pub fn parse_api_keys(list: Option<&str>, single: Option<&str>) -> Vec<String> {
    let keys: Vec<String> = list
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect();
    if !keys.is_empty() {
        return keys;
    }
    single
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(|k| vec![k.to_string()])
        .unwrap_or_default()
}

fn parse_number<T: std::str::FromStr>(
    key: &str,
    value: Option<String>,
    default: T,
) -> Result<T, CoreError>
where
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|e| CoreError::Configuration(format!("{key} must be a number, got '{raw}': {e}"))),
    }
}
