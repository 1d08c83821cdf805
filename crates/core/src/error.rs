/// Domain-level error shared by every port in the pipeline.
///
/// Each variant is an error *kind*; the payload is the human-readable
/// message produced by the adapter that failed. Messages are never
/// truncated here -- see [`crate::text::truncate_chars`] for the store and
/// notification boundaries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Missing or invalid configuration (asset folder, API keys, ...).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The image generation call failed after exhausting its retries.
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Reading rows or cells from the prompt store failed.
    #[error("Store read failed: {0}")]
    StoreRead(String),

    /// Writing rows or cells to the prompt store failed.
    #[error("Store write failed: {0}")]
    StoreWrite(String),

    /// Uploading an asset or fetching its public link failed.
    #[error("Asset upload failed: {0}")]
    AssetUpload(String),

    /// Posting a notification failed. Always swallowed by the pipeline.
    #[error("Notification failed: {0}")]
    Notification(String),

    /// Caller input was rejected before any processing started.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unexpected runtime failure inside the service itself.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Short machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Configuration(_) => "CONFIGURATION_ERROR",
            CoreError::Generation(_) => "GENERATION_ERROR",
            CoreError::StoreRead(_) => "STORE_READ_ERROR",
            CoreError::StoreWrite(_) => "STORE_WRITE_ERROR",
            CoreError::AssetUpload(_) => "ASSET_UPLOAD_ERROR",
            CoreError::Notification(_) => "NOTIFICATION_ERROR",
            CoreError::Validation(_) => "VALIDATION_ERROR",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
