/// Errors from the Google REST layer.
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Google returned a non-2xx status code.
    #[error("Google API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A field expected in the response was absent.
    #[error("Response is missing field '{0}'")]
    MissingField(&'static str),
}

impl CloudError {
    /// HTTP status of an API error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            CloudError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or a [`CloudError::ApiError`] containing the
/// status and body text on failure.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, CloudError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(CloudError::ApiError {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}
