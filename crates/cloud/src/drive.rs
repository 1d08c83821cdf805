//! Google Drive v3 client: image uploads, public sharing, and daily
//! spreadsheet lookup/creation.

use async_trait::async_trait;
use promptsheet_core::ports::AssetStore;
use promptsheet_core::CoreError;
use serde::Deserialize;

use crate::auth::AccessToken;
use crate::error::{ensure_success, CloudError};

/// Drive metadata API base.
pub const DRIVE_API_URL: &str = "https://www.googleapis.com/drive/v3";

/// Drive media upload base.
pub const DRIVE_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3";

/// MIME type of a native Google spreadsheet.
pub const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

/// Boundary for `multipart/related` uploads.
const UPLOAD_BOUNDARY: &str = "promptsheet_upload_boundary";

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileRef {
    id: Option<String>,
    web_view_link: Option<String>,
}

/// HTTP client for the Drive API.
#[derive(Clone)]
pub struct DriveClient {
    client: reqwest::Client,
    token: AccessToken,
    api_url: String,
    upload_url: String,
}

impl DriveClient {
    pub fn new(client: reqwest::Client, token: AccessToken) -> Self {
        Self {
            client,
            token,
            api_url: DRIVE_API_URL.to_string(),
            upload_url: DRIVE_UPLOAD_URL.to_string(),
        }
    }

    /// Find a non-trashed spreadsheet called `name` directly inside
    /// `folder_id`.
    pub async fn find_spreadsheet(
        &self,
        name: &str,
        folder_id: &str,
    ) -> Result<Option<String>, CloudError> {
        let query = spreadsheet_query(name, folder_id);
        let response = self
            .client
            .get(format!("{}/files", self.api_url))
            .bearer_auth(self.token.as_str())
            .query(&[("q", query.as_str()), ("fields", "files(id,name)")])
            .send()
            .await?;

        let list: FileList = ensure_success(response).await?.json().await?;
        Ok(list.files.into_iter().find_map(|f| f.id))
    }

    /// Create an empty spreadsheet called `name` inside `folder_id`.
    pub async fn create_spreadsheet(&self, name: &str, folder_id: &str) -> Result<String, CloudError> {
        let metadata = serde_json::json!({
            "name": name,
            "mimeType": SPREADSHEET_MIME,
            "parents": [folder_id],
        });

        let response = self
            .client
            .post(format!("{}/files", self.api_url))
            .bearer_auth(self.token.as_str())
            .query(&[("fields", "id")])
            .json(&metadata)
            .send()
            .await?;

        let file: FileRef = ensure_success(response).await?.json().await?;
        file.id.ok_or(CloudError::MissingField("id"))
    }

    /// Upload `data` as a new file in `folder_id`. Returns the file id.
    pub async fn upload_file(
        &self,
        folder_id: &str,
        name: &str,
        mime_type: &str,
        data: Vec<u8>,
    ) -> Result<String, CloudError> {
        let metadata = serde_json::json!({
            "name": name,
            "parents": [folder_id],
        });
        let body = multipart_related_body(UPLOAD_BOUNDARY, &metadata, mime_type, &data);

        let response = self
            .client
            .post(format!("{}/files", self.upload_url))
            .bearer_auth(self.token.as_str())
            .query(&[("uploadType", "multipart"), ("fields", "id")])
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={UPLOAD_BOUNDARY}"),
            )
            .body(body)
            .send()
            .await?;

        let file: FileRef = ensure_success(response).await?.json().await?;
        file.id.ok_or(CloudError::MissingField("id"))
    }

    /// Grant `anyone` read access. A 403 or 404 (sharing disabled by
    /// domain policy, or inherited permissions) is tolerated.
    pub async fn share_publicly(&self, file_id: &str) -> Result<(), CloudError> {
        let permission = serde_json::json!({ "type": "anyone", "role": "reader" });

        let response = self
            .client
            .post(format!("{}/files/{file_id}/permissions", self.api_url))
            .bearer_auth(self.token.as_str())
            .query(&[("fields", "id")])
            .json(&permission)
            .send()
            .await?;

        match ensure_success(response).await {
            Ok(_) => Ok(()),
            Err(e) if e.status().is_some_and(is_tolerated_share_status) => {
                tracing::warn!(file_id, error = %e, "Could not share file publicly, continuing");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch the browser link of a file.
    pub async fn web_view_link(&self, file_id: &str) -> Result<String, CloudError> {
        let response = self
            .client
            .get(format!("{}/files/{file_id}", self.api_url))
            .bearer_auth(self.token.as_str())
            .query(&[("fields", "webViewLink")])
            .send()
            .await?;

        let file: FileRef = ensure_success(response).await?.json().await?;
        file.web_view_link.ok_or(CloudError::MissingField("webViewLink"))
    }
}

#[async_trait]
impl AssetStore for DriveClient {
    async fn upload_png(
        &self,
        folder_id: &str,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<String, CoreError> {
        let size = data.len();
        let file_id = self
            .upload_file(folder_id, file_name, "image/png", data)
            .await
            .map_err(|e| CoreError::AssetUpload(format!("upload of {file_name}: {e}")))?;
        tracing::debug!(file_id = %file_id, file_name, bytes = size, "Uploaded image to Drive");
        Ok(file_id)
    }

    async fn public_link(&self, asset_id: &str) -> Result<String, CoreError> {
        self.share_publicly(asset_id)
            .await
            .map_err(|e| CoreError::AssetUpload(format!("sharing {asset_id}: {e}")))?;
        self.web_view_link(asset_id)
            .await
            .map_err(|e| CoreError::AssetUpload(format!("link for {asset_id}: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Statuses returned by the permissions endpoint that do not fail an upload.
fn is_tolerated_share_status(status: u16) -> bool {
    matches!(status, 403 | 404)
}

/// Escape a value for use inside a single-quoted Drive query string.
fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Drive search query for a spreadsheet by exact name within a folder.
fn spreadsheet_query(name: &str, folder_id: &str) -> String {
    format!(
        "name = '{}' and mimeType = '{SPREADSHEET_MIME}' and '{}' in parents and trashed = false",
        escape_query_value(name),
        escape_query_value(folder_id)
    )
}

/// Build a `multipart/related` body: JSON metadata part, then media part.
fn multipart_related_body(
    boundary: &str,
    metadata: &serde_json::Value,
    mime_type: &str,
    data: &[u8],
) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(
        format!("--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(metadata.to_string().as_bytes());
    body.extend_from_slice(format!("\r\n--{boundary}\r\nContent-Type: {mime_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}
