//! Google Cloud Storage through the JSON API media upload endpoint.
//!
//! `POST {endpoint}/upload/storage/v1/b/{bucket}/o?uploadType=media&name={key}`
//! with the file streamed as the body and a caller-supplied bearer token.

use super::BlobStore;
use crate::config::DEFAULT_STORAGE_ENDPOINT;
use crate::error::TransferError;
use curl::easy::{Easy, List, ReadError};
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Blocking GCS client holding an already-minted OAuth2 access token.
#[derive(Clone)]
pub struct GcsStore {
    endpoint: String,
    token: String,
}

impl fmt::Debug for GcsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcsStore")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl GcsStore {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    /// Store talking to the public `storage.googleapis.com` endpoint.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self::new(DEFAULT_STORAGE_ENDPOINT, token)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Media upload URL for `bucket`/`key`; the key is percent-encoded as a query value.
    pub fn upload_url(&self, bucket: &str, key: &str) -> String {
        let name: String = url::form_urlencoded::byte_serialize(key.as_bytes()).collect();
        format!(
            "{}/upload/storage/v1/b/{}/o?uploadType=media&name={}",
            self.endpoint.trim_end_matches('/'),
            bucket,
            name
        )
    }
}

fn error_message(status: u32, body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        return parsed.error.message;
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        format!("HTTP {status}")
    } else {
        text.to_string()
    }
}

impl BlobStore for GcsStore {
    fn scheme(&self) -> &str {
        "gs"
    }

    fn put_file(&self, bucket: &str, key: &str, local_path: &Path) -> Result<(), TransferError> {
        let mut file = File::open(local_path).map_err(TransferError::io("open", local_path))?;
        let len = file
            .metadata()
            .map_err(TransferError::io("stat", local_path))?
            .len();

        let storage = |status: Option<u32>, message: String| TransferError::Storage {
            bucket: bucket.to_string(),
            key: key.to_string(),
            status,
            message,
        };
        let curl_err = |e: curl::Error| storage(None, e.to_string());

        let url = self.upload_url(bucket, key);
        let mut response: Vec<u8> = Vec::new();
        let mut read_error: Option<io::Error> = None;

        let mut easy = Easy::new();
        easy.url(&url).map_err(curl_err)?;
        easy.post(true).map_err(curl_err)?;
        easy.post_field_size(len).map_err(curl_err)?;
        easy.follow_location(false).map_err(curl_err)?;

        let mut headers = List::new();
        headers
            .append(&format!("Authorization: Bearer {}", self.token))
            .map_err(curl_err)?;
        headers
            .append("Content-Type: application/octet-stream")
            .map_err(curl_err)?;
        // No 100-continue round trip before the body.
        headers.append("Expect:").map_err(curl_err)?;
        easy.http_headers(headers).map_err(curl_err)?;

        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .read_function(|buf| match file.read(buf) {
                    Ok(n) => Ok(n),
                    Err(e) => {
                        read_error = Some(e);
                        Err(ReadError::Abort)
                    }
                })
                .map_err(curl_err)?;
            transfer
                .write_function(|data| {
                    response.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(curl_err)?;
            transfer.perform()
        };

        if let Some(e) = read_error {
            return Err(TransferError::Io {
                op: "read",
                path: local_path.to_path_buf(),
                source: e,
            });
        }
        performed.map_err(curl_err)?;

        let status = easy.response_code().map_err(curl_err)?;
        if !(200..300).contains(&status) {
            return Err(storage(Some(status), error_message(status, &response)));
        }
        tracing::debug!(bucket, key, bytes = len, status, "object stored");
        Ok(())
    }
}
