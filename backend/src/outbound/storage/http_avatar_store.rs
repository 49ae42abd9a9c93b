//! Reqwest-backed object storage adapter.
//!
//! Speaks the Supabase-style storage API:
//! `POST {base}/object/{bucket}/{owner}/{entity}/avatar` with `x-upsert: true`
//! so an existing object is replaced rather than rejected.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};

use crate::domain::ports::{AvatarStore, AvatarStoreError};
use crate::domain::{AvatarPath, AvatarUpload};

const UPSERT_HEADER: &str = "x-upsert";
const API_KEY_HEADER: &str = "apikey";

/// Avatar store adapter posting objects to one bucket.
pub struct HttpAvatarStore {
    client: Client,
    base: Url,
    bucket: String,
    api_key: Option<String>,
}

impl HttpAvatarStore {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        bucket: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            bucket: bucket.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    fn object_url(&self, path: &AvatarPath) -> Result<Url, AvatarStoreError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| AvatarStoreError::transport("storage url cannot carry a path"))?
            .pop_if_empty()
            .push("object")
            .push(&self.bucket)
            .extend(path.as_str().split('/'));
        Ok(url)
    }
}

#[async_trait]
impl AvatarStore for HttpAvatarStore {
    async fn upload(
        &self,
        path: &AvatarPath,
        upload: &AvatarUpload,
    ) -> Result<(), AvatarStoreError> {
        let url = self.object_url(path)?;
        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, upload.content_type())
            .header(UPSERT_HEADER, "true")
            .body(upload.bytes().to_vec());
        if let Some(key) = &self.api_key {
            request = request
                .header(AUTHORIZATION, format!("Bearer {key}"))
                .header(API_KEY_HEADER, key.as_str());
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_transport_error(error: reqwest::Error) -> AvatarStoreError {
    if error.is_timeout() {
        AvatarStoreError::timeout(error.to_string())
    } else {
        AvatarStoreError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> AvatarStoreError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            AvatarStoreError::timeout(message)
        }
        _ if status.is_client_error() => AvatarStoreError::rejected(message),
        _ => AvatarStoreError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        let head: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
        format!("{head}...")
    } else {
        compact
    }
}
