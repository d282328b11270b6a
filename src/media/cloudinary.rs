use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::CloudinaryConfig;
use crate::error::{AppError, AppResult};
use crate::models::media_model::{MediaKind, MediaRef, UploadedFile};

use super::MediaStore;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Media store backed by the Cloudinary upload API.
#[derive(Clone)]
pub struct CloudinaryStore {
    http: reqwest::Client,
    config: CloudinaryConfig,
    api_base: String,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config,
            api_base: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.to_string();
        self
    }

    fn endpoint(&self, kind: MediaKind, action: &str) -> String {
        format!("{}/{}/{}/{}", self.api_base, self.config.cloud_name, kind.as_str(), action)
    }

    /// Adds the api key, timestamp and signature to the parameters being signed.
    fn signed_form(&self, params: &[(&str, String)]) -> Form {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let mut signed: Vec<(&str, String)> = params.to_vec();
        signed.push(("timestamp", timestamp));

        let signature = sign(&signed, &self.config.api_secret);

        let mut form = Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in signed {
            form = form.text(key.to_string(), value);
        }
        form
    }

    async fn post<T: for<'de> Deserialize<'de>>(&self, url: String, form: Form) -> AppResult<T> {
        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Media store unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(AppError::Upstream(format!(
                "Media store rejected request ({}): {}",
                status, message
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Upstream(format!("Unexpected media store response: {}", e)))
    }
}

/// Cloudinary request signature: parameters sorted by name, joined as a query
/// string, suffixed with the secret and hashed.
pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    async fn upload(&self, file: &UploadedFile, folder: &str, kind: MediaKind) -> AppResult<MediaRef> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| AppError::Validation(format!("Invalid content type: {}", e)))?;

        let form = self
            .signed_form(&[("folder", folder.to_string())])
            .part("file", part);

        let uploaded: UploadResponse = self.post(self.endpoint(kind, "upload"), form).await?;
        tracing::info!(public_id = %uploaded.public_id, folder, "Uploaded media");

        Ok(MediaRef {
            public_id: uploaded.public_id,
            url: uploaded.secure_url,
        })
    }

    async fn destroy(&self, public_id: &str, kind: MediaKind) -> AppResult<()> {
        let form = self.signed_form(&[("public_id", public_id.to_string())]);
        let destroyed: DestroyResponse = self.post(self.endpoint(kind, "destroy"), form).await?;

        if destroyed.result == "ok" {
            tracing::info!(public_id, "Deleted media");
            Ok(())
        } else {
            Err(AppError::Upstream(format!(
                "Media store could not delete {}: {}",
                public_id, destroyed.result
            )))
        }
    }
}
