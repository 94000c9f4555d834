use crate::models::config::OcrServerConfig;
use crate::services::ocr::engine::OcrEngine;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OCR engine backed by an HTTP recognition server. The blocking client is
/// deliberate: recognition runs inside `spawn_blocking` in the aggregator,
/// never on a runtime worker thread.
pub struct HttpOcrEngine {
    client: reqwest::blocking::Client,
    base_url: String,
}

#[derive(Serialize)]
struct ImageRequest {
    image_base64: String,
}

#[derive(Deserialize)]
struct OcrResponse {
    raw_text: String,
}

impl HttpOcrEngine {
    pub fn new(config: &OcrServerConfig) -> Result<Self, String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Check if the recognition server is reachable.
    pub fn health_check(&self) -> Result<(), String> {
        let url = format!("{}/health", self.base_url);
        self.client
            .get(&url)
            .send()
            .map_err(|e| format!("Health check failed: {}", e))?;
        Ok(())
    }
}

impl OcrEngine for HttpOcrEngine {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, String> {
        let image_base64 = general_purpose::STANDARD.encode(image_bytes);
        let url = format!("{}/ocr", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&ImageRequest { image_base64 })
            .send()
            .map_err(|e| format!("Request failed: {}", e))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(format!("OCR server error: {}", error_text));
        }

        let data: OcrResponse = response
            .json()
            .map_err(|e| format!("Failed to parse response: {}", e))?;

        Ok(data.raw_text)
    }
}
