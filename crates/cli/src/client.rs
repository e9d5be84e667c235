//! HTTP API client for a Hypothesis Lab server

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::Config;

/// API client for making HTTP requests to the Hypothesis Lab API
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_endpoint.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    /// Create a new API client with custom settings
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .context("Failed to send GET request")?;

        self.handle_response(response).await
    }

    /// Make a POST request without a body
    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let response = self
            .client
            .post(self.url(path))
            .send()
            .await
            .context("Failed to send POST request")?;

        self.handle_response(response).await
    }

    /// Make a DELETE request
    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .context("Failed to send DELETE request")?;

        self.handle_response(response).await
    }

    /// Upload a CSV file together with the test to run on it
    pub async fn upload_csv<R: DeserializeOwned>(
        &self,
        file_name: &str,
        file_content: Vec<u8>,
        test_type: &str,
        confidence_level: Option<f64>,
    ) -> Result<R> {
        let part = reqwest::multipart::Part::bytes(file_content)
            .file_name(file_name.to_string())
            .mime_str("text/csv")
            .context("Failed to build upload part")?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("test_type", test_type.to_string());
        if let Some(confidence) = confidence_level {
            form = form.text("confidence_level", confidence.to_string());
        }

        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await
            .context("Failed to upload file")?;

        self.handle_response(response).await
    }

    /// Handle response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .context("Failed to deserialize response");
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        anyhow::bail!(
            "Request failed with status {}: {}",
            status,
            error_message(&error_text)
        )
    }
}

/// The server's `detail` text, or the raw body when it is not JSON
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
