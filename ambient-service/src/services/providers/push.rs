use super::{ProviderError, PushProvider};
use crate::config::FcmConfig;
use crate::models::NotificationPayload;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

const FCM_API_URL: &str = "https://fcm.googleapis.com/v1/projects";

pub struct FcmProvider {
    config: FcmConfig,
    access_token: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct FcmRequest {
    message: FcmMessage,
}

// Data-only message; the clients render Title/Body from the data map.
#[derive(Debug, Serialize)]
struct FcmMessage {
    token: String,
    data: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct FcmResponse {
    #[serde(default)]
    error: Option<FcmError>,
}

#[derive(Debug, Deserialize)]
struct FcmError {
    message: String,
    status: String,
}

impl FcmProvider {
    /// Build the provider, resolving credentials at startup. The
    /// service-account key is sent as a bearer token; exchanging it for a
    /// short-lived OAuth2 access token is left to deployment tooling.
    pub fn new(config: FcmConfig) -> Result<Self, ProviderError> {
        let access_token = match config.credentials_file.as_deref() {
            Some(path) if !path.is_empty() => std::fs::read_to_string(path)
                .map(|key| key.trim().to_string())
                .map_err(|e| {
                    ProviderError::Configuration(format!(
                        "Failed to read credentials file {}: {}",
                        path, e
                    ))
                })?,
            _ => config.service_account_key.clone(),
        };

        if access_token.is_empty() {
            return Err(ProviderError::Configuration(
                "FCM credentials are not configured".to_string(),
            ));
        }

        Ok(Self {
            config,
            access_token,
            client: Client::new(),
        })
    }

    async fn send_one(
        &self,
        token: &str,
        data: &HashMap<String, String>,
    ) -> Result<(), ProviderError> {
        let request = FcmRequest {
            message: FcmMessage {
                token: token.to_string(),
                data: data.clone(),
            },
        };

        let url = format!("{}/{}/messages:send", FCM_API_URL, self.config.project_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(format!("Failed to connect to FCM: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::SendFailed(format!(
                "FCM API returned error status {}: {}",
                status, body
            )));
        }

        let fcm_response: FcmResponse = response.json().await.map_err(|e| {
            ProviderError::SendFailed(format!("Failed to parse FCM response: {}", e))
        })?;

        if let Some(error) = fcm_response.error {
            return Err(ProviderError::SendFailed(format!(
                "FCM error ({}): {}",
                error.status, error.message
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl PushProvider for FcmProvider {
    async fn send_batch(
        &self,
        tokens: &[String],
        payload: &NotificationPayload,
    ) -> Result<(), ProviderError> {
        if !self.config.enabled {
            return Err(ProviderError::NotEnabled(
                "FCM push provider is not enabled".to_string(),
            ));
        }

        if self.config.project_id.is_empty() {
            return Err(ProviderError::Configuration(
                "FCM project_id is not configured".to_string(),
            ));
        }

        // One unchunked batch, matching the site controllers' expectations.
        // The first per-token failure aborts the rest of the batch.
        let data = payload.to_data_map();
        for token in tokens {
            self.send_one(token, &data).await?;
        }

        tracing::info!(
            recipients = tokens.len(),
            title = %payload.title,
            "Push batch sent via FCM"
        );

        Ok(())
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if !self.config.enabled {
            return Ok(());
        }

        if self.config.project_id.is_empty() {
            return Err(ProviderError::Configuration(
                "FCM project_id is not configured".to_string(),
            ));
        }

        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }
}

/// Mock push provider for testing and disabled deployments.
pub struct MockPushProvider {
    enabled: bool,
    send_count: AtomicU64,
    last_batch: Mutex<Vec<String>>,
}

impl MockPushProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            send_count: AtomicU64::new(0),
            last_batch: Mutex::new(Vec::new()),
        }
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }

    /// Recipients of the most recent batch.
    pub fn last_batch(&self) -> Vec<String> {
        self.last_batch.lock().expect("mock batch lock").clone()
    }
}

#[async_trait]
impl PushProvider for MockPushProvider {
    async fn send_batch(
        &self,
        tokens: &[String],
        payload: &NotificationPayload,
    ) -> Result<(), ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotEnabled(
                "Mock push provider is not enabled".to_string(),
            ));
        }

        self.send_count.fetch_add(1, Ordering::SeqCst);
        *self.last_batch.lock().expect("mock batch lock") = tokens.to_vec();

        tracing::info!(
            recipients = tokens.len(),
            title = %payload.title,
            "[MOCK] Push batch would be sent"
        );

        Ok(())
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
