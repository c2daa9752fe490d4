//! HTTP invoke transport - posts each command as JSON to the backend

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::backend::{Backend, BackendError, CreatorSettingsRequest};
use crate::config::Settings;
use crate::models::{Installation, Preset};

/// Backend reached over HTTP: `POST <base_url>/<command>` with camelCase JSON arguments
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(settings: &Settings) -> Self {
        HttpBackend {
            client: create_client(Duration::from_secs(settings.request_timeout_secs)),
            base_url: settings.backend_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn command_url(&self, command: &str) -> String {
        format!("{}/{}", self.base_url, command)
    }

    /// Invoke a command and decode its JSON result
    async fn invoke<T: DeserializeOwned>(
        &self,
        command: &'static str,
        args: Value,
    ) -> Result<T, BackendError> {
        let start = Instant::now();
        tracing::debug!(command, "Invoking backend command");

        let result = self
            .client
            .post(self.command_url(command))
            .json(&args)
            .send()
            .await;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                let msg = if e.is_timeout() {
                    format!("{} timed out", command)
                } else if e.is_connect() {
                    format!("connection failed: {}", e)
                } else {
                    format!("request failed: {}", e)
                };
                tracing::warn!(command, error = %msg, "Backend command did not complete");
                return Err(BackendError::Transport(msg));
            }
        };

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| BackendError::Transport(format!("error reading body: {}", e)))?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            tracing::warn!(command, status = status.as_u16(), elapsed_ms, "Backend command failed");
            return Err(BackendError::command(command, error_detail(&body)));
        }

        tracing::debug!(command, status = status.as_u16(), elapsed_ms, "Backend command completed");
        decode_result(command, &body)
    }
}

/// Extract the failure detail: backends answer with either a JSON string or plain text
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(message)) => message,
        Ok(Value::Object(map)) => match map.get("message").and_then(Value::as_str) {
            Some(message) => message.to_string(),
            None => body.trim().to_string(),
        },
        _ => body.trim().to_string(),
    }
}

fn decode_result<T: DeserializeOwned>(command: &'static str, body: &str) -> Result<T, BackendError> {
    // Unit commands may answer with an empty body
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| BackendError::Decode {
        command,
        message: e.to_string(),
    })
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_installations(&self) -> Result<Vec<Installation>, BackendError> {
        self.invoke("list_installations", json!({})).await
    }

    async fn list_presets(&self, force_refresh: bool) -> Result<Vec<Preset>, BackendError> {
        self.invoke("list_presets", json!({ "forceRefresh": force_refresh }))
            .await
    }

    async fn install_preset(&self, preset_id: &str, install_path: &str) -> Result<(), BackendError> {
        self.invoke(
            "install_preset",
            json!({ "uuid": preset_id, "installPath": install_path }),
        )
        .await
    }

    async fn clear_cache(&self) -> Result<(), BackendError> {
        self.invoke("clear_cache", json!({})).await
    }

    async fn validate_installation_path(&self, path: &str) -> Result<bool, BackendError> {
        self.invoke("validate_minecraft_path", json!({ "path": path }))
            .await
    }

    async fn download_creator_settings(
        &self,
        request: &CreatorSettingsRequest,
    ) -> Result<(), BackendError> {
        self.invoke("download_creator_settings", creator_settings_args(request))
            .await
    }

    async fn upload_material_file(&self, source_path: &str) -> Result<String, BackendError> {
        self.invoke("upload_material_file", json!({ "sourcePath": source_path }))
            .await
    }

    async fn install_uploaded_materials(
        &self,
        selected_names: &[String],
        preset_name: &str,
    ) -> Result<(), BackendError> {
        self.invoke(
            "install_uploaded_materials",
            json!({ "selectedNames": selected_names, "presetName": preset_name }),
        )
        .await
    }
}

fn creator_settings_args(request: &CreatorSettingsRequest) -> Value {
    json!({
        "settingsHash": request.settings_hash,
        "selectedNames": request.selected_names,
        "presetName": request.preset_name,
        "uuid": request.preset_id,
    })
}

/// Create an HTTP client with the configured timeout
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
