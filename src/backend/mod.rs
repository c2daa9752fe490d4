//! Backend layer - the command boundary to the native installer backend
//!
//! Every backend command is a single request/response call. The store only
//! sees the [`Backend`] trait; [`HttpBackend`] is the production transport.
//! [`BackendActor`] runs commands on their own tasks so the App actor never
//! waits on I/O.

pub mod actor;
pub mod http;
#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Installation, Preset};

pub use actor::BackendActor;
pub use http::HttpBackend;

/// Failure reported across the backend boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    /// The backend ran the command and rejected it; `message` is its detail verbatim
    #[error("{message}")]
    Command { command: &'static str, message: String },
    /// The command never reached the backend, or the connection dropped
    #[error("backend unreachable: {0}")]
    Transport(String),
    /// The backend answered with something that is not the expected shape
    #[error("unexpected response from {command}: {message}")]
    Decode { command: &'static str, message: String },
}

impl BackendError {
    pub fn command(command: &'static str, message: impl Into<String>) -> Self {
        BackendError::Command {
            command,
            message: message.into(),
        }
    }
}

/// Arguments of the `download_creator_settings` command
#[derive(Debug, Clone, PartialEq)]
pub struct CreatorSettingsRequest {
    pub settings_hash: String,
    pub selected_names: Vec<String>,
    pub preset_name: String,
    pub preset_id: String,
}

#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_installations(&self) -> Result<Vec<Installation>, BackendError>;

    /// `force_refresh` bypasses the backend's preset cache
    async fn list_presets(&self, force_refresh: bool) -> Result<Vec<Preset>, BackendError>;

    async fn install_preset(&self, preset_id: &str, install_path: &str) -> Result<(), BackendError>;

    async fn clear_cache(&self) -> Result<(), BackendError>;

    async fn validate_installation_path(&self, path: &str) -> Result<bool, BackendError>;

    async fn download_creator_settings(
        &self,
        request: &CreatorSettingsRequest,
    ) -> Result<(), BackendError>;

    /// Copies a material file into the backend's staging area, returning its stored filename
    async fn upload_material_file(&self, source_path: &str) -> Result<String, BackendError>;

    async fn install_uploaded_materials(
        &self,
        selected_names: &[String],
        preset_name: &str,
    ) -> Result<(), BackendError>;
}
