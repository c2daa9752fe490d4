//! Recording backend used by the store and actor tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::backend::{Backend, BackendError, CreatorSettingsRequest};
use crate::models::{Installation, Preset};

/// A backend call as observed by [`MockBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListInstallations,
    ListPresets { force_refresh: bool },
    InstallPreset { preset_id: String, install_path: String },
    ClearCache,
    ValidatePath(String),
    DownloadCreatorSettings(CreatorSettingsRequest),
    UploadMaterial(String),
    InstallMaterials { selected_names: Vec<String>, preset_name: String },
}

#[derive(Default)]
pub struct MockBackend {
    installations: Vec<Installation>,
    presets: Vec<Preset>,
    valid_path: bool,
    failures: HashMap<&'static str, String>,
    failing_install_paths: HashMap<String, String>,
    calls: Mutex<Vec<Call>>,
    installations_gate: Option<Arc<Notify>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_installations(mut self, installations: Vec<Installation>) -> Self {
        self.installations = installations;
        self
    }

    pub fn with_presets(mut self, presets: Vec<Preset>) -> Self {
        self.presets = presets;
        self
    }

    pub fn with_valid_path(mut self, valid: bool) -> Self {
        self.valid_path = valid;
        self
    }

    /// Make every call of `command` fail with `message`
    pub fn failing(mut self, command: &'static str, message: &str) -> Self {
        self.failures.insert(command, message.to_string());
        self
    }

    /// Make `install_preset` fail only for `install_path`
    pub fn failing_install_at(mut self, install_path: &str, message: &str) -> Self {
        self.failing_install_paths
            .insert(install_path.to_string(), message.to_string());
        self
    }

    /// Hold every `list_installations` call until `gate` is notified
    pub fn holding_installations(mut self, gate: Arc<Notify>) -> Self {
        self.installations_gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, command: &'static str) -> Result<(), BackendError> {
        match self.failures.get(command) {
            Some(message) => Err(BackendError::command(command, message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn list_installations(&self) -> Result<Vec<Installation>, BackendError> {
        self.record(Call::ListInstallations);
        if let Some(gate) = &self.installations_gate {
            gate.notified().await;
        }
        self.check("list_installations")?;
        Ok(self.installations.clone())
    }

    async fn list_presets(&self, force_refresh: bool) -> Result<Vec<Preset>, BackendError> {
        self.record(Call::ListPresets { force_refresh });
        self.check("list_presets")?;
        Ok(self.presets.clone())
    }

    async fn install_preset(&self, preset_id: &str, install_path: &str) -> Result<(), BackendError> {
        self.record(Call::InstallPreset {
            preset_id: preset_id.to_string(),
            install_path: install_path.to_string(),
        });
        self.check("install_preset")?;
        match self.failing_install_paths.get(install_path) {
            Some(message) => Err(BackendError::command("install_preset", message.clone())),
            None => Ok(()),
        }
    }

    async fn clear_cache(&self) -> Result<(), BackendError> {
        self.record(Call::ClearCache);
        self.check("clear_cache")
    }

    async fn validate_installation_path(&self, path: &str) -> Result<bool, BackendError> {
        self.record(Call::ValidatePath(path.to_string()));
        self.check("validate_minecraft_path")?;
        Ok(self.valid_path)
    }

    async fn download_creator_settings(
        &self,
        request: &CreatorSettingsRequest,
    ) -> Result<(), BackendError> {
        self.record(Call::DownloadCreatorSettings(request.clone()));
        self.check("download_creator_settings")
    }

    async fn upload_material_file(&self, source_path: &str) -> Result<String, BackendError> {
        self.record(Call::UploadMaterial(source_path.to_string()));
        self.check("upload_material_file")?;
        let filename = source_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(source_path)
            .to_string();
        Ok(filename)
    }

    async fn install_uploaded_materials(
        &self,
        selected_names: &[String],
        preset_name: &str,
    ) -> Result<(), BackendError> {
        self.record(Call::InstallMaterials {
            selected_names: selected_names.to_vec(),
            preset_name: preset_name.to_string(),
        });
        self.check("install_uploaded_materials")
    }
}
