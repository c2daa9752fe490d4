//! Async orchestrations - each wraps backend calls in status, loading and console bookkeeping
//!
//! An orchestration is split in two. A `start_*` step checks preconditions,
//! claims the resource, sets the in-progress status and the loading flag,
//! and returns the [`BackendCommand`] to run. [`AppStore::handle_response`]
//! applies what the backend sent back and may return a follow-up command.
//! The App actor ships commands to the backend actor and never waits on
//! them; the `async` methods run both steps inline against a [`Backend`].
//!
//! Backend errors never escape: they end up in `status` with `is_error`
//! set, and `is_loading` drops once nothing is in flight.

use tokio::sync::mpsc;

use crate::app::AppStore;
use crate::backend::actor::execute;
use crate::backend::{Backend, BackendError, CreatorSettingsRequest};
use crate::constants::{CREATOR_PRESET_PREFIX, MIN_SETTINGS_HASH_LEN};
use crate::messages::{BackendCommand, BackendResponse};

const EMPTY_SELECTION: &str = "Please select at least one installation";

impl AppStore {
    /// Claim the command's resource and enter the busy state.
    /// Returns `None` if an operation on that resource is already running.
    fn begin(
        &mut self,
        command: BackendCommand,
        status: &str,
        log_line: &str,
    ) -> Option<BackendCommand> {
        if let Some(resource) = command.resource() {
            if !self.in_flight.insert(resource) {
                tracing::debug!(command = command.name(), "Resource busy, trigger rejected");
                self.log(format!("{} already in progress", resource.label()));
                return None;
            }
        }

        self.set_status(status, false);
        self.set_loading(true);
        self.log(log_line);
        self.publish();
        Some(command)
    }

    /// Report a backend failure
    fn fail(&mut self, context: &str, err: &BackendError) {
        let message = format!("{}: {}", context, err);
        tracing::warn!(error = %err, "{}", context);
        self.set_status(message.clone(), true);
        self.log(message);
    }

    /// Report a failed precondition; no backend call was made
    fn reject(&mut self, message: &str) {
        self.set_status(message, true);
    }

    // ========================
    // Starting steps
    // ========================

    pub fn start_refresh_installations(&mut self) -> Option<BackendCommand> {
        self.begin(
            BackendCommand::ListInstallations,
            "Loading Minecraft installations...",
            "Scanning for Minecraft installations...",
        )
    }

    pub fn start_refresh_presets(&mut self, force_refresh: bool) -> Option<BackendCommand> {
        self.begin(
            BackendCommand::ListPresets { force_refresh },
            "Loading RTX presets...",
            "Fetching RTX presets...",
        )
    }

    pub fn start_clear_cache(&mut self) -> Option<BackendCommand> {
        self.begin(BackendCommand::ClearCache, "Clearing cache...", "Clearing cache...")
    }

    /// Install `preset_id` into every selected installation, one after another.
    ///
    /// The first failure stops the run; installations after it are not
    /// attempted and the installation list is not refreshed.
    pub fn start_install_preset(&mut self, preset_id: &str) -> Option<BackendCommand> {
        if self.selected_installations.is_empty() {
            self.reject(EMPTY_SELECTION);
            return None;
        }

        let install_paths = self.selected_paths();
        let log_line = format!(
            "Installing preset {} to {} installation(s)",
            preset_id,
            install_paths.len()
        );
        self.begin(
            BackendCommand::InstallPreset {
                preset_id: preset_id.to_string(),
                install_paths,
            },
            "Installing preset...",
            &log_line,
        )
    }

    /// Initial load: installations first, then presets from cache
    pub fn start_load_all(&mut self) -> Vec<BackendCommand> {
        let installations = self.start_refresh_installations();
        let presets = self.start_refresh_presets(false);
        installations.into_iter().chain(presets).collect()
    }

    pub fn start_add_installation(&mut self) -> Option<BackendCommand> {
        let path = self.install_path_input.trim().to_string();
        if path.is_empty() {
            return None;
        }

        let log_line = format!("Validating {}", path);
        self.begin(
            BackendCommand::ValidateInstallationPath(path),
            "Validating installation path...",
            &log_line,
        )
    }

    pub fn start_install_creator_settings(&mut self) -> Option<BackendCommand> {
        let settings_hash = self.creator.settings_hash.trim().to_string();
        if settings_hash.is_empty() {
            self.reject("Please enter a settings hash");
            return None;
        }
        if settings_hash.chars().count() < MIN_SETTINGS_HASH_LEN {
            self.reject("Settings hash must be at least 8 characters");
            return None;
        }
        if self.selected_installations.is_empty() {
            self.reject(EMPTY_SELECTION);
            return None;
        }

        let preset_name = match self.creator.preset_name.trim() {
            "" => default_creator_name(&settings_hash),
            name => name.to_string(),
        };
        let log_line = format!("Installing creator preset {}", preset_name);
        let request = CreatorSettingsRequest {
            preset_id: format!("{}{}", CREATOR_PRESET_PREFIX, settings_hash),
            settings_hash,
            selected_names: self.selected_paths(),
            preset_name,
        };

        let command = self.begin(
            BackendCommand::DownloadCreatorSettings(request),
            "Installing creator settings...",
            &log_line,
        );
        if command.is_some() {
            self.creator.is_processing = true;
        }
        command
    }

    pub fn start_upload_material(&mut self) -> Option<BackendCommand> {
        let source_path = self.creator.material_path.trim().to_string();
        if source_path.is_empty() {
            return None;
        }

        let log_line = format!("Uploading {}", source_path);
        let command = self.begin(
            BackendCommand::UploadMaterialFile(source_path),
            "Uploading material file...",
            &log_line,
        );
        if command.is_some() {
            self.creator.is_processing = true;
        }
        command
    }

    pub fn start_install_materials(&mut self) -> Option<BackendCommand> {
        if self.selected_installations.is_empty() {
            self.reject(EMPTY_SELECTION);
            return None;
        }
        if self.creator.uploaded_materials.is_empty() {
            self.reject("No material files uploaded");
            return None;
        }

        let preset_name = match self.creator.preset_name.trim() {
            "" => default_materials_name(self.creator.uploaded_materials.len()),
            name => name.to_string(),
        };
        let log_line = format!("Installing material preset {}", preset_name);
        let selected_names = self.selected_paths();

        let command = self.begin(
            BackendCommand::InstallUploadedMaterials {
                selected_names,
                preset_name,
            },
            "Installing material files...",
            &log_line,
        );
        if command.is_some() {
            self.creator.is_processing = true;
        }
        command
    }

    // ========================
    // Backend responses
    // ========================

    /// Apply a backend response, returning a follow-up command if the
    /// orchestration continues (a refresh after a successful install)
    pub fn handle_response(&mut self, response: BackendResponse) -> Option<BackendCommand> {
        if let Some(resource) = response.resource() {
            self.in_flight.remove(&resource);
        }

        let follow_up = match response {
            BackendResponse::Installations(Ok(installations)) => {
                let count = installations.len();
                tracing::info!(count, "Installations loaded");
                self.set_installations(installations);
                self.set_status(format!("Found {} Minecraft installation(s)", count), false);
                self.log(format!("Found {} installations", count));
                None
            }
            BackendResponse::Installations(Err(err)) => {
                self.fail("Error loading installations", &err);
                None
            }

            BackendResponse::Presets(Ok(presets)) => {
                let count = presets.len();
                tracing::info!(count, "Presets loaded");
                self.set_presets(presets);
                self.set_status(format!("Loaded {} RTX preset(s)", count), false);
                self.log(format!("Loaded {} presets", count));
                None
            }
            BackendResponse::Presets(Err(err)) => {
                self.fail("Error loading presets", &err);
                None
            }

            BackendResponse::CacheCleared(Ok(())) => {
                self.log("Cache cleared successfully");
                self.set_status("Cache cleared", false);
                None
            }
            BackendResponse::CacheCleared(Err(err)) => {
                self.fail("Error clearing cache", &err);
                None
            }

            BackendResponse::PresetInstalled { install_path } => {
                self.log(format!("Installed to: {}", install_path));
                None
            }
            BackendResponse::InstallFinished(Ok(())) => {
                self.set_status("Preset installed successfully", false);
                self.log("Installation completed successfully");
                self.start_refresh_installations()
            }
            BackendResponse::InstallFinished(Err(err)) => {
                self.fail("Error installing preset", &err);
                None
            }

            BackendResponse::PathValidated {
                path,
                result: Ok(true),
            } => {
                self.log(format!("Added installation path {}", path));
                self.close_add_installation();
                self.start_refresh_installations()
            }
            BackendResponse::PathValidated {
                path,
                result: Ok(false),
            } => {
                let message = format!("Invalid installation path: {}", path);
                self.set_status(message.clone(), true);
                self.log(message);
                None
            }
            BackendResponse::PathValidated { result: Err(err), .. } => {
                self.fail("Error adding installation", &err);
                None
            }

            BackendResponse::CreatorSettingsInstalled {
                preset_name,
                result,
            } => {
                self.creator.is_processing = false;
                match result {
                    Ok(()) => {
                        self.set_status(format!("Installed creator settings {}", preset_name), false);
                        self.log("Creator preset installation complete");
                        self.creator.settings_hash.clear();
                        self.creator.preset_name.clear();
                        self.cursor_position = 0;
                        self.start_refresh_installations()
                    }
                    Err(err) => {
                        self.fail("Creator install failed", &err);
                        None
                    }
                }
            }

            BackendResponse::MaterialUploaded(result) => {
                self.creator.is_processing = false;
                match result {
                    Ok(filename) => {
                        self.set_status(format!("Uploaded {}", filename), false);
                        self.log(format!("Uploaded material file {}", filename));
                        self.creator.uploaded_materials.push(filename);
                        self.creator.material_path.clear();
                        self.cursor_position = 0;
                    }
                    Err(err) => self.fail("Upload failed", &err),
                }
                None
            }

            BackendResponse::MaterialsInstalled {
                preset_name,
                result,
            } => {
                self.creator.is_processing = false;
                match result {
                    Ok(()) => {
                        self.set_status(format!("Installed material preset {}", preset_name), false);
                        self.log("Material installation complete");
                        self.creator.uploaded_materials.clear();
                        self.material_cursor = 0;
                        self.start_refresh_installations()
                    }
                    Err(err) => {
                        self.fail("Material install failed", &err);
                        None
                    }
                }
            }
        };

        if self.in_flight.is_empty() {
            self.set_loading(false);
        }
        follow_up
    }

    // ========================
    // Inline orchestrations
    // ========================

    /// Run a started command, and whatever it leads to, on the current task
    pub async fn run_inline(&mut self, backend: &dyn Backend, mut next: Option<BackendCommand>) {
        while let Some(command) = next.take() {
            let (response_tx, mut response_rx) = mpsc::unbounded_channel();
            execute(backend, command, &response_tx).await;
            drop(response_tx);

            while let Some(response) = response_rx.recv().await {
                if let Some(follow_up) = self.handle_response(response) {
                    next = Some(follow_up);
                }
                self.publish();
            }
        }
    }

    pub async fn refresh_installations(&mut self, backend: &dyn Backend) {
        let command = self.start_refresh_installations();
        self.run_inline(backend, command).await;
    }

    pub async fn refresh_presets(&mut self, backend: &dyn Backend, force_refresh: bool) {
        let command = self.start_refresh_presets(force_refresh);
        self.run_inline(backend, command).await;
    }

    pub async fn clear_cache(&mut self, backend: &dyn Backend) {
        let command = self.start_clear_cache();
        self.run_inline(backend, command).await;
    }

    pub async fn install_preset(&mut self, backend: &dyn Backend, preset_id: &str) {
        let command = self.start_install_preset(preset_id);
        self.run_inline(backend, command).await;
    }

    pub async fn load_all(&mut self, backend: &dyn Backend) {
        self.refresh_installations(backend).await;
        self.refresh_presets(backend, false).await;
    }

    pub async fn add_installation(&mut self, backend: &dyn Backend) {
        let command = self.start_add_installation();
        self.run_inline(backend, command).await;
    }

    pub async fn install_creator_settings(&mut self, backend: &dyn Backend) {
        let command = self.start_install_creator_settings();
        self.run_inline(backend, command).await;
    }

    pub async fn upload_material(&mut self, backend: &dyn Backend) {
        let command = self.start_upload_material();
        self.run_inline(backend, command).await;
    }

    pub async fn install_materials(&mut self, backend: &dyn Backend) {
        let command = self.start_install_materials();
        self.run_inline(backend, command).await;
    }
}

/// Preset name used when the creator form leaves it blank
pub fn default_creator_name(settings_hash: &str) -> String {
    let prefix: String = settings_hash.chars().take(MIN_SETTINGS_HASH_LEN).collect();
    format!("Settings {}", prefix)
}

pub fn default_materials_name(file_count: usize) -> String {
    format!("Materials ({} files)", file_count)
}
