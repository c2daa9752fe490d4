//! Backend messages - communication between App and Backend layers

use crate::backend::{BackendError, CreatorSettingsRequest};
use crate::models::{Installation, Preset};

/// State slice an orchestration writes to. At most one operation per
/// resource is in flight; a second trigger for a busy resource is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Installations,
    Presets,
    Cache,
    Materials,
}

impl Resource {
    pub fn label(&self) -> &'static str {
        match self {
            Resource::Installations => "Installation update",
            Resource::Presets => "Preset refresh",
            Resource::Cache => "Cache clear",
            Resource::Materials => "Material upload",
        }
    }
}

/// Commands sent from App layer to Backend layer
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    ListInstallations,
    ListPresets { force_refresh: bool },
    ClearCache,
    /// Install one preset into each path in order, stopping at the first failure
    InstallPreset {
        preset_id: String,
        install_paths: Vec<String>,
    },
    ValidateInstallationPath(String),
    DownloadCreatorSettings(CreatorSettingsRequest),
    UploadMaterialFile(String),
    InstallUploadedMaterials {
        selected_names: Vec<String>,
        preset_name: String,
    },
    /// Shutdown the backend actor
    Shutdown,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::ListInstallations => "list_installations",
            BackendCommand::ListPresets { .. } => "list_presets",
            BackendCommand::ClearCache => "clear_cache",
            BackendCommand::InstallPreset { .. } => "install_preset",
            BackendCommand::ValidateInstallationPath(_) => "validate_minecraft_path",
            BackendCommand::DownloadCreatorSettings(_) => "download_creator_settings",
            BackendCommand::UploadMaterialFile(_) => "upload_material_file",
            BackendCommand::InstallUploadedMaterials { .. } => "install_uploaded_materials",
            BackendCommand::Shutdown => "shutdown",
        }
    }

    /// Resource held while the command runs
    pub fn resource(&self) -> Option<Resource> {
        match self {
            BackendCommand::ListInstallations
            | BackendCommand::InstallPreset { .. }
            | BackendCommand::ValidateInstallationPath(_)
            | BackendCommand::DownloadCreatorSettings(_)
            | BackendCommand::InstallUploadedMaterials { .. } => Some(Resource::Installations),
            BackendCommand::ListPresets { .. } => Some(Resource::Presets),
            BackendCommand::ClearCache => Some(Resource::Cache),
            BackendCommand::UploadMaterialFile(_) => Some(Resource::Materials),
            BackendCommand::Shutdown => None,
        }
    }
}

/// Responses sent from Backend layer to App layer
#[derive(Debug, Clone)]
pub enum BackendResponse {
    Installations(Result<Vec<Installation>, BackendError>),
    Presets(Result<Vec<Preset>, BackendError>),
    CacheCleared(Result<(), BackendError>),
    /// One target of an install finished; more may follow
    PresetInstalled { install_path: String },
    InstallFinished(Result<(), BackendError>),
    PathValidated {
        path: String,
        result: Result<bool, BackendError>,
    },
    CreatorSettingsInstalled {
        preset_name: String,
        result: Result<(), BackendError>,
    },
    MaterialUploaded(Result<String, BackendError>),
    MaterialsInstalled {
        preset_name: String,
        result: Result<(), BackendError>,
    },
}

impl BackendResponse {
    /// Resource released by this response; progress updates release nothing
    pub fn resource(&self) -> Option<Resource> {
        match self {
            BackendResponse::PresetInstalled { .. } => None,
            BackendResponse::Installations(_)
            | BackendResponse::InstallFinished(_)
            | BackendResponse::PathValidated { .. }
            | BackendResponse::CreatorSettingsInstalled { .. }
            | BackendResponse::MaterialsInstalled { .. } => Some(Resource::Installations),
            BackendResponse::Presets(_) => Some(Resource::Presets),
            BackendResponse::CacheCleared(_) => Some(Resource::Cache),
            BackendResponse::MaterialUploaded(_) => Some(Resource::Materials),
        }
    }
}
