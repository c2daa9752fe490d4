//! Render state - data structure sent from App layer to UI for rendering

use crate::constants::INITIAL_STATUS;
use crate::messages::ui_events::{AppTab, InputField, InputMode};
use crate::models::{InstalledPresetEntry, Installation, Preset};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    pub active_tab: AppTab,

    // Collections
    pub installations: Vec<Installation>,
    pub presets: Vec<Preset>,
    pub installed_presets: Vec<InstalledPresetEntry>,

    // Selection
    pub selected_installations: Vec<String>,
    pub selected_preset: Option<String>,

    // List cursors
    pub installation_cursor: usize,
    pub preset_cursor: usize,
    pub installed_cursor: usize,
    pub material_cursor: usize,

    // Status line
    pub status: String,
    pub is_loading: bool,
    pub is_error: bool,

    // Console panel, already formatted as `[time] message`
    pub console: Vec<String>,
    pub console_scroll: u16,

    pub toolbar_open: bool,

    // Text input
    pub input_mode: InputMode,
    pub active_field: InputField,
    pub cursor_position: usize,

    // Custom installation form
    pub show_add_installation: bool,
    pub install_path_input: String,

    // Creator tab
    pub settings_hash_input: String,
    pub preset_name_input: String,
    pub material_path_input: String,
    pub uploaded_materials: Vec<String>,
    pub creator_processing: bool,
}

impl RenderState {
    pub fn is_installation_selected(&self, install_path: &str) -> bool {
        self.selected_installations.iter().any(|p| p == install_path)
    }
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            active_tab: AppTab::Installations,
            installations: Vec::new(),
            presets: Vec::new(),
            installed_presets: Vec::new(),
            selected_installations: Vec::new(),
            selected_preset: None,
            installation_cursor: 0,
            preset_cursor: 0,
            installed_cursor: 0,
            material_cursor: 0,
            status: String::from(INITIAL_STATUS),
            is_loading: false,
            is_error: false,
            console: Vec::new(),
            console_scroll: 0,
            toolbar_open: false,
            input_mode: InputMode::Normal,
            active_field: InputField::SettingsHash,
            cursor_position: 0,
            show_add_installation: false,
            install_path_input: String::new(),
            settings_hash_input: String::new(),
            preset_name_input: String::new(),
            material_path_input: String::new(),
            uploaded_materials: Vec::new(),
            creator_processing: false,
        }
    }
}
