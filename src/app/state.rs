//! App state - the store: pure data plus synchronous transitions, no I/O logic

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Local};
use indexmap::IndexSet;
use tokio::sync::mpsc;

use crate::constants::INITIAL_STATUS;
use crate::messages::ui_events::{AppTab, InputField, InputMode};
use crate::messages::{RenderState, Resource};
use crate::models::{dedup_installed_presets, InstalledPresetEntry, Installation, Preset};

/// One console transcript line, stamped when it was appended
#[derive(Clone, Debug)]
pub struct ConsoleLine {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl fmt::Display for ConsoleLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// Creator tab form state
#[derive(Clone, Debug, Default)]
pub struct CreatorForm {
    pub settings_hash: String,
    pub preset_name: String,
    pub material_path: String,
    pub uploaded_materials: Vec<String>,
    pub is_processing: bool,
}

/// Main application state - pure data, no I/O
pub struct AppStore {
    // Collections, replaced wholesale on refresh
    pub installations: Vec<Installation>,
    pub presets: Vec<Preset>,

    // Selection. Not pruned when collections change.
    pub selected_installations: IndexSet<String>,
    pub selected_preset: Option<String>,

    // Status line
    pub status: String,
    pub is_error: bool,
    pub is_loading: bool,

    // Append-only until cleared
    pub console: Vec<ConsoleLine>,
    pub console_scroll: u16,

    pub active_tab: AppTab,
    pub toolbar_open: bool,

    // List cursors
    pub installation_cursor: usize,
    pub preset_cursor: usize,
    pub installed_cursor: usize,
    pub material_cursor: usize,

    // Text input
    pub input_mode: InputMode,
    pub active_field: InputField,
    pub cursor_position: usize,

    pub show_add_installation: bool,
    pub install_path_input: String,

    pub creator: CreatorForm,

    // Resources with an orchestration in flight
    pub(crate) in_flight: HashSet<Resource>,

    render_tx: Option<mpsc::UnboundedSender<RenderState>>,
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AppStore {
    pub fn new() -> Self {
        AppStore {
            installations: Vec::new(),
            presets: Vec::new(),
            selected_installations: IndexSet::new(),
            selected_preset: None,
            status: String::from(INITIAL_STATUS),
            is_error: false,
            is_loading: false,
            console: Vec::new(),
            console_scroll: 0,
            active_tab: AppTab::Installations,
            toolbar_open: false,
            installation_cursor: 0,
            preset_cursor: 0,
            installed_cursor: 0,
            material_cursor: 0,
            input_mode: InputMode::Normal,
            active_field: InputField::SettingsHash,
            cursor_position: 0,
            show_add_installation: false,
            install_path_input: String::new(),
            creator: CreatorForm::default(),
            in_flight: HashSet::new(),
            render_tx: None,
        }
    }

    /// Store that pushes a render snapshot on every [`AppStore::publish`]
    pub fn with_renderer(render_tx: mpsc::UnboundedSender<RenderState>) -> Self {
        AppStore {
            render_tx: Some(render_tx),
            ..Self::new()
        }
    }

    // ========================
    // Setters
    // ========================

    pub fn set_installations(&mut self, installations: Vec<Installation>) {
        self.installations = installations;
        self.installation_cursor = clamp_cursor(self.installation_cursor, self.installations.len());
        self.installed_cursor = clamp_cursor(self.installed_cursor, self.installed_presets().len());
    }

    pub fn set_presets(&mut self, presets: Vec<Preset>) {
        self.presets = presets;
        self.preset_cursor = clamp_cursor(self.preset_cursor, self.presets.len());
    }

    /// Replace the whole selection; toggling is up to the caller
    pub fn set_selected_installations(&mut self, selected: IndexSet<String>) {
        self.selected_installations = selected;
    }

    pub fn set_selected_preset(&mut self, preset_id: Option<String>) {
        self.selected_preset = preset_id;
    }

    pub fn set_status(&mut self, status: impl Into<String>, is_error: bool) {
        self.status = status.into();
        self.is_error = is_error;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn set_active_tab(&mut self, tab: AppTab) {
        self.active_tab = tab;
    }

    pub fn set_toolbar_open(&mut self, open: bool) {
        self.toolbar_open = open;
    }

    // ========================
    // Console
    // ========================

    /// Append a line stamped with the current wall-clock time
    pub fn log(&mut self, message: impl Into<String>) {
        let line = ConsoleLine {
            timestamp: Local::now(),
            message: message.into(),
        };
        tracing::info!(target: "console", "{}", line.message);
        self.console.push(line);
    }

    pub fn clear_console(&mut self) {
        self.console.clear();
        self.console_scroll = 0;
    }

    // ========================
    // Derived views
    // ========================

    pub fn installed_presets(&self) -> Vec<InstalledPresetEntry> {
        dedup_installed_presets(&self.installations)
    }

    pub fn is_busy(&self, resource: Resource) -> bool {
        self.in_flight.contains(&resource)
    }

    pub fn is_installation_selected(&self, install_path: &str) -> bool {
        self.selected_installations.contains(install_path)
    }

    /// Selected installation keys in selection order
    pub fn selected_paths(&self) -> Vec<String> {
        self.selected_installations.iter().cloned().collect()
    }

    /// Get the current input field content
    pub fn current_input(&self) -> &str {
        match self.active_field {
            InputField::InstallPath => &self.install_path_input,
            InputField::SettingsHash => &self.creator.settings_hash,
            InputField::PresetName => &self.creator.preset_name,
            InputField::MaterialPath => &self.creator.material_path,
        }
    }

    /// Get mutable reference to current input field
    pub fn current_input_mut(&mut self) -> &mut String {
        match self.active_field {
            InputField::InstallPath => &mut self.install_path_input,
            InputField::SettingsHash => &mut self.creator.settings_hash,
            InputField::PresetName => &mut self.creator.preset_name,
            InputField::MaterialPath => &mut self.creator.material_path,
        }
    }

    // ========================
    // Rendering
    // ========================

    /// Send the current snapshot to the UI, if a renderer is attached
    pub fn publish(&self) {
        if let Some(tx) = &self.render_tx {
            let _ = tx.send(self.to_render_state());
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            active_tab: self.active_tab,
            installations: self.installations.clone(),
            presets: self.presets.clone(),
            installed_presets: self.installed_presets(),
            selected_installations: self.selected_paths(),
            selected_preset: self.selected_preset.clone(),
            installation_cursor: self.installation_cursor,
            preset_cursor: self.preset_cursor,
            installed_cursor: self.installed_cursor,
            material_cursor: self.material_cursor,
            status: self.status.clone(),
            is_loading: self.is_loading,
            is_error: self.is_error,
            console: self.console.iter().map(ToString::to_string).collect(),
            console_scroll: self.console_scroll,
            toolbar_open: self.toolbar_open,
            input_mode: self.input_mode,
            active_field: self.active_field,
            cursor_position: self.cursor_position,
            show_add_installation: self.show_add_installation,
            install_path_input: self.install_path_input.clone(),
            settings_hash_input: self.creator.settings_hash.clone(),
            preset_name_input: self.creator.preset_name.clone(),
            material_path_input: self.creator.material_path.clone(),
            uploaded_materials: self.creator.uploaded_materials.clone(),
            creator_processing: self.creator.is_processing,
        }
    }
}

/// Keep a list cursor inside `0..len` (0 for empty lists)
pub(crate) fn clamp_cursor(cursor: usize, len: usize) -> usize {
    cursor.min(len.saturating_sub(1))
}
