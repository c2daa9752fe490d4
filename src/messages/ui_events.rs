//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::messages::RenderState;

/// Application tabs
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AppTab {
    #[default]
    Installations,
    Presets,
    Actions,
    Creator,
}

impl AppTab {
    pub const ALL: [AppTab; 4] = [
        AppTab::Installations,
        AppTab::Presets,
        AppTab::Actions,
        AppTab::Creator,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AppTab::Installations => "Installations",
            AppTab::Presets => "Presets",
            AppTab::Actions => "Actions",
            AppTab::Creator => "Creator",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            AppTab::Installations => 0,
            AppTab::Presets => 1,
            AppTab::Actions => 2,
            AppTab::Creator => 3,
        }
    }
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Tab navigation
    SwitchTab(AppTab),

    // List navigation (acts on the active tab's list)
    CursorUp,
    CursorDown,

    // Selection and install
    ToggleInstallation,
    TogglePreset,
    InstallPreset,

    // Toolbar popover
    ToggleToolbar,
    Refresh,
    ForceRefresh,
    ClearCache,
    Settings,
    Help,
    About,

    // Console
    ClearConsole,
    ConsoleScrollUp,
    ConsoleScrollDown,

    // Custom installation form
    OpenAddInstallation,
    SubmitAddInstallation,
    CancelAddInstallation,

    // Input editing
    NextField,
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // Creator tab
    SubmitCreatorSettings,
    UploadMaterial,
    RemoveMaterial,
    InstallMaterials,

    // System
    Quit,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Editable text fields
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputField {
    InstallPath,
    #[default]
    SettingsHash,
    PresetName,
    MaterialPath,
}

impl InputField {
    /// Next field of the creator form; the install path field is not part of it
    pub fn next_creator_field(&self) -> InputField {
        match self {
            InputField::SettingsHash => InputField::PresetName,
            InputField::PresetName => InputField::MaterialPath,
            InputField::MaterialPath | InputField::InstallPath => InputField::SettingsHash,
        }
    }
}

/// Convert a key event to a UiEvent based on what is currently on screen
pub fn key_to_ui_event(key: KeyEvent, state: &RenderState) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if state.input_mode == InputMode::Editing {
        return handle_editing_keys(key, state.active_field);
    }

    if state.toolbar_open {
        return handle_toolbar_keys(key);
    }

    // Global keys in normal mode
    match key.code {
        KeyCode::Char('q') => return Some(UiEvent::Quit),
        KeyCode::Char('1') => return Some(UiEvent::SwitchTab(AppTab::Installations)),
        KeyCode::Char('2') => return Some(UiEvent::SwitchTab(AppTab::Presets)),
        KeyCode::Char('3') => return Some(UiEvent::SwitchTab(AppTab::Actions)),
        KeyCode::Char('4') => return Some(UiEvent::SwitchTab(AppTab::Creator)),
        KeyCode::Char('o') => return Some(UiEvent::ToggleToolbar),
        KeyCode::Char('?') => return Some(UiEvent::Help),
        KeyCode::Char('r') => return Some(UiEvent::Refresh),
        KeyCode::Char('F') => return Some(UiEvent::ForceRefresh),
        KeyCode::Char('C') => return Some(UiEvent::ClearConsole),
        KeyCode::PageUp => return Some(UiEvent::ConsoleScrollUp),
        KeyCode::PageDown => return Some(UiEvent::ConsoleScrollDown),
        KeyCode::Up => return Some(UiEvent::CursorUp),
        KeyCode::Down => return Some(UiEvent::CursorDown),
        _ => {}
    }

    match state.active_tab {
        AppTab::Installations => match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => Some(UiEvent::ToggleInstallation),
            KeyCode::Char('n') => Some(UiEvent::OpenAddInstallation),
            _ => None,
        },
        AppTab::Presets => match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => Some(UiEvent::TogglePreset),
            KeyCode::Char('i') => Some(UiEvent::InstallPreset),
            _ => None,
        },
        AppTab::Actions => None,
        AppTab::Creator => match key.code {
            KeyCode::Tab => Some(UiEvent::NextField),
            KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartEditing),
            KeyCode::Char('s') => Some(UiEvent::SubmitCreatorSettings),
            KeyCode::Char('u') => Some(UiEvent::UploadMaterial),
            KeyCode::Char('d') => Some(UiEvent::RemoveMaterial),
            KeyCode::Char('m') => Some(UiEvent::InstallMaterials),
            _ => None,
        },
    }
}

/// Keys while the toolbar popover is open
fn handle_toolbar_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('o') => Some(UiEvent::ToggleToolbar),
        KeyCode::Char('r') => Some(UiEvent::Refresh),
        KeyCode::Char('f') => Some(UiEvent::ForceRefresh),
        KeyCode::Char('c') => Some(UiEvent::ClearCache),
        KeyCode::Char('s') => Some(UiEvent::Settings),
        KeyCode::Char('h') | KeyCode::Char('?') => Some(UiEvent::Help),
        KeyCode::Char('a') => Some(UiEvent::About),
        KeyCode::Char('q') => Some(UiEvent::Quit),
        _ => None,
    }
}

/// Keys while a text field is being edited
fn handle_editing_keys(key: KeyEvent, field: InputField) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => match field {
            InputField::InstallPath => Some(UiEvent::CancelAddInstallation),
            _ => Some(UiEvent::StopEditing),
        },
        KeyCode::Enter => match field {
            InputField::InstallPath => Some(UiEvent::SubmitAddInstallation),
            InputField::SettingsHash | InputField::PresetName => {
                Some(UiEvent::SubmitCreatorSettings)
            }
            InputField::MaterialPath => Some(UiEvent::UploadMaterial),
        },
        KeyCode::Tab if field != InputField::InstallPath => Some(UiEvent::NextField),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}
