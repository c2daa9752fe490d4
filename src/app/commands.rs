//! Command handlers - synchronous responses to UI events

use crate::app::state::clamp_cursor;
use crate::app::AppStore;
use crate::messages::ui_events::{AppTab, InputField, InputMode};

impl AppStore {
    // ========================
    // Navigation
    // ========================

    pub fn switch_tab(&mut self, tab: AppTab) {
        self.set_active_tab(tab);
        if tab == AppTab::Creator && self.active_field == InputField::InstallPath {
            self.active_field = InputField::SettingsHash;
        }
    }

    pub fn cursor_up(&mut self) {
        match self.active_tab {
            AppTab::Installations => {
                self.installation_cursor = self.installation_cursor.saturating_sub(1)
            }
            AppTab::Presets => self.preset_cursor = self.preset_cursor.saturating_sub(1),
            AppTab::Actions => self.installed_cursor = self.installed_cursor.saturating_sub(1),
            AppTab::Creator => self.material_cursor = self.material_cursor.saturating_sub(1),
        }
    }

    pub fn cursor_down(&mut self) {
        match self.active_tab {
            AppTab::Installations => {
                self.installation_cursor =
                    clamp_cursor(self.installation_cursor + 1, self.installations.len())
            }
            AppTab::Presets => {
                self.preset_cursor = clamp_cursor(self.preset_cursor + 1, self.presets.len())
            }
            AppTab::Actions => {
                self.installed_cursor =
                    clamp_cursor(self.installed_cursor + 1, self.installed_presets().len())
            }
            AppTab::Creator => {
                self.material_cursor = clamp_cursor(
                    self.material_cursor + 1,
                    self.creator.uploaded_materials.len(),
                )
            }
        }
    }

    /// `console_scroll` counts lines back from the newest entry
    pub fn console_scroll_up(&mut self) {
        let max = self.console.len().min(u16::MAX as usize) as u16;
        self.console_scroll = self.console_scroll.saturating_add(1).min(max);
    }

    pub fn console_scroll_down(&mut self) {
        self.console_scroll = self.console_scroll.saturating_sub(1);
    }

    // ========================
    // Selection
    // ========================

    /// Select or unselect one installation by building the new selection set
    pub fn select_installation(&mut self, install_path: &str, selected: bool) {
        let mut next = self.selected_installations.clone();
        if selected {
            next.insert(install_path.to_string());
        } else {
            next.shift_remove(install_path);
        }
        self.set_selected_installations(next);
    }

    /// Flip the selection of the installation under the cursor
    pub fn toggle_installation(&mut self) {
        let Some(path) = self
            .installations
            .get(self.installation_cursor)
            .map(|i| i.install_path.clone())
        else {
            return;
        };
        let selected = !self.is_installation_selected(&path);
        self.select_installation(&path, selected);
    }

    /// Select the preset under the cursor, or clear it if it was already selected
    pub fn toggle_preset(&mut self) {
        let Some(id) = self.presets.get(self.preset_cursor).map(|p| p.id.clone()) else {
            return;
        };
        if self.selected_preset.as_deref() == Some(id.as_str()) {
            self.set_selected_preset(None);
        } else {
            self.set_selected_preset(Some(id));
        }
    }

    /// Preset targeted by the install trigger: the one under the cursor
    pub fn preset_under_cursor(&self) -> Option<String> {
        self.presets.get(self.preset_cursor).map(|p| p.id.clone())
    }

    // ========================
    // Toolbar
    // ========================

    pub fn toggle_toolbar(&mut self) {
        self.set_toolbar_open(!self.toolbar_open);
    }

    pub fn settings_clicked(&mut self) {
        self.log("Settings clicked - Feature coming soon");
    }

    pub fn help_clicked(&mut self) {
        self.log("Help clicked - Feature coming soon");
    }

    pub fn about_clicked(&mut self) {
        self.log("About clicked - Feature coming soon");
    }

    // ========================
    // Forms
    // ========================

    pub fn open_add_installation(&mut self) {
        self.show_add_installation = true;
        self.active_field = InputField::InstallPath;
        self.start_editing();
    }

    pub fn close_add_installation(&mut self) {
        self.show_add_installation = false;
        self.install_path_input.clear();
        self.input_mode = InputMode::Normal;
        self.active_field = InputField::SettingsHash;
        self.cursor_position = 0;
    }

    pub fn next_field(&mut self) {
        self.active_field = self.active_field.next_creator_field();
        self.cursor_position = self.current_input().len();
    }

    /// Remove the uploaded material under the cursor; no backend call
    pub fn remove_material(&mut self) {
        if self.material_cursor >= self.creator.uploaded_materials.len() {
            return;
        }
        let filename = self.creator.uploaded_materials.remove(self.material_cursor);
        self.material_cursor =
            clamp_cursor(self.material_cursor, self.creator.uploaded_materials.len());
        self.set_status(format!("Removed {}", filename), false);
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        self.input_mode = InputMode::Editing;
        self.cursor_position = self.current_input().len();
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        let input = self.current_input_mut();
        if cursor_pos <= input.len() {
            input.insert(cursor_pos, c);
            self.cursor_position = cursor_pos + c.len_utf8();
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let cursor_pos = self.cursor_position;
            let input = self.current_input_mut();
            let prev_pos = input[..cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            input.remove(prev_pos);
            self.cursor_position = prev_pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Installation, Preset};

    fn store_with_installations() -> AppStore {
        let mut store = AppStore::new();
        store.set_installations(vec![
            Installation::new("Release", "/release"),
            Installation::new("Preview", "/preview"),
        ]);
        store
    }

    #[test]
    fn test_selection_is_idempotent_per_path() {
        let mut store = store_with_installations();
        store.select_installation("/release", true);
        store.select_installation("/release", true);
        store.select_installation("/preview", true);
        store.select_installation("/preview", false);
        store.select_installation("/preview", false);
        store.select_installation("/other", true);

        assert_eq!(store.selected_paths(), vec!["/release", "/other"]);
    }

    #[test]
    fn test_toggle_installation_under_cursor() {
        let mut store = store_with_installations();
        store.cursor_down();
        store.toggle_installation();
        assert!(store.is_installation_selected("/preview"));
        store.toggle_installation();
        assert!(store.selected_installations.is_empty());
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut store = store_with_installations();
        for _ in 0..5 {
            store.cursor_down();
        }
        assert_eq!(store.installation_cursor, 1);
        for _ in 0..5 {
            store.cursor_up();
        }
        assert_eq!(store.installation_cursor, 0);
    }

    #[test]
    fn test_toggle_preset_is_single_select() {
        let mut store = AppStore::new();
        store.set_presets(vec![
            Preset {
                name: "One".into(),
                id: "1".into(),
                stub: String::new(),
                tonemapping_mode: String::new(),
                bloom_mode: String::new(),
            },
            Preset {
                name: "Two".into(),
                id: "2".into(),
                stub: String::new(),
                tonemapping_mode: String::new(),
                bloom_mode: String::new(),
            },
        ]);
        store.set_active_tab(AppTab::Presets);

        store.toggle_preset();
        assert_eq!(store.selected_preset.as_deref(), Some("1"));
        store.cursor_down();
        store.toggle_preset();
        assert_eq!(store.selected_preset.as_deref(), Some("2"));
        store.toggle_preset();
        assert_eq!(store.selected_preset, None);
    }

    #[test]
    fn test_toolbar_buttons_only_log() {
        let mut store = AppStore::new();
        store.toggle_toolbar();
        assert!(store.toolbar_open);
        store.settings_clicked();
        store.help_clicked();
        store.about_clicked();

        assert_eq!(store.console.len(), 3);
        assert_eq!(store.console[2].message, "About clicked - Feature coming soon");
        assert_eq!(store.status, "Ready");
    }

    #[test]
    fn test_editing_inserts_at_cursor() {
        let mut store = AppStore::new();
        store.switch_tab(AppTab::Creator);
        store.start_editing();
        for c in "abd".chars() {
            store.enter_char(c);
        }
        store.move_cursor_left();
        store.enter_char('c');
        assert_eq!(store.creator.settings_hash, "abcd");

        store.delete_char();
        assert_eq!(store.creator.settings_hash, "abd");
        store.stop_editing();
        assert_eq!(store.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_add_installation_form_lifecycle() {
        let mut store = AppStore::new();
        store.open_add_installation();
        assert_eq!(store.input_mode, InputMode::Editing);
        store.enter_char('/');
        assert_eq!(store.install_path_input, "/");

        store.close_add_installation();
        assert!(!store.show_add_installation);
        assert!(store.install_path_input.is_empty());
        assert_eq!(store.active_field, InputField::SettingsHash);
    }

    #[test]
    fn test_remove_material() {
        let mut store = AppStore::new();
        store.creator.uploaded_materials = vec!["a.material.bin".into(), "b.material.bin".into()];
        store.switch_tab(AppTab::Creator);
        store.cursor_down();
        store.remove_material();

        assert_eq!(store.creator.uploaded_materials, vec!["a.material.bin"]);
        assert_eq!(store.material_cursor, 0);
        assert_eq!(store.status, "Removed b.material.bin");
    }
}
