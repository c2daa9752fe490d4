//! App actor - message loop processing UI events and backend responses
//!
//! The actor never awaits a backend call. Orchestrations hand their command
//! to the backend actor and the reply comes back on the response channel,
//! so navigation and editing stay live while a call is pending. A second
//! trigger for a resource that is still busy is rejected by the store.

use tokio::sync::mpsc;

use crate::app::state::AppStore;
use crate::messages::{BackendCommand, BackendResponse, RenderState, UiEvent};

/// App actor that processes UI events and backend responses
pub struct AppActor {
    state: AppStore,
    backend_tx: mpsc::UnboundedSender<BackendCommand>,
}

impl AppActor {
    pub fn new(
        backend_tx: mpsc::UnboundedSender<BackendCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppStore::with_renderer(render_tx),
            backend_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut backend_rx: mpsc::UnboundedReceiver<BackendResponse>,
    ) {
        // Send initial render state, then start loading everything
        self.state.publish();
        for command in self.state.start_load_all() {
            self.dispatch(Some(command));
        }
        self.state.publish();

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        tracing::info!("Quit requested");
                        let _ = self.backend_tx.send(BackendCommand::Shutdown);
                        break;
                    }
                    self.state.publish();
                }
                Some(response) = backend_rx.recv() => {
                    let follow_up = self.state.handle_response(response);
                    self.dispatch(follow_up);
                    self.state.publish();
                }
                else => break,
            }
        }
    }

    fn dispatch(&self, command: Option<BackendCommand>) {
        if let Some(command) = command {
            let _ = self.backend_tx.send(command);
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Navigation
            UiEvent::SwitchTab(tab) => self.state.switch_tab(tab),
            UiEvent::CursorUp => self.state.cursor_up(),
            UiEvent::CursorDown => self.state.cursor_down(),

            // Selection and install
            UiEvent::ToggleInstallation => self.state.toggle_installation(),
            UiEvent::TogglePreset => self.state.toggle_preset(),
            UiEvent::InstallPreset => match self.state.preset_under_cursor() {
                Some(preset_id) => {
                    let command = self.state.start_install_preset(&preset_id);
                    self.dispatch(command);
                }
                None => self.state.set_status("No preset to install", true),
            },

            // Toolbar
            UiEvent::ToggleToolbar => self.state.toggle_toolbar(),
            UiEvent::Refresh => {
                self.state.log("Refreshing installations...");
                let command = self.state.start_refresh_installations();
                self.dispatch(command);
            }
            UiEvent::ForceRefresh => {
                self.state.log("Force refreshing presets...");
                let command = self.state.start_refresh_presets(true);
                self.dispatch(command);
            }
            UiEvent::ClearCache => {
                self.state.log("Clearing cache...");
                let command = self.state.start_clear_cache();
                self.dispatch(command);
            }
            UiEvent::Settings => self.state.settings_clicked(),
            UiEvent::Help => self.state.help_clicked(),
            UiEvent::About => self.state.about_clicked(),

            // Console
            UiEvent::ClearConsole => self.state.clear_console(),
            UiEvent::ConsoleScrollUp => self.state.console_scroll_up(),
            UiEvent::ConsoleScrollDown => self.state.console_scroll_down(),

            // Custom installation
            UiEvent::OpenAddInstallation => self.state.open_add_installation(),
            UiEvent::SubmitAddInstallation => {
                let command = self.state.start_add_installation();
                self.dispatch(command);
            }
            UiEvent::CancelAddInstallation => self.state.close_add_installation(),

            // Input editing
            UiEvent::NextField => self.state.next_field(),
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),

            // Creator
            UiEvent::SubmitCreatorSettings => {
                self.state.stop_editing();
                let command = self.state.start_install_creator_settings();
                self.dispatch(command);
            }
            UiEvent::UploadMaterial => {
                self.state.stop_editing();
                let command = self.state.start_upload_material();
                self.dispatch(command);
            }
            UiEvent::RemoveMaterial => self.state.remove_material(),
            UiEvent::InstallMaterials => {
                let command = self.state.start_install_materials();
                self.dispatch(command);
            }

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tokio::sync::Notify;

    use super::*;
    use crate::backend::mock::{Call, MockBackend};
    use crate::backend::BackendActor;
    use crate::messages::ui_events::{key_to_ui_event, AppTab, InputMode};
    use crate::models::Installation;

    fn spawn_app(
        backend: Arc<MockBackend>,
    ) -> (
        mpsc::UnboundedSender<UiEvent>,
        mpsc::UnboundedReceiver<RenderState>,
        tokio::task::JoinHandle<()>,
    ) {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (render_tx, render_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();

        tokio::spawn(BackendActor::new(backend, resp_tx).run(cmd_rx));
        let handle = tokio::spawn(AppActor::new(cmd_tx, render_tx).run(ui_rx, resp_rx));
        (ui_tx, render_rx, handle)
    }

    /// First published snapshot satisfying `done`
    async fn wait_for(
        render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
        done: impl Fn(&RenderState) -> bool,
    ) -> RenderState {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let state = render_rx.recv().await.expect("app actor stopped");
                if done(&state) {
                    return state;
                }
            }
        })
        .await
        .expect("render state never reached")
    }

    fn loaded(state: &RenderState) -> bool {
        !state.is_loading && state.console.iter().any(|l| l.contains("Loaded "))
    }

    fn release_installation() -> Arc<MockBackend> {
        Arc::new(MockBackend::new().with_installations(vec![Installation::new("Release", "/release")]))
    }

    #[tokio::test]
    async fn test_startup_loads_then_quits() {
        let backend = release_installation();
        let (ui_tx, mut render_rx, handle) = spawn_app(backend.clone());

        let state = wait_for(&mut render_rx, |s| loaded(s) && s.installations.len() == 1).await;
        assert!(!state.is_error);

        ui_tx.send(UiEvent::Quit).unwrap();
        handle.await.unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.contains(&Call::ListInstallations));
        assert!(calls.contains(&Call::ListPresets { force_refresh: false }));
    }

    #[tokio::test]
    async fn test_ui_stays_live_while_backend_call_pending() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(
            MockBackend::new()
                .with_installations(vec![Installation::new("Release", "/release")])
                .holding_installations(gate.clone()),
        );
        let (ui_tx, mut render_rx, handle) = spawn_app(backend.clone());

        ui_tx.send(UiEvent::SwitchTab(AppTab::Presets)).unwrap();
        ui_tx.send(UiEvent::OpenAddInstallation).unwrap();

        let state = wait_for(&mut render_rx, |s| s.show_add_installation).await;
        assert_eq!(state.active_tab, AppTab::Presets);
        assert_eq!(state.input_mode, InputMode::Editing);
        assert!(state.is_loading);
        assert!(state.installations.is_empty());

        // Typing goes into the path field, it does not quit
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(key_to_ui_event(key, &state), Some(UiEvent::CharInput('q')));

        gate.notify_one();
        let state = wait_for(&mut render_rx, |s| !s.is_loading).await;
        assert_eq!(state.installations.len(), 1);

        ui_tx.send(UiEvent::Quit).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_rejected_while_installations_busy() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(MockBackend::new().holding_installations(gate.clone()));
        let (ui_tx, mut render_rx, handle) = spawn_app(backend.clone());

        ui_tx.send(UiEvent::Refresh).unwrap();
        wait_for(&mut render_rx, |s| {
            s.console
                .iter()
                .any(|l| l.ends_with("Installation update already in progress"))
        })
        .await;

        gate.notify_one();
        wait_for(&mut render_rx, |s| !s.is_loading).await;
        ui_tx.send(UiEvent::Quit).unwrap();
        handle.await.unwrap();

        let scans = backend
            .calls()
            .into_iter()
            .filter(|c| *c == Call::ListInstallations)
            .count();
        assert_eq!(scans, 1);
    }

    #[tokio::test]
    async fn test_toolbar_events_and_selection() {
        let backend = release_installation();
        let (ui_tx, mut render_rx, handle) = spawn_app(backend.clone());
        wait_for(&mut render_rx, |s| loaded(s) && s.installations.len() == 1).await;

        ui_tx.send(UiEvent::ToggleInstallation).unwrap();
        ui_tx.send(UiEvent::ForceRefresh).unwrap();
        ui_tx.send(UiEvent::ClearCache).unwrap();
        ui_tx.send(UiEvent::SwitchTab(AppTab::Presets)).unwrap();

        let state = wait_for(&mut render_rx, |s| {
            !s.is_loading
                && s.active_tab == AppTab::Presets
                && s.console.iter().any(|l| l.ends_with("Cache cleared successfully"))
                && s.console.iter().filter(|l| l.contains("Loaded ")).count() == 2
        })
        .await;
        assert_eq!(state.selected_installations, vec!["/release"]);
        assert!(!state.is_error);

        ui_tx.send(UiEvent::Quit).unwrap();
        handle.await.unwrap();

        let calls = backend.calls();
        assert!(calls.contains(&Call::ListPresets { force_refresh: true }));
        assert!(calls.contains(&Call::ClearCache));
    }

    #[tokio::test]
    async fn test_install_without_presets_reports_error() {
        let backend = Arc::new(MockBackend::new());
        let (ui_tx, mut render_rx, handle) = spawn_app(backend.clone());
        wait_for(&mut render_rx, loaded).await;

        ui_tx.send(UiEvent::InstallPreset).unwrap();
        let state = wait_for(&mut render_rx, |s| s.is_error).await;
        assert_eq!(state.status, "No preset to install");

        ui_tx.send(UiEvent::Quit).unwrap();
        handle.await.unwrap();
        assert_eq!(backend.calls().len(), 2);
    }
}
