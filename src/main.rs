//! RTX Preset Installer - terminal front-end
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - state store and action orchestration
//! - Backend Layer - commands sent to the installer backend

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use rtx_preset_installer::backend::{BackendActor, HttpBackend};
use rtx_preset_installer::config::Settings;
use rtx_preset_installer::constants::{APP_NAME, APP_VERSION};
use rtx_preset_installer::messages::ui_events::{key_to_ui_event, AppTab, InputField, InputMode};
use rtx_preset_installer::messages::{BackendCommand, BackendResponse, RenderState, UiEvent};
use rtx_preset_installer::ui;
use rtx_preset_installer::AppActor;

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;

    // Initialize logging to file; stdout belongs to the terminal UI
    let log_dir = settings
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| ".".into());
    let log_name = settings
        .log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| rtx_preset_installer::constants::DEFAULT_LOG_FILE.into());
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    tracing::info!(version = APP_VERSION, backend = %settings.backend_url, "Starting {}", APP_NAME);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _terminal_guard = TerminalGuard;

    let terminal_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(terminal_backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();
    let (backend_cmd_tx, backend_cmd_rx) = mpsc::unbounded_channel::<BackendCommand>();
    let (backend_resp_tx, backend_resp_rx) = mpsc::unbounded_channel::<BackendResponse>();

    // Spawn backend actor
    let backend = Arc::new(HttpBackend::new(&settings));
    let backend_actor = BackendActor::new(backend, backend_resp_tx);
    tokio::spawn(backend_actor.run(backend_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(backend_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, backend_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Shutting down");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();
    let mut tick: usize = 0;

    loop {
        tick = tick.wrapping_add(1);

        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state, tick))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(key, &current_state) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState, tick: usize) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Tab bar
            Constraint::Length(3),  // Status line
            Constraint::Min(5),     // Content
            Constraint::Length(10), // Console
            Constraint::Length(1),  // Key hints
        ])
        .split(area);

    f.render_widget(ui::render_tabs(state.active_tab), main_chunks[0]);
    draw_status_line(f, state, tick, main_chunks[1]);

    match state.active_tab {
        AppTab::Installations => draw_installations_tab(f, state, main_chunks[2]),
        AppTab::Presets => draw_presets_tab(f, state, main_chunks[2]),
        AppTab::Actions => draw_actions_tab(f, state, main_chunks[2]),
        AppTab::Creator => draw_creator_tab(f, state, main_chunks[2]),
    }

    draw_console(f, state, main_chunks[3]);
    draw_key_hints(f, state, main_chunks[4]);

    if state.toolbar_open {
        draw_toolbar_popover(f, area);
    }

    if state.show_add_installation {
        draw_add_installation_popup(f, state, area);
    }
}

fn draw_status_line(f: &mut Frame, state: &RenderState, tick: usize, area: Rect) {
    let mut spans = vec![Span::styled(
        state.status.as_str(),
        ui::status_style(state.is_error),
    )];
    if state.is_loading {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            ui::spinner(tick / 4),
            Style::default().fg(Color::Cyan).bold(),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if state.is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .title(" Status ");

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_installations_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let items: Vec<ListItem> = state
        .installations
        .iter()
        .enumerate()
        .map(|(i, installation)| {
            let selected = state.is_installation_selected(&installation.install_path);
            let preview = if installation.is_preview_channel { " [Preview]" } else { "" };
            let preset = match &installation.installed_preset {
                Some(p) => format!("Current preset: {}", p.name),
                None => "No preset installed".to_string(),
            };

            let lines = vec![
                Line::from(vec![
                    Span::raw(format!("{} ", ui::checkbox(selected))),
                    Span::styled(installation.display_name.clone(), Style::default().bold()),
                    Span::styled(preview, Style::default().fg(Color::Magenta)),
                ]),
                Line::from(Span::styled(
                    format!("    {}", installation.install_path),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(Span::styled(
                    format!("    {}", preset),
                    if installation.installed_preset.is_some() {
                        Style::default().fg(Color::Green)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    },
                )),
            ];
            ListItem::new(lines).style(ui::row_style(i == state.installation_cursor, false))
        })
        .collect();

    let title = format!(
        " Minecraft Installations ({} found, {} selected) ",
        state.installations.len(),
        state.selected_installations.len()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    if items.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from("No Minecraft installations found"),
            Line::from(Span::styled(
                "Press 'n' to add a custom installation path",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    f.render_widget(List::new(items).block(block), area);
}

fn draw_presets_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let items: Vec<ListItem> = state
        .presets
        .iter()
        .enumerate()
        .map(|(i, preset)| {
            let selected = state.selected_preset.as_deref() == Some(preset.id.as_str());
            let line = Line::from(vec![
                Span::raw(format!("{} ", ui::radio(selected))),
                Span::styled(preset.name.clone(), Style::default().bold()),
                Span::styled(
                    format!("  tonemapping: {}  bloom: {}", preset.tonemapping_mode, preset.bloom_mode),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            ListItem::new(line).style(ui::row_style(i == state.preset_cursor, selected))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" Available Presets ({} loaded) ", state.presets.len()));

    if items.is_empty() {
        f.render_widget(Paragraph::new("No presets available").block(block), area);
        return;
    }

    f.render_widget(List::new(items).block(block), area);
}

fn draw_actions_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(area);

    let actions = Paragraph::new(vec![
        Line::from(" r  Refresh installations"),
        Line::from(" F  Force refresh presets (bypass cache)"),
        Line::from(" o  Toolbar: clear cache, settings, help, about"),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Actions "));
    f.render_widget(actions, chunks[0]);

    let items: Vec<ListItem> = state
        .installed_presets
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let marker = if entry.is_creator { "[creator] " } else { "" };
            let line = Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Magenta)),
                Span::styled(entry.installation_name.clone(), Style::default().bold()),
                Span::raw(format!("  {}", entry.preset_name)),
                Span::styled(
                    format!("  {}  {}", entry.installed_at.format("%Y-%m-%d %H:%M"), entry.launch_uri()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            ListItem::new(line).style(ui::row_style(i == state.installed_cursor, false))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Installed Presets ({}) ", state.installed_presets.len()));
    f.render_widget(List::new(items).block(block), chunks[1]);
}

fn draw_creator_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Settings hash
            Constraint::Length(3), // Preset name
            Constraint::Length(3), // Material path
            Constraint::Min(3),    // Uploaded files
        ])
        .split(area);

    let editing = state.input_mode == InputMode::Editing;
    let fields = [
        (InputField::SettingsHash, state.settings_hash_input.as_str(), " Settings Hash (s:install) "),
        (InputField::PresetName, state.preset_name_input.as_str(), " Preset Name (optional) "),
        (InputField::MaterialPath, state.material_path_input.as_str(), " Material File Path (u:upload) "),
    ];
    for (chunk, (field, content, title)) in chunks.iter().zip(fields) {
        let focused = state.active_field == field;
        f.render_widget(ui::render_input(content, title, focused, editing), *chunk);
        if focused && editing {
            let max_x = chunk.x + chunk.width.saturating_sub(2);
            let caret = ui::caret_column(content, state.cursor_position);
            let cursor_x = (chunk.x + caret + 1).min(max_x);
            f.set_cursor_position(Position::new(cursor_x, chunk.y + 1));
        }
    }

    let items: Vec<ListItem> = state
        .uploaded_materials
        .iter()
        .enumerate()
        .map(|(i, filename)| {
            ListItem::new(filename.as_str()).style(ui::row_style(i == state.material_cursor, false))
        })
        .collect();

    let processing = if state.creator_processing { " [working...]" } else { "" };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(
            " Uploaded Materials ({}) d:remove m:install{} ",
            state.uploaded_materials.len(),
            processing
        ));
    f.render_widget(List::new(items).block(block), chunks[3]);
}

fn draw_console(f: &mut Frame, state: &RenderState, area: Rect) {
    let lines: Vec<Line> = if state.console.is_empty() {
        vec![Line::from(Span::styled(
            "Console is empty",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        state.console.iter().map(|l| Line::from(l.as_str())).collect()
    };

    // Follow the tail unless the user scrolled
    let visible = area.height.saturating_sub(2) as usize;
    let tail = state.console.len().saturating_sub(visible) as u16;
    let scroll = tail.saturating_sub(state.console_scroll);

    let console = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Console (PgUp/PgDn scroll, C:clear) "),
        )
        .scroll((scroll, 0));
    f.render_widget(console, area);
}

fn draw_key_hints(f: &mut Frame, state: &RenderState, area: Rect) {
    let hints = if state.input_mode == InputMode::Editing {
        " ESC:stop editing | arrows:move | Enter:submit "
    } else {
        match state.active_tab {
            AppTab::Installations => " 1-4:tabs | ↑/↓:move | Space:select | n:add path | o:toolbar | q:quit ",
            AppTab::Presets => " 1-4:tabs | ↑/↓:move | Space:select | i:install | o:toolbar | q:quit ",
            AppTab::Actions => " 1-4:tabs | r:refresh | F:force refresh | o:toolbar | q:quit ",
            AppTab::Creator => " 1-4:tabs | Tab:field | e:edit | s:install | u:upload | m:materials | q:quit ",
        }
    };

    f.render_widget(
        Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn draw_toolbar_popover(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(40, 40, area);

    let text = vec![
        Line::from(" r  Refresh"),
        Line::from(" f  Force Refresh"),
        Line::from(" c  Clear Cache"),
        Line::from(" s  Settings"),
        Line::from(" h  Help"),
        Line::from(" a  About"),
        Line::from(""),
        Line::from(Span::styled(" Esc/o to close", Style::default().fg(Color::DarkGray))),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} v{} ", APP_NAME, APP_VERSION))
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, popup_area);
    f.render_widget(Paragraph::new(text).block(block), popup_area);
}

fn draw_add_installation_popup(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup_area = centered_rect(60, 20, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Add Custom Installation (Enter:add, Esc:cancel) ")
        .style(Style::default().bg(Color::Black));

    let input = Paragraph::new(state.install_path_input.as_str()).block(block);

    f.render_widget(Clear, popup_area);
    f.render_widget(input, popup_area);

    let max_x = popup_area.x + popup_area.width.saturating_sub(2);
    let caret = ui::caret_column(&state.install_path_input, state.cursor_position);
    let cursor_x = (popup_area.x + caret + 1).min(max_x);
    f.set_cursor_position(Position::new(cursor_x, popup_area.y + 1));
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
