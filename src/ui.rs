use ratatui::{prelude::*, widgets::*};

use crate::messages::ui_events::AppTab;

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Border style for a panel: yellow while editing, cyan when focused
pub fn border_style(is_focused: bool, is_editing: bool) -> Style {
    if is_focused && is_editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Renders a text input field
pub fn render_input<'a>(
    content: &'a str,
    title: &'a str,
    is_focused: bool,
    is_editing: bool,
) -> Paragraph<'a> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(is_focused, is_editing))
        .title(title);

    Paragraph::new(content).block(block)
}

/// Renders the tab bar
pub fn render_tabs(selected: AppTab) -> Tabs<'static> {
    let titles: Vec<Line> = AppTab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!(" {}:{} ", i + 1, tab.title())))
        .collect();

    Tabs::new(titles)
        .select(selected.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).bold())
        .divider("|")
}

/// Checkbox prefix for multi-select rows
pub fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Radio prefix for single-select rows
pub fn radio(selected: bool) -> &'static str {
    if selected {
        "(*)"
    } else {
        "( )"
    }
}

/// Row style: highlighted under the cursor, green when selected
pub fn row_style(is_cursor: bool, is_selected: bool) -> Style {
    let style = if is_selected {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    if is_cursor {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}

/// Status message style, red for errors
pub fn status_style(is_error: bool) -> Style {
    if is_error {
        Style::default().fg(Color::Red).bold()
    } else {
        Style::default().fg(Color::White)
    }
}

/// Spinner frame for the busy indicator
pub fn spinner(tick: usize) -> &'static str {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Screen column of the caret; `byte_pos` is a byte offset into `input`
pub fn caret_column(input: &str, byte_pos: usize) -> u16 {
    let before = input.get(..byte_pos).unwrap_or(input);
    before.chars().count().min(u16::MAX as usize) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_cycles() {
        assert_eq!(spinner(0), spinner(4));
        assert_ne!(spinner(0), spinner(1));
    }

    #[test]
    fn test_status_style_marks_errors() {
        assert_eq!(status_style(true).fg, Some(Color::Red));
        assert_eq!(status_style(false).fg, Some(Color::White));
    }

    #[test]
    fn test_caret_column_counts_chars() {
        let path = "C:\\Jeux\\Été";
        assert_eq!(caret_column(path, path.len()), 11);
        assert_eq!(caret_column("abc", 2), 2);
        assert_eq!(caret_column("abc", 10), 3);
    }
}
