use crate::app::{App, FetchPhase, InputMode};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use unicode_width::UnicodeWidthChar;

pub fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let header_text = format!(
        " Find Movies You'll Enjoy Without The Hassle   [{} movies]",
        app.movies.len()
    );
    let header = Paragraph::new(header_text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, area);
}

pub fn render_search_bar(app: &App, frame: &mut Frame, area: Rect) {
    let search_style = match app.input_mode {
        InputMode::Editing => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default().fg(Color::DarkGray),
    };
    let search_label = if app.input_mode == InputMode::Editing {
        " 🔍 Search (Enter to apply, Esc to cancel): "
    } else {
        " 🔍 Search (/): "
    };
    let search_text = format!("{}{}", search_label, app.search_term);
    let search_bar = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(search_style)
            .title(" Search "),
    );
    frame.render_widget(search_bar, area);

    // Set cursor position when editing
    if app.input_mode == InputMode::Editing {
        let cursor_x = area.x + search_label.len() as u16 + app.search_term.len() as u16;
        let cursor_y = area.y + 1;
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

/// Loading indicator, error message, or the movie list, exclusively.
pub fn render_results(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" All Movies ");

    match app.phase {
        FetchPhase::Loading => {
            let spinner = Paragraph::new("  Loading movies…")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(spinner, area);
        }
        FetchPhase::Error => {
            let error = Paragraph::new(format!("  {}", app.error_message))
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(error, area);
        }
        FetchPhase::Idle | FetchPhase::Loaded => {
            let items: Vec<ListItem> = app
                .movies
                .iter()
                .map(|movie| {
                    let poster_indicator = if movie.poster_path.is_some() {
                        "●"
                    } else {
                        "○"
                    };
                    let rating = movie
                        .vote_average
                        .map(|v| format!("★ {v:.1}"))
                        .unwrap_or_else(|| "★ –".to_string());
                    let meta = format!(
                        "  {} · {}",
                        movie.original_language.as_deref().unwrap_or("?"),
                        movie.release_year().unwrap_or("????"),
                    );
                    let line = Line::from(vec![
                        Span::styled(
                            format!("{} ", poster_indicator),
                            Style::default().fg(if movie.poster_path.is_some() {
                                Color::Green
                            } else {
                                Color::DarkGray
                            }),
                        ),
                        Span::raw(truncate_str(
                            &movie.title,
                            (area.width as usize).saturating_sub(25),
                        )),
                        Span::styled(meta, Style::default().fg(Color::DarkGray)),
                        Span::styled(format!("  {rating}"), Style::default().fg(Color::Yellow)),
                    ]);
                    ListItem::new(line)
                })
                .collect();

            let list_widget = List::new(items)
                .block(block)
                .highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▸ ");

            let mut list_state = ListState::default();
            list_state.select(Some(app.selected));
            frame.render_stateful_widget(list_widget, area, &mut list_state);
        }
    }
}

pub fn render_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status_line = Line::from(vec![
        Span::styled(
            " ↑↓",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Navigate  "),
        Span::styled(
            "/",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Search  "),
        Span::styled(
            "Esc",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Clear  "),
        Span::styled(
            "?",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Help  "),
        Span::styled(
            "q",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Quit  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), area);
}

/// Truncate a string to `max_width` display columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    let width: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if width <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width.saturating_sub(1) {
            break;
        }
        used += w;
        result.push(c);
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate_str("Batman", 20), "Batman");
    }

    #[test]
    fn test_truncate_long_string_adds_ellipsis() {
        let truncated = truncate_str("The Lord of the Rings: The Return of the King", 20);
        assert!(truncated.ends_with('…'));
        assert!(truncated.chars().count() <= 20);
    }

    #[test]
    fn test_truncate_counts_display_width() {
        // Full-width characters count as two columns.
        let truncated = truncate_str("千と千尋の神隠し", 8);
        assert!(truncated.ends_with('…'));
        let width: usize = truncated.chars().map(|c| c.width().unwrap_or(0)).sum();
        assert!(width <= 8);
    }
}
