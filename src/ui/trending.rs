use crate::app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Ranked panel of the most-searched terms. Only rendered when the list is
/// non-empty; on any trending-read failure the list is empty and the panel
/// simply disappears.
pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = app
        .trending
        .iter()
        .enumerate()
        .map(|(rank, entry)| {
            Line::from(vec![
                Span::styled(
                    format!(" {}. ", rank + 1),
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(entry.search_term.clone()),
                Span::styled(
                    format!("  ({} searches)", entry.count),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Trending Searches "),
    );
    frame.render_widget(panel, area);
}
