mod help;
mod movies;
mod trending;

use crate::app::App;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

/// Top-level render: header, search bar, optional trending panel, results,
/// status bar. The trending panel only takes space when it has entries.
pub fn render(app: &App, frame: &mut Frame) {
    let mut constraints = vec![Constraint::Length(3), Constraint::Length(3)];
    let has_trending = !app.trending.is_empty();
    if has_trending {
        constraints.push(Constraint::Length(app.trending.len() as u16 + 2));
    }
    constraints.push(Constraint::Min(5));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    movies::render_header(app, frame, chunks[0]);
    movies::render_search_bar(app, frame, chunks[1]);

    let mut next = 2;
    if has_trending {
        trending::render(app, frame, chunks[next]);
        next += 1;
    }
    movies::render_results(app, frame, chunks[next]);
    movies::render_status_bar(app, frame, chunks[next + 1]);

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}
