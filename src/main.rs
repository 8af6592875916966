mod app;
mod catalog;
mod config;
mod debounce;
mod trending;
mod ui;

use std::path::{Path, PathBuf};
use std::time::Duration;

use app::{App, InputMode};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// TUI movie discovery: debounced catalog search with trending search history
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Catalog API key (falls back to MOVIE_EXPLORER_API_KEY / TMDB_API_KEY)
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Catalog API base URL
    #[arg(long)]
    api_base: Option<String>,

    /// Path to the trending-history SQLite database
    #[arg(short, long)]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match config::Config::resolve(cli.api_key, cli.api_base, cli.db) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing(&config::default_log_path()) {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    if let Some(parent) = config.trending_db.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = trending::TrendingStore::open(&config.trending_db).await?;
    let catalog =
        catalog::CatalogClient::new(config.api_base_url.clone(), config.api_key.clone());

    let mut app = App::new(catalog, store, config.quiet_period, config.trending_limit);
    app.init().await;

    // Init terminal
    let mut terminal = ratatui::init();

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    ratatui::restore();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

/// Log to a file: the terminal belongs to the TUI.
fn init_tracing(log_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = std::fs::File::create(log_path)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(log_file)
        .with_filter(filter);

    tracing_subscriber::registry().with(file_layer).init();
    Ok(())
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.tick().await;
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            // Discard any pending debounce so nothing fires after teardown.
            app.debouncer.cancel();
            return Ok(());
        }

        // Poll timeout tracks the debounce deadline so settling never waits
        // for the next input event.
        let timeout = app
            .debouncer
            .time_until_settled()
            .unwrap_or(Duration::from_millis(100))
            .min(Duration::from_millis(100));
        if crossterm::event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(app, key);
                }
                _ => {}
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.input_mode == InputMode::Editing {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                app.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                app.search_backspace();
            }
            KeyCode::Char(c) => {
                app.search_push(c);
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.list_next();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.list_prev();
        }
        KeyCode::Esc => {
            app.clear_search();
        }
        _ => {}
    }
}
