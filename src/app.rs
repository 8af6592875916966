use std::time::Duration;

use tokio::sync::mpsc;

use crate::catalog::{CatalogClient, CatalogError, Movie};
use crate::debounce::Debouncer;
use crate::trending::{TrendingEntry, TrendingStore};

/// Input mode for the search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Where the last catalog fetch left the results pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Messages sent back to the event loop by spawned fetch tasks.
#[derive(Debug)]
pub enum AppMessage {
    MoviesFetched {
        generation: u64,
        query: String,
        outcome: Result<Vec<Movie>, CatalogError>,
    },
}

/// Main application state. Owned by the event loop task; all mutation is
/// serialized through it.
pub struct App {
    pub catalog: CatalogClient,
    pub trending_store: TrendingStore,
    pub should_quit: bool,
    pub show_help: bool,

    pub input_mode: InputMode,
    pub search_term: String,
    pub debouncer: Debouncer,
    pub settled_query: String,

    pub phase: FetchPhase,
    pub movies: Vec<Movie>,
    pub error_message: String,
    pub selected: usize,

    pub trending: Vec<TrendingEntry>,
    pub trending_limit: i64,

    // Superseded fetches are discarded by comparing this at completion time.
    fetch_generation: u64,
    messages_tx: mpsc::UnboundedSender<AppMessage>,
    messages_rx: mpsc::UnboundedReceiver<AppMessage>,

    pub status_msg: String,
}

impl App {
    pub fn new(
        catalog: CatalogClient,
        trending_store: TrendingStore,
        quiet_period: Duration,
        trending_limit: i64,
    ) -> Self {
        let (messages_tx, messages_rx) = mpsc::unbounded_channel();
        Self {
            catalog,
            trending_store,
            should_quit: false,
            show_help: false,

            input_mode: InputMode::Normal,
            search_term: String::new(),
            debouncer: Debouncer::new(quiet_period),
            settled_query: String::new(),

            phase: FetchPhase::Idle,
            movies: Vec::new(),
            error_message: String::new(),
            selected: 0,

            trending: Vec::new(),
            trending_limit,

            fetch_generation: 0,
            messages_tx,
            messages_rx,

            status_msg: "Loading movies...".to_string(),
        }
    }

    /// Mount: browse popular movies and load the trending panel.
    pub async fn init(&mut self) {
        self.dispatch_catalog_fetch();
        self.refresh_trending().await;
    }

    /// One pass of deferred work: settle the debouncer and apply any fetch
    /// completions that arrived since the last pass.
    pub async fn tick(&mut self) {
        if let Some(query) = self.debouncer.poll_settled() {
            self.on_settled_query(query).await;
        }
        while let Ok(msg) = self.messages_rx.try_recv() {
            self.apply_message(msg).await;
        }
    }

    // ── Search input ──

    pub fn search_push(&mut self, c: char) {
        self.search_term.push(c);
        self.debouncer.update(self.search_term.clone());
    }

    pub fn search_backspace(&mut self) {
        self.search_term.pop();
        self.debouncer.update(self.search_term.clone());
    }

    pub fn clear_search(&mut self) {
        if !self.search_term.is_empty() {
            self.search_term.clear();
            self.debouncer.update(String::new());
        }
    }

    /// A value equal to the current settled query does not re-fetch; only
    /// an actual change transitions the state machine.
    async fn on_settled_query(&mut self, query: String) {
        if query == self.settled_query {
            return;
        }
        self.settled_query = query;
        self.dispatch_catalog_fetch();
        self.refresh_trending().await;
    }

    // ── Catalog fetch ──

    /// Start a fetch: bump the generation and enter Loading.
    fn begin_fetch(&mut self) -> u64 {
        self.fetch_generation += 1;
        self.phase = FetchPhase::Loading;
        self.error_message.clear();
        self.fetch_generation
    }

    fn dispatch_catalog_fetch(&mut self) {
        let generation = self.begin_fetch();
        let query = self.settled_query.clone();
        let client = self.catalog.clone();
        let tx = self.messages_tx.clone();
        tokio::spawn(async move {
            tracing::debug!("fetching movies, generation={generation}, query={query:?}");
            let outcome = client.fetch_movies(&query).await;
            let _ = tx.send(AppMessage::MoviesFetched {
                generation,
                query,
                outcome,
            });
        });
    }

    async fn apply_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::MoviesFetched {
                generation,
                query,
                outcome,
            } => self.apply_fetch_outcome(generation, query, outcome).await,
        }
    }

    async fn apply_fetch_outcome(
        &mut self,
        generation: u64,
        query: String,
        outcome: Result<Vec<Movie>, CatalogError>,
    ) {
        if generation != self.fetch_generation {
            tracing::debug!("discarding superseded fetch, generation={generation}");
            return;
        }
        match outcome {
            Ok(movies) => {
                self.phase = FetchPhase::Loaded;
                self.movies = movies;
                self.selected = 0;
                self.status_msg = format!("{} movies", self.movies.len());

                if let Some(first) = record_candidate(&query, &self.movies) {
                    self.trending_store
                        .record_search_best_effort(&query, &first)
                        .await;
                }
            }
            Err(e) => {
                tracing::warn!("catalog fetch failed: {e}");
                self.phase = FetchPhase::Error;
                self.error_message = e.user_message();
                self.movies.clear();
                self.selected = 0;
                self.status_msg = "fetch failed".to_string();
            }
        }
    }

    // ── Trending panel ──

    async fn refresh_trending(&mut self) {
        self.trending = self
            .trending_store
            .top_entries_best_effort(self.trending_limit)
            .await;
    }

    // ── List navigation ──

    pub fn list_next(&mut self) {
        if self.selected + 1 < self.movies.len() {
            self.selected += 1;
        }
    }

    pub fn list_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

/// First result of a non-empty search gets recorded in the trending store.
/// Browse-mode fetches never record, whatever they return.
fn record_candidate(query: &str, movies: &[Movie]) -> Option<Movie> {
    if query.is_empty() {
        return None;
    }
    movies.first().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i64, title: &str, poster_path: Option<&str>) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            poster_path: poster_path.map(str::to_string),
            overview: String::new(),
            release_date: None,
            original_language: None,
            vote_average: None,
        }
    }

    async fn test_app(dir: &tempfile::TempDir) -> App {
        let store = TrendingStore::open(&dir.path().join("trending.db"))
            .await
            .unwrap();
        let catalog = CatalogClient::new("https://catalog.test/3".to_string(), "k".to_string());
        App::new(catalog, store, Duration::from_millis(400), 5)
    }

    #[test]
    fn test_record_candidate_rules() {
        let movies = vec![movie(1, "Batman", None), movie(2, "Batman Returns", None)];
        // Non-empty search with results records the first.
        assert_eq!(record_candidate("batman", &movies).unwrap().id, 1);
        // Browse mode never records, result count notwithstanding.
        assert!(record_candidate("", &movies).is_none());
        // Empty result set records nothing.
        assert!(record_candidate("batman", &[]).is_none());
    }

    #[tokio::test]
    async fn test_begin_fetch_enters_loading() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir).await;
        assert_eq!(app.phase, FetchPhase::Idle);

        app.begin_fetch();
        assert_eq!(app.phase, FetchPhase::Loading);
        assert!(app.error_message.is_empty());
    }

    #[tokio::test]
    async fn test_successful_search_loads_and_records_first_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir).await;
        app.settled_query = "batman".to_string();
        let generation = app.begin_fetch();

        app.apply_fetch_outcome(
            generation,
            "batman".to_string(),
            Ok(vec![movie(1, "Batman", Some("/x.jpg"))]),
        )
        .await;

        assert_eq!(app.phase, FetchPhase::Loaded);
        assert_eq!(app.movies.len(), 1);
        assert_eq!(app.movies[0].title, "Batman");

        let entries = app.trending_store.top_entries(5).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].search_term, "batman");
        assert_eq!(entries[0].count, 1);
        assert_eq!(entries[0].movie_id, 1);
        assert!(entries[0].poster_url.ends_with("/x.jpg"));
    }

    #[tokio::test]
    async fn test_browse_mode_never_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir).await;
        let generation = app.begin_fetch();

        app.apply_fetch_outcome(
            generation,
            String::new(),
            Ok(vec![movie(1, "Popular", None), movie(2, "Also Popular", None)]),
        )
        .await;

        assert_eq!(app.phase, FetchPhase::Loaded);
        assert_eq!(app.movies.len(), 2);
        assert!(app.trending_store.top_entries(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repeat_search_increments_count() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir).await;

        for _ in 0..2 {
            let generation = app.begin_fetch();
            app.apply_fetch_outcome(
                generation,
                "batman".to_string(),
                Ok(vec![movie(1, "Batman", Some("/x.jpg"))]),
            )
            .await;
        }

        let entries = app.trending_store.top_entries(5).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].count, 2);
    }

    #[tokio::test]
    async fn test_api_failure_surfaces_message_and_clears_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir).await;
        app.movies = vec![movie(1, "Stale", None)];
        let generation = app.begin_fetch();

        app.apply_fetch_outcome(
            generation,
            "batman".to_string(),
            Err(CatalogError::Api {
                message: "X".to_string(),
            }),
        )
        .await;

        assert_eq!(app.phase, FetchPhase::Error);
        assert_eq!(app.error_message, "X");
        assert!(app.movies.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_uses_generic_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir).await;
        let generation = app.begin_fetch();

        app.apply_fetch_outcome(
            generation,
            "batman".to_string(),
            Err(CatalogError::Status { status: 503 }),
        )
        .await;

        assert_eq!(app.phase, FetchPhase::Error);
        assert_eq!(app.error_message, "Error fetching movies");
    }

    #[tokio::test]
    async fn test_superseded_fetch_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir).await;

        let stale = app.begin_fetch();
        let current = app.begin_fetch();

        app.apply_fetch_outcome(
            stale,
            "bat".to_string(),
            Ok(vec![movie(1, "Stale Result", None)]),
        )
        .await;
        // The newer fetch is still in flight: state untouched.
        assert_eq!(app.phase, FetchPhase::Loading);
        assert!(app.movies.is_empty());

        app.apply_fetch_outcome(
            current,
            "batman".to_string(),
            Ok(vec![movie(2, "Batman", None)]),
        )
        .await;
        assert_eq!(app.phase, FetchPhase::Loaded);
        assert_eq!(app.movies[0].id, 2);
    }

    #[tokio::test]
    async fn test_settled_query_equal_to_current_does_not_refetch() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir).await;
        let before = app.fetch_generation;

        app.on_settled_query(String::new()).await;
        assert_eq!(app.fetch_generation, before);
        assert_eq!(app.phase, FetchPhase::Idle);
    }

    #[tokio::test]
    async fn test_error_to_loading_on_new_settled_query() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir).await;
        let generation = app.begin_fetch();
        app.apply_fetch_outcome(
            generation,
            "zzz".to_string(),
            Err(CatalogError::Status { status: 500 }),
        )
        .await;
        assert_eq!(app.phase, FetchPhase::Error);

        app.begin_fetch();
        assert_eq!(app.phase, FetchPhase::Loading);
        assert!(app.error_message.is_empty());
    }

    #[tokio::test]
    async fn test_list_navigation_clamps() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir).await;
        app.movies = vec![movie(1, "A", None), movie(2, "B", None)];

        app.list_prev();
        assert_eq!(app.selected, 0);
        app.list_next();
        assert_eq!(app.selected, 1);
        app.list_next();
        assert_eq!(app.selected, 1);
        app.list_prev();
        assert_eq!(app.selected, 0);
    }

    #[tokio::test]
    async fn test_search_input_feeds_debouncer() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir).await;

        app.search_push('b');
        app.search_push('a');
        app.search_backspace();
        assert_eq!(app.search_term, "b");
        assert!(app.debouncer.is_pending());
    }
}
