use std::path::Path;
use turso::Value;

use crate::catalog::Movie;

/// A ranked search-history row from the `search_trends` table.
#[derive(Debug, Clone)]
pub struct TrendingEntry {
    pub identifier: i64,
    pub search_term: String,
    pub count: i64,
    pub movie_id: i64,
    pub poster_url: String,
}

// ── Value extraction helpers ──

fn val_i64(v: &Value) -> i64 {
    match v {
        Value::Integer(i) => *i,
        _ => 0,
    }
}

fn val_string(v: &Value) -> String {
    match v {
        Value::Text(s) => s.clone(),
        _ => String::new(),
    }
}

/// Store handle wrapping a turso connection.
///
/// Both operations exist in a plain fallible form and a `*_best_effort`
/// form. Search history is telemetry: the best-effort forms log failures
/// and never propagate them, so no caller can fail because of this store.
pub struct TrendingStore {
    conn: turso::Connection,
}

impl TrendingStore {
    /// Open the trending database, creating the file and schema if missing.
    pub async fn open(path: &Path) -> turso::Result<Self> {
        let path_str = path.to_string_lossy().to_string();
        let db = turso::Builder::new_local(&path_str).build().await?;
        let conn = db.connect()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS search_trends (
                identifier INTEGER PRIMARY KEY,
                search_term TEXT NOT NULL,
                count INTEGER NOT NULL,
                movie_id INTEGER NOT NULL,
                poster_url TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            (),
        )
        .await?;
        Ok(TrendingStore { conn })
    }

    /// Record one occurrence of a search term. An existing row for the term
    /// has its count incremented by exactly 1; an unseen term gets a fresh
    /// row with count 1, the movie's id, and the movie's full poster URL.
    pub async fn record_search(&self, term: &str, movie: &Movie) -> turso::Result<()> {
        let mut rows = self
            .conn
            .query(
                "SELECT identifier, count FROM search_trends WHERE search_term = ?1 LIMIT 1",
                turso::params::Params::Positional(vec![Value::Text(term.to_string())]),
            )
            .await?;

        let now = chrono::Utc::now().to_rfc3339();
        if let Some(row) = rows.next().await? {
            let id = val_i64(&row.get_value(0)?);
            let count = val_i64(&row.get_value(1)?);
            self.conn
                .execute(
                    "UPDATE search_trends SET count = ?1, updated_at = ?2 WHERE identifier = ?3",
                    turso::params::Params::Positional(vec![
                        Value::Integer(count + 1),
                        Value::Text(now),
                        Value::Integer(id),
                    ]),
                )
                .await?;
        } else {
            self.conn
                .execute(
                    "INSERT INTO search_trends (search_term, count, movie_id, poster_url, updated_at) \
                     VALUES (?1, 1, ?2, ?3, ?4)",
                    turso::params::Params::Positional(vec![
                        Value::Text(term.to_string()),
                        Value::Integer(movie.id),
                        Value::Text(movie.poster_url().unwrap_or_default()),
                        Value::Text(now),
                    ]),
                )
                .await?;
        }
        Ok(())
    }

    /// Top entries ordered by count descending, truncated to `limit`.
    pub async fn top_entries(&self, limit: i64) -> turso::Result<Vec<TrendingEntry>> {
        let mut entries = Vec::new();
        let mut rows = self
            .conn
            .query(
                "SELECT identifier, search_term, count, movie_id, poster_url \
                 FROM search_trends ORDER BY count DESC LIMIT ?1",
                turso::params::Params::Positional(vec![Value::Integer(limit)]),
            )
            .await?;

        while let Some(row) = rows.next().await? {
            entries.push(TrendingEntry {
                identifier: val_i64(&row.get_value(0)?),
                search_term: val_string(&row.get_value(1)?),
                count: val_i64(&row.get_value(2)?),
                movie_id: val_i64(&row.get_value(3)?),
                poster_url: val_string(&row.get_value(4)?),
            });
        }
        Ok(entries)
    }

    /// Best-effort [`Self::record_search`]: failures are logged and swallowed.
    pub async fn record_search_best_effort(&self, term: &str, movie: &Movie) {
        if let Err(e) = self.record_search(term, movie).await {
            tracing::warn!("failed to record search occurrence for {term:?}: {e}");
        }
    }

    /// Best-effort [`Self::top_entries`]: any failure degrades to an empty
    /// list, which hides the trending panel instead of surfacing an error.
    pub async fn top_entries_best_effort(&self, limit: i64) -> Vec<TrendingEntry> {
        match self.top_entries(limit).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("failed to load trending entries: {e}");
                Vec::new()
            }
        }
    }
}
