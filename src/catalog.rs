use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Prefix prepended to a movie's poster path to form a full image URL.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// A movie record as returned by the catalog API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl Movie {
    /// Full poster URL, or None when the catalog has no poster for this movie.
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_ref()
            .map(|p| format!("{IMAGE_BASE_URL}{p}"))
    }

    /// Year part of the release date ("2008-07-16" -> "2008").
    pub fn release_year(&self) -> Option<&str> {
        self.release_date.as_deref().and_then(|d| d.get(0..4))
    }
}

/// Catalog response envelope. A logically failed request still returns HTTP
/// 200 with `Response: "False"` and a server-supplied message.
#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    results: Option<Vec<Movie>>,
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// Errors from the catalog fetch path.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog returned HTTP {status}")]
    Status { status: u16 },

    #[error("{message}")]
    Api { message: String },

    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
}

impl CatalogError {
    /// Message shown in the results pane. API-level failures carry the
    /// server's own wording; everything else collapses to a generic line.
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Api { message } => message.clone(),
            _ => "Error fetching movies".to_string(),
        }
    }
}

/// HTTP client for the movie catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CatalogClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Endpoint selection: an empty query browses by popularity, anything
    /// else runs a text search with the query percent-encoded.
    fn endpoint(&self, query: &str) -> String {
        if query.is_empty() {
            format!("{}/discover/movie?sort_by=popularity.desc", self.base_url)
        } else {
            format!(
                "{}/search/movie?query={}",
                self.base_url,
                urlencoding::encode(query)
            )
        }
    }

    /// Fetch movies for `query`. The list replaces the previous one
    /// wholesale; there is no merging of partial results.
    pub async fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>, CatalogError> {
        let response = self
            .http
            .get(self.endpoint(query))
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::Status {
                status: response.status().as_u16(),
            });
        }

        let body: CatalogResponse = response.json().await?;
        parse_response(body)
    }
}

fn parse_response(body: CatalogResponse) -> Result<Vec<Movie>, CatalogError> {
    if body.response.as_deref() == Some("False") {
        return Err(CatalogError::Api {
            message: body
                .error
                .unwrap_or_else(|| "Failed to fetch movies".to_string()),
        });
    }
    Ok(body.results.unwrap_or_default())
}
