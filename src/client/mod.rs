//! Backend API client.
//!
//! Thin JSON-over-HTTP client for the two backend surfaces: the web
//! application (keyboard mapping endpoints) and the search service
//! (command-style queries: `prefixSearch`, `word`, `wordImage`, `suggest`).
//! All calls are blocking; callers that must stay responsive run them on a
//! worker thread via [`background::spawn_fetch`].

pub mod background;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::Url;
use tracing::debug;

use crate::config::BackendConfig;
use crate::constants::{APP_BINARY_NAME, AUTHOR_FIELD, TYPEAHEAD_MAX_RESULTS};
use crate::models::{Correction, KeyboardUpdate, MappingState, WordInfo};

/// Client for the search backend and the keyboard mapping endpoints.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: Client,
    site_url: String,
    search_url: String,
    username: String,
    ip: String,
}

impl SearchClient {
    /// Creates a client from the backend configuration.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat_version())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            site_url: config.site_url.trim_end_matches('/').to_string(),
            search_url: config.search_url.clone(),
            username: config.username.clone(),
            ip: config.ip.clone().unwrap_or_default(),
        })
    }

    /// Fetches the current keyboard mapping and enabled flag.
    pub fn keyboard(&self) -> Result<MappingState> {
        let url = format!("{}/keyboard", self.site_url);
        debug!("fetching keyboard mapping: {url}");

        let state = self
            .http
            .get(&url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .context("Keyboard mapping request failed")?
            .json::<MappingState>()
            .context("Failed to parse keyboard mapping response")?;

        Ok(state)
    }

    /// Saves or resets the keyboard mapping.
    pub fn update_keyboard(&self, update: &KeyboardUpdate) -> Result<()> {
        let url = format!("{}/updateKeyboard", self.site_url);
        debug!("updating keyboard mapping: {url}");

        self.http
            .post(&url)
            .json(update)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .context("Keyboard update request failed")?;

        Ok(())
    }

    /// Author typeahead: prefix search over the author field.
    pub fn author_suggestions(&self, prefix: &str) -> Result<Vec<String>> {
        self.prefix_search(prefix, AUTHOR_FIELD, TYPEAHEAD_MAX_RESULTS)
    }

    /// Prefix search over an indexed field.
    pub fn prefix_search(&self, prefix: &str, field: &str, max_results: usize) -> Result<Vec<String>> {
        debug!("prefix search: field={field} prefix={prefix}");

        let matches = self
            .http
            .get(&self.search_url)
            .query(&[
                ("command", "prefixSearch"),
                ("prefix", prefix),
                ("field", field),
                ("maxResults", &max_results.to_string()),
            ])
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .context("Prefix search request failed")?
            .json::<Vec<String>>()
            .context("Failed to parse prefix search response")?;

        Ok(matches)
    }

    /// Fetches the OCR'd word (and second word, for hyphenated words) at a
    /// document offset.
    pub fn word(&self, doc_id: i64, start_offset: u64) -> Result<WordInfo> {
        debug!("fetching word: docId={doc_id} startOffset={start_offset}");

        let info = self
            .http
            .get(&self.search_url)
            .query(&[
                ("command", "word"),
                ("docId", &doc_id.to_string()),
                ("startOffset", &start_offset.to_string()),
            ])
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .context("Word request failed")?
            .json::<WordInfo>()
            .context("Failed to parse word response")?;

        Ok(info)
    }

    /// Builds the URL of the scanned word image for display.
    pub fn word_image_url(&self, doc_id: i64, start_offset: u64) -> Result<String> {
        let url = Url::parse_with_params(
            &self.search_url,
            &[
                ("command", "wordImage"),
                ("docId", &doc_id.to_string()),
                ("startOffset", &start_offset.to_string()),
            ],
        )
        .context("Failed to build word image URL")?;

        Ok(url.into())
    }

    /// Builds the URL of the server-rendered search page for the given
    /// filters (empty filters are omitted).
    pub fn search_page_url(&self, query: &str, title: &str, authors: &str) -> Result<String> {
        let mut params: Vec<(&str, &str)> = Vec::new();
        if !query.is_empty() {
            params.push(("query", query));
        }
        if !title.is_empty() {
            params.push(("title", title));
        }
        if !authors.is_empty() {
            params.push(("author", authors));
        }

        let url = Url::parse_with_params(&format!("{}/", self.site_url), &params)
            .context("Failed to build search page URL")?;

        Ok(url.into())
    }

    /// Submits a correction suggestion for a word.
    pub fn suggest(&self, correction: &Correction) -> Result<()> {
        debug!(
            "submitting suggestion for docId={} at offset {}",
            correction.doc_id, correction.word_offset
        );

        self.http
            .get(&self.search_url)
            .query(&[
                ("command", "suggest"),
                ("docId", &correction.doc_id.to_string()),
                ("startOffset", &correction.word_offset.to_string()),
                ("user", &self.username),
                ("ip", &self.ip),
                ("suggestion", &correction.suggestion),
                (
                    "suggestion2",
                    correction.suggestion2.as_deref().unwrap_or(""),
                ),
                ("fontCode", &correction.font_code),
                ("languageCode", &correction.language_code),
            ])
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .context("Suggestion request failed")?;

        Ok(())
    }
}

/// User-agent string for backend requests.
fn concat_version() -> String {
    format!("{}/{}", APP_BINARY_NAME, env!("CARGO_PKG_VERSION"))
}
