// src/github/fetch.rs
// =============================================================================
// This module fetches a user's repositories, cache first.
//
// Strategy:
// 1. Look in the session cache under the user identifier
// 2. If the cached value parses, return it (no request, no cache write)
// 3. Otherwise GET {base_url}/users/{user}/repos
// 4. Keep repositories that publish a Pages site and aren't excluded,
//    newest first
// 5. Store the result in the cache and return it
//
// A cached value that doesn't parse is treated exactly like a missing one.
// There are no retries: a failed fetch is returned to the caller, who
// decides what to do with it.
//
// Rust concepts:
// - async functions: For network I/O
// - Arc<dyn Trait>: a cache shared with whoever created the source
// - Stable sorting: Vec::sort_by keeps equal elements in input order
// =============================================================================

use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use super::error::FetchError;
use super::repository::Repository;
use crate::cache::SessionStore;
use crate::config::Config;

/// Media type GitHub recommends for REST calls
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Cache-then-fetch repository data source.
pub struct RepositorySource {
    client: Client,
    base_url: Url,
    excluded: BTreeSet<String>,
    token: Option<String>,
    cache: Arc<dyn SessionStore>,
}

impl RepositorySource {
    /// Builds a source from an explicit configuration and cache.
    pub fn new(config: &Config, cache: Arc<dyn SessionStore>) -> Result<Self, FetchError> {
        let base_url = config
            .endpoint()
            .map_err(|_| FetchError::InvalidBaseUrl(config.base_url.clone()))?;

        // One client for every request (connection pooling)
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            base_url,
            excluded: config.excluded.clone(),
            token: config.token.clone(),
            cache,
        })
    }

    /// Returns the filtered, sorted repositories of `user`.
    ///
    /// Served from the session cache when possible. On a miss the list is
    /// fetched, filtered, sorted and written back to the cache.
    pub async fn get_repositories(&self, user: &str) -> Result<Vec<Repository>, FetchError> {
        let key = user.trim();
        if key.is_empty() {
            return Err(FetchError::InvalidUser(user.to_string()));
        }

        if let Some(cached) = self.read_cache(key) {
            debug!(user = key, count = cached.len(), "Serving repositories from session cache");
            return Ok(cached);
        }

        let fetched = self.fetch(key).await?;
        let total = fetched.len();
        let repositories = filter_and_sort(fetched, &self.excluded);
        info!(user = key, total, kept = repositories.len(), "Fetched repositories");

        self.write_cache(key, &repositories);
        Ok(repositories)
    }

    /// The listing endpoint for `user`, e.g.
    /// https://api.github.com/users/octocat/repos
    pub fn repos_url(&self, user: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();

        // path_segments_mut percent-encodes each segment, so a user
        // identifier can't smuggle extra path components in
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["users", user, "repos"]);

        Ok(url)
    }

    fn read_cache(&self, user: &str) -> Option<Vec<Repository>> {
        let raw = self.cache.get_item(user)?;

        match serde_json::from_str(&raw) {
            Ok(repositories) => Some(repositories),
            Err(e) => {
                warn!(user, error = %e, "Ignoring unreadable cached repositories");
                None
            }
        }
    }

    fn write_cache(&self, user: &str, repositories: &[Repository]) {
        match serde_json::to_string(repositories) {
            Ok(serialized) => self.cache.set_item(user, serialized),
            Err(e) => warn!(user, error = %e, "Failed to cache repositories"),
        }
    }

    async fn fetch(&self, user: &str) -> Result<Vec<Repository>, FetchError> {
        let url = self.repos_url(user)?;
        debug!(%url, "Fetching repositories");

        let mut request = self.client.get(url.clone()).header(ACCEPT, GITHUB_JSON);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        // Only 200 counts; anything else (including other 2xx) is a failure
        if response.status() != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|source| FetchError::Parse {
            url: url.to_string(),
            source,
        })
    }
}

/// Keeps repositories with a Pages site whose name isn't excluded, sorted by
/// `updated_at`, newest first.
///
/// The sort is stable: repositories with equal timestamps keep their input
/// order. Repositories whose `updated_at` doesn't parse go last.
pub fn filter_and_sort(records: Vec<Repository>, excluded: &BTreeSet<String>) -> Vec<Repository> {
    let mut kept: Vec<Repository> = records
        .into_iter()
        .filter(|repo| repo.has_pages && !excluded.contains(&repo.name))
        .collect();

    // None < Some(_), so comparing b to a puts unparseable timestamps last
    kept.sort_by(|a, b| b.updated_timestamp().cmp(&a.updated_timestamp()));
    kept
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<dyn SessionStore> instead of a concrete type?
//    - The caller creates the cache and may want to look at it afterwards
//      (tests do). Arc lets both sides hold it.
//    - dyn SessionStore means any storage implementing the trait works
//
// 2. Why read the body as text and parse it ourselves?
//    - response.json() would mix "the connection broke" and "the JSON is
//      wrong" into one reqwest error
//    - Parsing with serde_json keeps the two failures apart
//
// 3. What does `self.cache.get_item(user)?` do inside read_cache?
//    - read_cache returns Option, so ? works on Option too
//    - None from get_item returns None from read_cache immediately
// -----------------------------------------------------------------------------
