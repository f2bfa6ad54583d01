// src/github/error.rs
// =============================================================================
// Errors surfaced by the repository data source.
//
// Two families reach the caller:
// - network errors: the request failed or the API answered with a status
//   other than 200
// - parse errors: the API answered 200 but the body is not a repository list
//
// A missing or corrupted cache entry is NOT an error. The data source just
// fetches again, so there is no variant for it.
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The user identifier was empty or only whitespace
    #[error("Invalid user identifier: '{0}'")]
    InvalidUser(String),

    /// The configured base URL can't be turned into an endpoint
    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    /// The HTTP client could not be built (TLS backend, bad user agent, ...)
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection, DNS, TLS or body read failure
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with something other than 200 OK
    #[error("Failed to fetch {url}: HTTP {status}")]
    Status { url: String, status: StatusCode },

    /// 200 OK, but the body is not a JSON list of repositories
    #[error("Failed to parse repositories from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// True for transport failures and non-200 answers
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Transport { .. } | FetchError::Status { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, FetchError::Parse { .. })
    }
}
