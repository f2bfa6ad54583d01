// src/github/mod.rs
// =============================================================================
// This module is the repository data source.
//
// Currently implements:
// - The repository record (name, has_pages, updated_at + everything else)
// - Filtering to Pages repositories and sorting newest first
// - Cache-then-fetch retrieval from the GitHub REST API
//
// Submodules:
// - repository: the record type
// - fetch: RepositorySource and filter_and_sort
// - error: FetchError
// =============================================================================

mod error;
mod fetch;
mod repository;

pub use error::FetchError;
pub use fetch::{filter_and_sort, RepositorySource};
pub use repository::Repository;
