//! Error taxonomy for the ranked-tag engine.
//!
//! Only class-4 "programmer-contract" failures are represented as `Err`.
//! Per-file parse/read failures, cache corruption, and budget-impossible
//! renders are all recoverable and show up as ordinary values (empty tag
//! lists, an in-memory cache fallback, an empty string), never as an error
//! variant here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoMapError {
    #[error("map_tokens must be nonnegative, got {0}")]
    NegativeBudget(i64),
}

pub type Result<T> = std::result::Result<T, RepoMapError>;
