//! Error types for voko operations.
//!
//! [`VokoError`] is the single error surface of the facade: it wraps I/O
//! failures, parser errors, and extraction errors so callers handle one
//! type. [`ExtractError`] covers what can go wrong while walking an already
//! parsed tree.

use std::io;

use thiserror::Error;

use voko_parser::ParseError;

/// The main error type for voko operations.
#[derive(Debug, Error)]
pub enum VokoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while extracting records from a parsed tree.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A placeholder named a root text the article does not define.
    #[error("placeholder `{flag}` resolves to no root text at byte {position}")]
    UnresolvedPlaceholder { flag: String, position: u64 },
}
