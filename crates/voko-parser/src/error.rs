//! Errors raised while building an element tree.
//!
//! Every variant carries the byte offset the reader had reached when the
//! problem was detected, so a batch driver can report which part of a
//! source unit is broken without re-reading it.

use thiserror::Error;

use voko_core::ElementKind;

use crate::resolver::ResolveError;

/// A type alias for `Result<T, ParseError>`.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Error type for parsing a dictionary unit.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The markup used a tag the grammar does not declare.
    #[error("unknown element `{tag}` at byte {position}")]
    UnknownElementKind { tag: String, position: u64 },

    /// The markup is well-formed XML but violates the grammar's structure.
    #[error("{message} at byte {position}")]
    MalformedStructure { message: String, position: u64 },

    /// Character data appeared inside an element whose kind forbids it.
    #[error("unexpected text {text:?} inside `{parent}` at byte {position}")]
    UnexpectedText {
        parent: ElementKind,
        text: String,
        position: u64,
    },

    /// A grammar resource named by the document could not be loaded.
    #[error(transparent)]
    Resource(#[from] ResolveError),

    /// The underlying reader rejected the markup.
    #[error("malformed markup at byte {position}: {source}")]
    Xml {
        #[source]
        source: quick_xml::Error,
        position: u64,
    },
}

impl ParseError {
    pub(crate) fn xml(source: impl Into<quick_xml::Error>, position: u64) -> Self {
        ParseError::Xml {
            source: source.into(),
            position,
        }
    }

    pub(crate) fn malformed(message: impl Into<String>, position: u64) -> Self {
        ParseError::MalformedStructure {
            message: message.into(),
            position,
        }
    }
}
