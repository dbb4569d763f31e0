//! Streaming parser for voko dictionary markup.
//!
//! This crate turns one dictionary source unit into the typed element tree
//! defined by [`voko_core`]. Parsing is a single forward pass: reader events
//! are folded onto a stack of open elements, entity definitions are pulled
//! from the grammar files through an [`EntityResolver`], and the finished
//! tree is handed back as a [`voko_core::Element`].
//!
//! ```
//! use voko_parser::{MemoryResolver, parse_str};
//!
//! let source = r#"<art><kap><rad>kurac</rad>i</kap></art>"#;
//! let art = parse_str(source, &MemoryResolver::new()).unwrap();
//! assert_eq!(art.kind().tag(), "art");
//! ```

pub mod builder;
pub mod entities;
pub mod error;
pub mod resolver;

#[cfg(test)]
mod builder_tests;

pub use builder::{parse_reader, parse_str};
pub use entities::EntityTable;
pub use error::{ParseError, Result};
pub use resolver::{EntityResolver, MemoryResolver, ResolveError};
