//! Resolution of external grammar resources.
//!
//! A document names its grammar through a document type declaration, and the
//! grammar in turn may pull in further resources. Where those bytes come
//! from is the caller's business: the command-line tool reads them from a
//! grammar directory on disk, tests supply them from memory. The parser only
//! asks an [`EntityResolver`] for them.

use indexmap::IndexMap;
use thiserror::Error;

/// A grammar resource could not be located.
#[derive(Debug, Error)]
#[error("cannot resolve grammar resource `{system_id}`: {reason}")]
pub struct ResolveError {
    system_id: String,
    reason: String,
}

impl ResolveError {
    pub fn new(system_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            system_id: system_id.into(),
            reason: reason.into(),
        }
    }

    /// The system identifier that failed to resolve.
    pub fn system_id(&self) -> &str {
        &self.system_id
    }
}

/// Maps system identifiers from the markup to resource bytes.
///
/// System identifiers in the wild are relative paths written for the
/// original authoring layout (`"../dtd/vokoxml.dtd"`), so implementations
/// should match on the final path segment rather than the full identifier.
pub trait EntityResolver {
    /// Returns the bytes of the named resource.
    fn resolve(&self, public_id: Option<&str>, system_id: &str) -> Result<Vec<u8>, ResolveError>;
}

/// The final path segment of a system identifier.
pub fn base_name(system_id: &str) -> &str {
    system_id.rsplit('/').next().unwrap_or(system_id)
}

/// An in-memory [`EntityResolver`], keyed by resource base name.
#[derive(Debug, Default)]
pub struct MemoryResolver {
    entries: IndexMap<String, Vec<u8>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a resource under the base name of `system_id`.
    pub fn insert(&mut self, system_id: &str, bytes: impl Into<Vec<u8>>) {
        self.entries
            .insert(base_name(system_id).to_string(), bytes.into());
    }
}

impl EntityResolver for MemoryResolver {
    fn resolve(&self, _public_id: Option<&str>, system_id: &str) -> Result<Vec<u8>, ResolveError> {
        self.entries
            .get(base_name(system_id))
            .cloned()
            .ok_or_else(|| ResolveError::new(system_id, "no such resource registered"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name_strips_directories() {
        assert_eq!(base_name("../dtd/vokoxml.dtd"), "vokoxml.dtd");
        assert_eq!(base_name("vokosgn.ent"), "vokosgn.ent");
    }

    #[test]
    fn test_memory_resolver_matches_by_base_name() {
        let mut resolver = MemoryResolver::new();
        resolver.insert("vokoxml.dtd", b"<!ENTITY x \"y\">".as_slice());

        let bytes = resolver.resolve(None, "../dtd/vokoxml.dtd").unwrap();
        assert_eq!(bytes, b"<!ENTITY x \"y\">");

        let err = resolver.resolve(None, "missing.dtd").unwrap_err();
        assert_eq!(err.system_id(), "missing.dtd");
    }
}
