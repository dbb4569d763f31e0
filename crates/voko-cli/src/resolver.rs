//! Filesystem resolution of grammar resources.
//!
//! Dictionary sources name their grammar as `../dtd/vokoxml.dtd` relative
//! to the authoring layout, and the grammar files include each other by
//! bare name. [`FsResolver`] maps both shapes onto a grammar directory on
//! disk. One resolver is shared across a whole batch.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use voko::{EntityResolver, ResolveError};

/// Resolves system identifiers against a grammar directory.
#[derive(Debug)]
pub struct FsResolver {
    base: PathBuf,
}

impl FsResolver {
    /// Creates a resolver rooted at the directory that contains the
    /// grammar layout (typically holding a `dtd/` subdirectory).
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn candidates(&self, system_id: &str) -> Result<Vec<PathBuf>, ResolveError> {
        if let Some(path) = system_id.strip_prefix("file:/") {
            return Ok(vec![PathBuf::from(format!("/{}", path.trim_start_matches('/')))]);
        }
        if system_id.contains(':') {
            return Err(ResolveError::new(
                system_id,
                "unsupported system identifier scheme",
            ));
        }

        // "../dtd/x.dtd" is relative to the authoring layout; strip the
        // parent steps and re-root at the grammar directory.
        let relative: PathBuf = Path::new(system_id)
            .components()
            .filter(|c| !matches!(c, std::path::Component::ParentDir))
            .collect();

        let file_name = relative
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| ResolveError::new(system_id, "identifier names no file"))?;

        Ok(vec![
            self.base.join(&relative),
            self.base.join("dtd").join(&file_name),
            self.base.join(file_name),
        ])
    }
}

impl EntityResolver for FsResolver {
    fn resolve(&self, _public_id: Option<&str>, system_id: &str) -> Result<Vec<u8>, ResolveError> {
        for candidate in self.candidates(system_id)? {
            if candidate.is_file() {
                debug!(
                    system_id,
                    path = candidate.display().to_string();
                    "resolved grammar resource"
                );
                return fs::read(&candidate)
                    .map_err(|err| ResolveError::new(system_id, err.to_string()));
            }
        }
        Err(ResolveError::new(
            system_id,
            format!("not found under {}", self.base.display()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_resolves_relative_layout_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("dtd")).unwrap();
        fs::write(dir.path().join("dtd/vokoxml.dtd"), b"<!ENTITY x \"y\">").unwrap();

        let resolver = FsResolver::new(dir.path());
        let bytes = resolver.resolve(None, "../dtd/vokoxml.dtd").unwrap();
        assert_eq!(bytes, b"<!ENTITY x \"y\">");
    }

    #[test]
    fn test_resolves_bare_include_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("dtd")).unwrap();
        fs::write(dir.path().join("dtd/vokosgn.ent"), b"ent").unwrap();

        let resolver = FsResolver::new(dir.path());
        assert_eq!(resolver.resolve(None, "vokosgn.ent").unwrap(), b"ent");
    }

    #[test]
    fn test_unsupported_scheme() {
        let resolver = FsResolver::new("/tmp");
        let err = resolver.resolve(None, "http://example.org/x.dtd").unwrap_err();
        assert_eq!(err.system_id(), "http://example.org/x.dtd");
    }

    #[test]
    fn test_missing_resource() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = FsResolver::new(dir.path());
        assert!(resolver.resolve(None, "../dtd/absent.dtd").is_err());
    }
}
