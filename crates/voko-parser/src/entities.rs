//! Entity definitions scanned out of document type definitions.
//!
//! The dictionary sources spell non-ASCII letters and shared phrases as
//! general entity references (`&cx;`, `&km;`) whose definitions live in the
//! grammar files. Only `<!ENTITY>` declarations matter for building the
//! tree, so rather than interpreting the full grammar this module scans the
//! definition text for entity declarations and follows parameter-entity
//! includes, which is how the definition files are actually stitched
//! together (`<!ENTITY % sgn SYSTEM "vokosgn.ent">`).

use indexmap::IndexMap;
use log::debug;

use crate::error::{ParseError, Result};
use crate::resolver::EntityResolver;

/// Parameter-entity includes deeper than this indicate a definition cycle.
const MAX_INCLUDE_DEPTH: usize = 8;

/// General entity definitions, name to replacement text.
#[derive(Debug, Default)]
pub struct EntityTable {
    map: IndexMap<String, String>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The replacement text for a general entity, if declared.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Builds a table by scanning one definition document and everything it
    /// includes.
    pub fn from_dtd(bytes: &[u8], resolver: &dyn EntityResolver) -> Result<Self> {
        let mut table = Self::new();
        table.scan(&String::from_utf8_lossy(bytes), resolver, 0)?;
        Ok(table)
    }

    /// Scans `<!ENTITY>` declarations, recursing into parameter-entity
    /// includes through `resolver`.
    pub(crate) fn scan(
        &mut self,
        dtd: &str,
        resolver: &dyn EntityResolver,
        depth: usize,
    ) -> Result<()> {
        if depth > MAX_INCLUDE_DEPTH {
            return Err(ParseError::malformed(
                "parameter entity includes nested too deeply",
                0,
            ));
        }

        let mut rest = dtd;
        while let Some(idx) = rest.find("<!ENTITY") {
            rest = &rest[idx + "<!ENTITY".len()..];
            rest = self.scan_declaration(rest, resolver, depth)?;
        }
        Ok(())
    }

    /// Parses one declaration body (everything after `<!ENTITY`) and returns
    /// the remainder of the input.
    fn scan_declaration<'a>(
        &mut self,
        input: &'a str,
        resolver: &dyn EntityResolver,
        depth: usize,
    ) -> Result<&'a str> {
        let mut rest = input.trim_start();

        let parameter = if let Some(after) = rest.strip_prefix('%') {
            rest = after.trim_start();
            true
        } else {
            false
        };

        let name_end = rest
            .find(|c: char| c.is_whitespace())
            .ok_or_else(|| ParseError::malformed("truncated entity declaration", 0))?;
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        if let Some(after) = rest.strip_prefix("SYSTEM") {
            let (system_id, after) = quoted(after.trim_start())?;
            rest = after;
            self.include(parameter, name, None, system_id, resolver, depth)?;
        } else if let Some(after) = rest.strip_prefix("PUBLIC") {
            let (public_id, after) = quoted(after.trim_start())?;
            let (system_id, after) = quoted(after.trim_start())?;
            rest = after;
            self.include(parameter, name, Some(public_id), system_id, resolver, depth)?;
        } else {
            let (value, after) = quoted(rest)?;
            rest = after;
            if !parameter {
                let value = self.expand_value(value);
                self.map.insert(name.to_string(), value);
            }
            // Internal parameter entities only feed content models, which
            // the element kinds already encode.
        }

        match rest.find('>') {
            Some(end) => Ok(&rest[end + 1..]),
            None => Ok(""),
        }
    }

    fn include(
        &mut self,
        parameter: bool,
        name: &str,
        public_id: Option<&str>,
        system_id: &str,
        resolver: &dyn EntityResolver,
        depth: usize,
    ) -> Result<()> {
        if !parameter {
            // External general entities never occur in dictionary sources.
            debug!(name; "skipping external general entity");
            return Ok(());
        }
        let bytes = resolver.resolve(public_id, system_id)?;
        debug!(name, system_id; "including parameter entity");
        self.scan(&String::from_utf8_lossy(&bytes), resolver, depth + 1)
    }

    /// Expands character references and references to already-declared
    /// entities inside a replacement text. Unknown references are kept
    /// verbatim.
    fn expand_value(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(start) = rest.find('&') {
            out.push_str(&rest[..start]);
            let tail = &rest[start + 1..];
            match tail.find(';') {
                Some(end) => {
                    let name = &tail[..end];
                    if let Some(ch) = resolve_char_ref(name) {
                        out.push(ch);
                    } else if let Some(value) = self.get(name) {
                        out.push_str(value);
                    } else {
                        out.push('&');
                        out.push_str(name);
                        out.push(';');
                    }
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push('&');
                    rest = tail;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Decodes a character reference name (`#265`, `#x109`) to its character.
pub(crate) fn resolve_char_ref(name: &str) -> Option<char> {
    let digits = name.strip_prefix('#')?;
    let code = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse().ok()?
    };
    char::from_u32(code)
}

fn quoted(input: &str) -> Result<(&str, &str)> {
    let mut chars = input.chars();
    let quote = match chars.next() {
        Some(q @ ('"' | '\'')) => q,
        _ => {
            return Err(ParseError::malformed(
                "expected quoted literal in entity declaration",
                0,
            ));
        }
    };
    let body = chars.as_str();
    match body.find(quote) {
        Some(end) => Ok((&body[..end], &body[end + 1..])),
        None => Err(ParseError::malformed(
            "unterminated literal in entity declaration",
            0,
        )),
    }
}

/// An external identifier from a document type declaration.
#[derive(Debug, PartialEq)]
pub(crate) enum ExternalId {
    System(String),
    Public(String, String),
}

/// The parsed parts of a `<!DOCTYPE ...>` declaration body.
#[derive(Debug)]
pub(crate) struct Doctype {
    pub external_id: Option<ExternalId>,
    pub internal_subset: Option<String>,
}

/// Parses a document type declaration body (everything between `<!DOCTYPE`
/// and the closing `>`).
pub(crate) fn parse_doctype(decl: &str) -> Option<Doctype> {
    let mut rest = decl.trim_start();

    // Root element name.
    let name_end = rest
        .find(|c: char| c.is_whitespace() || c == '[')
        .unwrap_or(rest.len());
    if name_end == 0 {
        return None;
    }
    rest = rest[name_end..].trim_start();

    let external_id = if let Some(after) = rest.strip_prefix("SYSTEM") {
        let (system_id, after) = quoted(after.trim_start()).ok()?;
        rest = after.trim_start();
        Some(ExternalId::System(system_id.to_string()))
    } else if let Some(after) = rest.strip_prefix("PUBLIC") {
        let (public_id, after) = quoted(after.trim_start()).ok()?;
        let (system_id, after) = quoted(after.trim_start()).ok()?;
        rest = after.trim_start();
        Some(ExternalId::Public(
            public_id.to_string(),
            system_id.to_string(),
        ))
    } else {
        None
    };

    let internal_subset = rest.strip_prefix('[').map(|after| {
        let end = after.rfind(']').unwrap_or(after.len());
        after[..end].to_string()
    });

    Some(Doctype {
        external_id,
        internal_subset,
    })
}
