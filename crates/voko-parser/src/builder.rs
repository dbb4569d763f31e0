//! Streaming construction of the element tree.
//!
//! The reader walks the markup event by event and the [`TreeBuilder`] keeps
//! a stack of open elements. An element joins its parent only when its
//! closing tag arrives, so inner structure is complete before attachment and
//! a `kap` child can be routed to its parent's head slot instead of the
//! ordinary content. The public entry points are [`parse_str`] and
//! [`parse_reader`].

use std::io::BufRead;

use log::{debug, trace};
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

use voko_core::{ContentModel, Element, ElementKind};

use crate::entities::{self, EntityTable, ExternalId};
use crate::error::{ParseError, Result};
use crate::resolver::EntityResolver;

/// Parses one dictionary unit from a string.
pub fn parse_str(input: &str, resolver: &dyn EntityResolver) -> Result<Element> {
    parse_reader(input.as_bytes(), resolver)
}

/// Parses one dictionary unit from a buffered reader.
pub fn parse_reader<R: BufRead>(input: R, resolver: &dyn EntityResolver) -> Result<Element> {
    let mut reader = Reader::from_reader(input);
    // Tag mismatches are reported by the builder, with the element kind
    // and position at hand.
    reader.config_mut().check_end_names = false;
    reader.config_mut().allow_unmatched_ends = true;
    let mut builder = TreeBuilder::new(resolver);
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|err| ParseError::xml(err, reader.buffer_position()))?;
        let position = reader.buffer_position();

        match event {
            Event::DocType(decl) => {
                builder.doctype(&String::from_utf8_lossy(&decl), position)?;
            }
            Event::Start(start) => builder.open(&start, position)?,
            Event::Empty(start) => {
                builder.open(&start, position)?;
                builder.close(None, position)?;
            }
            Event::End(end) => {
                let tag = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                builder.close(Some(&tag), position)?;
            }
            Event::Text(text) => {
                let raw = text
                    .decode()
                    .map_err(|err| ParseError::xml(err, position))?;
                builder.text(&raw, position)?;
            }
            Event::CData(cdata) => {
                builder.text(&String::from_utf8_lossy(&cdata), position)?;
            }
            Event::GeneralRef(entity) => {
                let name = String::from_utf8_lossy(entity.as_ref()).into_owned();
                builder.general_ref(&name, position)?;
            }
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) => {}
            Event::Eof => return builder.finish(position),
        }

        buf.clear();
    }
}

/// Stack-based tree builder fed by reader events.
struct TreeBuilder<'r> {
    resolver: &'r dyn EntityResolver,
    entities: EntityTable,
    stack: Vec<Element>,
    root: Option<Element>,
}

impl<'r> TreeBuilder<'r> {
    fn new(resolver: &'r dyn EntityResolver) -> Self {
        Self {
            resolver,
            entities: EntityTable::new(),
            stack: Vec::new(),
            root: None,
        }
    }

    /// Loads entity definitions named by the document type declaration.
    fn doctype(&mut self, decl: &str, position: u64) -> Result<()> {
        let doctype = entities::parse_doctype(decl)
            .ok_or_else(|| ParseError::malformed("unreadable document type declaration", position))?;

        if let Some(external_id) = doctype.external_id {
            let (public_id, system_id) = match &external_id {
                ExternalId::System(system_id) => (None, system_id.as_str()),
                ExternalId::Public(public_id, system_id) => {
                    (Some(public_id.as_str()), system_id.as_str())
                }
            };
            let bytes = self.resolver.resolve(public_id, system_id)?;
            self.entities
                .scan(&String::from_utf8_lossy(&bytes), self.resolver, 0)?;
            debug!(system_id, count = self.entities.len(); "loaded entity definitions");
        }
        if let Some(subset) = doctype.internal_subset {
            self.entities.scan(&subset, self.resolver, 0)?;
        }
        Ok(())
    }

    fn open(&mut self, start: &BytesStart<'_>, position: u64) -> Result<()> {
        let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let kind = ElementKind::from_tag(&tag).ok_or(ParseError::UnknownElementKind {
            tag,
            position,
        })?;
        trace!(tag = kind.tag(); "open element");

        let mut element = Element::new(kind, position);
        for attr in start.attributes() {
            let attr = attr.map_err(|err| ParseError::xml(err, position))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value_with(|name| self.entity_replacement(name))
                .map_err(|err| ParseError::xml(err, position))?;
            element.set_attr(&key, value.into_owned());
        }
        self.stack.push(element);
        Ok(())
    }

    /// Pops the innermost open element and attaches it. `expected_tag` is
    /// the closing tag when one was read; empty-element events close without
    /// one.
    fn close(&mut self, expected_tag: Option<&str>, position: u64) -> Result<()> {
        let element = self.stack.pop().ok_or_else(|| {
            ParseError::malformed("closing tag without a matching opening tag", position)
        })?;
        if let Some(tag) = expected_tag {
            if element.kind().tag() != tag {
                return Err(ParseError::malformed(
                    format!(
                        "closing tag `{}` does not match open element `{}`",
                        tag,
                        element.kind()
                    ),
                    position,
                ));
            }
        }

        let Some(parent) = self.stack.last_mut() else {
            if self.root.is_some() {
                return Err(ParseError::malformed(
                    "more than one document element",
                    position,
                ));
            }
            self.root = Some(element);
            return Ok(());
        };

        if element.kind() == ElementKind::Kap
            && parent.kind().is_head_bearing()
            && parent.head().is_none()
        {
            parent.set_head(element);
            return Ok(());
        }

        match parent.content_model() {
            ContentModel::Mixed | ContentModel::Elements => {
                parent.push_child(element);
                Ok(())
            }
            ContentModel::Text | ContentModel::Empty => Err(ParseError::malformed(
                format!(
                    "element `{}` not allowed inside `{}`",
                    element.kind(),
                    parent.kind()
                ),
                position,
            )),
        }
    }

    /// Routes character data to the innermost open element.
    fn text(&mut self, raw: &str, position: u64) -> Result<()> {
        let Some(parent) = self.stack.last_mut() else {
            if raw.trim().is_empty() {
                return Ok(());
            }
            return Err(ParseError::malformed(
                "text outside of the document element",
                position,
            ));
        };

        match parent.content_model() {
            ContentModel::Text => parent.push_text(raw),
            ContentModel::Mixed => parent.append_mixed_text(raw),
            ContentModel::Elements | ContentModel::Empty => {
                // Indentation between child elements is not content.
                if !raw.trim().is_empty() {
                    return Err(ParseError::UnexpectedText {
                        parent: parent.kind(),
                        text: raw.trim().to_string(),
                        position,
                    });
                }
            }
        }
        Ok(())
    }

    /// Expands a general or character reference into character data.
    fn general_ref(&mut self, name: &str, position: u64) -> Result<()> {
        let replacement = if let Some(ch) = entities::resolve_char_ref(name) {
            ch.to_string()
        } else if let Some(value) = self.entity_replacement(name) {
            value.to_string()
        } else {
            return Err(ParseError::malformed(
                format!("reference to undeclared entity `&{name};`"),
                position,
            ));
        };
        self.text(&replacement, position)
    }

    fn entity_replacement(&self, name: &str) -> Option<&str> {
        self.entities
            .get(name)
            .or_else(|| resolve_predefined_entity(name))
    }

    fn finish(self, position: u64) -> Result<Element> {
        if let Some(open) = self.stack.last() {
            return Err(ParseError::malformed(
                format!("unclosed element `{}`", open.kind()),
                position,
            ));
        }
        self.root
            .ok_or_else(|| ParseError::malformed("document contains no elements", position))
    }
}
