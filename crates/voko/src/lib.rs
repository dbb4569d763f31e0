//! voko - headword and sense extraction for dictionary markup.
//!
//! Parsing and extraction for the Reta-Vortaro article format. A source
//! unit is parsed into a typed element tree, then walked to reconstruct
//! headwords (substituting root placeholders), number senses
//! hierarchically, and collect definition text into a JSON-ready record.

pub mod export;
pub mod headword;
pub mod roots;
pub mod senses;

mod error;

pub use voko_core::{ContentModel, Element, ElementKind, Node};
pub use voko_parser::{EntityResolver, EntityTable, MemoryResolver, ParseError, ResolveError};

pub use error::{ExtractError, VokoError};
pub use export::{ArticleRecord, SenseRecord};
pub use roots::RootSet;

use std::io::BufRead;

use log::{debug, info, warn};

/// Extractor for parsing dictionary units and producing output records.
///
/// This provides an API for processing one unit through parsing and
/// extraction. Units are independent; one extractor can process many in
/// sequence.
///
/// # Examples
///
/// ```
/// use voko::{ArticleExtractor, MemoryResolver};
///
/// let source = "<vortaro><art><kap><rad>kurac</rad>/i</kap>\
///     <drv><kap><tld/>isto</kap>\
///     <snc><dif>Tiu, kiu <tld/>as profesie.</dif></snc></drv>\
///     </art></vortaro>";
///
/// let extractor = ArticleExtractor::new();
/// let tree = extractor.parse(source, &MemoryResolver::new()).unwrap();
/// let record = extractor.extract(&tree).unwrap();
///
/// assert_eq!(record["kuracisto"][0].number, "1");
/// assert_eq!(record["kuracisto"][0].text, "Tiu, kiu kuracas profesie.");
/// ```
#[derive(Debug, Default)]
pub struct ArticleExtractor;

impl ArticleExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parses one unit from a string into its element tree.
    ///
    /// # Errors
    ///
    /// Returns `VokoError` for markup errors and for grammar resources the
    /// resolver cannot supply.
    pub fn parse(&self, source: &str, resolver: &dyn EntityResolver) -> Result<Element, VokoError> {
        let tree = voko_parser::parse_str(source, resolver)?;
        debug!(root = tree.kind().tag(); "unit parsed");
        Ok(tree)
    }

    /// Parses one unit from a buffered reader into its element tree.
    pub fn parse_reader<R: BufRead>(
        &self,
        input: R,
        resolver: &dyn EntityResolver,
    ) -> Result<Element, VokoError> {
        let tree = voko_parser::parse_reader(input, resolver)?;
        debug!(root = tree.kind().tag(); "unit parsed");
        Ok(tree)
    }

    /// Extracts the article record of a parsed unit: every derivation's
    /// headwords mapped to its numbered senses.
    ///
    /// Headword variants share their derivation's senses. A derivation
    /// without a head, or with no senses, is reported through the log and
    /// does not fail the unit; an unresolved placeholder does.
    pub fn extract(&self, tree: &Element) -> Result<ArticleRecord, VokoError> {
        info!("extracting article record");
        let roots = self.roots_of(tree);

        let mut derivations = Vec::new();
        collect_derivations(tree, &mut derivations);
        if derivations.is_empty() {
            warn!("unit has no derivations");
        }

        let mut record = ArticleRecord::new();
        for drv in derivations {
            let Some(kap) = drv.head() else {
                warn!(position = drv.position(); "derivation without a head, skipped");
                continue;
            };
            let words = headword::headwords(kap, &roots).map_err(VokoError::from)?;
            let senses: Vec<SenseRecord> = senses::collect_senses(drv, &roots)?
                .into_iter()
                .map(Into::into)
                .collect();
            if senses.is_empty() {
                warn!(position = drv.position(); "derivation without senses");
            }
            for word in words {
                record.insert(word, senses.clone());
            }
        }

        debug!(headwords = record.len(); "article record extracted");
        Ok(record)
    }

    /// Extracts every derivation headword of a parsed unit, in document
    /// order, variants included.
    pub fn headwords(&self, tree: &Element) -> Result<Vec<String>, VokoError> {
        let roots = self.roots_of(tree);
        let mut derivations = Vec::new();
        collect_derivations(tree, &mut derivations);

        let mut words = Vec::new();
        for drv in derivations {
            if let Some(kap) = drv.head() {
                words.extend(headword::headwords(kap, &roots)?);
            }
        }
        Ok(words)
    }

    /// Extracts the root texts of a parsed unit, plain root first.
    pub fn roots(&self, tree: &Element) -> Vec<String> {
        self.roots_of(tree)
            .texts()
            .map(str::to_string)
            .collect()
    }

    fn roots_of(&self, tree: &Element) -> RootSet {
        match find_article(tree) {
            Some(art) => RootSet::from_article(art),
            None => {
                warn!("unit has no article element");
                RootSet::default()
            }
        }
    }
}

/// First article element in the tree, depth-first.
fn find_article(el: &Element) -> Option<&Element> {
    if el.kind() == ElementKind::Art {
        return Some(el);
    }
    el.children().find_map(find_article)
}

/// Collects derivations in document order: every `drv`, and every
/// `subdrv` with its own head. Headless sub-derivations stay part of their
/// enclosing derivation's sense numbering.
fn collect_derivations<'a>(el: &'a Element, out: &mut Vec<&'a Element>) {
    for child in el.children() {
        match child.kind() {
            ElementKind::Drv => {
                out.push(child);
                collect_derivations(child, out);
            }
            ElementKind::SubDrv if child.head().is_some() => {
                out.push(child);
                collect_derivations(child, out);
            }
            _ => collect_derivations(child, out),
        }
    }
}
