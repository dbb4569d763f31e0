//! Headword reconstruction from head elements.
//!
//! A head mixes literal text (affixes, ending letters) with placeholders
//! standing in for the article's root, so the headword has to be stitched
//! back together in document order. A head may also contain `var`
//! sub-heads, each of which yields an additional headword for the same
//! entry (alternate spellings).

use voko_core::{Element, ElementKind, Node};

use crate::error::ExtractError;
use crate::roots::RootSet;

/// Reconstructs the headwords of one head element: the base headword
/// followed by any variant headwords.
pub fn headwords(kap: &Element, roots: &RootSet) -> Result<Vec<String>, ExtractError> {
    reconstruct(kap, roots, true)
}

fn reconstruct(
    kap: &Element,
    roots: &RootSet,
    include_vars: bool,
) -> Result<Vec<String>, ExtractError> {
    let mut base = String::new();
    let mut variants = Vec::new();

    for node in kap.content() {
        match node {
            Node::Text(text) => {
                // Indentation around child elements is not part of the word.
                if !text.trim().is_empty() {
                    base.push_str(text);
                }
            }
            Node::Element(child) => match child.kind() {
                ElementKind::Tld => base.push_str(&roots.substitute(child)?),
                ElementKind::Rad => base.push_str(child.text()),
                ElementKind::Var if include_vars => {
                    if let Some(var_kap) = child.head() {
                        variants.extend(reconstruct(var_kap, roots, false)?);
                    }
                }
                _ => {}
            },
        }
    }

    let mut result = Vec::new();
    let base = cleanup(&base);
    if !base.is_empty() {
        result.push(base);
    }
    result.extend(variants);
    Ok(result)
}

/// Trims the assembled text and strips one trailing `,` or `;`, which in
/// the markup separates the headword from what follows it.
fn cleanup(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_suffix([',', ';'])
        .map(str::trim_end)
        .unwrap_or(trimmed)
        .to_string()
}
