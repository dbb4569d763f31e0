//! Sense numbering and definition text collection.
//!
//! Senses of a derivation are numbered in document order: top-level senses
//! count `1..K`, and a sense nested inside another gets the parent number
//! plus its own counter (`1.1`, `1.2`), restarting under each parent. For
//! each sense the first definitional content is flattened to plain text:
//! either a `dif` element, or a reference (group) explicitly marked as a
//! definition through `tip="dif"`.

use voko_core::{ContentModel, Element, ElementKind, Node};

use crate::error::ExtractError;
use crate::roots::RootSet;

/// One numbered sense of a derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct Sense {
    pub number: String,
    pub text: String,
}

/// Collects the numbered senses of a derivation in document order.
///
/// A nested sub-derivation without its own head does not start a new
/// entry; its senses continue the enclosing derivation's numbering.
pub fn collect_senses(drv: &Element, roots: &RootSet) -> Result<Vec<Sense>, ExtractError> {
    let mut senses = Vec::new();
    number_senses(&top_level(drv), "", roots, &mut senses)?;
    Ok(senses)
}

/// Top-level senses of a derivation, including those of headless
/// sub-derivations in place.
fn top_level(drv: &Element) -> Vec<&Element> {
    let mut list = Vec::new();
    for child in drv.children() {
        match child.kind() {
            ElementKind::Snc => list.push(child),
            ElementKind::SubDrv if child.head().is_none() => {
                list.extend(child.children().filter(|c| c.kind() == ElementKind::Snc));
            }
            _ => {}
        }
    }
    list
}

fn number_senses(
    level: &[&Element],
    base: &str,
    roots: &RootSet,
    out: &mut Vec<Sense>,
) -> Result<(), ExtractError> {
    for (index, snc) in level.iter().enumerate() {
        let number = if base.is_empty() {
            (index + 1).to_string()
        } else {
            format!("{base}.{}", index + 1)
        };

        let text = match definition_of(snc) {
            Some(definition) => {
                let mut raw = String::new();
                flatten(definition, roots, &mut raw)?;
                normalize(&raw)
            }
            None => String::new(),
        };
        out.push(Sense { number: number.clone(), text });

        let nested: Vec<&Element> = snc
            .children()
            .filter(|c| matches!(c.kind(), ElementKind::Snc | ElementKind::SubSnc))
            .collect();
        number_senses(&nested, &number, roots, out)?;
    }
    Ok(())
}

/// The first definitional element of a sense: a `dif`, or a reference
/// (group) whose `tip` marks it as a definition.
fn definition_of(snc: &Element) -> Option<&Element> {
    snc.children().find(|child| match child.kind() {
        ElementKind::Dif => true,
        ElementKind::Ref | ElementKind::RefGrp => child.attr("tip") == "dif",
        _ => false,
    })
}

/// Element kinds whose text participates in a definition when embedded in
/// one. References inside a definition body are rendered regardless of
/// their `tip`; reference groups flatten recursively in document order.
fn is_inline(kind: ElementKind) -> bool {
    use ElementKind::*;
    matches!(
        kind,
        Ref | RefGrp | Em | Esc | Frm | Ind | Ke | Ctl | Mis | Nom | Nac | Sub | Sup | Ts
    )
}

fn flatten(el: &Element, roots: &RootSet, out: &mut String) -> Result<(), ExtractError> {
    for node in el.content() {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(child) => match child.kind() {
                ElementKind::Tld => out.push_str(&roots.substitute(child)?),
                kind if is_inline(kind) => {
                    // Text-only kinds keep their text out of the content
                    // sequence.
                    if child.content_model() == ContentModel::Text {
                        out.push_str(child.text());
                    } else {
                        flatten(child, roots, out)?;
                    }
                }
                _ => {}
            },
        }
    }
    Ok(())
}

/// Normalizes collected sense text: whitespace runs collapse to single
/// spaces, a trailing `:` becomes `.`, and a final `.` is appended when
/// the text does not already end in closing punctuation.
fn normalize(raw: &str) -> String {
    let mut text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.ends_with(':') {
        text.pop();
        text.push('.');
    } else if !text.is_empty() && !text.ends_with(['.', '!', '?', ';']) {
        text.push('.');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use voko_parser::{MemoryResolver, parse_str};

    fn parse(source: &str) -> Element {
        parse_str(source, &MemoryResolver::new()).unwrap()
    }

    fn roots_of(art_source: &str) -> RootSet {
        RootSet::from_article(&parse(art_source))
    }

    fn senses(drv_source: &str, roots: &RootSet) -> Vec<Sense> {
        collect_senses(&parse(drv_source), roots).unwrap()
    }

    fn numbers(senses: &[Sense]) -> Vec<&str> {
        senses.iter().map(|s| s.number.as_str()).collect()
    }

    #[test]
    fn test_flat_numbering() {
        let roots = roots_of("<art><kap><rad>kurac</rad></kap></art>");
        let collected = senses(
            "<drv><kap><tld/>i</kap>\
             <snc><dif>unua senco</dif></snc>\
             <snc><dif>dua senco</dif></snc></drv>",
            &roots,
        );
        assert_eq!(numbers(&collected), vec!["1", "2"]);
        assert_eq!(collected[0].text, "unua senco.");
    }

    #[test]
    fn test_nested_numbering() {
        let roots = roots_of("<art><kap><rad>kurac</rad></kap></art>");
        let collected = senses(
            "<drv><kap><tld/>i</kap>\
             <snc><dif>unua</dif>\
               <subsnc><dif>ena</dif></subsnc>\
             </snc>\
             <snc><dif>dua</dif></snc></drv>",
            &roots,
        );
        assert_eq!(numbers(&collected), vec!["1", "1.1", "2"]);
    }

    #[test]
    fn test_deeper_nesting_restarts_counters() {
        let roots = roots_of("<art><kap><rad>x</rad></kap></art>");
        let collected = senses(
            "<drv><kap><tld/></kap>\
             <snc><dif>a</dif>\
               <subsnc><dif>b</dif><subsnc><dif>c</dif></subsnc></subsnc>\
               <subsnc><dif>d</dif></subsnc>\
             </snc></drv>",
            &roots,
        );
        assert_eq!(numbers(&collected), vec!["1", "1.1", "1.1.1", "1.2"]);
    }

    #[test]
    fn test_placeholder_in_definition() {
        let roots = roots_of("<art><kap><rad>kurac</rad></kap></art>");
        let collected = senses(
            "<drv><kap><tld/>isto</kap><snc><dif>Tiu, kiu <tld/>as profesie</dif></snc></drv>",
            &roots,
        );
        assert_eq!(collected[0].text, "Tiu, kiu kuracas profesie.");
    }

    #[test]
    fn test_whitespace_collapse_and_colon_fixup() {
        let roots = roots_of("<art><kap><rad>x</rad></kap></art>");
        let collected = senses(
            "<drv><kap><tld/></kap><snc><dif>\n  multaj   spacoj\n  kaj fino:\n</dif></snc></drv>",
            &roots,
        );
        assert_eq!(collected[0].text, "multaj spacoj kaj fino.");
    }

    #[test]
    fn test_existing_terminal_punctuation_is_kept() {
        let roots = roots_of("<art><kap><rad>x</rad></kap></art>");
        let collected = senses(
            "<drv><kap><tld/></kap><snc><dif>ĉu vere?</dif></snc></drv>",
            &roots,
        );
        assert_eq!(collected[0].text, "ĉu vere?");
    }

    #[test]
    fn test_definitional_refgrp_concatenates_references() {
        let roots = roots_of("<art><kap><rad>x</rad></kap></art>");
        let collected = senses(
            "<drv><kap><tld/></kap>\
             <snc><refgrp tip=\"dif\">\
               <ref cel=\"akvo.0o\">akvo </ref>\
               <ref cel=\"maro.0o\">maro</ref>\
             </refgrp></snc></drv>",
            &roots,
        );
        assert_eq!(collected[0].text, "akvo maro.");
    }

    #[test]
    fn test_non_definitional_reference_is_not_a_definition() {
        let roots = roots_of("<art><kap><rad>x</rad></kap></art>");
        let collected = senses(
            "<drv><kap><tld/></kap>\
             <snc><ref tip=\"vid\" cel=\"akvo.0o\">akvo</ref></snc></drv>",
            &roots,
        );
        assert_eq!(collected[0].text, "");
    }

    #[test]
    fn test_definitional_ref_with_placeholder() {
        let roots = roots_of("<art><kap><rad>san</rad></kap></art>");
        let collected = senses(
            "<drv><kap>mal<tld/>a</kap>\
             <snc><ref tip=\"dif\" cel=\"san.0a\">ne <tld/>a</ref></snc></drv>",
            &roots,
        );
        assert_eq!(collected[0].text, "ne sana.");
    }

    #[test]
    fn test_embedded_reference_in_dif_renders_without_tip() {
        let roots = roots_of("<art><kap><rad>x</rad></kap></art>");
        let collected = senses(
            "<drv><kap><tld/></kap>\
             <snc><dif>vidu <ref cel=\"akvo.0o\">akvo</ref> tie</dif></snc></drv>",
            &roots,
        );
        assert_eq!(collected[0].text, "vidu akvo tie.");
    }

    #[test]
    fn test_headless_subdrv_continues_numbering() {
        let roots = roots_of("<art><kap><rad>x</rad></kap></art>");
        let collected = senses(
            "<drv><kap><tld/></kap>\
             <snc><dif>a</dif></snc>\
             <subdrv><snc><dif>b</dif></snc></subdrv></drv>",
            &roots,
        );
        assert_eq!(numbers(&collected), vec!["1", "2"]);
    }

    #[test]
    fn test_sense_without_content_is_kept_empty() {
        let roots = roots_of("<art><kap><rad>x</rad></kap></art>");
        let collected = senses(
            "<drv><kap><tld/></kap><snc mrk=\"x.0.a\"></snc></drv>",
            &roots,
        );
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].number, "1");
        assert_eq!(collected[0].text, "");
    }

    proptest! {
        /// Numbering is gap-free at both levels for any shape of nesting.
        #[test]
        fn prop_numbering_is_gap_free(shape in prop::collection::vec(0usize..4, 1..6)) {
            let mut source = String::from("<drv><kap><tld/></kap>");
            for nested in &shape {
                source.push_str("<snc><dif>t</dif>");
                for _ in 0..*nested {
                    source.push_str("<subsnc><dif>n</dif></subsnc>");
                }
                source.push_str("</snc>");
            }
            source.push_str("</drv>");

            let roots = roots_of("<art><kap><rad>x</rad></kap></art>");
            let collected = senses(&source, &roots);

            let mut expected = Vec::new();
            for (outer, nested) in shape.iter().enumerate() {
                expected.push((outer + 1).to_string());
                for inner in 0..*nested {
                    expected.push(format!("{}.{}", outer + 1, inner + 1));
                }
            }
            prop_assert_eq!(numbers(&collected), expected);
        }
    }
}
