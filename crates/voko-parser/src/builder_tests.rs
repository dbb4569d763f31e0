//! Unit tests for the streaming tree builder.
//!
//! These exercise the full event loop against inline markup: head routing,
//! mixed content, entity expansion from grammar files, and the structural
//! error cases.

use proptest::prelude::*;

use voko_core::{Element, ElementKind, Node};

use crate::builder::parse_str;
use crate::error::ParseError;
use crate::resolver::MemoryResolver;

const DTD: &str = r#"
<!ELEMENT rad (#PCDATA)>
<!ENTITY cx "&#265;">
<!ENTITY gx "&#285;">
<!ENTITY km "proksimume">
"#;

fn grammar() -> MemoryResolver {
    let mut resolver = MemoryResolver::new();
    resolver.insert("vokoxml.dtd", DTD.as_bytes());
    resolver
}

fn parse(source: &str) -> Result<Element, ParseError> {
    parse_str(source, &grammar())
}

fn parse_ok(source: &str) -> Element {
    match parse(source) {
        Ok(root) => root,
        Err(err) => panic!("expected parsing to succeed, got: {err}"),
    }
}

#[test]
fn test_article_structure() {
    let root = parse_ok(
        r#"<?xml version="1.0"?>
<!DOCTYPE vortaro SYSTEM "../dtd/vokoxml.dtd">
<vortaro>
<art mrk="$Id$">
<kap><rad>kurac</rad>/i</kap>
<drv mrk="kurac.0i">
<kap><tld/>i</kap>
<snc mrk="kurac.0i.sano">
<dif>Zorgi pri ies sano.</dif>
</snc>
</drv>
</art>
</vortaro>"#,
    );

    assert_eq!(root.kind(), ElementKind::Vortaro);
    let art = root.find_child(ElementKind::Art).unwrap();
    assert_eq!(art.attr("mrk"), "$Id$");

    let kap = art.head().unwrap();
    let rad = kap.find_child(ElementKind::Rad).unwrap();
    assert_eq!(rad.text(), "kurac");

    let drv = art.find_child(ElementKind::Drv).unwrap();
    let snc = drv.find_child(ElementKind::Snc).unwrap();
    assert_eq!(snc.attr("mrk"), "kurac.0i.sano");
    let dif = snc.find_child(ElementKind::Dif).unwrap();
    assert_eq!(dif.content()[0].as_text(), Some("Zorgi pri ies sano."));
}

#[test]
fn test_kap_becomes_head_not_content() {
    let drv = parse_ok("<drv><kap><tld/>o</kap><snc><dif>io</dif></snc></drv>");
    assert!(drv.head().is_some());
    assert!(drv.find_child(ElementKind::Kap).is_none());
    assert_eq!(drv.children().count(), 1);
}

#[test]
fn test_second_kap_stays_in_content() {
    // Only the first kap of a head-bearing element is its head.
    let drv = parse_ok("<drv><kap><tld/>o</kap><kap><tld var=\"1\"/>o</kap></drv>");
    assert!(drv.head().is_some());
    assert_eq!(drv.children().count(), 1);
    assert!(drv.find_child(ElementKind::Kap).is_some());
}

#[test]
fn test_mixed_content_keeps_order() {
    let kap = parse_ok("<kap>antaŭ <tld/> post</kap>");
    let spans: Vec<&str> = kap
        .content()
        .iter()
        .map(|node| match node {
            Node::Text(text) => text.as_str(),
            Node::Element(el) => el.kind().tag(),
        })
        .collect();
    assert_eq!(spans, vec!["antaŭ ", "tld", " post"]);
}

#[test]
fn test_entity_in_text_content() {
    let root = parse_ok(
        "<!DOCTYPE vortaro SYSTEM \"vokoxml.dtd\">\n<kap><rad>kura&cx;</rad>i</kap>",
    );
    let rad = root.find_child(ElementKind::Rad).unwrap();
    assert_eq!(rad.text(), "kuraĉ");
}

#[test]
fn test_entity_in_mixed_content_coalesces() {
    let dif = parse_ok("<!DOCTYPE vortaro SYSTEM \"vokoxml.dtd\">\n<dif>man&gx;i kaj trinki</dif>");
    assert_eq!(dif.content().len(), 1);
    assert_eq!(dif.content()[0].as_text(), Some("manĝi kaj trinki"));
}

#[test]
fn test_entity_in_attribute_value() {
    let snc = parse_ok("<!DOCTYPE vortaro SYSTEM \"vokoxml.dtd\">\n<snc mrk=\"kura&cx;.0i\"/>");
    assert_eq!(snc.attr("mrk"), "kuraĉ.0i");
}

#[test]
fn test_character_reference_without_doctype() {
    let rad = parse_ok("<rad>kura&#265;</rad>");
    assert_eq!(rad.text(), "kuraĉ");
}

#[test]
fn test_predefined_entities() {
    let dif = parse_ok("<dif>unu &amp; du &lt;tri&gt;</dif>");
    assert_eq!(dif.content()[0].as_text(), Some("unu & du <tri>"));
}

#[test]
fn test_internal_subset_entities() {
    let dif = parse_ok("<!DOCTYPE vortaro [ <!ENTITY nep \"nepre\"> ]>\n<dif>&nep; tiel</dif>");
    assert_eq!(dif.content()[0].as_text(), Some("nepre tiel"));
}

#[test]
fn test_undeclared_entity_is_an_error() {
    let err = parse("<dif>&mankas;</dif>").unwrap_err();
    assert!(
        matches!(
            err,
            ParseError::MalformedStructure { .. } | ParseError::Xml { .. }
        ),
        "{err}"
    );
}

#[test]
fn test_missing_grammar_resource() {
    let err = parse("<!DOCTYPE vortaro SYSTEM \"nenia.dtd\">\n<vortaro/>").unwrap_err();
    assert!(matches!(err, ParseError::Resource(_)), "{err}");
}

#[test]
fn test_unknown_element() {
    let err = parse("<vortaro><artiklo/></vortaro>").unwrap_err();
    match err {
        ParseError::UnknownElementKind { tag, .. } => assert_eq!(tag, "artiklo"),
        other => panic!("expected UnknownElementKind, got: {other}"),
    }
}

#[test]
fn test_text_in_element_only_content() {
    let err = parse("<snc>nuda teksto</snc>").unwrap_err();
    match err {
        ParseError::UnexpectedText { parent, text, .. } => {
            assert_eq!(parent, ElementKind::Snc);
            assert_eq!(text, "nuda teksto");
        }
        other => panic!("expected UnexpectedText, got: {other}"),
    }
}

#[test]
fn test_whitespace_between_elements_is_ignored() {
    let snc = parse_ok("<snc>\n    <dif>io</dif>\n</snc>");
    assert_eq!(snc.content().len(), 1);
}

#[test]
fn test_element_inside_text_only_content() {
    let err = parse("<rad>kurac<tld/></rad>").unwrap_err();
    assert!(matches!(err, ParseError::MalformedStructure { .. }), "{err}");
}

#[test]
fn test_mismatched_close_tag() {
    let err = parse("<art><kap></art>").unwrap_err();
    match err {
        ParseError::MalformedStructure { message, .. } => {
            assert!(message.contains("art"), "{message}");
            assert!(message.contains("kap"), "{message}");
        }
        other => panic!("expected MalformedStructure, got: {other}"),
    }
}

#[test]
fn test_close_tag_without_open() {
    let err = parse("<art></art></kap>").unwrap_err();
    assert!(matches!(err, ParseError::MalformedStructure { .. }), "{err}");
}

#[test]
fn test_unclosed_element() {
    let err = parse("<vortaro><art>").unwrap_err();
    assert!(matches!(err, ParseError::MalformedStructure { .. }), "{err}");
}

#[test]
fn test_undeclared_attribute_is_dropped() {
    let rad = parse_ok("<rad mrk=\"x\">kurac</rad>");
    assert!(!rad.has_attr("mrk"));
    assert_eq!(rad.attr("var"), "");
}

#[test]
fn test_declared_default_applies() {
    let refgrp = parse_ok("<refgrp><ref cel=\"akvo.0o\">akvo</ref></refgrp>");
    assert_eq!(refgrp.attr("tip"), "vid");
}

#[test]
fn test_positions_increase_through_the_document() {
    let root = parse_ok("<vortaro><art><kap>a</kap></art></vortaro>");
    let art = root.find_child(ElementKind::Art).unwrap();
    assert!(art.position() > root.position());
    assert!(art.head().unwrap().position() > art.position());
}

proptest! {
    /// Mixed content passes through the builder byte for byte.
    #[test]
    fn prop_mixed_text_round_trips(text in "[a-zĉĝĥĵŝŭ ,.]{1,60}") {
        let source = format!("<dif>{text}</dif>");
        let dif = parse_str(&source, &MemoryResolver::new()).unwrap();
        let flat: String = dif.content().iter().filter_map(Node::as_text).collect();
        prop_assert_eq!(flat, text);
    }
}
