//! Ordered JSON rendering of element trees.
//!
//! The rendering is deterministic and key order is meaningful, so the
//! `preserve_order` feature of `serde_json` is required. Shape per kind:
//!
//! - text span: `{"text": "..."}`
//! - empty element: `{tag: {attr: "...", ...}}`
//! - text-only element: `{tag: {"text": "...", attr: "...", ...}}`
//! - content element: `{tag: {"content": [...], "kap": {...}?, attr: ...}}`
//!
//! Every declared attribute of the kind is emitted, defaulting when absent
//! in the markup. A head renders under the `"kap"` key as a full element
//! encoding, so head-bearing elements show the doubled `"kap": {"kap": ...}`
//! nesting that sibling tools key off.

use serde_json::{Map, Value};

use crate::element::{Element, Node};
use crate::kind::ContentModel;

/// Renders one element tree to an ordered JSON value.
pub fn encode(element: &Element) -> Value {
    let mut body = Map::new();

    match element.content_model() {
        ContentModel::Empty => {}
        ContentModel::Text => {
            body.insert("text".to_string(), Value::String(element.text().to_string()));
        }
        ContentModel::Mixed | ContentModel::Elements => {
            let content: Vec<Value> = element.content().iter().map(encode_node).collect();
            body.insert("content".to_string(), Value::Array(content));
            if let Some(head) = element.head() {
                body.insert("kap".to_string(), encode(head));
            }
        }
    }

    for &(name, _) in element.kind().declared_attrs() {
        body.insert(name.to_string(), Value::String(element.attr(name).to_string()));
    }

    let mut wrapper = Map::new();
    wrapper.insert(element.kind().tag().to_string(), Value::Object(body));
    Value::Object(wrapper)
}

/// Renders one content entry: a text span or a child element.
pub fn encode_node(node: &Node) -> Value {
    match node {
        Node::Text(text) => {
            let mut wrapper = Map::new();
            wrapper.insert("text".to_string(), Value::String(text.clone()));
            Value::Object(wrapper)
        }
        Node::Element(element) => encode(element),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::kind::ElementKind;

    #[test]
    fn test_encode_empty_element_emits_defaults() {
        let tld = Element::new(ElementKind::Tld, 0);
        assert_eq!(encode(&tld), json!({"tld": {"lit": "", "var": ""}}));
    }

    #[test]
    fn test_encode_text_element() {
        let mut rad = Element::new(ElementKind::Rad, 0);
        rad.push_text("kurac");
        assert_eq!(encode(&rad), json!({"rad": {"text": "kurac", "var": ""}}));
    }

    #[test]
    fn test_encode_mixed_content_in_order() {
        let mut dif = Element::new(ElementKind::Dif, 0);
        dif.push_text_node("vidu ".to_string());
        let mut tld = Element::new(ElementKind::Tld, 5);
        tld.set_attr("lit", "K".to_string());
        dif.push_child(tld);

        assert_eq!(
            encode(&dif),
            json!({"dif": {
                "content": [
                    {"text": "vidu "},
                    {"tld": {"lit": "K", "var": ""}},
                ],
                "lng": "",
            }})
        );
    }

    #[test]
    fn test_encode_head_doubles_kap_key() {
        let mut kap = Element::new(ElementKind::Kap, 3);
        kap.push_text_node("vorto".to_string());
        let mut drv = Element::new(ElementKind::Drv, 0);
        drv.set_attr("mrk", "v.0".to_string());
        drv.set_head(kap);

        assert_eq!(
            encode(&drv),
            json!({"drv": {
                "content": [],
                "kap": {"kap": {"content": [{"text": "vorto"}]}},
                "mrk": "v.0",
            }})
        );
    }

    #[test]
    fn test_encode_is_deterministic() {
        let mut snc = Element::new(ElementKind::Snc, 0);
        snc.set_attr("mrk", "x.1".to_string());
        let first = serde_json::to_string(&encode(&snc)).unwrap();
        let second = serde_json::to_string(&encode(&snc)).unwrap();
        assert_eq!(first, second);
    }
}
