//! Root texts of an article and placeholder resolution.
//!
//! An article's head carries one plain root morpheme and optionally variant
//! roots, either as flagged `rad` siblings or inside `var` sub-heads. A
//! placeholder elsewhere in the article names one of these texts, so the
//! whole table is collected once per article and resolution goes through a
//! single function where the plain root is index `0` by convention.

use indexmap::IndexMap;
use log::trace;

use voko_core::{Element, ElementKind};

use crate::error::ExtractError;

/// The root texts of one article: the plain root plus its variants.
#[derive(Debug, Default)]
pub struct RootSet {
    base: Option<String>,
    variants: IndexMap<String, String>,
}

impl RootSet {
    /// Collects root texts from an article's head.
    ///
    /// The first unflagged `rad` is the plain root. A `rad` carrying a
    /// `var` flag declares a variant under that name, as does a `rad`
    /// inside a `var` sub-head.
    pub fn from_article(art: &Element) -> Self {
        let mut roots = RootSet::default();
        let Some(kap) = art.head() else {
            return roots;
        };

        for child in kap.children() {
            match child.kind() {
                ElementKind::Rad => roots.add_rad(child),
                ElementKind::Var => {
                    if let Some(var_kap) = child.head() {
                        for rad in var_kap.children() {
                            if rad.kind() == ElementKind::Rad {
                                roots.add_rad(rad);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        trace!(variants = roots.variants.len(); "collected article roots");
        roots
    }

    fn add_rad(&mut self, rad: &Element) {
        let flag = rad.attr("var");
        let text = rad.text().trim();
        if text.is_empty() {
            return;
        }
        if flag.is_empty() {
            if self.base.is_none() {
                self.base = Some(text.to_string());
            }
        } else {
            self.variants.insert(flag.to_string(), text.to_string());
        }
    }

    /// The plain root text, if the article declares one.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// All root texts in declaration order, plain root first.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.base
            .as_deref()
            .into_iter()
            .chain(self.variants.values().map(String::as_str))
    }

    /// Resolves a placeholder flag to a root text.
    ///
    /// An empty flag (or `"0"`) is the plain root. Otherwise the flag is
    /// looked up as a declared variant name; a purely numeric flag that
    /// names no variant falls back to an index into [`RootSet::texts`].
    pub fn resolve(&self, flag: &str, position: u64) -> Result<&str, ExtractError> {
        let unresolved = || ExtractError::UnresolvedPlaceholder {
            flag: if flag.is_empty() { "0" } else { flag }.to_string(),
            position,
        };

        if flag.is_empty() || flag == "0" {
            return self.base().ok_or_else(unresolved);
        }
        if let Some(text) = self.variants.get(flag) {
            return Ok(text);
        }
        if let Ok(index) = flag.parse::<usize>() {
            return self.texts().nth(index).ok_or_else(unresolved);
        }
        Err(unresolved())
    }

    /// Substitutes a placeholder element with its root text.
    ///
    /// A `lit` override replaces the first letter of the resolved root,
    /// which is how the markup capitalizes a root at sentence start.
    pub fn substitute(&self, tld: &Element) -> Result<String, ExtractError> {
        let root = self.resolve(tld.attr("var"), tld.position())?;
        let lit = tld.attr("lit");
        if lit.is_empty() {
            return Ok(root.to_string());
        }
        let mut rest = root.chars();
        rest.next();
        Ok(format!("{lit}{}", rest.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voko_parser::{MemoryResolver, parse_str};

    fn article(source: &str) -> Element {
        parse_str(source, &MemoryResolver::new()).unwrap()
    }

    #[test]
    fn test_plain_root_only() {
        let art = article("<art><kap><rad>kurac</rad>/i</kap></art>");
        let roots = RootSet::from_article(&art);
        assert_eq!(roots.base(), Some("kurac"));
        assert_eq!(roots.texts().collect::<Vec<_>>(), vec!["kurac"]);
    }

    #[test]
    fn test_flagged_rad_variant() {
        let art = article("<art><kap><rad>kurac</rad>, <rad var=\"1\">kuraĉ</rad></kap></art>");
        let roots = RootSet::from_article(&art);
        assert_eq!(roots.resolve("", 0).unwrap(), "kurac");
        assert_eq!(roots.resolve("1", 0).unwrap(), "kuraĉ");
        assert_eq!(roots.texts().collect::<Vec<_>>(), vec!["kurac", "kuraĉ"]);
    }

    #[test]
    fn test_variant_inside_var_sub_head() {
        let art = article(
            "<art><kap><rad>super</rad> <var><kap><rad var=\"2\">supr</rad></kap></var></kap></art>",
        );
        let roots = RootSet::from_article(&art);
        assert_eq!(roots.resolve("2", 0).unwrap(), "supr");
    }

    #[test]
    fn test_numeric_fallback_indexes_the_table() {
        let art =
            article("<art><kap><rad>kurac</rad><rad var=\"mola\">kuraĉ</rad></kap></art>");
        let roots = RootSet::from_article(&art);
        assert_eq!(roots.resolve("mola", 0).unwrap(), "kuraĉ");
        // "1" names no variant, so it indexes texts(): 0 = plain, 1 = first variant.
        assert_eq!(roots.resolve("1", 0).unwrap(), "kuraĉ");
        assert_eq!(roots.resolve("0", 0).unwrap(), "kurac");
    }

    #[test]
    fn test_out_of_range_flag_is_unresolved() {
        let art = article("<art><kap><rad>kurac</rad></kap></art>");
        let roots = RootSet::from_article(&art);
        let err = roots.resolve("3", 42).unwrap_err();
        let ExtractError::UnresolvedPlaceholder { flag, position } = err;
        assert_eq!(flag, "3");
        assert_eq!(position, 42);
    }

    #[test]
    fn test_substitute_with_lit_override() {
        let art = article("<art><kap><rad>kurac</rad></kap></art>");
        let roots = RootSet::from_article(&art);

        let drv = article("<drv><kap><tld lit=\"K\"/>ejo</kap></drv>");
        let tld = drv.head().unwrap().find_child(ElementKind::Tld).unwrap();
        assert_eq!(roots.substitute(tld).unwrap(), "Kurac");
    }

    #[test]
    fn test_missing_base_root_is_unresolved() {
        let art = article("<art><kap>nur teksto</kap></art>");
        let roots = RootSet::from_article(&art);
        assert!(roots.base().is_none());
        assert!(roots.resolve("", 0).is_err());
    }
}
