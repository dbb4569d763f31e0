//! The closed set of voko grammar element kinds.
//!
//! The voko DTD describes a finite vocabulary of elements. Each kind carries
//! a content model (what may appear inside it), a list of declared
//! attributes with their defaults, and a flag for whether it may own a
//! headword (`kap`) sub-element. Keeping this as one exhaustive enum means
//! the compiler checks every grammar-handling `match` when kinds are added.

use std::fmt;

/// How an element's inside is structured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentModel {
    /// No content at all (`<tld/>`, `<sncref/>`, `<tezrad/>`).
    Empty,
    /// Character data only.
    Text,
    /// Character data interleaved with child elements, in document order.
    Mixed,
    /// Child elements only; loose non-whitespace text is an error.
    Elements,
}

/// One element kind of the voko grammar.
///
/// Variant names follow the DTD tag names (`refgrp` → [`ElementKind::RefGrp`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Editorial/administrative note.
    Adm,
    /// Article: one dictionary entry built around a root morpheme.
    Art,
    /// Author of a cited phrase or work.
    Aut,
    /// Base form of a translation, used for index grouping.
    Baz,
    /// Short bibliographic reference.
    Bib,
    /// Illustration.
    Bld,
    /// Quoted (self-referential) text.
    Ctl,
    /// Definition of a sense.
    Dif,
    /// Derivation: a word derived from the article's root.
    Drv,
    /// Usage example.
    Ekz,
    /// Emphasis.
    Em,
    /// Exceptionally formed word, skipped by word analysis.
    Esc,
    /// Citation source.
    Fnt,
    /// Mathematical or chemical formula.
    Frm,
    /// Bold part of a formula.
    G,
    /// Grammatical information.
    Gra,
    /// Index entry part of a translation or example.
    Ind,
    /// Italic part of a formula.
    K,
    /// Headword of an article or derivation.
    Kap,
    /// Common-language paraphrase of a technical headword.
    Ke,
    /// Clarifying remark.
    Klr,
    /// Location of a citation within a work.
    Lok,
    /// Reference to a word list.
    LstRef,
    /// Ungrammatical text.
    Mis,
    /// Acronym of the headword.
    Mlg,
    /// Abbreviated phrase fragment.
    Mll,
    /// Marker inside an illustration.
    Mrk,
    /// National-language word, skipped by word analysis.
    Nac,
    /// Non-Esperantized name.
    Nom,
    /// Officiality grade of a headword.
    Ofc,
    /// Pronunciation or transcription.
    Pr,
    /// Root morpheme of a headword.
    Rad,
    /// Cross-reference to another word.
    Ref,
    /// Group of same-typed cross-references.
    RefGrp,
    /// Remark about a word or sense.
    Rim,
    /// Sense: one numbered meaning of a derivation.
    Snc,
    /// Reference to another sense, rendered as its number.
    SncRef,
    /// Subscript.
    Sub,
    /// Subarticle grouping widely diverging meanings.
    SubArt,
    /// Subderivation grouping related senses of a long entry.
    SubDrv,
    /// Subsense nested inside a sense.
    SubSnc,
    /// Superscript.
    Sup,
    /// Thesaurus root marker.
    TezRad,
    /// Tilde: placeholder for the article's root text.
    Tld,
    /// Translation.
    Trd,
    /// Group of translations into one language.
    TrdGrp,
    /// Struck-through text.
    Ts,
    /// A URL.
    Url,
    /// Usage field (style, topic, region).
    Uzo,
    /// Variant spelling/form of a headword.
    Var,
    /// Document root element.
    Vortaro,
    /// Work containing a citation.
    Vrk,
    /// Word class (part of speech).
    VSpec,
}

/// Tag-name lookup table, kept sorted by tag for readability.
const TAG_TABLE: &[(&str, ElementKind)] = &[
    ("adm", ElementKind::Adm),
    ("art", ElementKind::Art),
    ("aut", ElementKind::Aut),
    ("baz", ElementKind::Baz),
    ("bib", ElementKind::Bib),
    ("bld", ElementKind::Bld),
    ("ctl", ElementKind::Ctl),
    ("dif", ElementKind::Dif),
    ("drv", ElementKind::Drv),
    ("ekz", ElementKind::Ekz),
    ("em", ElementKind::Em),
    ("esc", ElementKind::Esc),
    ("fnt", ElementKind::Fnt),
    ("frm", ElementKind::Frm),
    ("g", ElementKind::G),
    ("gra", ElementKind::Gra),
    ("ind", ElementKind::Ind),
    ("k", ElementKind::K),
    ("kap", ElementKind::Kap),
    ("ke", ElementKind::Ke),
    ("klr", ElementKind::Klr),
    ("lok", ElementKind::Lok),
    ("lstref", ElementKind::LstRef),
    ("mis", ElementKind::Mis),
    ("mlg", ElementKind::Mlg),
    ("mll", ElementKind::Mll),
    ("mrk", ElementKind::Mrk),
    ("nac", ElementKind::Nac),
    ("nom", ElementKind::Nom),
    ("ofc", ElementKind::Ofc),
    ("pr", ElementKind::Pr),
    ("rad", ElementKind::Rad),
    ("ref", ElementKind::Ref),
    ("refgrp", ElementKind::RefGrp),
    ("rim", ElementKind::Rim),
    ("snc", ElementKind::Snc),
    ("sncref", ElementKind::SncRef),
    ("sub", ElementKind::Sub),
    ("subart", ElementKind::SubArt),
    ("subdrv", ElementKind::SubDrv),
    ("subsnc", ElementKind::SubSnc),
    ("sup", ElementKind::Sup),
    ("tezrad", ElementKind::TezRad),
    ("tld", ElementKind::Tld),
    ("trd", ElementKind::Trd),
    ("trdgrp", ElementKind::TrdGrp),
    ("ts", ElementKind::Ts),
    ("url", ElementKind::Url),
    ("uzo", ElementKind::Uzo),
    ("var", ElementKind::Var),
    ("vortaro", ElementKind::Vortaro),
    ("vrk", ElementKind::Vrk),
    ("vspec", ElementKind::VSpec),
];

impl ElementKind {
    /// Looks up the kind for a tag name, or `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<ElementKind> {
        TAG_TABLE
            .binary_search_by_key(&tag, |&(t, _)| t)
            .ok()
            .map(|idx| TAG_TABLE[idx].1)
    }

    /// The DTD tag name of this kind.
    pub fn tag(self) -> &'static str {
        use ElementKind::*;
        match self {
            Adm => "adm",
            Art => "art",
            Aut => "aut",
            Baz => "baz",
            Bib => "bib",
            Bld => "bld",
            Ctl => "ctl",
            Dif => "dif",
            Drv => "drv",
            Ekz => "ekz",
            Em => "em",
            Esc => "esc",
            Fnt => "fnt",
            Frm => "frm",
            G => "g",
            Gra => "gra",
            Ind => "ind",
            K => "k",
            Kap => "kap",
            Ke => "ke",
            Klr => "klr",
            Lok => "lok",
            LstRef => "lstref",
            Mis => "mis",
            Mlg => "mlg",
            Mll => "mll",
            Mrk => "mrk",
            Nac => "nac",
            Nom => "nom",
            Ofc => "ofc",
            Pr => "pr",
            Rad => "rad",
            Ref => "ref",
            RefGrp => "refgrp",
            Rim => "rim",
            Snc => "snc",
            SncRef => "sncref",
            Sub => "sub",
            SubArt => "subart",
            SubDrv => "subdrv",
            SubSnc => "subsnc",
            Sup => "sup",
            TezRad => "tezrad",
            Tld => "tld",
            Trd => "trd",
            TrdGrp => "trdgrp",
            Ts => "ts",
            Url => "url",
            Uzo => "uzo",
            Var => "var",
            Vortaro => "vortaro",
            Vrk => "vrk",
            VSpec => "vspec",
        }
    }

    /// The content model of this kind.
    pub fn content_model(self) -> ContentModel {
        use ElementKind::*;
        match self {
            Tld | TezRad | SncRef => ContentModel::Empty,
            Aut | Baz | Bib | Esc | G | K | Mlg | Nac | Nom | Ofc | Pr | Rad | Url | VSpec => {
                ContentModel::Text
            }
            Adm | Bld | Ctl | Dif | Ekz | Em | Fnt | Frm | Gra | Ind | Kap | Ke | Klr | Lok
            | LstRef | Mis | Mll | Mrk | Ref | RefGrp | Rim | Sub | Sup | Trd | TrdGrp | Ts
            | Uzo | Vrk => ContentModel::Mixed,
            Art | Drv | Snc | SubArt | SubDrv | SubSnc | Var | Vortaro => ContentModel::Elements,
        }
    }

    /// Whether this kind may own a `kap` headword sub-element.
    ///
    /// Such a `kap` is attached as the element's head rather than appended
    /// to ordinary content.
    pub fn is_head_bearing(self) -> bool {
        matches!(
            self,
            ElementKind::Art | ElementKind::Drv | ElementKind::SubDrv | ElementKind::Var
        )
    }

    /// The attributes the grammar declares for this kind, as
    /// `(name, default)` pairs in declaration order.
    ///
    /// Attributes outside this list are not retained by the tree builder,
    /// and the JSON rendering emits every listed attribute even when it was
    /// absent in the markup (using the default).
    pub fn declared_attrs(self) -> &'static [(&'static str, &'static str)] {
        use ElementKind::*;
        match self {
            Rad => &[("var", "")],
            Url => &[("ref", "")],
            Tld => &[("lit", ""), ("var", "")],
            TezRad => &[("fak", "")],
            SncRef => &[("ref", "")],
            Mlg => &[("kod", "")],
            Frm => &[("am", "")],
            Uzo | Klr | Mll => &[("tip", "")],
            TrdGrp => &[("lng", "")],
            Trd => &[("lng", ""), ("fnt", ""), ("kod", "")],
            Ref => &[("tip", ""), ("cel", ""), ("lst", ""), ("val", "")],
            RefGrp => &[("tip", "vid")],
            Ekz => &[("mrk", "")],
            Rim => &[("num", ""), ("mrk", "")],
            Mrk => &[("stl", ""), ("cel", "")],
            Bld => &[
                ("lok", ""),
                ("mrk", ""),
                ("tip", "img"),
                ("alt", ""),
                ("lrg", ""),
                ("prm", ""),
            ],
            SubSnc => &[("mrk", ""), ("ref", "")],
            Snc => &[("mrk", ""), ("num", ""), ("ref", "")],
            Dif => &[("lng", "")],
            Art | Drv | SubArt | SubDrv => &[("mrk", "")],
            _ => &[],
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
