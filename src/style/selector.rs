//! Selector parsing through the `selectors` crate.
//!
//! Only parsing, serialization and specificity are needed here: rules are
//! keyed by their canonical selector text and bucketed by the rightmost
//! compound selector. Nothing in this crate matches selectors against
//! elements.

use std::fmt;

use cssparser::{CowRcStr, ParseError, Parser, ParserInput, SourceLocation, ToCss as _};
use selectors::parser::{Component, ParseRelative, SelectorList, SelectorParseErrorKind};

use super::properties::enum_property;

/// A parsed complex selector.
pub type Selector = selectors::parser::Selector<StyleSelectors>;

/// Our selector implementation for the selectors crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSelectors;

/// Identifier string type, used for every atom the parser produces.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct IdentStr(pub String);

impl precomputed_hash::PrecomputedHash for IdentStr {
    fn precomputed_hash(&self) -> u32 {
        let mut h: u32 = 0;
        for byte in self.0.bytes() {
            h = h.wrapping_mul(31).wrapping_add(byte as u32);
        }
        h
    }
}

impl AsRef<str> for IdentStr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for IdentStr {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl<'a> From<&'a str> for IdentStr {
    fn from(s: &'a str) -> Self {
        Self(s.to_string())
    }
}

impl cssparser::ToCss for IdentStr {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        cssparser::serialize_identifier(&self.0, dest)
    }
}

/// Pseudo-element type (none are supported).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PseudoElement {}

impl cssparser::ToCss for PseudoElement {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl selectors::parser::PseudoElement for PseudoElement {
    type Impl = StyleSelectors;

    fn accepts_state_pseudo_classes(&self) -> bool {
        false
    }

    fn valid_after_slotted(&self) -> bool {
        false
    }
}

enum_property! {
    /// Dynamic pseudo-classes understood in rule selectors.
    pub enum NonTSPseudoClass {
        #[default]
        Hover => "hover",
        Active => "active",
        Focus => "focus",
        Checked => "checked",
        Disabled => "disabled",
    }
}

impl selectors::parser::NonTSPseudoClass for NonTSPseudoClass {
    type Impl = StyleSelectors;

    fn is_active_or_hover(&self) -> bool {
        matches!(self, Self::Hover | Self::Active)
    }

    fn is_user_action_state(&self) -> bool {
        matches!(self, Self::Hover | Self::Active | Self::Focus)
    }
}

impl cssparser::ToCss for NonTSPseudoClass {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_char(':')?;
        dest.write_str(self.as_str())
    }
}

impl<'i> selectors::parser::Parser<'i> for StyleSelectors {
    type Impl = StyleSelectors;
    type Error = SelectorParseErrorKind<'i>;

    fn parse_non_ts_pseudo_class(
        &self,
        location: SourceLocation,
        name: CowRcStr<'i>,
    ) -> Result<NonTSPseudoClass, ParseError<'i, Self::Error>> {
        NonTSPseudoClass::from_css(&name).ok_or_else(|| {
            location.new_custom_error(SelectorParseErrorKind::UnsupportedPseudoClassOrElement(
                name.clone(),
            ))
        })
    }
}

impl selectors::SelectorImpl for StyleSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = IdentStr;
    type Identifier = IdentStr;
    type LocalName = IdentStr;
    type NamespaceUrl = IdentStr;
    type NamespacePrefix = IdentStr;
    type BorrowedLocalName = IdentStr;
    type BorrowedNamespaceUrl = IdentStr;
    type NonTSPseudoClass = NonTSPseudoClass;
    type PseudoElement = PseudoElement;
}

/// Parse a comma-separated list of selectors.
pub fn parse_selector_list<'i>(
    parser: &mut Parser<'i, '_>,
) -> Result<Vec<Selector>, ParseError<'i, ()>> {
    let location = parser.current_source_location();
    let selectors = SelectorList::parse(&StyleSelectors, parser, ParseRelative::No)
        .map_err(|_| location.new_custom_error(()))?;

    Ok(selectors.slice().to_vec())
}

/// Parse a single selector from text, e.g. for rule lookups.
pub(crate) fn parse_selector(text: &str) -> Option<Selector> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let mut selectors = parse_selector_list(&mut parser).ok()?;
    if selectors.len() == 1 {
        selectors.pop()
    } else {
        None
    }
}

/// Canonical text of a selector; rules with equal text are the same rule.
pub(crate) fn selector_text(selector: &Selector) -> String {
    selector.to_css_string()
}

/// CSS specificity for cascade ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Specificity {
    pub ids: u16,
    pub classes: u16,
    pub elements: u16,
}

impl Specificity {
    pub fn from_selector(selector: &Selector) -> Self {
        let spec = selector.specificity();
        // selectors crate packs specificity as (id << 20) | (class << 10) | elements
        Self {
            ids: ((spec >> 20) & 0x3FF) as u16,
            classes: ((spec >> 10) & 0x3FF) as u16,
            elements: (spec & 0x3FF) as u16,
        }
    }
}

impl Ord for Specificity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ids
            .cmp(&other.ids)
            .then(self.classes.cmp(&other.classes))
            .then(self.elements.cmp(&other.elements))
    }
}

impl PartialOrd for Specificity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Bucket key of a rule: the most selective simple selector of the
/// rightmost compound (`#id`, then `.class`, then the tag name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleKey {
    Id(String),
    Class(String),
    Tag(String),
    Universal,
}

impl RuleKey {
    pub fn from_selector(selector: &Selector) -> Self {
        let mut class = None;
        let mut tag = None;

        for component in selector.iter() {
            match component {
                Component::ID(id) => return RuleKey::Id(id.0.clone()),
                Component::Class(name) if class.is_none() => class = Some(name.0.clone()),
                Component::LocalName(local) => tag = Some(local.lower_name.0.clone()),
                _ => {}
            }
        }

        class
            .map(RuleKey::Class)
            .or_else(|| tag.map(RuleKey::Tag))
            .unwrap_or(RuleKey::Universal)
    }
}
