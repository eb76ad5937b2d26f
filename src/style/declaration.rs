//! Declarations and property dictionaries.
//!
//! A [`PropertyDictionary`] holds the declarations of one style rule. Merging
//! dictionaries follows the cascade for a single origin: a later declaration
//! replaces an earlier one for the same property, except that a normal
//! declaration never replaces an `!important` one.

use std::collections::BTreeMap;

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, Delimiter, ParseError, Parser, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
};
use log::warn;

use super::ToCss;
use super::value::PropertyValue;

/// A single declared property value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Property {
    pub value: PropertyValue,
    /// Declared with `!important`.
    pub important: bool,
}

impl Property {
    pub fn new(value: PropertyValue) -> Self {
        Self {
            value,
            important: false,
        }
    }

    pub fn important(value: PropertyValue) -> Self {
        Self {
            value,
            important: true,
        }
    }
}

/// Property name to value map for one style rule.
///
/// Names are stored lowercased. Iteration is in name order, which keeps
/// serialization and hashing deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
#[cfg_attr(feature = "cli", serde(transparent))]
pub struct PropertyDictionary {
    properties: BTreeMap<String, Property>,
}

impl PropertyDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, applying cascade precedence against any existing value.
    pub fn set(&mut self, name: &str, property: Property) {
        let name = name.to_ascii_lowercase();
        match self.properties.get_mut(&name) {
            Some(existing) if existing.important && !property.important => {}
            Some(existing) => *existing = property,
            None => {
                self.properties.insert(name, property);
            }
        }
    }

    /// Look up a property by name.
    pub fn get(&self, name: &str) -> Option<&Property> {
        if let Some(property) = self.properties.get(name) {
            return Some(property);
        }
        self.properties.get(&name.to_ascii_lowercase())
    }

    /// Layer all properties of `other` on top of this dictionary.
    pub fn import(&mut self, other: &PropertyDictionary) {
        for (name, property) in &other.properties {
            match self.properties.get_mut(name) {
                Some(existing) if existing.important && !property.important => {}
                Some(existing) => *existing = property.clone(),
                None => {
                    self.properties.insert(name.clone(), property.clone());
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate over (name, property) pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.properties.iter().map(|(name, p)| (name.as_str(), p))
    }
}

impl ToCss for PropertyDictionary {
    fn to_css(&self, buf: &mut String) {
        for (i, (name, property)) in self.properties.iter().enumerate() {
            if i > 0 {
                buf.push(' ');
            }
            buf.push_str(name);
            buf.push_str(": ");
            property.value.to_css(buf);
            if property.important {
                buf.push_str(" !important");
            }
            buf.push(';');
        }
    }
}

/// Parse the contents of a `{ ... }` declaration block.
///
/// Parsing is lenient: declarations with empty or malformed values are
/// skipped with a warning and the rest of the block is kept. `first_line`
/// is added to the line numbers in those warnings.
pub fn parse_declaration_block(input: &mut Parser<'_, '_>, first_line: u32) -> PropertyDictionary {
    let mut properties = PropertyDictionary::new();
    let mut decl_parser = DeclarationListParser {
        properties: &mut properties,
    };

    for result in RuleBodyParser::new(input, &mut decl_parser) {
        if let Err((error, slice)) = result {
            let location = error.location;
            warn!(
                "skipping invalid declaration `{}` at {}:{}",
                slice.trim(),
                location.line + first_line,
                location.column
            );
        }
    }

    properties
}

struct DeclarationListParser<'a> {
    properties: &'a mut PropertyDictionary,
}

impl<'i> AtRuleParser<'i> for DeclarationListParser<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        _name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> QualifiedRuleParser<'i> for DeclarationListParser<'_> {
    type Prelude = ();
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> DeclarationParser<'i> for DeclarationListParser<'_> {
    type Declaration = ();
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let value = input.parse_until_before(
            Delimiter::Bang,
            |input| -> Result<PropertyValue, ParseError<'i, ()>> {
                PropertyValue::parse(input).ok_or_else(|| input.new_custom_error(()))
            },
        )?;
        let important = input.try_parse(cssparser::parse_important).is_ok();
        input.expect_exhausted()?;

        let property = if important {
            Property::important(value)
        } else {
            Property::new(value)
        };
        self.properties.set(&name, property);
        Ok(())
    }
}

impl<'i> RuleBodyItemParser<'i, (), ()> for DeclarationListParser<'_> {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}
