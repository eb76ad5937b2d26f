//! Parsed property values.

use std::fmt::Write;
use std::hash::{Hash, Hasher};

use cssparser::{ParseError, Parser, Token};

use super::ToCss;
use super::properties::{Color, Length};

/// The value half of a declaration.
///
/// Values are kept close to their source form: the rule set stores them, it
/// does not compute them. Anything the typed variants cannot represent is
/// preserved verbatim as `Raw`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
#[cfg_attr(feature = "cli", serde(rename_all = "snake_case"))]
pub enum PropertyValue {
    Length(Length),
    /// Unitless number
    Number(f32),
    /// Identifier like "auto", "inherit", "bold"
    Keyword(String),
    Color(Color),
    /// Quoted string
    String(String),
    Url(String),
    /// Space-separated component values (e.g. `1px 2px`)
    List(Vec<PropertyValue>),
    /// Source text of a value with no typed representation
    Raw(String),
}

impl Eq for PropertyValue {}

impl Hash for PropertyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            PropertyValue::Length(length) => length.hash(state),
            PropertyValue::Number(v) => v.to_bits().hash(state),
            PropertyValue::Keyword(s)
            | PropertyValue::String(s)
            | PropertyValue::Url(s)
            | PropertyValue::Raw(s) => s.hash(state),
            PropertyValue::Color(color) => color.hash(state),
            PropertyValue::List(values) => values.hash(state),
        }
    }
}

impl PropertyValue {
    /// Parse a declaration value.
    ///
    /// Consumes the whole input. Returns `None` if the input is empty.
    pub fn parse(input: &mut Parser<'_, '_>) -> Option<Self> {
        let start = input.position();
        let mut components = Vec::new();

        while !input.is_exhausted() {
            match input.try_parse(parse_component) {
                Ok(component) => components.push(component),
                Err(_) => {
                    // Commas, operators and unknown functions: keep the text.
                    while input.next().is_ok() {}
                    let raw = input.slice_from(start).trim();
                    return (!raw.is_empty()).then(|| PropertyValue::Raw(raw.to_string()));
                }
            }
        }

        match components.len() {
            0 => None,
            1 => components.pop(),
            _ => Some(PropertyValue::List(components)),
        }
    }

    /// The value as a number, if it is a unitless number.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            PropertyValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as a length; a unitless zero counts as `0px`.
    pub fn as_length(&self) -> Option<Length> {
        match self {
            PropertyValue::Length(length) => Some(*length),
            PropertyValue::Number(v) if *v == 0.0 => Some(Length::Px(0.0)),
            PropertyValue::Keyword(k) if k.eq_ignore_ascii_case("auto") => Some(Length::Auto),
            _ => None,
        }
    }

    /// The value as a keyword.
    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            PropertyValue::Keyword(k) => Some(k),
            _ => None,
        }
    }
}

/// Parse one component value, rewinding (via `try_parse`) on failure.
fn parse_component<'i>(input: &mut Parser<'i, '_>) -> Result<PropertyValue, ParseError<'i, ()>> {
    if let Ok(color) = input.try_parse(parse_rgb_function) {
        return Ok(PropertyValue::Color(color));
    }

    let location = input.current_source_location();
    let value = match input.next()? {
        Token::Dimension { value, unit, .. } => Length::from_dimension(*value, unit)
            .map(PropertyValue::Length)
            .ok_or_else(|| location.new_custom_error(()))?,
        Token::Percentage { unit_value, .. } => {
            PropertyValue::Length(Length::Percent(*unit_value * 100.0))
        }
        Token::Number { value, .. } => PropertyValue::Number(*value),
        Token::Ident(ident) => PropertyValue::Keyword(ident.to_string()),
        Token::QuotedString(s) => PropertyValue::String(s.to_string()),
        Token::UnquotedUrl(url) => PropertyValue::Url(url.to_string()),
        Token::IDHash(hash) | Token::Hash(hash) => Color::from_hex(hash)
            .map(PropertyValue::Color)
            .ok_or_else(|| location.new_custom_error(()))?,
        _ => return Err(location.new_custom_error(())),
    };
    Ok(value)
}

fn parse_rgb_function<'i>(input: &mut Parser<'i, '_>) -> Result<Color, ParseError<'i, ()>> {
    let name = input.expect_function()?.clone();
    let has_alpha = if name.eq_ignore_ascii_case("rgb") {
        false
    } else if name.eq_ignore_ascii_case("rgba") {
        true
    } else {
        return Err(input.new_custom_error(()));
    };

    input.parse_nested_block(|input| {
        let r = parse_color_component(input)?;
        input.expect_comma()?;
        let g = parse_color_component(input)?;
        input.expect_comma()?;
        let b = parse_color_component(input)?;
        let a = if has_alpha {
            input.expect_comma()?;
            let alpha = input.expect_number()?;
            (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
        } else {
            255
        };
        Ok(Color::rgba(r, g, b, a))
    })
}

fn parse_color_component<'i>(input: &mut Parser<'i, '_>) -> Result<u8, ParseError<'i, ()>> {
    let location = input.current_source_location();
    match input.next()? {
        Token::Number {
            int_value: Some(v), ..
        } => Ok((*v).clamp(0, 255) as u8),
        Token::Percentage { unit_value, .. } => {
            Ok((unit_value * 255.0).round().clamp(0.0, 255.0) as u8)
        }
        _ => Err(location.new_custom_error(())),
    }
}

impl ToCss for PropertyValue {
    fn to_css(&self, buf: &mut String) {
        match self {
            PropertyValue::Length(length) => length.to_css(buf),
            PropertyValue::Number(v) => write!(buf, "{}", v).unwrap(),
            PropertyValue::Keyword(k) => buf.push_str(k),
            PropertyValue::Color(color) => color.to_css(buf),
            PropertyValue::String(s) => {
                buf.push('"');
                for c in s.chars() {
                    if c == '"' || c == '\\' {
                        buf.push('\\');
                    }
                    buf.push(c);
                }
                buf.push('"');
            }
            PropertyValue::Url(url) => write!(buf, "url({})", url).unwrap(),
            PropertyValue::List(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        buf.push(' ');
                    }
                    value.to_css(buf);
                }
            }
            PropertyValue::Raw(raw) => buf.push_str(raw),
        }
    }
}
