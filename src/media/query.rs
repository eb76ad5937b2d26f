//! Media query conditions and their parsing.
//!
//! A media query here is a conjunction of features, e.g.
//! `screen and (min-width: 600px) and (orientation: landscape)`.

use std::collections::BTreeMap;
use std::fmt::Write;

use cssparser::{ParseError, Parser, Token};
use log::warn;

use crate::style::{Length, ToCss, enum_property};

enum_property! {
    /// Viewport orientation. Portrait includes square viewports.
    pub enum Orientation {
        #[default]
        Portrait => "portrait",
        Landscape => "landscape",
    }
}

impl Orientation {
    pub fn is_portrait(self) -> bool {
        self == Orientation::Portrait
    }
}

/// The kind of a media condition, without its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MediaQueryId {
    Width,
    MinWidth,
    MaxWidth,
    Height,
    MinHeight,
    MaxHeight,
    AspectRatio,
    MinAspectRatio,
    MaxAspectRatio,
    Resolution,
    MinResolution,
    MaxResolution,
    Orientation,
    Invalid,
}

impl MediaQueryId {
    /// Look up a feature by its CSS name. Unknown names are `Invalid`.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "width" => Self::Width,
            "min-width" => Self::MinWidth,
            "max-width" => Self::MaxWidth,
            "height" => Self::Height,
            "min-height" => Self::MinHeight,
            "max-height" => Self::MaxHeight,
            "aspect-ratio" => Self::AspectRatio,
            "min-aspect-ratio" => Self::MinAspectRatio,
            "max-aspect-ratio" => Self::MaxAspectRatio,
            "resolution" => Self::Resolution,
            "min-resolution" => Self::MinResolution,
            "max-resolution" => Self::MaxResolution,
            "orientation" => Self::Orientation,
            _ => Self::Invalid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::MinWidth => "min-width",
            Self::MaxWidth => "max-width",
            Self::Height => "height",
            Self::MinHeight => "min-height",
            Self::MaxHeight => "max-height",
            Self::AspectRatio => "aspect-ratio",
            Self::MinAspectRatio => "min-aspect-ratio",
            Self::MaxAspectRatio => "max-aspect-ratio",
            Self::Resolution => "resolution",
            Self::MinResolution => "min-resolution",
            Self::MaxResolution => "max-resolution",
            Self::Orientation => "orientation",
            Self::Invalid => "invalid",
        }
    }
}

/// A single media feature test with its value.
///
/// Aspect ratios are stored as `width / height`, resolutions in dppx.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaCondition {
    Width(Length),
    MinWidth(Length),
    MaxWidth(Length),
    Height(Length),
    MinHeight(Length),
    MaxHeight(Length),
    AspectRatio(f32),
    MinAspectRatio(f32),
    MaxAspectRatio(f32),
    Resolution(f32),
    MinResolution(f32),
    MaxResolution(f32),
    Orientation(Orientation),
    /// Source text (`name: value`) of a feature this crate does not
    /// understand; always matches.
    Invalid(String),
}

impl MediaCondition {
    pub fn id(&self) -> MediaQueryId {
        match self {
            Self::Width(_) => MediaQueryId::Width,
            Self::MinWidth(_) => MediaQueryId::MinWidth,
            Self::MaxWidth(_) => MediaQueryId::MaxWidth,
            Self::Height(_) => MediaQueryId::Height,
            Self::MinHeight(_) => MediaQueryId::MinHeight,
            Self::MaxHeight(_) => MediaQueryId::MaxHeight,
            Self::AspectRatio(_) => MediaQueryId::AspectRatio,
            Self::MinAspectRatio(_) => MediaQueryId::MinAspectRatio,
            Self::MaxAspectRatio(_) => MediaQueryId::MaxAspectRatio,
            Self::Resolution(_) => MediaQueryId::Resolution,
            Self::MinResolution(_) => MediaQueryId::MinResolution,
            Self::MaxResolution(_) => MediaQueryId::MaxResolution,
            Self::Orientation(_) => MediaQueryId::Orientation,
            Self::Invalid(_) => MediaQueryId::Invalid,
        }
    }

    /// Parse the inside of a `( name: value )` feature block.
    fn parse<'i>(input: &mut Parser<'i, '_>) -> Result<Self, ParseError<'i, ()>> {
        let start = input.position();
        let name = input.expect_ident_cloned()?;
        input.expect_colon()?;

        let id = MediaQueryId::from_name(&name);
        let condition = match id {
            MediaQueryId::Width => Self::Width(parse_length(input)?),
            MediaQueryId::MinWidth => Self::MinWidth(parse_length(input)?),
            MediaQueryId::MaxWidth => Self::MaxWidth(parse_length(input)?),
            MediaQueryId::Height => Self::Height(parse_length(input)?),
            MediaQueryId::MinHeight => Self::MinHeight(parse_length(input)?),
            MediaQueryId::MaxHeight => Self::MaxHeight(parse_length(input)?),
            MediaQueryId::AspectRatio => Self::AspectRatio(parse_ratio(input)?),
            MediaQueryId::MinAspectRatio => Self::MinAspectRatio(parse_ratio(input)?),
            MediaQueryId::MaxAspectRatio => Self::MaxAspectRatio(parse_ratio(input)?),
            MediaQueryId::Resolution => Self::Resolution(parse_resolution(input)?),
            MediaQueryId::MinResolution => Self::MinResolution(parse_resolution(input)?),
            MediaQueryId::MaxResolution => Self::MaxResolution(parse_resolution(input)?),
            MediaQueryId::Orientation => {
                let location = input.current_source_location();
                let ident = input.expect_ident()?;
                Orientation::from_css(ident)
                    .map(Self::Orientation)
                    .ok_or_else(|| location.new_custom_error(()))?
            }
            MediaQueryId::Invalid => {
                warn!("ignoring unknown media feature `{}`", name);
                while input.next().is_ok() {}
                Self::Invalid(input.slice_from(start).trim().to_string())
            }
        };

        input.expect_exhausted()?;
        Ok(condition)
    }
}

impl ToCss for MediaCondition {
    fn to_css(&self, buf: &mut String) {
        let name = self.id().as_str();
        match self {
            Self::Width(length)
            | Self::MinWidth(length)
            | Self::MaxWidth(length)
            | Self::Height(length)
            | Self::MinHeight(length)
            | Self::MaxHeight(length) => {
                write!(buf, "({}: {})", name, length.to_css_string()).unwrap()
            }
            Self::AspectRatio(ratio) | Self::MinAspectRatio(ratio) | Self::MaxAspectRatio(ratio) => {
                write!(buf, "({}: {})", name, ratio).unwrap()
            }
            Self::Resolution(dppx) | Self::MinResolution(dppx) | Self::MaxResolution(dppx) => {
                write!(buf, "({}: {}dppx)", name, dppx).unwrap()
            }
            Self::Orientation(orientation) => {
                write!(buf, "({}: {})", name, orientation.as_str()).unwrap()
            }
            Self::Invalid(feature) => write!(buf, "({})", feature).unwrap(),
        }
    }
}

fn parse_length<'i>(input: &mut Parser<'i, '_>) -> Result<Length, ParseError<'i, ()>> {
    let location = input.current_source_location();
    let length = match input.next()? {
        Token::Dimension { value, unit, .. } => Length::from_dimension(*value, unit),
        Token::Number { value, .. } if *value == 0.0 => Some(Length::Px(0.0)),
        _ => None,
    };
    length.ok_or_else(|| location.new_custom_error(()))
}

/// `16/9`, `16 / 9` or a plain number.
fn parse_ratio<'i>(input: &mut Parser<'i, '_>) -> Result<f32, ParseError<'i, ()>> {
    let numerator = input.expect_number()?;
    if input.try_parse(|i| i.expect_delim('/')).is_ok() {
        let denominator = input.expect_number()?;
        return Ok(numerator / denominator);
    }
    Ok(numerator)
}

/// `2x`, `2dppx`, `192dpi`, `75dpcm` or a plain number, as dppx.
fn parse_resolution<'i>(input: &mut Parser<'i, '_>) -> Result<f32, ParseError<'i, ()>> {
    let location = input.current_source_location();
    let dppx = match input.next()? {
        Token::Number { value, .. } => Some(*value),
        Token::Dimension { value, unit, .. } => match unit.to_ascii_lowercase().as_str() {
            "x" | "dppx" => Some(*value),
            "dpi" => Some(*value / 96.0),
            "dpcm" => Some(*value * 2.54 / 96.0),
            _ => None,
        },
        _ => None,
    };
    dppx.ok_or_else(|| location.new_custom_error(()))
}

/// The conditions of one media query, at most one per [`MediaQueryId`].
///
/// Two sets are equal when they hold the same conditions, regardless of the
/// order they were written in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaConditionSet {
    conditions: BTreeMap<MediaQueryId, MediaCondition>,
}

impl MediaConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition, replacing any earlier condition of the same kind.
    pub fn insert(&mut self, condition: MediaCondition) {
        self.conditions.insert(condition.id(), condition);
    }

    pub fn get(&self, id: MediaQueryId) -> Option<&MediaCondition> {
        self.conditions.get(&id)
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MediaCondition> {
        self.conditions.values()
    }

    /// Parse an `@media` prelude.
    ///
    /// Returns `Ok(None)` when the query names a media type other than
    /// `all` or `screen`: such a block can never apply on a screen viewport.
    /// `not`, comma-separated query lists and malformed features are errors.
    pub fn parse<'i>(input: &mut Parser<'i, '_>) -> Result<Option<Self>, ParseError<'i, ()>> {
        let mut set = Self::new();
        let mut applies = true;

        if let Ok(ident) = input.try_parse(|i| i.expect_ident_cloned()) {
            let media_type = ident.to_ascii_lowercase();
            let media_type = if media_type == "only" {
                input.expect_ident_cloned()?.to_ascii_lowercase()
            } else {
                media_type
            };

            match media_type.as_str() {
                "all" | "screen" => {}
                "not" | "and" | "or" => return Err(input.new_custom_error(())),
                _ => applies = false,
            }

            if input.is_exhausted() {
                return Ok(applies.then_some(set));
            }
            input.expect_ident_matching("and")?;
        }

        loop {
            input.expect_parenthesis_block()?;
            let condition = input.parse_nested_block(MediaCondition::parse)?;
            set.insert(condition);

            if input.is_exhausted() {
                break;
            }
            input.expect_ident_matching("and")?;
        }

        Ok(applies.then_some(set))
    }
}

impl ToCss for MediaConditionSet {
    fn to_css(&self, buf: &mut String) {
        if self.conditions.is_empty() {
            buf.push_str("all");
            return;
        }
        for (i, condition) in self.conditions.values().enumerate() {
            if i > 0 {
                buf.push_str(" and ");
            }
            condition.to_css(buf);
        }
    }
}
