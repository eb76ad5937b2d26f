//! CSS value primitives and the enum_property! macro.

use std::fmt::Write;
use std::hash::{Hash, Hasher};

use super::ToCss;

/// Macro for defining CSS keyword enums with automatic ToCss implementation.
///
/// Inspired by lightningcss's `enum_property!` macro, this reduces boilerplate
/// for enums that map directly to CSS keywords.
///
/// # Example
///
/// ```ignore
/// enum_property! {
///     /// Screen orientation.
///     pub enum Orientation {
///         #[default]
///         Portrait => "portrait",
///         Landscape => "landscape",
///     }
/// }
/// ```
macro_rules! enum_property {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $css:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(feature = "cli", derive(serde::Serialize))]
        #[cfg_attr(feature = "cli", serde(rename_all = "kebab-case"))]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl $name {
            /// Returns the CSS keyword for this value.
            #[inline]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $css,)*
                }
            }

            /// Parse a CSS keyword into this enum (ASCII case-insensitive).
            #[inline]
            pub fn from_css(s: &str) -> Option<Self> {
                $(
                    if s.eq_ignore_ascii_case($css) {
                        return Some($name::$variant);
                    }
                )*
                None
            }
        }

        impl $crate::style::ToCss for $name {
            fn to_css(&self, buf: &mut String) {
                buf.push_str(self.as_str());
            }
        }
    };
}

// Export the macro for use within the crate
pub(crate) use enum_property;

/// RGBA color (8 bits per channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Create a new opaque color.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color with alpha.
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse the digits of a `#rgb`, `#rrggbb` or `#rrggbbaa` color.
    ///
    /// Hash tokens may hold any name characters; non-ASCII input is rejected.
    pub fn from_hex(hex: &str) -> Option<Self> {
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
                Some(Color::rgb(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Color::rgb(r, g, b))
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some(Color::rgba(r, g, b, a))
            }
            _ => None,
        }
    }
}

impl ToCss for Color {
    fn to_css(&self, buf: &mut String) {
        if self.a == 255 {
            // Opaque: use #RRGGBB
            write!(buf, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b).unwrap();
        } else if self.a == 0 {
            buf.push_str("transparent");
        } else {
            let alpha = self.a as f32 / 255.0;
            write!(buf, "rgba({},{},{},{:.2})", self.r, self.g, self.b, alpha).unwrap();
        }
    }
}

/// Length value with unit.
///
/// `Dp` is a density-independent pixel, scaled by the device pixel ratio at
/// resolution time. The viewport units are percentages of the viewport axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
#[cfg_attr(feature = "cli", serde(tag = "unit", content = "value", rename_all = "lowercase"))]
pub enum Length {
    #[default]
    Auto,
    Px(f32),
    Dp(f32),
    Em(f32),
    Rem(f32),
    Percent(f32),
    Vw(f32),
    Vh(f32),
    Vmin(f32),
    Vmax(f32),
    Pt(f32),
    Pc(f32),
    In(f32),
    Cm(f32),
    Mm(f32),
}

impl Length {
    /// Build a length from a CSS dimension (`value` + `unit`).
    ///
    /// Returns `None` for units that are not lengths.
    pub fn from_dimension(value: f32, unit: &str) -> Option<Self> {
        let unit = unit.to_ascii_lowercase();
        let length = match unit.as_str() {
            "px" => Length::Px(value),
            "dp" => Length::Dp(value),
            "em" => Length::Em(value),
            "rem" => Length::Rem(value),
            "vw" => Length::Vw(value),
            "vh" => Length::Vh(value),
            "vmin" => Length::Vmin(value),
            "vmax" => Length::Vmax(value),
            "pt" => Length::Pt(value),
            "pc" => Length::Pc(value),
            "in" => Length::In(value),
            "cm" => Length::Cm(value),
            "mm" => Length::Mm(value),
            _ => return None,
        };
        Some(length)
    }

    /// The numeric part of the length (0 for `auto`).
    pub fn value(&self) -> f32 {
        match *self {
            Length::Auto => 0.0,
            Length::Px(v)
            | Length::Dp(v)
            | Length::Em(v)
            | Length::Rem(v)
            | Length::Percent(v)
            | Length::Vw(v)
            | Length::Vh(v)
            | Length::Vmin(v)
            | Length::Vmax(v)
            | Length::Pt(v)
            | Length::Pc(v)
            | Length::In(v)
            | Length::Cm(v)
            | Length::Mm(v) => v,
        }
    }

    fn unit(&self) -> &'static str {
        match self {
            Length::Auto => "",
            Length::Px(_) => "px",
            Length::Dp(_) => "dp",
            Length::Em(_) => "em",
            Length::Rem(_) => "rem",
            Length::Percent(_) => "%",
            Length::Vw(_) => "vw",
            Length::Vh(_) => "vh",
            Length::Vmin(_) => "vmin",
            Length::Vmax(_) => "vmax",
            Length::Pt(_) => "pt",
            Length::Pc(_) => "pc",
            Length::In(_) => "in",
            Length::Cm(_) => "cm",
            Length::Mm(_) => "mm",
        }
    }
}

impl Eq for Length {}

impl Hash for Length {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        self.value().to_bits().hash(state);
    }
}

impl ToCss for Length {
    fn to_css(&self, buf: &mut String) {
        match self {
            Length::Auto => buf.push_str("auto"),
            Length::Px(v) if *v == 0.0 => buf.push('0'),
            other => write!(buf, "{}{}", other.value(), other.unit()).unwrap(),
        }
    }
}
