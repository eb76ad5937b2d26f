//! Rule storage for compiled and per-media-block style sheets.
//!
//! This module contains:
//! - CSS value types (Length, Color, PropertyValue)
//! - Property dictionaries with cascade-aware merging
//! - Selector parsing and specificity
//! - The StyleSheet rule set with its lookup index and optimization pass
//! - Length resolution against a viewport

mod declaration;
mod index;
pub mod length;
mod properties;
mod selector;
mod stylesheet;
mod value;

/// Serialization of style values back to CSS text.
pub trait ToCss {
    /// Write this value as CSS to the buffer.
    fn to_css(&self, buf: &mut String);

    /// Convert to a CSS string (convenience method).
    fn to_css_string(&self) -> String {
        let mut buf = String::new();
        self.to_css(&mut buf);
        buf
    }
}

pub use declaration::{Property, PropertyDictionary, parse_declaration_block};
pub use index::RuleIndex;
pub use length::{DEFAULT_FONT_SIZE, compute_length};
pub use properties::{Color, Length};
pub use selector::{
    IdentStr, NonTSPseudoClass, RuleKey, Selector, Specificity, StyleSelectors,
    parse_selector_list,
};
pub use stylesheet::{StyleRule, StyleSheet};
pub use value::PropertyValue;

pub(crate) use properties::enum_property;
