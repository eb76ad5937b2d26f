//! # mediasheet
//!
//! Media-query aware style sheet storage.
//!
//! A style sheet is split into media blocks: the rules outside any `@media`
//! rule and the rules of each `@media` rule, each guarded by its conditions.
//! For a given viewport size and device pixel ratio the blocks that apply are
//! merged, in source order, into one indexed [`StyleSheet`]. The result is
//! cached until the viewport or pixel ratio changes.
//!
//! ## Features
//!
//! - `width`, `height`, `aspect-ratio` and `resolution` (with `min-`/`max-`
//!   forms) and `orientation` media features
//! - Cascade-aware rule merging with `!important` support
//! - Combining a document sheet with an override sheet without touching either
//! - Copy-on-write declaration storage shared between compiled sheets
//!
//! ## Quick Start
//!
//! ```
//! use mediasheet::{StyleSheetContainer, ViewportSize};
//!
//! let mut base = StyleSheetContainer::parse(
//!     "body { margin: 8px } @media (min-width: 800px) { body { margin: 32px } }",
//!     1,
//! )
//! .unwrap();
//! let overrides = StyleSheetContainer::parse("body { color: #333 }", 1).unwrap();
//!
//! let mut styles = base.combine(&overrides);
//! let sheet = styles.compiled_style_sheet(ViewportSize::new(1024.0, 768.0), 1.0);
//! assert!(sheet.property("body", "color").is_some());
//!
//! // inputs are left as they were
//! let sheet = base.compiled_style_sheet(ViewportSize::new(1024.0, 768.0), 1.0);
//! assert!(sheet.property("body", "color").is_none());
//! ```

pub mod container;
pub mod error;
pub mod media;
pub mod parser;
pub mod style;

pub use container::{MediaBlock, MediaBlockList, StyleSheetContainer};
pub use error::{Error, ParseErrorKind, Result};
pub use media::{
    MediaCondition, MediaConditionSet, MediaContext, MediaQueryId, Orientation, ViewportSize,
};
pub use parser::parse_media_blocks;
pub use style::{Property, PropertyDictionary, PropertyValue, StyleRule, StyleSheet, ToCss};
