//! The style sheet container: media blocks plus a compiled-sheet cache.
//!
//! ```
//! use mediasheet::{StyleSheetContainer, ViewportSize};
//!
//! let mut container = StyleSheetContainer::parse(
//!     "p { color: black } @media (max-width: 480px) { p { color: red } }",
//!     1,
//! )
//! .unwrap();
//!
//! let narrow = container.compiled_style_sheet(ViewportSize::new(320.0, 640.0), 1.0);
//! assert_eq!(narrow.property("p", "color").unwrap().value.as_keyword(), Some("red"));
//!
//! let wide = container.compiled_style_sheet(ViewportSize::new(1280.0, 800.0), 1.0);
//! assert_eq!(wide.property("p", "color").unwrap().value.as_keyword(), Some("black"));
//! ```

mod block;
mod cache;

use log::debug;

pub use block::{MediaBlock, MediaBlockList};
pub use cache::{CacheKey, CompileCache};

use crate::error::Result;
use crate::media::{MediaContext, ViewportSize};
use crate::parser::parse_media_blocks;
use crate::style::StyleSheet;

/// Media-partitioned style rules and the sheet compiled for the last
/// viewport they were queried with.
#[derive(Debug, Clone, Default)]
pub struct StyleSheetContainer {
    media_blocks: MediaBlockList,
    cache: CompileCache,
}

impl StyleSheetContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a container from style sheet text.
    pub fn parse(source: &str, begin_line_number: u32) -> Result<Self> {
        let mut container = Self::new();
        container.load_style_sheet_container(source, begin_line_number)?;
        Ok(container)
    }

    /// Append the media blocks of `source` to this container.
    ///
    /// Returns the number of style rules read. If the text is rejected the
    /// container is left as it was.
    pub fn load_style_sheet_container(&mut self, source: &str, begin_line_number: u32) -> Result<usize> {
        let mut blocks = MediaBlockList::new();
        let rule_count = parse_media_blocks(source, begin_line_number, &mut blocks)?;

        debug!(
            "loaded {} rules in {} media blocks",
            rule_count,
            blocks.len()
        );
        self.media_blocks.extend(blocks);
        self.cache.clear();
        Ok(rule_count)
    }

    /// The sheet of all rules that apply to this viewport and pixel ratio.
    ///
    /// The result is cached and only recompiled when `viewport` or
    /// `dp_ratio` differ (bit for bit) from the previous call.
    pub fn compiled_style_sheet(&mut self, viewport: ViewportSize, dp_ratio: f32) -> &StyleSheet {
        let context = MediaContext::new(viewport, dp_ratio);
        let media_blocks = &self.media_blocks;
        self.cache
            .get_or_compile(CacheKey::new(&context), || compile(media_blocks, &context))
    }

    /// A new container with the blocks of `other` layered on top of these.
    ///
    /// Blocks of `other` whose conditions equal an existing block are merged
    /// into it in place; the rest are appended. Neither input changes.
    pub fn combine(&self, other: &StyleSheetContainer) -> StyleSheetContainer {
        let mut media_blocks = self.media_blocks.clone();

        for block in &other.media_blocks {
            match media_blocks.find_mut(&block.conditions) {
                Some(existing) => existing.style_sheet.merge(&block.style_sheet),
                None => media_blocks.push(block.clone()),
            }
        }

        StyleSheetContainer {
            media_blocks,
            cache: CompileCache::new(),
        }
    }

    pub fn media_blocks(&self) -> &MediaBlockList {
        &self.media_blocks
    }

    /// How many times a sheet has been compiled (cache misses).
    pub fn compile_count(&self) -> u64 {
        self.cache.compile_count()
    }
}

/// Merge every block matching `context`, in order, into one indexed sheet.
fn compile(media_blocks: &MediaBlockList, context: &MediaContext) -> StyleSheet {
    let mut style_sheet = StyleSheet::new();
    let mut matched = 0;

    for block in media_blocks.iter().filter(|block| block.matches(context)) {
        style_sheet.merge(&block.style_sheet);
        matched += 1;
    }

    style_sheet.build_index();
    style_sheet.optimize();

    debug!(
        "compiled {} of {} media blocks for {}x{} @{}x into {} rules",
        matched,
        media_blocks.len(),
        context.viewport.width,
        context.viewport.height,
        context.dp_ratio,
        style_sheet.len()
    );
    style_sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Length, PropertyValue};

    const BASE: &str = "
        p { color: black; width: 100px }
        @media (min-width: 100px) and (max-width: 200px) { p { color: green } }
        @media (orientation: landscape) { h1 { color: blue } }
    ";

    fn color(sheet: &StyleSheet, selector: &str) -> Option<String> {
        sheet
            .property(selector, "color")
            .and_then(|p| p.value.as_keyword().map(str::to_string))
    }

    #[test]
    fn test_compile_merges_matching_blocks() {
        let mut container = StyleSheetContainer::parse(BASE, 1).unwrap();

        let sheet = container.compiled_style_sheet(ViewportSize::new(150.0, 400.0), 1.0);
        assert_eq!(color(sheet, "p").as_deref(), Some("green"));
        assert_eq!(
            sheet.property("p", "width").unwrap().value,
            PropertyValue::Length(Length::Px(100.0))
        );
        assert!(sheet.get("h1").is_none());
        assert!(sheet.is_indexed());

        let sheet = container.compiled_style_sheet(ViewportSize::new(250.0, 100.0), 1.0);
        assert_eq!(color(sheet, "p").as_deref(), Some("black"));
        assert_eq!(color(sheet, "h1").as_deref(), Some("blue"));
    }

    #[test]
    fn test_compile_is_cached_per_key() {
        let mut container = StyleSheetContainer::parse(BASE, 1).unwrap();
        let viewport = ViewportSize::new(150.0, 400.0);

        let first = container.compiled_style_sheet(viewport, 1.0) as *const StyleSheet;
        let second = container.compiled_style_sheet(viewport, 1.0) as *const StyleSheet;
        assert_eq!(first, second);
        assert_eq!(container.compile_count(), 1);

        container.compiled_style_sheet(viewport, 2.0);
        assert_eq!(container.compile_count(), 2);
    }

    #[test]
    fn test_loading_clears_cache() {
        let mut container = StyleSheetContainer::parse(BASE, 1).unwrap();
        let viewport = ViewportSize::new(150.0, 400.0);
        container.compiled_style_sheet(viewport, 1.0);

        container
            .load_style_sheet_container("p { color: purple }", 10)
            .unwrap();
        let sheet = container.compiled_style_sheet(viewport, 1.0);
        assert_eq!(color(sheet, "p").as_deref(), Some("purple"));
        assert_eq!(container.compile_count(), 2);
    }

    #[test]
    fn test_failed_load_leaves_container_unchanged() {
        let mut container = StyleSheetContainer::parse(BASE, 1).unwrap();
        let blocks = container.media_blocks().len();

        assert!(
            container
                .load_style_sheet_container("a { color: red } @media (width: nope) {}", 1)
                .is_err()
        );
        assert_eq!(container.media_blocks().len(), blocks);
        assert!(container.media_blocks().iter().all(|b| b.style_sheet.get("a").is_none()));
    }

    #[test]
    fn test_combine_merges_equal_conditions_in_place() {
        let base = StyleSheetContainer::parse(BASE, 1).unwrap();
        let overrides = StyleSheetContainer::parse(
            "@media (max-width: 200px) and (min-width: 100px) { p { color: red } }",
            1,
        )
        .unwrap();

        let mut combined = base.combine(&overrides);
        assert_eq!(combined.media_blocks().len(), base.media_blocks().len());

        let sheet = combined.compiled_style_sheet(ViewportSize::new(150.0, 400.0), 1.0);
        assert_eq!(color(sheet, "p").as_deref(), Some("red"));

        let original = base.media_blocks().iter().nth(1).unwrap();
        assert_eq!(color(&original.style_sheet, "p").as_deref(), Some("green"));
    }

    #[test]
    fn test_combine_appends_new_conditions() {
        let base = StyleSheetContainer::parse(BASE, 1).unwrap();
        let overrides =
            StyleSheetContainer::parse("@media (min-resolution: 2x) { p { color: white } }", 1)
                .unwrap();

        let mut combined = base.combine(&overrides);
        assert_eq!(combined.media_blocks().len(), base.media_blocks().len() + 1);

        let sheet = combined.compiled_style_sheet(ViewportSize::new(150.0, 400.0), 2.0);
        assert_eq!(color(sheet, "p").as_deref(), Some("white"));
        let sheet = combined.compiled_style_sheet(ViewportSize::new(150.0, 400.0), 1.0);
        assert_eq!(color(sheet, "p").as_deref(), Some("green"));
    }
}
