//! Media blocks and their ordered store.

use crate::media::{MediaConditionSet, MediaContext};
use crate::style::StyleSheet;

/// A set of media conditions and the rules they guard.
#[derive(Debug, Clone, Default)]
pub struct MediaBlock {
    pub conditions: MediaConditionSet,
    pub style_sheet: StyleSheet,
}

impl MediaBlock {
    pub fn new(conditions: MediaConditionSet, style_sheet: StyleSheet) -> Self {
        Self {
            conditions,
            style_sheet,
        }
    }

    /// Whether this block applies in `context`.
    pub fn matches(&self, context: &MediaContext) -> bool {
        context.matches(&self.conditions)
    }
}

/// Media blocks in source order. Later blocks take precedence when merged.
#[derive(Debug, Clone, Default)]
pub struct MediaBlockList {
    blocks: Vec<MediaBlock>,
}

impl MediaBlockList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: MediaBlock) {
        self.blocks.push(block);
    }

    /// The first block whose condition set equals `conditions`.
    pub fn find(&self, conditions: &MediaConditionSet) -> Option<&MediaBlock> {
        self.blocks.iter().find(|block| &block.conditions == conditions)
    }

    pub fn find_mut(&mut self, conditions: &MediaConditionSet) -> Option<&mut MediaBlock> {
        self.blocks
            .iter_mut()
            .find(|block| &block.conditions == conditions)
    }

    /// The last block if it has exactly these conditions, otherwise a new
    /// empty block appended for them.
    pub(crate) fn last_or_push(&mut self, conditions: MediaConditionSet) -> &mut MediaBlock {
        let reuse = self
            .blocks
            .last()
            .is_some_and(|block| block.conditions == conditions);
        if !reuse {
            self.blocks
                .push(MediaBlock::new(conditions, StyleSheet::new()));
        }
        let last = self.blocks.len() - 1;
        &mut self.blocks[last]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MediaBlock> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Total number of rules across all blocks.
    pub fn rule_count(&self) -> usize {
        self.blocks.iter().map(|block| block.style_sheet.len()).sum()
    }
}

impl Extend<MediaBlock> for MediaBlockList {
    fn extend<I: IntoIterator<Item = MediaBlock>>(&mut self, iter: I) {
        self.blocks.extend(iter);
    }
}

impl IntoIterator for MediaBlockList {
    type Item = MediaBlock;
    type IntoIter = std::vec::IntoIter<MediaBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.into_iter()
    }
}

impl<'a> IntoIterator for &'a MediaBlockList {
    type Item = &'a MediaBlock;
    type IntoIter = std::slice::Iter<'a, MediaBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
