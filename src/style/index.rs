//! Rule lookup index.

use std::collections::HashMap;

use super::selector::RuleKey;
use super::stylesheet::StyleRule;

/// Buckets rule positions by their [`RuleKey`].
///
/// Positions are indices into the owning sheet's rule vector and are only
/// valid until that vector changes; the sheet drops its index on mutation.
#[derive(Debug, Clone, Default)]
pub struct RuleIndex {
    ids: HashMap<String, Vec<usize>>,
    classes: HashMap<String, Vec<usize>>,
    tags: HashMap<String, Vec<usize>>,
    universal: Vec<usize>,
}

impl RuleIndex {
    pub fn build(rules: &[StyleRule]) -> Self {
        let mut index = Self::default();
        for (position, rule) in rules.iter().enumerate() {
            let bucket = match rule.key() {
                RuleKey::Id(id) => index.ids.entry(id.clone()).or_default(),
                RuleKey::Class(class) => index.classes.entry(class.clone()).or_default(),
                RuleKey::Tag(tag) => index.tags.entry(tag.clone()).or_default(),
                RuleKey::Universal => &mut index.universal,
            };
            bucket.push(position);
        }
        index
    }

    /// Positions of rules that may apply to an element with the given tag,
    /// id and classes, in source order.
    pub fn candidates(&self, tag: &str, id: Option<&str>, classes: &[&str]) -> Vec<usize> {
        let mut positions = self.universal.clone();

        if let Some(bucket) = self.tags.get(&tag.to_ascii_lowercase()) {
            positions.extend_from_slice(bucket);
        }
        if let Some(bucket) = id.and_then(|id| self.ids.get(id)) {
            positions.extend_from_slice(bucket);
        }
        for class in classes {
            if let Some(bucket) = self.classes.get(*class) {
                positions.extend_from_slice(bucket);
            }
        }

        positions.sort_unstable();
        positions.dedup();
        positions
    }

    /// Number of non-empty buckets.
    pub fn bucket_count(&self) -> usize {
        self.ids.len()
            + self.classes.len()
            + self.tags.len()
            + usize::from(!self.universal.is_empty())
    }
}
