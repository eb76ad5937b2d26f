//! The rule set behind every media block and every compiled sheet.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::debug;

use super::ToCss;
use super::declaration::{Property, PropertyDictionary};
use super::index::RuleIndex;
use super::selector::{RuleKey, Selector, Specificity, parse_selector, selector_text};

/// A single selector with its declarations.
///
/// Declarations are reference counted and copied on write, so cloning a
/// rule (or a whole sheet) never lets two owners observe each other's
/// mutations.
#[derive(Debug, Clone)]
pub struct StyleRule {
    selector: Selector,
    text: String,
    key: RuleKey,
    specificity: Specificity,
    properties: Arc<PropertyDictionary>,
}

impl StyleRule {
    pub fn new(selector: Selector, properties: PropertyDictionary) -> Self {
        Self {
            text: selector_text(&selector),
            key: RuleKey::from_selector(&selector),
            specificity: Specificity::from_selector(&selector),
            selector,
            properties: Arc::new(properties),
        }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Canonical selector text.
    pub fn selector_text(&self) -> &str {
        &self.text
    }

    pub fn specificity(&self) -> Specificity {
        self.specificity
    }

    pub fn key(&self) -> &RuleKey {
        &self.key
    }

    pub fn properties(&self) -> &PropertyDictionary {
        &self.properties
    }

    /// Whether both rules point at the same declaration storage.
    pub fn shares_properties_with(&self, other: &StyleRule) -> bool {
        Arc::ptr_eq(&self.properties, &other.properties)
    }
}

/// An ordered set of style rules, one per distinct selector.
///
/// Adding a rule whose selector is already present layers the new
/// declarations on top of the existing rule (see
/// [`PropertyDictionary::import`]) and keeps the original position.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    rules: Vec<StyleRule>,
    positions: HashMap<String, usize>,
    index: Option<RuleIndex>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in source order.
    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    /// Add declarations for `selector`.
    pub fn add_rule(&mut self, selector: Selector, properties: &PropertyDictionary) {
        let text = selector_text(&selector);
        if let Some(&position) = self.positions.get(&text) {
            Arc::make_mut(&mut self.rules[position].properties).import(properties);
        } else {
            self.push(StyleRule::new(selector, properties.clone()));
        }
        self.index = None;
    }

    /// Layer every rule of `other` on top of this sheet.
    pub fn merge(&mut self, other: &StyleSheet) {
        for rule in &other.rules {
            match self.positions.get(&rule.text) {
                Some(&position) => {
                    let existing = &mut self.rules[position].properties;
                    if !Arc::ptr_eq(existing, &rule.properties) {
                        Arc::make_mut(existing).import(&rule.properties);
                    }
                }
                None => self.push(rule.clone()),
            }
        }
        self.index = None;
    }

    /// A new sheet holding this sheet with `other` layered on top.
    pub fn combine(&self, other: &StyleSheet) -> StyleSheet {
        let mut combined = self.clone();
        combined.merge(other);
        combined
    }

    fn push(&mut self, rule: StyleRule) {
        self.positions.insert(rule.text.clone(), self.rules.len());
        self.rules.push(rule);
    }

    /// Build the lookup index used by [`StyleSheet::candidate_rules`].
    pub fn build_index(&mut self) {
        let index = RuleIndex::build(&self.rules);
        debug!(
            "indexed {} rules into {} buckets",
            self.rules.len(),
            index.bucket_count()
        );
        self.index = Some(index);
    }

    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    /// Deduplicate declaration storage and release spare capacity.
    ///
    /// Rules with identical declarations end up sharing one dictionary. Rule
    /// order is unchanged, so a built index stays valid. Returns the number
    /// of rules that were switched to shared storage.
    pub fn optimize(&mut self) -> usize {
        let mut pool: HashSet<Arc<PropertyDictionary>> = HashSet::with_capacity(self.rules.len());
        let mut shared = 0;

        for rule in &mut self.rules {
            match pool.get(&rule.properties) {
                Some(existing) => {
                    if !Arc::ptr_eq(existing, &rule.properties) {
                        rule.properties = Arc::clone(existing);
                        shared += 1;
                    }
                }
                None => {
                    pool.insert(Arc::clone(&rule.properties));
                }
            }
        }

        self.rules.shrink_to_fit();
        self.positions.shrink_to_fit();
        debug!(
            "optimized {} rules: {} distinct declaration blocks, {} newly shared",
            self.rules.len(),
            pool.len(),
            shared
        );
        shared
    }

    /// Number of distinct declaration blocks backing the rules.
    pub fn unique_dictionaries(&self) -> usize {
        self.rules
            .iter()
            .map(|rule| Arc::as_ptr(&rule.properties))
            .collect::<HashSet<_>>()
            .len()
    }

    /// Declarations for a selector, e.g. `sheet.get(".button:hover")`.
    pub fn get(&self, selector: &str) -> Option<&PropertyDictionary> {
        let position = match self.positions.get(selector) {
            Some(&position) => position,
            None => {
                let canonical = selector_text(&parse_selector(selector)?);
                *self.positions.get(&canonical)?
            }
        };
        Some(self.rules[position].properties())
    }

    /// A single property of a selector's rule.
    pub fn property(&self, selector: &str, name: &str) -> Option<&Property> {
        self.get(selector)?.get(name)
    }

    /// Rules that may apply to an element with this tag, id and classes,
    /// in source order.
    ///
    /// Only the rightmost compound's key is consulted; callers still have to
    /// match the full selector.
    pub fn candidate_rules(&self, tag: &str, id: Option<&str>, classes: &[&str]) -> Vec<&StyleRule> {
        match &self.index {
            Some(index) => index
                .candidates(tag, id, classes)
                .into_iter()
                .map(|position| &self.rules[position])
                .collect(),
            None => self
                .rules
                .iter()
                .filter(|rule| match rule.key() {
                    RuleKey::Id(key) => id == Some(key.as_str()),
                    RuleKey::Class(key) => classes.contains(&key.as_str()),
                    RuleKey::Tag(key) => key.eq_ignore_ascii_case(tag),
                    RuleKey::Universal => true,
                })
                .collect(),
        }
    }
}

impl ToCss for StyleSheet {
    fn to_css(&self, buf: &mut String) {
        for rule in &self.rules {
            buf.push_str(&rule.text);
            if rule.properties.is_empty() {
                buf.push_str(" {}\n");
            } else {
                buf.push_str(" { ");
                rule.properties.to_css(buf);
                buf.push_str(" }\n");
            }
        }
    }
}
