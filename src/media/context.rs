//! Evaluation of media conditions against a viewport.

use log::trace;

use super::query::{MediaCondition, MediaConditionSet};
use crate::style::{DEFAULT_FONT_SIZE, Length, compute_length};

/// Viewport dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The runtime environment media queries are evaluated in.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct MediaContext {
    pub viewport: ViewportSize,
    /// Device pixels per CSS pixel.
    pub dp_ratio: f32,
}

impl MediaContext {
    pub fn new(viewport: ViewportSize, dp_ratio: f32) -> Self {
        Self { viewport, dp_ratio }
    }

    /// Whether every condition in the set holds. An empty set always matches.
    pub fn matches(&self, conditions: &MediaConditionSet) -> bool {
        conditions.iter().all(|condition| self.evaluate(condition))
    }

    /// Evaluate one condition.
    ///
    /// Comparisons are exact; `(aspect-ratio: 4/3)` only holds when
    /// `width / height` is bit-for-bit equal to `4.0 / 3.0`. A zero height
    /// yields an infinite or NaN ratio, compared as-is.
    pub fn evaluate(&self, condition: &MediaCondition) -> bool {
        let ViewportSize { width, height } = self.viewport;
        let aspect_ratio = width / height;
        let density = self.dp_ratio;

        let result = match condition {
            MediaCondition::Width(length) => width == self.resolve(*length),
            MediaCondition::MinWidth(length) => width >= self.resolve(*length),
            MediaCondition::MaxWidth(length) => width <= self.resolve(*length),
            MediaCondition::Height(length) => height == self.resolve(*length),
            MediaCondition::MinHeight(length) => height >= self.resolve(*length),
            MediaCondition::MaxHeight(length) => height <= self.resolve(*length),
            MediaCondition::AspectRatio(ratio) => aspect_ratio == *ratio,
            MediaCondition::MinAspectRatio(ratio) => aspect_ratio >= *ratio,
            MediaCondition::MaxAspectRatio(ratio) => aspect_ratio <= *ratio,
            MediaCondition::Resolution(dppx) => density == *dppx,
            MediaCondition::MinResolution(dppx) => density >= *dppx,
            MediaCondition::MaxResolution(dppx) => density <= *dppx,
            MediaCondition::Orientation(orientation) => (width <= height) == orientation.is_portrait(),
            MediaCondition::Invalid(_) => true,
        };

        trace!("media condition {:?} -> {}", condition, result);
        result
    }

    fn resolve(&self, length: Length) -> f32 {
        compute_length(
            length,
            DEFAULT_FONT_SIZE,
            DEFAULT_FONT_SIZE,
            self.dp_ratio,
            (self.viewport.width, self.viewport.height),
        )
    }
}
