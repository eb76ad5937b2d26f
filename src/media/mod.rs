//! Media queries: condition sets and their evaluation against a viewport.

mod context;
mod query;

pub use context::{MediaContext, ViewportSize};
pub use query::{MediaCondition, MediaConditionSet, MediaQueryId, Orientation};
