//! CSS cascade for SVG documents: style rules and inline styles are matched
//! against elements, and computed values are resolved lazily per element.
//!
//! Every supported property has a [`ValueManager`] in the shared
//! [`ValueManagerRegistry`]; shorthands expand through a [`ShorthandManager`].
//! A [`CssEngine`] holds the rules of one document and caches computed values in
//! one [`StyleMap`] per element and pseudo-element.
//!
//! See: <https://www.w3.org/TR/CSS2/cascade.html>

#![forbid(unsafe_code)]

mod context;
mod engine;
mod error;
pub mod managers;
mod priority;
mod registry;
mod shorthand;
mod style_map;
mod stylesheet;

pub use context::{CssContext, DEFAULT_PIXEL_UNIT_TO_MILLIMETER};
pub use engine::{CssEngine, MatchedRule};
pub use error::{CascadeError, ValueError};
pub use managers::{ComputeScope, ValueManager};
pub use priority::{CascadePriority, Origin};
pub use registry::{ValueManagerRegistry, registry};
pub use shorthand::{PropertyHandler, ShorthandManager};
pub use style_map::{CascadedValue, EntryFlags, StyleEntry, StyleKey, StyleMap};
pub use stylesheet::{Declaration, StyleRule, StyleSheet};
