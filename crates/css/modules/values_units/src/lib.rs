//! CSS Values and Units: value model, lexical units and unit conversion.
//! See: <https://www.w3.org/TR/CSS2/syndata.html>

#![forbid(unsafe_code)]

use core::fmt;
use std::error::Error;

// Per-chapter modules mirroring the values and units table of contents.
pub mod chapter_6_dimensions;
pub mod chapter_9_colors;
pub mod lexical;
pub mod value;

// Re-exports for ergonomic access from other crates.
pub use chapter_6_dimensions::{Unit, absolute_length_px, angle_degrees};
pub use chapter_9_colors::{Rgb, named_color, parse_hex_color};
pub use lexical::{LexicalUnit, LexicalUnitKind, parse_lexical_units};
pub use value::{ListSeparator, ListValue, NumberValue, PrimitiveType, RectValue, RgbValue, Value};

/// Parse error for turning value text into lexical units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// A token with no lexical-unit form.
    UnexpectedToken(String),
    /// A dimension whose unit is not supported.
    UnknownUnit(String),
    /// The value text held no units.
    Empty,
}

impl fmt::Display for ParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken(token) => write!(formatter, "unexpected token {token}"),
            Self::UnknownUnit(unit) => write!(formatter, "unknown unit `{unit}`"),
            Self::Empty => formatter.write_str("empty value"),
        }
    }
}

impl Error for ParseError {}
