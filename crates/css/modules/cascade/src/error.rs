//! Errors raised while creating and computing property values.

use core::fmt;
use css_values_units::LexicalUnitKind;
use std::error::Error;

/// A declaration value rejected by its property's grammar.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueError {
    /// A lexical unit of a kind the property never accepts.
    InvalidLexicalUnit {
        property: &'static str,
        kind: LexicalUnitKind,
    },
    /// An identifier outside the property's keyword table.
    InvalidIdentifier {
        property: &'static str,
        ident: String,
    },
    /// A value whose overall shape is wrong (missing parts, bad arity).
    MalformedLexicalUnit { property: &'static str },
    /// A number outside the property's accepted range.
    OutOfRange { property: &'static str, value: f32 },
}

impl ValueError {
    pub const fn property(&self) -> &'static str {
        match self {
            Self::InvalidLexicalUnit { property, .. }
            | Self::InvalidIdentifier { property, .. }
            | Self::MalformedLexicalUnit { property }
            | Self::OutOfRange { property, .. } => property,
        }
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLexicalUnit { property, kind } => {
                write!(formatter, "{property}: unexpected {kind} value")
            }
            Self::InvalidIdentifier { property, ident } => {
                write!(formatter, "{property}: unknown identifier `{ident}`")
            }
            Self::MalformedLexicalUnit { property } => {
                write!(formatter, "{property}: malformed value")
            }
            Self::OutOfRange { property, value } => {
                write!(formatter, "{property}: {value} is out of range")
            }
        }
    }
}

impl Error for ValueError {}

/// Failure resolving a property for an element.
#[derive(Clone, Debug, PartialEq)]
pub enum CascadeError {
    /// No manager or shorthand is registered under this name.
    UnknownProperty(String),
    /// The property's value depends on itself.
    Cycle { property: &'static str },
    Value(ValueError),
}

impl fmt::Display for CascadeError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProperty(name) => write!(formatter, "unknown property `{name}`"),
            Self::Cycle { property } => {
                write!(formatter, "{property}: value depends on itself")
            }
            Self::Value(error) => write!(formatter, "{error}"),
        }
    }
}

impl Error for CascadeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Value(error) => Some(error),
            Self::UnknownProperty(_) | Self::Cycle { .. } => None,
        }
    }
}

impl From<ValueError> for CascadeError {
    fn from(error: ValueError) -> Self {
        Self::Value(error)
    }
}
