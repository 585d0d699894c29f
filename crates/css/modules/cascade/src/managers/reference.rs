//! Properties referring to other resources through `url(...)`.

use super::{ValueManager, invalid_unit, keyword, single_unit};
use crate::context::CssContext;
use crate::error::ValueError;
use css_values_units::{LexicalUnit, ListSeparator, Value};

/// `none` or a single reference.
#[derive(Clone, Copy, Debug)]
pub struct UriManager {
    pub name: &'static str,
    pub inherited: bool,
}

pub const URI_MANAGERS: &[UriManager] = &[
    UriManager {
        name: "clip-path",
        inherited: false,
    },
    UriManager {
        name: "mask",
        inherited: false,
    },
    UriManager {
        name: "filter",
        inherited: false,
    },
    UriManager {
        name: "marker-start",
        inherited: true,
    },
    UriManager {
        name: "marker-mid",
        inherited: true,
    },
    UriManager {
        name: "marker-end",
        inherited: true,
    },
];

impl ValueManager for UriManager {
    fn property_name(&self) -> &'static str {
        self.name
    }

    fn is_inherited_property(&self) -> bool {
        self.inherited
    }

    fn default_value(&self) -> Value {
        Value::ident("none")
    }

    fn create_value(&self, units: &[LexicalUnit], context: &CssContext) -> Result<Value, ValueError> {
        match single_unit(self.name, units)? {
            LexicalUnit::Uri(uri) => Ok(Value::uri(uri, &context.resolve_uri(uri))),
            LexicalUnit::Ident(ident) => keyword(self.name, &["none"], ident),
            other => Err(invalid_unit(self.name, other)),
        }
    }
}

const CURSOR_KEYWORDS: &[&str] = &[
    "auto",
    "crosshair",
    "default",
    "pointer",
    "move",
    "e-resize",
    "ne-resize",
    "nw-resize",
    "n-resize",
    "se-resize",
    "sw-resize",
    "s-resize",
    "w-resize",
    "text",
    "wait",
    "help",
];

/// `cursor`: any number of `url(...),` entries followed by a keyword.
///
/// See: <https://www.w3.org/TR/SVG11/interact.html#CursorProperty>
#[derive(Clone, Copy, Debug, Default)]
pub struct CursorManager;

impl ValueManager for CursorManager {
    fn property_name(&self) -> &'static str {
        "cursor"
    }

    fn is_inherited_property(&self) -> bool {
        true
    }

    fn default_value(&self) -> Value {
        Value::ident("auto")
    }

    fn create_value(&self, units: &[LexicalUnit], context: &CssContext) -> Result<Value, ValueError> {
        let property = self.property_name();
        let mut cursors = Vec::new();
        let mut rest = units;
        while let [LexicalUnit::Uri(uri), tail @ ..] = rest {
            cursors.push(Value::uri(uri, &context.resolve_uri(uri)));
            rest = match tail {
                [LexicalUnit::Comma, after_comma @ ..] if !after_comma.is_empty() => after_comma,
                [] | [LexicalUnit::Comma] => {
                    return Err(ValueError::MalformedLexicalUnit { property });
                }
                [other, ..] => return Err(invalid_unit(property, other)),
            };
        }
        match rest {
            [LexicalUnit::Ident(ident)] => cursors.push(keyword(property, CURSOR_KEYWORDS, ident)?),
            [] => return Err(ValueError::MalformedLexicalUnit { property }),
            [LexicalUnit::Ident(_), extra, ..] => return Err(invalid_unit(property, extra)),
            [other, ..] => return Err(invalid_unit(property, other)),
        }
        Ok(Value::list(ListSeparator::Comma, cursors))
    }
}

/// `color-profile`: `auto`, `sRGB`, a profile name or a profile reference.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColorProfileManager;

impl ValueManager for ColorProfileManager {
    fn property_name(&self) -> &'static str {
        "color-profile"
    }

    fn is_inherited_property(&self) -> bool {
        true
    }

    fn default_value(&self) -> Value {
        Value::ident("auto")
    }

    fn create_value(&self, units: &[LexicalUnit], context: &CssContext) -> Result<Value, ValueError> {
        match single_unit(self.property_name(), units)? {
            LexicalUnit::Ident(ident) => Ok(keyword(self.property_name(), &["auto", "sRGB"], ident)
                .unwrap_or_else(|_| Value::ident(ident))),
            LexicalUnit::Uri(uri) => Ok(Value::uri(uri, &context.resolve_uri(uri))),
            other => Err(invalid_unit(self.property_name(), other)),
        }
    }
}
