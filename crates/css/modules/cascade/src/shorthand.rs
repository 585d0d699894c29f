//! Shorthand properties, expanded into their longhands at declaration time.

use crate::context::CssContext;
use crate::error::ValueError;
use crate::registry::ValueManagerRegistry;
use core::slice;
use css_values_units::{LexicalUnit, Value};

/// Receives the longhand declarations a shorthand expands into.
pub trait PropertyHandler {
    fn property(&mut self, name: &'static str, value: Value, important: bool);
}

impl<F: FnMut(&'static str, Value, bool)> PropertyHandler for F {
    fn property(&mut self, name: &'static str, value: Value, important: bool) {
        self(name, value, important);
    }
}

/// Expands one shorthand property.
pub trait ShorthandManager: Send + Sync {
    fn property_name(&self) -> &'static str;

    /// Longhands this shorthand sets.
    fn longhands(&self) -> &[&'static str];

    /// Creates every longhand value, then reports them to `handler`.
    ///
    /// Nothing reaches `handler` when any part is rejected.
    ///
    /// # Errors
    /// Returns the first [`ValueError`] raised by the shorthand's grammar or by a
    /// longhand manager.
    fn set_values(
        &self,
        registry: &ValueManagerRegistry,
        context: &CssContext,
        handler: &mut dyn PropertyHandler,
        units: &[LexicalUnit],
        important: bool,
    ) -> Result<(), ValueError>;
}

/// Creates `units` with the manager of `longhand`.
fn create_longhand(
    registry: &ValueManagerRegistry,
    context: &CssContext,
    shorthand: &'static str,
    longhand: &str,
    units: &[LexicalUnit],
) -> Result<Value, ValueError> {
    registry
        .manager_by_name(longhand)
        .ok_or(ValueError::MalformedLexicalUnit {
            property: shorthand,
        })?
        .create_value(units, context)
}

/// `margin` and `padding`: one to four values assigned clockwise from the top.
///
/// See: <https://www.w3.org/TR/CSS2/box.html#propdef-margin>
#[derive(Clone, Copy, Debug)]
pub struct BoxShorthandManager {
    pub name: &'static str,
    /// Longhands in top, right, bottom, left order.
    pub sides: [&'static str; 4],
}

pub const BOX_SHORTHANDS: [BoxShorthandManager; 2] = [
    BoxShorthandManager {
        name: "margin",
        sides: ["margin-top", "margin-right", "margin-bottom", "margin-left"],
    },
    BoxShorthandManager {
        name: "padding",
        sides: ["padding-top", "padding-right", "padding-bottom", "padding-left"],
    },
];

impl ShorthandManager for BoxShorthandManager {
    fn property_name(&self) -> &'static str {
        self.name
    }

    fn longhands(&self) -> &[&'static str] {
        &self.sides
    }

    fn set_values(
        &self,
        registry: &ValueManagerRegistry,
        context: &CssContext,
        handler: &mut dyn PropertyHandler,
        units: &[LexicalUnit],
        important: bool,
    ) -> Result<(), ValueError> {
        let property = self.name;
        if let [LexicalUnit::Inherit] = units {
            for side in self.sides {
                handler.property(side, Value::Inherit, important);
            }
            return Ok(());
        }
        if units.is_empty() {
            return Err(ValueError::MalformedLexicalUnit { property });
        }
        if let Some(unit) = units
            .iter()
            .enumerate()
            .find(|(position, unit)| {
                *position >= self.sides.len()
                    || matches!(unit, LexicalUnit::Comma | LexicalUnit::Slash | LexicalUnit::Inherit)
            })
            .map(|(_, unit)| unit)
        {
            return Err(ValueError::InvalidLexicalUnit {
                property,
                kind: unit.kind(),
            });
        }
        let mut values = Vec::with_capacity(units.len());
        for (unit, side) in units.iter().zip(self.sides) {
            values.push(create_longhand(
                registry,
                context,
                property,
                side,
                slice::from_ref(unit),
            )?);
        }
        let [top, right, bottom, left] = match values.as_slice() {
            [all] => [all, all, all, all],
            [vertical, horizontal] => [vertical, horizontal, vertical, horizontal],
            [top, horizontal, bottom] => [top, horizontal, bottom, horizontal],
            [top, right, bottom, left] => [top, right, bottom, left],
            _ => return Err(ValueError::MalformedLexicalUnit { property }),
        };
        for (side, value) in self.sides.into_iter().zip([top, right, bottom, left]) {
            handler.property(side, value.clone(), important);
        }
        Ok(())
    }
}

/// `marker`: sets the start, mid and end markers at once.
///
/// See: <https://www.w3.org/TR/SVG11/painting.html#MarkerProperty>
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkerShorthandManager;

const MARKERS: [&str; 3] = ["marker-start", "marker-mid", "marker-end"];

impl ShorthandManager for MarkerShorthandManager {
    fn property_name(&self) -> &'static str {
        "marker"
    }

    fn longhands(&self) -> &[&'static str] {
        &MARKERS
    }

    fn set_values(
        &self,
        registry: &ValueManagerRegistry,
        context: &CssContext,
        handler: &mut dyn PropertyHandler,
        units: &[LexicalUnit],
        important: bool,
    ) -> Result<(), ValueError> {
        let value = match units {
            [LexicalUnit::Inherit] => Value::Inherit,
            _ => create_longhand(registry, context, self.property_name(), MARKERS[0], units)?,
        };
        for marker in MARKERS {
            handler.property(marker, value.clone(), important);
        }
        Ok(())
    }
}
