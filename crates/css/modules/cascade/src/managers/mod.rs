//! Value managers: one per property, turning lexical units into declared values
//! and declared values into computed values.
//!
//! Managers are stateless and shared by every engine; per-element state is
//! reached through [`ComputeScope`].

use crate::context::CssContext;
use crate::error::{CascadeError, ValueError};
use crate::registry::registry;
use crate::style_map::StyleMap;
use css_values_units::{LexicalUnit, NumberValue, Unit, Value, absolute_length_px};

pub mod color;
pub mod font;
pub mod identifier;
pub mod length;
pub mod reference;
pub mod shape;

/// Element-side view handed to [`ValueManager::compute_value`].
///
/// Every read goes through the engine, which records it as a dependency of the
/// value being computed.
pub trait ComputeScope {
    fn context(&self) -> &CssContext;

    /// Whether the element has a parent element to inherit from.
    fn has_parent(&self) -> bool;

    /// Computed value of property `index` on the parent element, `None` at the root.
    ///
    /// # Errors
    /// Propagates failures resolving the parent's value.
    fn parent_value(&mut self, index: usize) -> Result<Option<Value>, CascadeError>;

    /// Computed value of another property of the same element.
    ///
    /// # Errors
    /// Propagates failures resolving that property, including cycles.
    fn own_value(&mut self, index: usize) -> Result<Value, CascadeError>;

    /// Style map of the element being computed, for relative-value flags.
    fn style_map(&mut self) -> &mut StyleMap;
}

/// Creates and computes values of a single property.
pub trait ValueManager: Send + Sync {
    /// Lowercase property name.
    fn property_name(&self) -> &'static str;

    fn is_inherited_property(&self) -> bool;

    /// Value used when no declaration applies and nothing is inherited.
    fn default_value(&self) -> Value;

    /// Applies the property grammar to a lexical-unit chain.
    ///
    /// # Errors
    /// Returns a [`ValueError`] when the chain does not fit the grammar.
    fn create_value(&self, units: &[LexicalUnit], context: &CssContext)
    -> Result<Value, ValueError>;

    /// Like [`ValueManager::create_value`], with `inherit` handled for every property.
    ///
    /// # Errors
    /// Returns `MalformedLexicalUnit` for an empty chain, otherwise whatever
    /// `create_value` returns.
    fn create_declared_value(
        &self,
        units: &[LexicalUnit],
        context: &CssContext,
    ) -> Result<Value, ValueError> {
        match units {
            [LexicalUnit::Inherit] => Ok(Value::Inherit),
            [] => Err(ValueError::MalformedLexicalUnit {
                property: self.property_name(),
            }),
            _ => self.create_value(units, context),
        }
    }

    /// Turns a declared value into the computed value for the scope's element.
    ///
    /// # Errors
    /// Propagates failures reading other computed values.
    fn compute_value(
        &self,
        _scope: &mut dyn ComputeScope,
        _index: usize,
        value: &Value,
    ) -> Result<Value, CascadeError> {
        Ok(value.clone())
    }
}

/// Default value description usable in `const` manager tables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Initial {
    Number(f32),
    Ident(&'static str),
}

impl Initial {
    pub fn to_value(self) -> Value {
        match self {
            Self::Number(number) => Value::number(number),
            Self::Ident(name) => Value::ident(name),
        }
    }
}

/// What a percentage of a length property refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PercentBasis {
    ViewportWidth,
    ViewportHeight,
    /// Normalized viewport diagonal, for lengths with no orientation.
    ViewportDiagonal,
    /// The element's own computed font size.
    FontSize,
}

/// The only unit of a single-unit property.
pub(crate) fn single_unit<'units>(
    property: &'static str,
    units: &'units [LexicalUnit],
) -> Result<&'units LexicalUnit, ValueError> {
    match units {
        [unit] => Ok(unit),
        [] => Err(ValueError::MalformedLexicalUnit { property }),
        [_, extra, ..] => Err(ValueError::InvalidLexicalUnit {
            property,
            kind: extra.kind(),
        }),
    }
}

/// Looks `ident` up in `keywords` ignoring ASCII case; the result carries the
/// table's spelling.
pub(crate) fn keyword(
    property: &'static str,
    keywords: &[&'static str],
    ident: &str,
) -> Result<Value, ValueError> {
    keywords
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(ident))
        .map(|candidate| Value::ident(candidate))
        .ok_or_else(|| ValueError::InvalidIdentifier {
            property,
            ident: ident.to_owned(),
        })
}

pub(crate) fn invalid_unit(property: &'static str, unit: &LexicalUnit) -> ValueError {
    ValueError::InvalidLexicalUnit {
        property,
        kind: unit.kind(),
    }
}

/// A length or percentage unit as a declared value.
pub(crate) fn create_length(
    property: &'static str,
    unit: &LexicalUnit,
    non_negative: bool,
) -> Result<Value, ValueError> {
    let (value, length_unit) = unit
        .numeric()
        .filter(|(_, length_unit)| length_unit.is_length() || *length_unit == Unit::Percentage)
        .ok_or_else(|| invalid_unit(property, unit))?;
    if non_negative && value < 0.0 {
        return Err(ValueError::OutOfRange { property, value });
    }
    Ok(Value::float(value, length_unit))
}

/// A plain number as a declared value.
pub(crate) fn create_number(property: &'static str, unit: &LexicalUnit) -> Result<Value, ValueError> {
    match unit {
        LexicalUnit::Integer(value) => Ok(Value::number(*value as f32)),
        LexicalUnit::Real(value) => Ok(Value::number(*value)),
        other => Err(invalid_unit(property, other)),
    }
}

/// Computed font size of the scope's element.
pub(crate) fn own_font_size(scope: &mut dyn ComputeScope) -> Result<f32, CascadeError> {
    let value = scope.own_value(registry().font_size_index())?;
    Ok(value.as_float().unwrap_or(scope.context().medium_font_size))
}

/// Converts a length to pixels, flagging the entry when the result depends on
/// the font size or the viewport.
///
/// # Errors
/// Propagates failures reading the element's font size.
pub fn compute_length(
    scope: &mut dyn ComputeScope,
    index: usize,
    number: NumberValue,
    basis: PercentBasis,
) -> Result<Value, CascadeError> {
    let NumberValue { value, unit } = number;
    let pixels = match unit {
        Unit::Number | Unit::Pixels | Unit::Degrees | Unit::Radians | Unit::Gradians => {
            return Ok(Value::Number(number));
        }
        Unit::Millimeters | Unit::Centimeters | Unit::Inches | Unit::Points | Unit::Picas => {
            absolute_length_px(value, unit, scope.context().pixel_unit_to_millimeter)
                .unwrap_or(value)
        }
        Unit::Ems => {
            scope.style_map().put_font_size_relative(index, true);
            value * own_font_size(scope)?
        }
        Unit::Exs => {
            scope.style_map().put_font_size_relative(index, true);
            value * own_font_size(scope)? * 0.5
        }
        Unit::Percentage => percentage_of(scope, index, value, basis)?,
    };
    Ok(Value::number(pixels))
}

fn percentage_of(
    scope: &mut dyn ComputeScope,
    index: usize,
    percentage: f32,
    basis: PercentBasis,
) -> Result<f32, CascadeError> {
    let reference = match basis {
        PercentBasis::ViewportWidth => {
            scope.style_map().put_block_width_relative(index, true);
            scope.context().viewport_width
        }
        PercentBasis::ViewportHeight => {
            scope.style_map().put_block_height_relative(index, true);
            scope.context().viewport_height
        }
        PercentBasis::ViewportDiagonal => {
            let map = scope.style_map();
            map.put_block_width_relative(index, true);
            map.put_block_height_relative(index, true);
            scope.context().viewport_diagonal()
        }
        PercentBasis::FontSize => {
            scope.style_map().put_font_size_relative(index, true);
            own_font_size(scope)?
        }
    };
    Ok(percentage * reference / 100.0)
}
