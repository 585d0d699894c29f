//! Length, number and angle properties.

use super::{
    ComputeScope, Initial, PercentBasis, ValueManager, compute_length, create_length,
    create_number, invalid_unit, keyword, single_unit,
};
use crate::context::CssContext;
use crate::error::{CascadeError, ValueError};
use css_values_units::{LexicalUnit, ListSeparator, Unit, Value, angle_degrees};

/// A property taking a length (or percentage) or one of a few keywords.
#[derive(Clone, Copy, Debug)]
pub struct LengthManager {
    pub name: &'static str,
    pub inherited: bool,
    pub initial: Initial,
    pub keywords: &'static [&'static str],
    pub basis: PercentBasis,
    pub non_negative: bool,
}

impl ValueManager for LengthManager {
    fn property_name(&self) -> &'static str {
        self.name
    }

    fn is_inherited_property(&self) -> bool {
        self.inherited
    }

    fn default_value(&self) -> Value {
        self.initial.to_value()
    }

    fn create_value(&self, units: &[LexicalUnit], _context: &CssContext) -> Result<Value, ValueError> {
        match single_unit(self.name, units)? {
            LexicalUnit::Ident(ident) => keyword(self.name, self.keywords, ident),
            unit => create_length(self.name, unit, self.non_negative),
        }
    }

    fn compute_value(
        &self,
        scope: &mut dyn ComputeScope,
        index: usize,
        value: &Value,
    ) -> Result<Value, CascadeError> {
        match value.as_number() {
            Some(number) => compute_length(scope, index, number, self.basis),
            None => Ok(value.clone()),
        }
    }
}

const fn length(
    name: &'static str,
    inherited: bool,
    initial: Initial,
    keywords: &'static [&'static str],
    basis: PercentBasis,
) -> LengthManager {
    LengthManager {
        name,
        inherited,
        initial,
        keywords,
        basis,
        non_negative: false,
    }
}

const fn non_negative(manager: LengthManager) -> LengthManager {
    LengthManager {
        non_negative: true,
        ..manager
    }
}

const ZERO: Initial = Initial::Number(0.0);

/// Length-valued properties, including the box longhands.
pub const LENGTH_MANAGERS: &[LengthManager] = &[
    non_negative(length(
        "stroke-width",
        true,
        Initial::Number(1.0),
        &[],
        PercentBasis::ViewportDiagonal,
    )),
    length("stroke-dashoffset", true, ZERO, &[], PercentBasis::ViewportDiagonal),
    length(
        "letter-spacing",
        true,
        Initial::Ident("normal"),
        &["normal"],
        PercentBasis::ViewportWidth,
    ),
    length(
        "word-spacing",
        true,
        Initial::Ident("normal"),
        &["normal"],
        PercentBasis::ViewportWidth,
    ),
    length("kerning", true, Initial::Ident("auto"), &["auto"], PercentBasis::ViewportWidth),
    length(
        "baseline-shift",
        false,
        Initial::Ident("baseline"),
        &["baseline", "sub", "super"],
        PercentBasis::FontSize,
    ),
    length("margin-top", false, ZERO, &[], PercentBasis::ViewportWidth),
    length("margin-right", false, ZERO, &[], PercentBasis::ViewportWidth),
    length("margin-bottom", false, ZERO, &[], PercentBasis::ViewportWidth),
    length("margin-left", false, ZERO, &[], PercentBasis::ViewportWidth),
    non_negative(length("padding-top", false, ZERO, &[], PercentBasis::ViewportWidth)),
    non_negative(length("padding-right", false, ZERO, &[], PercentBasis::ViewportWidth)),
    non_negative(length("padding-bottom", false, ZERO, &[], PercentBasis::ViewportWidth)),
    non_negative(length("padding-left", false, ZERO, &[], PercentBasis::ViewportWidth)),
];

/// A property taking a plain number or one of a few keywords.
#[derive(Clone, Copy, Debug)]
pub struct NumberManager {
    pub name: &'static str,
    pub inherited: bool,
    pub initial: Initial,
    pub keywords: &'static [&'static str],
    /// Smallest accepted number.
    pub minimum: Option<f32>,
}

impl ValueManager for NumberManager {
    fn property_name(&self) -> &'static str {
        self.name
    }

    fn is_inherited_property(&self) -> bool {
        self.inherited
    }

    fn default_value(&self) -> Value {
        self.initial.to_value()
    }

    fn create_value(&self, units: &[LexicalUnit], _context: &CssContext) -> Result<Value, ValueError> {
        let unit = single_unit(self.name, units)?;
        if let LexicalUnit::Ident(ident) = unit {
            return keyword(self.name, self.keywords, ident);
        }
        let number = create_number(self.name, unit)?;
        match (number.as_float(), self.minimum) {
            (Some(value), Some(minimum)) if value < minimum => Err(ValueError::OutOfRange {
                property: self.name,
                value,
            }),
            _ => Ok(number),
        }
    }
}

const fn number(name: &'static str, inherited: bool, initial: f32) -> NumberManager {
    NumberManager {
        name,
        inherited,
        initial: Initial::Number(initial),
        keywords: &[],
        minimum: None,
    }
}

pub const NUMBER_MANAGERS: &[NumberManager] = &[
    number("opacity", false, 1.0),
    number("fill-opacity", true, 1.0),
    number("stroke-opacity", true, 1.0),
    number("flood-opacity", false, 1.0),
    number("stop-opacity", false, 1.0),
    NumberManager {
        minimum: Some(1.0),
        ..number("stroke-miterlimit", true, 4.0)
    },
    NumberManager {
        initial: Initial::Ident("none"),
        keywords: &["none"],
        ..number("font-size-adjust", true, 0.0)
    },
];

/// A property taking an angle or one of a few keywords; angles compute to degrees.
#[derive(Clone, Copy, Debug)]
pub struct AngleManager {
    pub name: &'static str,
    pub inherited: bool,
    pub initial: Initial,
    pub keywords: &'static [&'static str],
}

impl ValueManager for AngleManager {
    fn property_name(&self) -> &'static str {
        self.name
    }

    fn is_inherited_property(&self) -> bool {
        self.inherited
    }

    fn default_value(&self) -> Value {
        match self.initial {
            Initial::Number(degrees) => Value::float(degrees, Unit::Degrees),
            Initial::Ident(_) => self.initial.to_value(),
        }
    }

    fn create_value(&self, units: &[LexicalUnit], _context: &CssContext) -> Result<Value, ValueError> {
        let unit = single_unit(self.name, units)?;
        if let LexicalUnit::Ident(ident) = unit {
            return keyword(self.name, self.keywords, ident);
        }
        unit.numeric()
            .filter(|(_, angle_unit)| angle_unit.is_angle() || *angle_unit == Unit::Number)
            .map(|(value, angle_unit)| Value::float(value, angle_unit))
            .ok_or_else(|| invalid_unit(self.name, unit))
    }

    fn compute_value(
        &self,
        _scope: &mut dyn ComputeScope,
        _index: usize,
        value: &Value,
    ) -> Result<Value, CascadeError> {
        Ok(value
            .as_number()
            .and_then(|number| angle_degrees(number.value, number.unit))
            .map_or_else(|| value.clone(), |degrees| Value::float(degrees, Unit::Degrees)))
    }
}

pub const ANGLE_MANAGERS: &[AngleManager] = &[
    AngleManager {
        name: "glyph-orientation-horizontal",
        inherited: true,
        initial: Initial::Number(0.0),
        keywords: &[],
    },
    AngleManager {
        name: "glyph-orientation-vertical",
        inherited: true,
        initial: Initial::Ident("auto"),
        keywords: &["auto"],
    },
];

/// `stroke-dasharray`: `none` or a list of non-negative lengths.
#[derive(Clone, Copy, Debug, Default)]
pub struct DashArrayManager;

impl ValueManager for DashArrayManager {
    fn property_name(&self) -> &'static str {
        "stroke-dasharray"
    }

    fn is_inherited_property(&self) -> bool {
        true
    }

    fn default_value(&self) -> Value {
        Value::ident("none")
    }

    fn create_value(&self, units: &[LexicalUnit], _context: &CssContext) -> Result<Value, ValueError> {
        let property = self.property_name();
        if let [LexicalUnit::Ident(ident)] = units {
            return keyword(property, &["none"], ident);
        }
        let mut dashes = Vec::with_capacity(units.len());
        let mut expect_length = true;
        for unit in units {
            match unit {
                LexicalUnit::Comma if !expect_length => expect_length = true,
                LexicalUnit::Comma => return Err(ValueError::MalformedLexicalUnit { property }),
                other => {
                    dashes.push(create_length(property, other, true)?);
                    expect_length = false;
                }
            }
        }
        if expect_length {
            return Err(ValueError::MalformedLexicalUnit { property });
        }
        Ok(Value::list(ListSeparator::Comma, dashes))
    }

    fn compute_value(
        &self,
        scope: &mut dyn ComputeScope,
        index: usize,
        value: &Value,
    ) -> Result<Value, CascadeError> {
        let Some(dashes) = value.as_list() else {
            return Ok(value.clone());
        };
        let mut computed = Vec::with_capacity(dashes.len());
        for dash in dashes.iter() {
            computed.push(match dash.as_number() {
                Some(number) => {
                    compute_length(scope, index, number, PercentBasis::ViewportDiagonal)?
                }
                None => dash.clone(),
            });
        }
        Ok(Value::list(dashes.separator, computed))
    }
}
