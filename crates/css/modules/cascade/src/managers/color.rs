//! Color and paint properties.
//! See: <https://www.w3.org/TR/SVG11/painting.html#SpecifyingPaint>

use super::{ComputeScope, ValueManager, invalid_unit, single_unit};
use crate::context::CssContext;
use crate::error::{CascadeError, ValueError};
use crate::registry::registry;
use css_values_units::{
    LexicalUnit, ListSeparator, NumberValue, Rgb, RgbValue, Unit, Value, named_color,
};

const CURRENT_COLOR: &str = "currentColor";

/// A property taking a color.
#[derive(Clone, Copy, Debug)]
pub struct ColorManager {
    pub name: &'static str,
    pub inherited: bool,
    pub initial: Rgb,
    /// `color` itself cannot refer to `currentColor`.
    pub allows_current_color: bool,
}

impl ColorManager {
    pub const COLOR: Self = Self {
        name: "color",
        inherited: true,
        initial: Rgb::new(0, 0, 0),
        allows_current_color: false,
    };
}

pub const COLOR_MANAGERS: &[ColorManager] = &[
    svg_color("flood-color", Rgb::new(0, 0, 0)),
    svg_color("lighting-color", Rgb::new(255, 255, 255)),
    svg_color("stop-color", Rgb::new(0, 0, 0)),
];

const fn svg_color(name: &'static str, initial: Rgb) -> ColorManager {
    ColorManager {
        name,
        inherited: false,
        initial,
        allows_current_color: true,
    }
}

/// `currentColor`, a color keyword or `rgb(...)`.
fn create_color(
    property: &'static str,
    unit: &LexicalUnit,
    allows_current_color: bool,
) -> Result<Value, ValueError> {
    match unit {
        LexicalUnit::Ident(ident)
            if allows_current_color && ident.eq_ignore_ascii_case(CURRENT_COLOR) =>
        {
            Ok(Value::ident(CURRENT_COLOR))
        }
        LexicalUnit::Ident(ident) => named_color(ident)
            .map(|_| Value::ident(&ident.to_ascii_lowercase()))
            .ok_or_else(|| ValueError::InvalidIdentifier {
                property,
                ident: ident.clone(),
            }),
        LexicalUnit::Function { name, parameters } if name == "rgb" => {
            create_rgb(property, parameters)
        }
        other => Err(invalid_unit(property, other)),
    }
}

fn create_rgb(property: &'static str, parameters: &[LexicalUnit]) -> Result<Value, ValueError> {
    let [red, LexicalUnit::Comma, green, LexicalUnit::Comma, blue] = parameters else {
        return Err(ValueError::MalformedLexicalUnit { property });
    };
    let component = |unit: &LexicalUnit| match unit.numeric() {
        Some((value, component_unit @ (Unit::Number | Unit::Percentage))) => {
            Ok(NumberValue::new(value, component_unit))
        }
        _ => Err(invalid_unit(property, unit)),
    };
    Ok(Value::Rgb(RgbValue {
        red: component(red)?,
        green: component(green)?,
        blue: component(blue)?,
    }))
}

/// Resolves keywords and percentage components to an rgb triple of numbers.
fn compute_color(
    scope: &mut dyn ComputeScope,
    index: usize,
    value: &Value,
) -> Result<Value, CascadeError> {
    match value {
        Value::Ident(name) if name.as_ref() == CURRENT_COLOR => {
            scope.style_map().put_color_relative(index, true);
            scope.own_value(registry().color_index())
        }
        Value::Ident(name) => Ok(named_color(name).map_or_else(
            || value.clone(),
            |color| Value::rgb(color.red, color.green, color.blue),
        )),
        Value::Rgb(color) => {
            let absolute = |component: NumberValue| match component.unit {
                Unit::Percentage => NumberValue::new(component.value * 255.0 / 100.0, Unit::Number),
                _ => component,
            };
            Ok(Value::Rgb(RgbValue {
                red: absolute(color.red),
                green: absolute(color.green),
                blue: absolute(color.blue),
            }))
        }
        _ => Ok(value.clone()),
    }
}

impl ValueManager for ColorManager {
    fn property_name(&self) -> &'static str {
        self.name
    }

    fn is_inherited_property(&self) -> bool {
        self.inherited
    }

    fn default_value(&self) -> Value {
        Value::rgb(self.initial.red, self.initial.green, self.initial.blue)
    }

    fn create_value(&self, units: &[LexicalUnit], _context: &CssContext) -> Result<Value, ValueError> {
        create_color(self.name, single_unit(self.name, units)?, self.allows_current_color)
    }

    fn compute_value(
        &self,
        scope: &mut dyn ComputeScope,
        index: usize,
        value: &Value,
    ) -> Result<Value, CascadeError> {
        compute_color(scope, index, value)
    }
}

/// `fill` and `stroke`: `none`, a color, or a paint server reference with an
/// optional fallback.
#[derive(Clone, Copy, Debug)]
pub struct PaintManager {
    pub name: &'static str,
    pub initial: Option<Rgb>,
}

pub const PAINT_MANAGERS: &[PaintManager] = &[
    PaintManager {
        name: "fill",
        initial: Some(Rgb::new(0, 0, 0)),
    },
    PaintManager {
        name: "stroke",
        initial: None,
    },
];

impl ValueManager for PaintManager {
    fn property_name(&self) -> &'static str {
        self.name
    }

    fn is_inherited_property(&self) -> bool {
        true
    }

    fn default_value(&self) -> Value {
        self.initial.map_or_else(
            || Value::ident("none"),
            |color| Value::rgb(color.red, color.green, color.blue),
        )
    }

    fn create_value(&self, units: &[LexicalUnit], context: &CssContext) -> Result<Value, ValueError> {
        let property = self.name;
        let paint = |unit: &LexicalUnit| match unit {
            LexicalUnit::Ident(ident) if ident.eq_ignore_ascii_case("none") => {
                Ok(Value::ident("none"))
            }
            other => create_color(property, other, true),
        };
        match units {
            [LexicalUnit::Uri(uri)] => Ok(Value::uri(uri, &context.resolve_uri(uri))),
            [LexicalUnit::Uri(uri), fallback] => Ok(Value::list(
                ListSeparator::Space,
                vec![Value::uri(uri, &context.resolve_uri(uri)), paint(fallback)?],
            )),
            _ => paint(single_unit(property, units)?),
        }
    }

    fn compute_value(
        &self,
        scope: &mut dyn ComputeScope,
        index: usize,
        value: &Value,
    ) -> Result<Value, CascadeError> {
        match value.as_list() {
            Some(list) => {
                let mut items = Vec::with_capacity(list.len());
                for item in list.iter() {
                    items.push(compute_color(scope, index, item)?);
                }
                Ok(Value::list(list.separator, items))
            }
            None => compute_color(scope, index, value),
        }
    }
}
