//! `clip` and `enable-background`, the properties built from groups of lengths.

use super::{
    ComputeScope, PercentBasis, ValueManager, compute_length, create_length, invalid_unit,
    keyword, single_unit,
};
use crate::context::CssContext;
use crate::error::{CascadeError, ValueError};
use css_values_units::{LexicalUnit, ListSeparator, RectValue, Value};
use std::sync::Arc;

/// `clip`: `auto` or `rect(top, right, bottom, left)`.
///
/// See: <https://www.w3.org/TR/CSS2/visufx.html#clipping>
#[derive(Clone, Copy, Debug, Default)]
pub struct ClipManager;

impl ClipManager {
    fn side(property: &'static str, unit: &LexicalUnit) -> Result<Value, ValueError> {
        match unit {
            LexicalUnit::Ident(ident) => keyword(property, &["auto"], ident),
            other => create_length(property, other, false),
        }
    }
}

impl ValueManager for ClipManager {
    fn property_name(&self) -> &'static str {
        "clip"
    }

    fn is_inherited_property(&self) -> bool {
        false
    }

    fn default_value(&self) -> Value {
        Value::ident("auto")
    }

    fn create_value(&self, units: &[LexicalUnit], _context: &CssContext) -> Result<Value, ValueError> {
        let property = self.property_name();
        match single_unit(property, units)? {
            LexicalUnit::Ident(ident) => keyword(property, &["auto"], ident),
            LexicalUnit::Function { name, parameters } if name == "rect" => {
                let sides: Vec<&LexicalUnit> = parameters
                    .iter()
                    .filter(|unit| **unit != LexicalUnit::Comma)
                    .collect();
                let [top, right, bottom, left] = sides.as_slice() else {
                    return Err(ValueError::MalformedLexicalUnit { property });
                };
                Ok(Value::Rect(Arc::new(RectValue {
                    top: Self::side(property, top)?,
                    right: Self::side(property, right)?,
                    bottom: Self::side(property, bottom)?,
                    left: Self::side(property, left)?,
                })))
            }
            other => Err(invalid_unit(property, other)),
        }
    }

    fn compute_value(
        &self,
        scope: &mut dyn ComputeScope,
        index: usize,
        value: &Value,
    ) -> Result<Value, CascadeError> {
        let Value::Rect(rect) = value else {
            return Ok(value.clone());
        };
        let mut side = |edge: &Value, basis| match edge.as_number() {
            Some(number) => compute_length(scope, index, number, basis),
            None => Ok(edge.clone()),
        };
        Ok(Value::Rect(Arc::new(RectValue {
            top: side(&rect.top, PercentBasis::ViewportHeight)?,
            right: side(&rect.right, PercentBasis::ViewportWidth)?,
            bottom: side(&rect.bottom, PercentBasis::ViewportHeight)?,
            left: side(&rect.left, PercentBasis::ViewportWidth)?,
        })))
    }
}

/// `enable-background`: `accumulate`, or `new` with an optional `x y width height`.
///
/// See: <https://www.w3.org/TR/SVG11/filters.html#EnableBackgroundProperty>
#[derive(Clone, Copy, Debug, Default)]
pub struct EnableBackgroundManager;

impl ValueManager for EnableBackgroundManager {
    fn property_name(&self) -> &'static str {
        "enable-background"
    }

    fn is_inherited_property(&self) -> bool {
        false
    }

    fn default_value(&self) -> Value {
        Value::ident("accumulate")
    }

    fn create_value(&self, units: &[LexicalUnit], _context: &CssContext) -> Result<Value, ValueError> {
        let property = self.property_name();
        let [first, region @ ..] = units else {
            return Err(ValueError::MalformedLexicalUnit { property });
        };
        let LexicalUnit::Ident(ident) = first else {
            return Err(invalid_unit(property, first));
        };
        let mode = keyword(property, &["accumulate", "new"], ident)?;
        if mode.is_ident("accumulate") {
            return match region.first() {
                Some(extra) => Err(invalid_unit(property, extra)),
                None => Ok(mode),
            };
        }
        let mut items = vec![mode];
        match region {
            [] => {}
            [_, _, _, _] => {
                for (position, unit) in region.iter().enumerate() {
                    let length = create_length(property, unit, false)?;
                    if let Some(size) =
                        length.as_float().filter(|size| position >= 2 && *size < 0.0)
                    {
                        return Err(ValueError::OutOfRange {
                            property,
                            value: size,
                        });
                    }
                    items.push(length);
                }
            }
            _ => return Err(ValueError::MalformedLexicalUnit { property }),
        }
        Ok(Value::list(ListSeparator::Space, items))
    }

    fn compute_value(
        &self,
        scope: &mut dyn ComputeScope,
        index: usize,
        value: &Value,
    ) -> Result<Value, CascadeError> {
        let Some(list) = value.as_list() else {
            return Ok(value.clone());
        };
        let mut items = Vec::with_capacity(list.len());
        for (position, item) in list.iter().enumerate() {
            let basis = if position % 2 == 1 {
                PercentBasis::ViewportWidth
            } else {
                PercentBasis::ViewportHeight
            };
            items.push(match item.as_number() {
                Some(number) => compute_length(scope, index, number, basis)?,
                None => item.clone(),
            });
        }
        Ok(Value::list(list.separator, items))
    }
}

#[cfg(test)]
mod tests {
    use super::{ClipManager, EnableBackgroundManager};
    use crate::context::CssContext;
    use crate::error::ValueError;
    use crate::managers::ValueManager;
    use css_values_units::{PrimitiveType, Value, parse_lexical_units};

    fn create(manager: &dyn ValueManager, text: &str) -> Result<Value, ValueError> {
        let units = parse_lexical_units(text).unwrap_or_default();
        manager.create_declared_value(&units, &CssContext::default())
    }

    #[test]
    fn clip_rectangles() {
        assert!(
            create(&ClipManager, "rect(1px, auto, 3mm, 4)")
                .is_ok_and(|value| value.primitive_type() == PrimitiveType::Rect)
        );
        assert!(create(&ClipManager, "rect(1px 2px 3px 4px)").is_ok());
        assert_eq!(
            create(&ClipManager, "rect(1px, 2px)"),
            Err(ValueError::MalformedLexicalUnit { property: "clip" })
        );
        assert_eq!(create(&ClipManager, "AUTO"), Ok(Value::ident("auto")));
    }

    #[test]
    fn background_regions() {
        assert_eq!(create(&EnableBackgroundManager, "accumulate"), Ok(Value::ident("accumulate")));
        assert!(
            create(&EnableBackgroundManager, "new")
                .is_ok_and(|value| value.as_list().is_some_and(|list| list.len() == 1))
        );
        assert!(
            create(&EnableBackgroundManager, "new 0 0 100 50")
                .is_ok_and(|value| value.to_string() == "new 0 0 100 50")
        );
        assert!(create(&EnableBackgroundManager, "new 0 0 100").is_err());
        assert!(create(&EnableBackgroundManager, "new 0 0 -1 5").is_err());
        assert!(create(&EnableBackgroundManager, "accumulate 1").is_err());
    }
}
