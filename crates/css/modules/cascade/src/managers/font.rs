//! Font properties. `font-size`, `font-weight` and `font-stretch` have keywords
//! resolved against the parent element.
//! See: <https://www.w3.org/TR/CSS2/fonts.html>

use super::{ComputeScope, ValueManager, create_length, invalid_unit, keyword, single_unit};
use crate::context::CssContext;
use crate::error::{CascadeError, ValueError};
use css_values_units::{LexicalUnit, ListSeparator, Unit, Value, absolute_length_px};

/// Ratio between adjacent absolute font-size keywords.
const FONT_SCALE: f64 = 1.2;

const FONT_SIZE_KEYWORDS: &[&str] = &[
    "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "larger", "smaller",
];

#[derive(Clone, Copy, Debug, Default)]
pub struct FontSizeManager;

impl FontSizeManager {
    /// The parent's computed font size, or the medium size at the root.
    fn parent_font_size(
        scope: &mut dyn ComputeScope,
        index: usize,
    ) -> Result<f32, CascadeError> {
        scope.style_map().put_parent_relative(index, true);
        let medium = scope.context().medium_font_size;
        Ok(scope
            .parent_value(index)?
            .and_then(|value| value.as_float())
            .unwrap_or(medium))
    }
}

/// Size of an absolute font-size keyword, picked by the characters at
/// positions 0 to 3 of the lowercase keyword.
fn keyword_font_size(medium: f32, keyword: &str) -> f32 {
    let medium = f64::from(medium);
    let bytes = keyword.as_bytes();
    let size = match bytes.first() {
        Some(b'm') => medium,
        Some(b's') => medium / FONT_SCALE,
        Some(b'l') => medium * FONT_SCALE,
        _ if bytes.get(1) == Some(&b'x') => {
            if bytes.get(3) == Some(&b's') {
                medium / FONT_SCALE / FONT_SCALE / FONT_SCALE
            } else {
                medium * FONT_SCALE * FONT_SCALE * FONT_SCALE
            }
        }
        _ if bytes.get(2) == Some(&b's') => medium / FONT_SCALE / FONT_SCALE,
        _ => medium * FONT_SCALE * FONT_SCALE,
    };
    size as f32
}

impl ValueManager for FontSizeManager {
    fn property_name(&self) -> &'static str {
        "font-size"
    }

    fn is_inherited_property(&self) -> bool {
        true
    }

    fn default_value(&self) -> Value {
        Value::ident("medium")
    }

    fn create_value(&self, units: &[LexicalUnit], _context: &CssContext) -> Result<Value, ValueError> {
        let property = self.property_name();
        match single_unit(property, units)? {
            LexicalUnit::Ident(ident) => keyword(property, FONT_SIZE_KEYWORDS, ident),
            unit => create_length(property, unit, true),
        }
    }

    fn compute_value(
        &self,
        scope: &mut dyn ComputeScope,
        index: usize,
        value: &Value,
    ) -> Result<Value, CascadeError> {
        let size = match value {
            Value::Ident(name) => match name.as_ref() {
                "larger" => Self::parent_font_size(scope, index)? * FONT_SCALE as f32,
                "smaller" => Self::parent_font_size(scope, index)? / FONT_SCALE as f32,
                other => keyword_font_size(scope.context().medium_font_size, other),
            },
            Value::Number(number) => match number.unit {
                Unit::Ems => number.value * Self::parent_font_size(scope, index)?,
                Unit::Exs => number.value * Self::parent_font_size(scope, index)? * 0.5,
                Unit::Percentage => number.value * Self::parent_font_size(scope, index)? / 100.0,
                unit => absolute_length_px(
                    number.value,
                    unit,
                    scope.context().pixel_unit_to_millimeter,
                )
                .unwrap_or(number.value),
            },
            _ => return Ok(value.clone()),
        };
        Ok(Value::number(size))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FontWeightManager;

impl ValueManager for FontWeightManager {
    fn property_name(&self) -> &'static str {
        "font-weight"
    }

    fn is_inherited_property(&self) -> bool {
        true
    }

    fn default_value(&self) -> Value {
        Value::ident("normal")
    }

    fn create_value(&self, units: &[LexicalUnit], _context: &CssContext) -> Result<Value, ValueError> {
        let property = self.property_name();
        match single_unit(property, units)? {
            LexicalUnit::Ident(ident) => {
                keyword(property, &["normal", "bold", "bolder", "lighter"], ident)
            }
            LexicalUnit::Integer(weight) if (100..=900).contains(weight) && weight % 100 == 0 => {
                Ok(Value::number(*weight as f32))
            }
            LexicalUnit::Integer(weight) => Err(ValueError::OutOfRange {
                property,
                value: *weight as f32,
            }),
            other => Err(invalid_unit(property, other)),
        }
    }

    fn compute_value(
        &self,
        scope: &mut dyn ComputeScope,
        index: usize,
        value: &Value,
    ) -> Result<Value, CascadeError> {
        let Some(name) = value.as_ident() else {
            return Ok(value.clone());
        };
        let weight = match name {
            "normal" => 400.0,
            "bold" => 700.0,
            relative => {
                scope.style_map().put_parent_relative(index, true);
                let parent = scope
                    .parent_value(index)?
                    .and_then(|parent| parent.as_float())
                    .unwrap_or(400.0);
                if relative == "bolder" {
                    scope.context().bolder_font_weight(parent)
                } else {
                    scope.context().lighter_font_weight(parent)
                }
            }
        };
        Ok(Value::number(weight))
    }
}

/// Widths from narrowest to widest.
const STRETCH_SCALE: [&str; 9] = [
    "ultra-condensed",
    "extra-condensed",
    "condensed",
    "semi-condensed",
    "normal",
    "semi-expanded",
    "expanded",
    "extra-expanded",
    "ultra-expanded",
];

#[derive(Clone, Copy, Debug, Default)]
pub struct FontStretchManager;

impl ValueManager for FontStretchManager {
    fn property_name(&self) -> &'static str {
        "font-stretch"
    }

    fn is_inherited_property(&self) -> bool {
        true
    }

    fn default_value(&self) -> Value {
        Value::ident("normal")
    }

    fn create_value(&self, units: &[LexicalUnit], _context: &CssContext) -> Result<Value, ValueError> {
        let property = self.property_name();
        match single_unit(property, units)? {
            LexicalUnit::Ident(ident) if ident.eq_ignore_ascii_case("wider") => {
                Ok(Value::ident("wider"))
            }
            LexicalUnit::Ident(ident) if ident.eq_ignore_ascii_case("narrower") => {
                Ok(Value::ident("narrower"))
            }
            LexicalUnit::Ident(ident) => keyword(property, &STRETCH_SCALE, ident),
            other => Err(invalid_unit(property, other)),
        }
    }

    fn compute_value(
        &self,
        scope: &mut dyn ComputeScope,
        index: usize,
        value: &Value,
    ) -> Result<Value, CascadeError> {
        let step: isize = match value.as_ident() {
            Some("wider") => 1,
            Some("narrower") => -1,
            _ => return Ok(value.clone()),
        };
        scope.style_map().put_parent_relative(index, true);
        let parent = scope.parent_value(index)?;
        let position = parent
            .as_ref()
            .and_then(Value::as_ident)
            .and_then(|name| STRETCH_SCALE.iter().position(|candidate| *candidate == name))
            .unwrap_or(4);
        let stepped = position.saturating_add_signed(step).min(STRETCH_SCALE.len() - 1);
        Ok(Value::ident(STRETCH_SCALE[stepped]))
    }
}

const GENERIC_FAMILIES: &[&str] = &["serif", "sans-serif", "cursive", "fantasy", "monospace"];

/// `font-family`: a comma-separated list of family names and generic families.
#[derive(Clone, Copy, Debug, Default)]
pub struct FontFamilyManager;

impl ValueManager for FontFamilyManager {
    fn property_name(&self) -> &'static str {
        "font-family"
    }

    fn is_inherited_property(&self) -> bool {
        true
    }

    fn default_value(&self) -> Value {
        Value::list(ListSeparator::Comma, vec![Value::string("Arial")])
    }

    fn create_value(&self, units: &[LexicalUnit], _context: &CssContext) -> Result<Value, ValueError> {
        let property = self.property_name();
        let mut families = Vec::new();
        for item in units.split(|unit| *unit == LexicalUnit::Comma) {
            let family = match item {
                [] => return Err(ValueError::MalformedLexicalUnit { property }),
                [LexicalUnit::String(name)] => Value::string(name),
                [LexicalUnit::Ident(name)] => GENERIC_FAMILIES
                    .iter()
                    .find(|generic| generic.eq_ignore_ascii_case(name))
                    .map_or_else(|| Value::string(name), |generic| Value::ident(generic)),
                words => {
                    let mut name = String::new();
                    for word in words {
                        let LexicalUnit::Ident(word) = word else {
                            return Err(invalid_unit(property, word));
                        };
                        if !name.is_empty() {
                            name.push(' ');
                        }
                        name.push_str(word);
                    }
                    Value::string(&name)
                }
            };
            families.push(family);
        }
        Ok(Value::list(ListSeparator::Comma, families))
    }
}

#[cfg(test)]
mod tests {
    use super::{FontFamilyManager, FontWeightManager, keyword_font_size};
    use crate::context::CssContext;
    use crate::managers::ValueManager;
    use css_values_units::parse_lexical_units;

    fn close(left: f32, right: f32) -> bool {
        (left - right).abs() < 0.001
    }

    #[test]
    fn keyword_sizes_scale_from_medium() {
        assert!(close(keyword_font_size(12.0, "medium"), 12.0));
        assert!(close(keyword_font_size(12.0, "small"), 10.0));
        assert!(close(keyword_font_size(12.0, "large"), 14.4));
        assert!(close(keyword_font_size(12.0, "x-small"), 8.333_333));
        assert!(close(keyword_font_size(12.0, "x-large"), 17.28));
        assert!(close(keyword_font_size(12.0, "xx-small"), 6.944_444));
        assert!(close(keyword_font_size(12.0, "xx-large"), 20.736));
    }

    #[test]
    fn weights_are_hundreds() {
        let context = CssContext::default();
        let create = |text: &str| {
            let units = parse_lexical_units(text).unwrap_or_default();
            FontWeightManager.create_declared_value(&units, &context)
        };
        assert!(create("700").is_ok());
        assert!(create("BOLDER").is_ok_and(|value| value.is_ident("bolder")));
        assert!(create("650").is_err());
        assert!(create("1000").is_err());
    }

    #[test]
    fn families_keep_strings_and_generics_apart() {
        let units = parse_lexical_units("\"Gill Sans\", Times New Roman, Serif").unwrap_or_default();
        let families = FontFamilyManager.create_declared_value(&units, &CssContext::default());
        assert_eq!(
            families.map(|value| value.to_string()),
            Ok("\"Gill Sans\", \"Times New Roman\", serif".to_owned())
        );
        let empty = parse_lexical_units("Arial,,serif").unwrap_or_default();
        assert!(
            FontFamilyManager
                .create_declared_value(&empty, &CssContext::default())
                .is_err()
        );
    }
}
