//! Immutable CSS values produced by value managers.
//!
//! Values are shared freely between rules, style maps and threads; text and
//! composite payloads sit behind `Arc`, so cloning never copies them.

use crate::Unit;
use core::fmt;
use std::sync::Arc;

/// A number with its unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumberValue {
    pub value: f32,
    pub unit: Unit,
}

impl NumberValue {
    pub const fn new(value: f32, unit: Unit) -> Self {
        Self { value, unit }
    }
}

/// `rgb(red, green, blue)`; components are numbers (0 to 255) or percentages.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RgbValue {
    pub red: NumberValue,
    pub green: NumberValue,
    pub blue: NumberValue,
}

impl RgbValue {
    /// A color from integral components.
    pub fn from_components(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: NumberValue::new(f32::from(red), Unit::Number),
            green: NumberValue::new(f32::from(green), Unit::Number),
            blue: NumberValue::new(f32::from(blue), Unit::Number),
        }
    }
}

/// `rect(top, right, bottom, left)`; each side is a length or `auto`.
#[derive(Clone, Debug, PartialEq)]
pub struct RectValue {
    pub top: Value,
    pub right: Value,
    pub bottom: Value,
    pub left: Value,
}

/// Separator between list items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListSeparator {
    Space,
    Comma,
}

/// An ordered list of values.
#[derive(Clone, Debug, PartialEq)]
pub struct ListValue {
    pub separator: ListSeparator,
    pub items: Arc<[Value]>,
}

impl ListValue {
    pub fn new(separator: ListSeparator, items: Vec<Value>) -> Self {
        Self {
            separator,
            items: items.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }
}

/// Primitive type discriminator, as seen by style consumers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Float(Unit),
    Ident,
    String,
    Uri,
    RgbColor,
    Rect,
    List,
    Inherit,
}

/// A CSS value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(NumberValue),
    /// A keyword.
    Ident(Arc<str>),
    /// A plain string, such as a quoted font family.
    String(Arc<str>),
    /// A URI; `resolved` is absolute when a base was known.
    Uri {
        specified: Arc<str>,
        resolved: Arc<str>,
    },
    Rgb(RgbValue),
    Rect(Arc<RectValue>),
    List(ListValue),
    /// The `inherit` keyword.
    Inherit,
}

impl Value {
    pub const fn number(value: f32) -> Self {
        Self::Number(NumberValue::new(value, Unit::Number))
    }

    pub const fn float(value: f32, unit: Unit) -> Self {
        Self::Number(NumberValue::new(value, unit))
    }

    pub fn ident(name: &str) -> Self {
        Self::Ident(Arc::from(name))
    }

    pub fn string(text: &str) -> Self {
        Self::String(Arc::from(text))
    }

    pub fn uri(specified: &str, resolved: &str) -> Self {
        Self::Uri {
            specified: Arc::from(specified),
            resolved: Arc::from(resolved),
        }
    }

    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::Rgb(RgbValue::from_components(red, green, blue))
    }

    pub fn list(separator: ListSeparator, items: Vec<Self>) -> Self {
        Self::List(ListValue::new(separator, items))
    }

    pub const fn primitive_type(&self) -> PrimitiveType {
        match self {
            Self::Number(number) => PrimitiveType::Float(number.unit),
            Self::Ident(_) => PrimitiveType::Ident,
            Self::String(_) => PrimitiveType::String,
            Self::Uri { .. } => PrimitiveType::Uri,
            Self::Rgb(_) => PrimitiveType::RgbColor,
            Self::Rect(_) => PrimitiveType::Rect,
            Self::List(_) => PrimitiveType::List,
            Self::Inherit => PrimitiveType::Inherit,
        }
    }

    /// The numeric payload, whatever its unit.
    pub const fn as_float(&self) -> Option<f32> {
        match self {
            Self::Number(number) => Some(number.value),
            _ => None,
        }
    }

    pub const fn as_number(&self) -> Option<NumberValue> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Self::Ident(name) => Some(name.as_ref()),
            _ => None,
        }
    }

    /// True for the keyword `name`, compared exactly.
    pub fn is_ident(&self, name: &str) -> bool {
        self.as_ident() == Some(name)
    }

    pub const fn as_list(&self) -> Option<&ListValue> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    pub const fn is_inherit(&self) -> bool {
        matches!(self, Self::Inherit)
    }
}

impl fmt::Display for NumberValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}{}", self.value, self.unit.suffix())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(formatter, "{number}"),
            Self::Ident(name) => formatter.write_str(name),
            Self::String(text) => write!(formatter, "\"{}\"", text.replace('"', "\\\"")),
            Self::Uri { specified, .. } => write!(formatter, "url({specified})"),
            Self::Rgb(color) => write!(
                formatter,
                "rgb({}, {}, {})",
                color.red, color.green, color.blue
            ),
            Self::Rect(rect) => write!(
                formatter,
                "rect({}, {}, {}, {})",
                rect.top, rect.right, rect.bottom, rect.left
            ),
            Self::List(list) => {
                let separator = match list.separator {
                    ListSeparator::Space => " ",
                    ListSeparator::Comma => ", ",
                };
                for (index, item) in list.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(separator)?;
                    }
                    write!(formatter, "{item}")?;
                }
                Ok(())
            }
            Self::Inherit => formatter.write_str("inherit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ListSeparator, PrimitiveType, Value};
    use crate::Unit;

    #[test]
    fn css_text_serialization() {
        assert_eq!(Value::float(12.5, Unit::Pixels).to_string(), "12.5px");
        assert_eq!(Value::float(50.0, Unit::Percentage).to_string(), "50%");
        assert_eq!(Value::rgb(255, 0, 0).to_string(), "rgb(255, 0, 0)");
        let families = Value::list(
            ListSeparator::Comma,
            vec![Value::string("Times New Roman"), Value::ident("serif")],
        );
        assert_eq!(families.to_string(), "\"Times New Roman\", serif");
    }

    #[test]
    fn primitive_types_distinguish_strings() {
        assert_eq!(Value::ident("auto").primitive_type(), PrimitiveType::Ident);
        assert_eq!(Value::string("auto").primitive_type(), PrimitiveType::String);
        assert_eq!(Value::uri("a.svg", "a.svg").primitive_type(), PrimitiveType::Uri);
        assert_eq!(
            Value::float(1.0, Unit::Ems).primitive_type(),
            PrimitiveType::Float(Unit::Ems)
        );
        assert_ne!(Value::ident("auto"), Value::string("auto"));
    }
}
