//! Lexical units: the parsed form of a declaration value before any property
//! grammar is applied.
//! See: <https://www.w3.org/TR/CSS2/syndata.html#values>

use crate::chapter_9_colors::parse_hex_color;
use crate::{ParseError, Unit};
use core::fmt;
use cssparser::{ParseError as CssParseError, Parser, ParserInput, Token};

/// One lexical unit. A declaration value is a chain (slice) of these.
#[derive(Clone, Debug, PartialEq)]
pub enum LexicalUnit {
    Inherit,
    Ident(String),
    String(String),
    Uri(String),
    Integer(i32),
    Real(f32),
    Dimension { value: f32, unit: Unit },
    /// Percentage in the 0 to 100 range.
    Percentage(f32),
    Comma,
    Slash,
    /// `name(parameters)`; hex colors arrive as `rgb(...)`.
    Function {
        name: String,
        parameters: Vec<LexicalUnit>,
    },
}

/// Discriminant of a [`LexicalUnit`], used in error reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LexicalUnitKind {
    Inherit,
    Ident,
    String,
    Uri,
    Integer,
    Real,
    Dimension,
    Percentage,
    Comma,
    Slash,
    Function,
}

impl LexicalUnit {
    pub const fn kind(&self) -> LexicalUnitKind {
        match self {
            Self::Inherit => LexicalUnitKind::Inherit,
            Self::Ident(_) => LexicalUnitKind::Ident,
            Self::String(_) => LexicalUnitKind::String,
            Self::Uri(_) => LexicalUnitKind::Uri,
            Self::Integer(_) => LexicalUnitKind::Integer,
            Self::Real(_) => LexicalUnitKind::Real,
            Self::Dimension { .. } => LexicalUnitKind::Dimension,
            Self::Percentage(_) => LexicalUnitKind::Percentage,
            Self::Comma => LexicalUnitKind::Comma,
            Self::Slash => LexicalUnitKind::Slash,
            Self::Function { .. } => LexicalUnitKind::Function,
        }
    }

    /// Numeric payload and unit of integer, real, dimension and percentage units.
    pub fn numeric(&self) -> Option<(f32, Unit)> {
        match self {
            Self::Integer(value) => Some((*value as f32, Unit::Number)),
            Self::Real(value) => Some((*value, Unit::Number)),
            Self::Dimension { value, unit } => Some((*value, *unit)),
            Self::Percentage(value) => Some((*value, Unit::Percentage)),
            _ => None,
        }
    }
}

impl fmt::Display for LexicalUnitKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Inherit => "inherit",
            Self::Ident => "identifier",
            Self::String => "string",
            Self::Uri => "uri",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Dimension => "dimension",
            Self::Percentage => "percentage",
            Self::Comma => "comma",
            Self::Slash => "slash",
            Self::Function => "function",
        };
        formatter.write_str(name)
    }
}

/// Parse a declaration value into a lexical-unit chain.
///
/// # Errors
/// Returns `ParseError::UnexpectedToken` for tokens with no lexical-unit form,
/// `ParseError::UnknownUnit` for dimensions outside the supported units and
/// `ParseError::Empty` when the text holds no units at all.
pub fn parse_lexical_units(text: &str) -> Result<Vec<LexicalUnit>, ParseError> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let units = parse_chain(&mut parser)?;
    if units.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(units)
}

fn parse_chain(input: &mut Parser<'_, '_>) -> Result<Vec<LexicalUnit>, ParseError> {
    let mut units = Vec::new();
    loop {
        let token = match input.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        let unit = match token {
            Token::Ident(name) => {
                if name.eq_ignore_ascii_case("inherit") {
                    LexicalUnit::Inherit
                } else {
                    LexicalUnit::Ident(name.to_string())
                }
            }
            Token::QuotedString(text) => LexicalUnit::String(text.to_string()),
            Token::UnquotedUrl(url) => LexicalUnit::Uri(url.to_string()),
            Token::Number {
                int_value: Some(int_value),
                ..
            } => LexicalUnit::Integer(int_value),
            Token::Number { value, .. } => LexicalUnit::Real(value),
            Token::Percentage {
                unit_value,
                int_value,
                ..
            } => LexicalUnit::Percentage(
                int_value.map_or(unit_value * 100.0, |whole| whole as f32),
            ),
            Token::Dimension { value, unit, .. } => LexicalUnit::Dimension {
                value,
                unit: Unit::from_dimension(unit.as_ref())
                    .ok_or_else(|| ParseError::UnknownUnit(unit.to_string()))?,
            },
            Token::Hash(digits) | Token::IDHash(digits) => hex_color_unit(digits.as_ref())?,
            Token::Comma => LexicalUnit::Comma,
            Token::Delim('/') => LexicalUnit::Slash,
            Token::Function(name) => {
                let nested: Result<Result<Vec<LexicalUnit>, ParseError>, CssParseError<'_, ()>> =
                    input.parse_nested_block(|block| Ok(parse_chain(block)));
                let parameters = nested.map_err(|_| ParseError::UnexpectedToken(name.to_string()))??;
                function_unit(name.as_ref(), parameters)?
            }
            other => return Err(ParseError::UnexpectedToken(format!("{other:?}"))),
        };
        units.push(unit);
    }
    Ok(units)
}

/// `url("...")` collapses into a URI unit; other functions keep their parameters.
fn function_unit(name: &str, parameters: Vec<LexicalUnit>) -> Result<LexicalUnit, ParseError> {
    if name.eq_ignore_ascii_case("url") {
        return match parameters.as_slice() {
            [LexicalUnit::String(url)] => Ok(LexicalUnit::Uri(url.clone())),
            _ => Err(ParseError::UnexpectedToken("url".to_owned())),
        };
    }
    Ok(LexicalUnit::Function {
        name: name.to_ascii_lowercase(),
        parameters,
    })
}

/// `#rgb` and `#rrggbb` become `rgb(r, g, b)` with integer components.
fn hex_color_unit(digits: &str) -> Result<LexicalUnit, ParseError> {
    let color =
        parse_hex_color(digits).ok_or_else(|| ParseError::UnexpectedToken(format!("#{digits}")))?;
    Ok(LexicalUnit::Function {
        name: "rgb".to_owned(),
        parameters: vec![
            LexicalUnit::Integer(i32::from(color.red)),
            LexicalUnit::Comma,
            LexicalUnit::Integer(i32::from(color.green)),
            LexicalUnit::Comma,
            LexicalUnit::Integer(i32::from(color.blue)),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::{LexicalUnit, parse_lexical_units};
    use crate::{ParseError, Unit};

    #[test]
    fn numbers_dimensions_and_percentages() {
        assert_eq!(
            parse_lexical_units("4px 1.5em 50% 3 0.5"),
            Ok(vec![
                LexicalUnit::Dimension {
                    value: 4.0,
                    unit: Unit::Pixels
                },
                LexicalUnit::Dimension {
                    value: 1.5,
                    unit: Unit::Ems
                },
                LexicalUnit::Percentage(50.0),
                LexicalUnit::Integer(3),
                LexicalUnit::Real(0.5),
            ])
        );
    }

    #[test]
    fn uris_and_hex_colors() {
        assert_eq!(
            parse_lexical_units("url(a.svg#m), url(\"b.svg\") pointer"),
            Ok(vec![
                LexicalUnit::Uri("a.svg#m".to_owned()),
                LexicalUnit::Comma,
                LexicalUnit::Uri("b.svg".to_owned()),
                LexicalUnit::Ident("pointer".to_owned()),
            ])
        );
        assert!(matches!(
            parse_lexical_units("#f00").as_deref(),
            Ok([LexicalUnit::Function { name, parameters }])
                if name == "rgb" && parameters.first() == Some(&LexicalUnit::Integer(255))
        ));
    }

    #[test]
    fn inherit_and_errors() {
        assert_eq!(parse_lexical_units("INHERIT"), Ok(vec![LexicalUnit::Inherit]));
        assert_eq!(parse_lexical_units("   "), Err(ParseError::Empty));
        assert_eq!(
            parse_lexical_units("3vw"),
            Err(ParseError::UnknownUnit("vw".to_owned()))
        );
        assert!(matches!(
            parse_lexical_units("{"),
            Err(ParseError::UnexpectedToken(_))
        ));
    }
}
