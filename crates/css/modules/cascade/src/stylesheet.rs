//! Style rules and their declarations, and a text front end for them built on
//! the `cssparser` rule and declaration parsers.
//! See: <https://www.w3.org/TR/css-syntax-3/#parsing>

use crate::priority::Origin;
use anyhow::{Context as _, Result};
use css_selectors::{ConditionFactory, Selector, parse_selector_list};
use css_values_units::ParseError as ValueParseError;
use css_values_units::{LexicalUnit, parse_lexical_units};
use cssparser::AtRuleParser as CssAtRuleParser;
use cssparser::CowRcStr;
use cssparser::DeclarationParser as CssDeclarationParser;
use cssparser::Delimiter;
use cssparser::ParseError;
use cssparser::Parser;
use cssparser::ParserInput;
use cssparser::ParserState;
use cssparser::QualifiedRuleParser as CssQualifiedRuleParser;
use cssparser::RuleBodyItemParser as CssRuleBodyItemParser;
use cssparser::RuleBodyParser as CssRuleBodyParser;
use cssparser::StyleSheetParser;
use cssparser::Token;
use cssparser::parse_important;

/// A `property: value` pair, value already split into lexical units.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    /// Property name normalized to ASCII lowercase.
    pub property: String,
    pub value: Vec<LexicalUnit>,
    pub important: bool,
}

impl Declaration {
    pub fn new(property: &str, value: Vec<LexicalUnit>, important: bool) -> Self {
        Self {
            property: property.to_ascii_lowercase(),
            value,
            important,
        }
    }

    /// Parses a declaration block such as the contents of a `style` attribute.
    ///
    /// A trailing `!important` marks the declaration important. Items without a
    /// property or value, and values that do not tokenize, are skipped with a
    /// warning.
    pub fn parse_block(input: &str) -> Vec<Self> {
        let mut source = ParserInput::new(input);
        let mut parser = Parser::new(&mut source);
        collect_declarations(&mut parser)
    }
}

/// Builds [`Declaration`]s from `name: value [!important]` items.
struct DeclarationCollector;

impl<'input> CssDeclarationParser<'input> for DeclarationCollector {
    type Declaration = Declaration;
    type Error = ValueParseError;

    fn parse_value(
        &mut self,
        name: CowRcStr<'input>,
        input: &mut Parser<'input, '_>,
        _declaration_start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'input, Self::Error>> {
        let text = input.parse_until_before(Delimiter::Bang, |value| {
            let start = value.position();
            while value.next_including_whitespace_and_comments().is_ok() {}
            Ok::<_, ParseError<'input, ValueParseError>>(value.slice_from(start))
        })?;
        let important = input.try_parse(parse_important).is_ok();
        input.expect_exhausted()?;
        let units = parse_lexical_units(text).map_err(|error| input.new_custom_error(error))?;
        Ok(Declaration::new(&name, units, important))
    }
}

impl CssAtRuleParser<'_> for DeclarationCollector {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = ValueParseError;
}

impl CssQualifiedRuleParser<'_> for DeclarationCollector {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = ValueParseError;
}

impl CssRuleBodyItemParser<'_, Declaration, ValueParseError> for DeclarationCollector {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}

fn collect_declarations(input: &mut Parser<'_, '_>) -> Vec<Declaration> {
    let mut collector = DeclarationCollector;
    let mut declarations = Vec::new();
    for item in CssRuleBodyParser::new(input, &mut collector) {
        match item {
            Ok(declaration) => declarations.push(declaration),
            Err((error, text)) => log::warn!("ignoring declaration `{}`: {error}", text.trim()),
        }
    }
    declarations
}

/// A qualified rule before its selector list is parsed.
struct RawRule {
    prelude: String,
    declarations: Vec<Declaration>,
}

/// Top-level parser: qualified rules become [`RawRule`]s, at-rules are rejected.
struct RuleCollector;

impl CssAtRuleParser<'_> for RuleCollector {
    type Prelude = ();
    type AtRule = RawRule;
    type Error = ValueParseError;
}

impl<'input> CssQualifiedRuleParser<'input> for RuleCollector {
    type Prelude = String;
    type QualifiedRule = RawRule;
    type Error = ValueParseError;

    /// Raw selector text with comments replaced by a space.
    fn parse_prelude(
        &mut self,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        let mut prelude = String::new();
        loop {
            let start = input.position();
            let Ok(token) = input.next_including_whitespace_and_comments() else {
                break;
            };
            if matches!(token, Token::Comment(_)) {
                prelude.push(' ');
            } else {
                prelude.push_str(input.slice_from(start));
            }
        }
        Ok(prelude.trim().to_owned())
    }

    fn parse_block(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::QualifiedRule, ParseError<'input, Self::Error>> {
        Ok(RawRule {
            prelude,
            declarations: collect_declarations(input),
        })
    }
}

/// A selector list with its declaration block.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleRule {
    pub selectors: Vec<Selector>,
    pub declarations: Vec<Declaration>,
}

impl StyleRule {
    /// Builds a rule from selector text and declaration-block text.
    ///
    /// # Errors
    /// Fails when the selector list does not parse or uses an unsupported kind.
    pub fn parse(selector_text: &str, block: &str, conditions: &ConditionFactory) -> Result<Self> {
        Self::with_declarations(selector_text, Declaration::parse_block(block), conditions)
    }

    fn with_declarations(
        selector_text: &str,
        declarations: Vec<Declaration>,
        conditions: &ConditionFactory,
    ) -> Result<Self> {
        let selectors = parse_selector_list(selector_text, conditions)
            .with_context(|| format!("invalid selector list `{}`", selector_text.trim()))?;
        Ok(Self {
            selectors,
            declarations,
        })
    }
}

/// Rules from one source, in source order.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleSheet {
    pub origin: Origin,
    pub rules: Vec<StyleRule>,
}

impl StyleSheet {
    pub const fn new(origin: Origin) -> Self {
        Self {
            origin,
            rules: Vec::new(),
        }
    }

    /// Parses `selectors { declarations }` rules with CSS error recovery:
    /// at-rules and rules without a block are skipped with a warning, and a
    /// block or comment left open at the end of the text is closed there.
    ///
    /// # Errors
    /// Fails when any rule's selector list is rejected.
    pub fn parse(origin: Origin, text: &str, conditions: &ConditionFactory) -> Result<Self> {
        let mut source = ParserInput::new(text);
        let mut parser = Parser::new(&mut source);
        let mut collector = RuleCollector;
        let mut sheet = Self::new(origin);
        for item in StyleSheetParser::new(&mut parser, &mut collector) {
            match item {
                Ok(RawRule {
                    prelude,
                    declarations,
                }) => {
                    let rule = StyleRule::with_declarations(&prelude, declarations, conditions)
                        .with_context(|| format!("rule {}", sheet.rules.len() + 1))?;
                    sheet.rules.push(rule);
                }
                Err((error, skipped)) => log::warn!("skipping rule `{}`: {error}", skipped.trim()),
            }
        }
        Ok(sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::{Declaration, StyleSheet};
    use crate::priority::Origin;
    use css_selectors::ConditionFactory;
    use css_values_units::{LexicalUnit, Unit};

    fn ident(name: &str) -> LexicalUnit {
        LexicalUnit::Ident(name.to_owned())
    }

    #[test]
    fn blocks_split_and_flag_importance() {
        let declarations =
            Declaration::parse_block(" Fill : red ; stroke-width: 2px !IMPORTANT;; bogus; x: ;");
        assert_eq!(
            declarations,
            [
                Declaration::new("fill", vec![ident("red")], false),
                Declaration::new(
                    "stroke-width",
                    vec![LexicalUnit::Dimension {
                        value: 2.0,
                        unit: Unit::Pixels
                    }],
                    true
                ),
            ]
        );
        assert_eq!(
            Declaration::parse_block("fill: red ! important; stroke: blue !bogus"),
            [Declaration::new("fill", vec![ident("red")], true)]
        );
    }

    #[test]
    fn delimiters_inside_strings_and_urls_stay_in_the_value() {
        let declarations = Declaration::parse_block(
            "font-family: \"Foo;Bar\", serif; fill: red; \
             clip-path: url(\"a;b}c.svg#clip\"); marker-start: url(m.svg#x;y); \
             font-family: '/* not a comment */'",
        );
        assert_eq!(
            declarations,
            [
                Declaration::new(
                    "font-family",
                    vec![LexicalUnit::String("Foo;Bar".to_owned()), LexicalUnit::Comma, ident("serif")],
                    false
                ),
                Declaration::new("fill", vec![ident("red")], false),
                Declaration::new("clip-path", vec![LexicalUnit::Uri("a;b}c.svg#clip".to_owned())], false),
                Declaration::new("marker-start", vec![LexicalUnit::Uri("m.svg#x;y".to_owned())], false),
                Declaration::new(
                    "font-family",
                    vec![LexicalUnit::String("/* not a comment */".to_owned())],
                    false
                ),
            ]
        );
    }

    #[test]
    fn sheets_parse_rules_in_order() -> anyhow::Result<()> {
        let conditions = ConditionFactory::default();
        let sheet = StyleSheet::parse(
            Origin::Author,
            "/* base */ g > rect { fill: blue } .a, /* b */ #b { stroke: none; }",
            &conditions,
        )?;
        assert_eq!(sheet.rules.len(), 2);
        assert_eq!(sheet.rules.get(1).map(|rule| rule.selectors.len()), Some(2));
        assert!(StyleSheet::parse(Origin::Author, "a ~ b { fill: red }", &conditions).is_err());

        let unterminated = StyleSheet::parse(Origin::Author, "rect { fill: red", &conditions)?;
        assert_eq!(
            unterminated.rules.first().map(|rule| rule.declarations.clone()),
            Some(vec![Declaration::new("fill", vec![ident("red")], false)])
        );
        assert!(StyleSheet::parse(Origin::Author, "/* open", &conditions)?.rules.is_empty());
        Ok(())
    }

    #[test]
    fn braces_and_comment_openers_in_strings_do_not_end_rules() -> anyhow::Result<()> {
        let conditions = ConditionFactory::default();
        let sheet = StyleSheet::parse(
            Origin::Author,
            "text { font-family: \"a}b\" } rect { fill: red } \
             @media print { rect { fill: blue } } \
             circle { font-family: \"/*\"; fill: url(\"p}q.svg#paint\") }",
            &conditions,
        )?;
        let declarations: Vec<Vec<Declaration>> =
            sheet.rules.iter().map(|rule| rule.declarations.clone()).collect();
        assert_eq!(
            declarations,
            [
                vec![Declaration::new("font-family", vec![LexicalUnit::String("a}b".to_owned())], false)],
                vec![Declaration::new("fill", vec![ident("red")], false)],
                vec![
                    Declaration::new("font-family", vec![LexicalUnit::String("/*".to_owned())], false),
                    Declaration::new("fill", vec![LexicalUnit::Uri("p}q.svg#paint".to_owned())], false),
                ],
            ]
        );
        Ok(())
    }
}
