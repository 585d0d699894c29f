//! Selector text to selector trees.
//! See: <https://www.w3.org/TR/CSS2/selector.html>
//!
//! Every node is built through [`ConditionFactory`] and [`SelectorFactory`], so text
//! using CSS3-only constructs fails with the same errors a full parser would raise.
//! Names keep their case: SVG element and class names are case-sensitive.

use crate::{
    Condition, ConditionFactory, ELEMENT_NODE, QualifiedName, Selector, SelectorError,
    SelectorFactory,
};

/// Combinators between compound selectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
    Adjacent,
}

/// Attribute selector operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AttributeOperator {
    Exists,
    Equals,
    Includes,
    DashMatch,
}

/// Pieces of a compound selector, in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
enum SimplePart {
    Type(Option<String>),
    Class(String),
    Id(String),
    Attribute {
        name: String,
        operator: AttributeOperator,
        value: String,
    },
    PseudoClass {
        name: String,
        argument: Option<String>,
    },
    PseudoElement(String),
}

/// Internal tokenizer token kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Tok {
    Combinator(Combinator),
    /// Whitespace that implies a descendant combinator.
    DescendantWs,
    Simple(SimplePart),
}

/// Pseudo-elements CSS 2 also spells with a single colon.
const LEGACY_PSEUDO_ELEMENTS: [&str; 4] = ["first-line", "first-letter", "before", "after"];

/// Tokenizer over one selector.
struct SelectorTokenizer<'input> {
    input: &'input str,
    /// Current byte offset into `input`.
    index: usize,
}

impl<'input> SelectorTokenizer<'input> {
    const fn new(input: &'input str) -> Self {
        Self { input, index: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.index).copied()
    }

    fn syntax_error(&self, message: &str) -> SelectorError {
        SelectorError::Syntax {
            position: self.index,
            message: message.to_owned(),
        }
    }

    /// Return the next selector token, if any.
    fn next_token(&mut self) -> Result<Option<Tok>, SelectorError> {
        let start = self.index;
        self.skip_spaces();
        if self.index > start && self.peek().is_some() {
            return Ok(Some(Tok::DescendantWs));
        }
        let Some(current) = self.peek() else {
            return Ok(None);
        };
        let token = match current {
            b'*' => {
                self.index = self.index.saturating_add(1);
                Tok::Simple(SimplePart::Type(None))
            }
            b'.' => {
                self.index = self.index.saturating_add(1);
                Tok::Simple(SimplePart::Class(self.consume_required_ident()?))
            }
            b'#' => {
                self.index = self.index.saturating_add(1);
                Tok::Simple(SimplePart::Id(self.consume_required_ident()?))
            }
            b'[' => self.consume_attribute()?,
            b':' => self.consume_pseudo()?,
            b'>' => {
                self.index = self.index.saturating_add(1);
                Tok::Combinator(Combinator::Child)
            }
            b'+' => {
                self.index = self.index.saturating_add(1);
                Tok::Combinator(Combinator::Adjacent)
            }
            b'~' => return Err(self.syntax_error("general sibling combinator")),
            _ => Tok::Simple(SimplePart::Type(Some(self.consume_required_ident()?))),
        };
        Ok(Some(token))
    }

    /// Consume an identifier of alphanumerics, `-`, `_` and non-ASCII characters.
    fn consume_ident(&mut self) -> &'input str {
        let start = self.index;
        while let Some(byte) = self.peek() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' || !byte.is_ascii() {
                self.index = self.index.saturating_add(1);
            } else {
                break;
            }
        }
        self.input.get(start..self.index).unwrap_or("")
    }

    fn consume_required_ident(&mut self) -> Result<String, SelectorError> {
        let ident = self.consume_ident();
        if ident.is_empty() {
            return Err(self.syntax_error("expected identifier"));
        }
        Ok(ident.to_owned())
    }

    /// `[name]`, `[name=value]`, `[name~=value]` or `[name|=value]`.
    fn consume_attribute(&mut self) -> Result<Tok, SelectorError> {
        self.index = self.index.saturating_add(1);
        self.skip_spaces();
        let name = self.consume_required_ident()?;
        self.skip_spaces();
        let operator = match self.peek() {
            Some(b'=') => {
                self.index = self.index.saturating_add(1);
                AttributeOperator::Equals
            }
            Some(b'~') => {
                self.expect_equals_after_operator()?;
                AttributeOperator::Includes
            }
            Some(b'|') => {
                self.expect_equals_after_operator()?;
                AttributeOperator::DashMatch
            }
            _ => AttributeOperator::Exists,
        };
        let value = if operator == AttributeOperator::Exists {
            String::new()
        } else {
            self.skip_spaces();
            match self.peek() {
                Some(quote @ (b'"' | b'\'')) => {
                    self.index = self.index.saturating_add(1);
                    self.consume_quoted_value(quote)?
                }
                _ => self.consume_required_ident()?,
            }
        };
        self.skip_spaces();
        if self.peek() != Some(b']') {
            return Err(self.syntax_error("expected `]`"));
        }
        self.index = self.index.saturating_add(1);
        Ok(Tok::Simple(SimplePart::Attribute {
            name,
            operator,
            value,
        }))
    }

    fn expect_equals_after_operator(&mut self) -> Result<(), SelectorError> {
        self.index = self.index.saturating_add(1);
        if self.peek() != Some(b'=') {
            return Err(self.syntax_error("expected `=`"));
        }
        self.index = self.index.saturating_add(1);
        Ok(())
    }

    /// Consume a quoted value until the matching quote byte.
    fn consume_quoted_value(&mut self, quote: u8) -> Result<String, SelectorError> {
        let start = self.index;
        while matches!(self.peek(), Some(byte) if byte != quote) {
            self.index = self.index.saturating_add(1);
        }
        if self.peek().is_none() {
            return Err(self.syntax_error("unterminated string"));
        }
        let value = self.input.get(start..self.index).unwrap_or("").to_owned();
        self.index = self.index.saturating_add(1);
        Ok(value)
    }

    /// `:name`, `:name(argument)` or `::name`.
    fn consume_pseudo(&mut self) -> Result<Tok, SelectorError> {
        self.index = self.index.saturating_add(1);
        let double_colon = self.peek() == Some(b':');
        if double_colon {
            self.index = self.index.saturating_add(1);
        }
        let name = self.consume_required_ident()?;
        if double_colon || LEGACY_PSEUDO_ELEMENTS.contains(&name.as_str()) {
            return Ok(Tok::Simple(SimplePart::PseudoElement(name)));
        }
        let argument = if self.peek() == Some(b'(') {
            self.index = self.index.saturating_add(1);
            let start = self.index;
            while matches!(self.peek(), Some(byte) if byte != b')') {
                self.index = self.index.saturating_add(1);
            }
            if self.peek().is_none() {
                return Err(self.syntax_error("expected `)`"));
            }
            let argument = self.input.get(start..self.index).unwrap_or("").trim();
            self.index = self.index.saturating_add(1);
            Some(argument.to_owned())
        } else {
            None
        };
        Ok(Tok::Simple(SimplePart::PseudoClass { name, argument }))
    }

    /// Skip ASCII whitespace.
    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(|byte| byte.is_ascii_whitespace()) {
            self.index = self.index.saturating_add(1);
        }
    }
}

/// Parse a comma separated selector list.
///
/// # Errors
/// Returns the first [`SelectorError`] raised by any selector in the list.
pub fn parse_selector_list(
    input: &str,
    conditions: &ConditionFactory,
) -> Result<Vec<Selector>, SelectorError> {
    input
        .split(',')
        .map(|part| parse_selector(part.trim(), conditions))
        .collect()
}

/// Parse one selector with descendant, child and adjacent combinators.
///
/// # Errors
/// Returns [`SelectorError::Syntax`] for malformed text and the factory errors for
/// constructs outside the CSS 2 profile.
pub fn parse_selector(input: &str, conditions: &ConditionFactory) -> Result<Selector, SelectorError> {
    let mut tokens = SelectorTokenizer::new(input);
    let mut current: Vec<SimplePart> = Vec::new();
    let mut selector: Option<Selector> = None;
    let mut pending_combinator: Option<Combinator> = None;

    while let Some(token) = tokens.next_token()? {
        match token {
            Tok::Combinator(comb) => {
                if current.is_empty() && selector.is_none() {
                    return Err(tokens.syntax_error("combinator without a left-hand selector"));
                }
                if !current.is_empty() {
                    selector = Some(join(
                        selector,
                        pending_combinator,
                        build_compound(&current, conditions)?,
                    )?);
                    current.clear();
                }
                pending_combinator = Some(comb);
            }
            Tok::DescendantWs => {
                if !current.is_empty() {
                    selector = Some(join(
                        selector,
                        pending_combinator.take(),
                        build_compound(&current, conditions)?,
                    )?);
                    current.clear();
                    pending_combinator = Some(Combinator::Descendant);
                }
            }
            Tok::Simple(simple) => current.push(simple),
        }
    }

    if current.is_empty() {
        if pending_combinator.is_some_and(|comb| comb != Combinator::Descendant) {
            return Err(tokens.syntax_error("dangling combinator"));
        }
        return selector.ok_or_else(|| tokens.syntax_error("empty selector"));
    }
    join(
        selector,
        pending_combinator,
        build_compound(&current, conditions)?,
    )
}

/// Relate the selector built so far to the next compound.
fn join(
    left: Option<Selector>,
    combinator: Option<Combinator>,
    right: Selector,
) -> Result<Selector, SelectorError> {
    let Some(left) = left else {
        return Ok(right);
    };
    if left.pseudo_element().is_some() {
        return Err(SelectorError::Syntax {
            position: 0,
            message: "pseudo-element must end the selector".to_owned(),
        });
    }
    let factory = SelectorFactory;
    match combinator.unwrap_or(Combinator::Descendant) {
        Combinator::Descendant => Ok(factory.create_descendant_selector(left, right)),
        Combinator::Child => Ok(factory.create_child_selector(left, right)),
        Combinator::Adjacent => factory.create_direct_adjacent_selector(ELEMENT_NODE, left, right),
    }
}

/// Build one compound: element selector, ANDed conditions, then the pseudo-element.
fn build_compound(
    parts: &[SimplePart],
    conditions: &ConditionFactory,
) -> Result<Selector, SelectorError> {
    let factory = SelectorFactory;
    let mut element_name: Option<&str> = None;
    let mut condition: Option<Condition> = None;
    let mut pseudo_element: Option<&str> = None;

    for (position, part) in parts.iter().enumerate() {
        if pseudo_element.is_some() {
            return Err(SelectorError::Syntax {
                position,
                message: "pseudo-element must end the selector".to_owned(),
            });
        }
        let next = match part {
            SimplePart::Type(name) => {
                if position != 0 {
                    return Err(SelectorError::Syntax {
                        position,
                        message: "type selector must start a compound".to_owned(),
                    });
                }
                element_name = name.as_deref();
                continue;
            }
            SimplePart::PseudoElement(name) => {
                pseudo_element = Some(name.as_str());
                continue;
            }
            SimplePart::Class(value) => conditions.create_class_condition(value),
            SimplePart::Id(value) => conditions.create_id_condition(value),
            SimplePart::Attribute {
                name,
                operator,
                value,
            } => build_attribute_condition(conditions, name, *operator, value),
            SimplePart::PseudoClass { name, argument } => {
                build_pseudo_class_condition(conditions, name, argument.as_deref())?
            }
        };
        condition = Some(match condition {
            Some(previous) => conditions.create_and_condition(previous, next),
            None => next,
        });
    }

    let element = factory.create_element_selector(None, element_name);
    let simple = match condition {
        Some(condition) => factory.create_conditional_selector(element, condition),
        None => element,
    };
    Ok(match pseudo_element {
        Some(name) => {
            factory.create_child_selector(simple, factory.create_pseudo_element_selector(Some(name)))
        }
        None => simple,
    })
}

fn build_attribute_condition(
    conditions: &ConditionFactory,
    name: &str,
    operator: AttributeOperator,
    value: &str,
) -> Condition {
    let name = QualifiedName::local(name);
    match operator {
        AttributeOperator::Exists => conditions.create_attribute_condition(name, false, None),
        AttributeOperator::Equals => conditions.create_attribute_condition(name, true, Some(value)),
        AttributeOperator::Includes => {
            conditions.create_one_of_attribute_condition(name, true, value)
        }
        AttributeOperator::DashMatch => {
            conditions.create_begin_hyphen_attribute_condition(name, true, value)
        }
    }
}

fn build_pseudo_class_condition(
    conditions: &ConditionFactory,
    name: &str,
    argument: Option<&str>,
) -> Result<Condition, SelectorError> {
    match (name, argument) {
        ("lang", Some(lang)) => Ok(conditions.create_lang_condition(lang)),
        ("not", Some(inner)) => {
            conditions.create_negative_condition(conditions.create_pseudo_class_condition(inner))
        }
        ("contains", Some(data)) => conditions.create_content_condition(data),
        ("only-child", None) => conditions.create_only_child_condition(),
        ("only-of-type", None) => conditions.create_only_type_condition(),
        (_, Some(_)) => conditions.create_positional_condition(0, false, false),
        (_, None) => Ok(conditions.create_pseudo_class_condition(name)),
    }
}
