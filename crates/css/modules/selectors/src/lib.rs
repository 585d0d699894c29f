//! CSS 2 selectors: selector model, matching and specificity.
//! See: <https://www.w3.org/TR/CSS2/selector.html>
//!
//! This crate covers the CSS 2 selector profile used by SVG style sheets:
//! - Element (type and universal) and pseudo-element selectors
//! - Conditional selectors carrying attribute, class, id, lang and pseudo-class conditions
//! - Descendant, child and direct-adjacent combinators
//! - Additive specificity and attribute-dependency tracking for invalidation
//!
//! Documents are only seen through [`ElementAdapter`]; selectors are built through
//! [`ConditionFactory`] and [`SelectorFactory`], which reject CSS3-only kinds.

#![forbid(unsafe_code)]

use core::fmt;
use std::collections::HashSet;
use std::error::Error;

mod factory;
mod matcher;
mod parser;
mod specificity;

pub use factory::{ConditionFactory, SelectorFactory};
pub use matcher::{
    contains_word, matches_condition, matches_hyphenated, matches_selector,
    matches_selector_list,
};
pub use parser::{parse_selector, parse_selector_list};
pub use specificity::Specificity;

/// DOM node type of element nodes, the only kind the adjacent combinator supports.
pub const ELEMENT_NODE: u16 = 1;

/// Namespace of the predefined `xml:` attributes.
pub const XML_NAMESPACE_URI: &str = "http://www.w3.org/XML/1998/namespace";

/// An adapter that abstracts DOM access for selector matching.
/// Implement this for your DOM layer.
///
/// See: <https://www.w3.org/TR/CSS2/selector.html#pattern-matching>
pub trait ElementAdapter {
    type Handle: Copy + Eq;

    /// Unique, stable key for caching per element.
    fn unique_key(&self, element: Self::Handle) -> u64;

    /// Parent element if any. Document and fragment roots return `None`.
    fn parent(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Previous sibling element, skipping text, comment and other non-element nodes.
    fn previous_sibling_element(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Local name of the element, case preserved.
    fn local_name(&self, element: Self::Handle) -> &str;

    /// Namespace URI of the element if any.
    fn namespace_uri(&self, element: Self::Handle) -> Option<&str>;

    /// Returns the attribute value if present.
    fn attribute(
        &self,
        element: Self::Handle,
        namespace_uri: Option<&str>,
        local_name: &str,
    ) -> Option<&str>;

    /// Class string used by class conditions (empty when absent).
    fn css_class(&self, element: Self::Handle) -> &str;

    /// Identifier used by id conditions (empty when absent).
    fn xml_id(&self, element: Self::Handle) -> &str;

    /// True if the element is currently an instance of the given pseudo-class
    /// (`first-child`, `hover`, `link`, ...).
    fn is_pseudo_instance_of(&self, element: Self::Handle, pseudo_class: &str) -> bool;
}

/// An attribute name with an optional namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub namespace_uri: Option<String>,
    pub local_name: String,
}

impl QualifiedName {
    /// A name in no namespace.
    pub fn local(local_name: &str) -> Self {
        Self {
            namespace_uri: None,
            local_name: local_name.to_owned(),
        }
    }

    /// A namespaced name.
    pub fn namespaced(namespace_uri: &str, local_name: &str) -> Self {
        Self {
            namespace_uri: Some(namespace_uri.to_owned()),
            local_name: local_name.to_owned(),
        }
    }
}

/// Conditions attached to a simple selector.
///
/// See: <https://www.w3.org/TR/CSS2/selector.html#attribute-selectors>
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    /// `[name]` or `[name=value]`.
    Attribute {
        name: QualifiedName,
        specified: bool,
        value: Option<String>,
    },
    /// `.value`, matched against the element's class string.
    Class {
        attribute: QualifiedName,
        value: String,
    },
    /// `#value`, matched against the element's id.
    Id {
        attribute: QualifiedName,
        value: String,
    },
    /// `:lang(lang)`, matched against `lang` then `xml:lang`.
    Lang { lang: String },
    /// `:value` for any pseudo-class the element answers for.
    PseudoClass { value: String },
    /// `[name~=value]`.
    OneOfAttribute {
        name: QualifiedName,
        specified: bool,
        value: String,
    },
    /// `[name|=value]`.
    BeginHyphenAttribute {
        name: QualifiedName,
        specified: bool,
        value: String,
    },
    /// Both conditions hold.
    And {
        first: Box<Condition>,
        second: Box<Condition>,
    },
}

/// Selector tree for the CSS 2 profile.
///
/// See: <https://www.w3.org/TR/CSS2/selector.html>
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Type selector; `local_name == None` is the universal selector.
    Element {
        namespace_uri: Option<String>,
        local_name: Option<String>,
    },
    /// `::local_name`, matched against the pseudo-element being styled.
    PseudoElement { local_name: Option<String> },
    /// Simple selector refined by a condition.
    Conditional {
        simple: Box<Selector>,
        condition: Condition,
    },
    /// `ancestor target`.
    Descendant {
        ancestor: Box<Selector>,
        target: Box<Selector>,
    },
    /// `parent > target`. A pseudo-element target qualifies the element itself.
    Child {
        parent: Box<Selector>,
        target: Box<Selector>,
    },
    /// `previous + target`.
    DirectAdjacent {
        node_type: u16,
        previous: Box<Selector>,
        target: Box<Selector>,
    },
}

impl Condition {
    /// Whether `element` satisfies this condition.
    pub fn matches<A: ElementAdapter>(&self, adapter: &A, element: A::Handle) -> bool {
        matches_condition(adapter, element, self)
    }

    /// Additive specificity of this condition.
    pub fn specificity(&self) -> Specificity {
        match self {
            Self::Id { .. } => Specificity::ID,
            Self::And { first, second } => first.specificity() + second.specificity(),
            Self::Attribute { .. }
            | Self::Class { .. }
            | Self::Lang { .. }
            | Self::PseudoClass { .. }
            | Self::OneOfAttribute { .. }
            | Self::BeginHyphenAttribute { .. } => Specificity::ATTRIBUTE,
        }
    }

    /// Adds the local names of every attribute this condition reads to `attributes`.
    pub fn fill_attribute_set(&self, attributes: &mut HashSet<String>) {
        match self {
            Self::Attribute { name, .. }
            | Self::OneOfAttribute { name, .. }
            | Self::BeginHyphenAttribute { name, .. } => {
                attributes.insert(name.local_name.clone());
            }
            Self::Class { attribute, .. } | Self::Id { attribute, .. } => {
                attributes.insert(attribute.local_name.clone());
            }
            Self::Lang { .. } => {
                attributes.insert("lang".to_owned());
            }
            Self::PseudoClass { .. } => {}
            Self::And { first, second } => {
                first.fill_attribute_set(attributes);
                second.fill_attribute_set(attributes);
            }
        }
    }
}

impl Selector {
    /// Whether `element`, styled for `pseudo_element`, matches this selector.
    pub fn matches<A: ElementAdapter>(
        &self,
        adapter: &A,
        element: A::Handle,
        pseudo_element: Option<&str>,
    ) -> bool {
        matches_selector(adapter, element, pseudo_element, self)
    }

    /// Additive specificity of this selector.
    ///
    /// See: <https://www.w3.org/TR/CSS2/cascade.html#specificity>
    pub fn specificity(&self) -> Specificity {
        match self {
            Self::Element { local_name, .. } => {
                if local_name.is_some() {
                    Specificity::ELEMENT
                } else {
                    Specificity::ZERO
                }
            }
            Self::PseudoElement { .. } => Specificity::ZERO,
            Self::Conditional { simple, condition } => {
                simple.specificity() + condition.specificity()
            }
            Self::Descendant {
                ancestor: left,
                target: right,
            }
            | Self::Child {
                parent: left,
                target: right,
            }
            | Self::DirectAdjacent {
                previous: left,
                target: right,
                ..
            } => left.specificity() + right.specificity(),
        }
    }

    /// Adds the local names of every attribute this selector reads to `attributes`.
    pub fn fill_attribute_set(&self, attributes: &mut HashSet<String>) {
        match self {
            Self::Element { .. } | Self::PseudoElement { .. } => {}
            Self::Conditional { simple, condition } => {
                simple.fill_attribute_set(attributes);
                condition.fill_attribute_set(attributes);
            }
            Self::Descendant {
                ancestor: left,
                target: right,
            }
            | Self::Child {
                parent: left,
                target: right,
            }
            | Self::DirectAdjacent {
                previous: left,
                target: right,
                ..
            } => {
                left.fill_attribute_set(attributes);
                right.fill_attribute_set(attributes);
            }
        }
    }

    /// True when matching depends on elements other than the subject.
    pub fn has_combinator(&self) -> bool {
        match self {
            Self::Element { .. } | Self::PseudoElement { .. } => false,
            Self::Conditional { simple, .. } => simple.has_combinator(),
            Self::Child { target, .. } => !matches!(**target, Self::PseudoElement { .. }),
            Self::Descendant { .. } | Self::DirectAdjacent { .. } => true,
        }
    }

    /// Pseudo-element name this selector targets, if any.
    pub fn pseudo_element(&self) -> Option<&str> {
        match self {
            Self::PseudoElement { local_name } => local_name.as_deref(),
            Self::Element { .. } => None,
            Self::Conditional { simple, .. } => simple.pseudo_element(),
            Self::Descendant { target, .. }
            | Self::Child { target, .. }
            | Self::DirectAdjacent { target, .. } => target.pseudo_element(),
        }
    }
}

/// Condition kinds, named in construction errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConditionKind {
    And,
    Or,
    Negative,
    Positional,
    Attribute,
    Id,
    Lang,
    OneOfAttribute,
    BeginHyphenAttribute,
    Class,
    PseudoClass,
    OnlyChild,
    OnlyType,
    Content,
}

/// Selector kinds, named in construction errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectorKind {
    Conditional,
    AnyNode,
    RootNode,
    Negative,
    Element,
    TextNode,
    CdataSection,
    ProcessingInstruction,
    Comment,
    PseudoElement,
    Descendant,
    Child,
    DirectAdjacent,
}

/// Errors raised while building selectors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorError {
    /// The condition kind is outside the supported profile.
    UnsupportedConditionKind(ConditionKind),
    /// The selector kind is outside the supported profile.
    UnsupportedSelectorKind(SelectorKind),
    /// Selector text could not be tokenized.
    Syntax { position: usize, message: String },
}

impl fmt::Display for SelectorError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedConditionKind(kind) => {
                write!(formatter, "unsupported condition kind: {kind:?}")
            }
            Self::UnsupportedSelectorKind(kind) => {
                write!(formatter, "unsupported selector kind: {kind:?}")
            }
            Self::Syntax { position, message } => {
                write!(formatter, "selector syntax error at {position}: {message}")
            }
        }
    }
}

impl Error for SelectorError {}
