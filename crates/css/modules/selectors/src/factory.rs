//! Construction of conditions and selectors for the CSS 2 profile.
//!
//! Parsers build selector trees exclusively through these factories. Kinds outside
//! the profile are rejected here, before any rule reaches the cascade.

use crate::{
    Condition, ConditionKind, ELEMENT_NODE, QualifiedName, Selector, SelectorError, SelectorKind,
};

/// Builds [`Condition`]s, binding the document's class and id attribute names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConditionFactory {
    class_attribute: QualifiedName,
    id_attribute: QualifiedName,
}

impl Default for ConditionFactory {
    fn default() -> Self {
        Self::new(QualifiedName::local("class"), QualifiedName::local("id"))
    }
}

impl ConditionFactory {
    pub const fn new(class_attribute: QualifiedName, id_attribute: QualifiedName) -> Self {
        Self {
            class_attribute,
            id_attribute,
        }
    }

    /// Attribute name class conditions read.
    pub const fn class_attribute(&self) -> &QualifiedName {
        &self.class_attribute
    }

    /// Attribute name id conditions read.
    pub const fn id_attribute(&self) -> &QualifiedName {
        &self.id_attribute
    }

    pub fn create_and_condition(&self, first: Condition, second: Condition) -> Condition {
        Condition::And {
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    /// # Errors
    /// Always fails: `a, b` inside a condition is not part of CSS 2.
    pub fn create_or_condition(
        &self,
        _first: Condition,
        _second: Condition,
    ) -> Result<Condition, SelectorError> {
        Err(SelectorError::UnsupportedConditionKind(ConditionKind::Or))
    }

    /// # Errors
    /// Always fails: `:not()` is not part of CSS 2.
    pub fn create_negative_condition(
        &self,
        _condition: Condition,
    ) -> Result<Condition, SelectorError> {
        Err(SelectorError::UnsupportedConditionKind(
            ConditionKind::Negative,
        ))
    }

    /// # Errors
    /// Always fails: positional pseudo-classes are not part of CSS 2.
    pub fn create_positional_condition(
        &self,
        _position: i32,
        _type_node: bool,
        _same_type: bool,
    ) -> Result<Condition, SelectorError> {
        Err(SelectorError::UnsupportedConditionKind(
            ConditionKind::Positional,
        ))
    }

    pub fn create_attribute_condition(
        &self,
        name: QualifiedName,
        specified: bool,
        value: Option<&str>,
    ) -> Condition {
        Condition::Attribute {
            name,
            specified,
            value: value.map(ToOwned::to_owned),
        }
    }

    pub fn create_id_condition(&self, value: &str) -> Condition {
        Condition::Id {
            attribute: self.id_attribute.clone(),
            value: value.to_owned(),
        }
    }

    /// The language is compared case-insensitively, so it is stored lowercased.
    pub fn create_lang_condition(&self, lang: &str) -> Condition {
        Condition::Lang {
            lang: lang.to_lowercase(),
        }
    }

    pub fn create_one_of_attribute_condition(
        &self,
        name: QualifiedName,
        specified: bool,
        value: &str,
    ) -> Condition {
        Condition::OneOfAttribute {
            name,
            specified,
            value: value.to_owned(),
        }
    }

    pub fn create_begin_hyphen_attribute_condition(
        &self,
        name: QualifiedName,
        specified: bool,
        value: &str,
    ) -> Condition {
        Condition::BeginHyphenAttribute {
            name,
            specified,
            value: value.to_owned(),
        }
    }

    pub fn create_class_condition(&self, value: &str) -> Condition {
        Condition::Class {
            attribute: self.class_attribute.clone(),
            value: value.to_owned(),
        }
    }

    pub fn create_pseudo_class_condition(&self, value: &str) -> Condition {
        Condition::PseudoClass {
            value: value.to_owned(),
        }
    }

    /// # Errors
    /// Always fails: `:only-child` is not part of CSS 2.
    pub fn create_only_child_condition(&self) -> Result<Condition, SelectorError> {
        Err(SelectorError::UnsupportedConditionKind(
            ConditionKind::OnlyChild,
        ))
    }

    /// # Errors
    /// Always fails: `:only-of-type` is not part of CSS 2.
    pub fn create_only_type_condition(&self) -> Result<Condition, SelectorError> {
        Err(SelectorError::UnsupportedConditionKind(
            ConditionKind::OnlyType,
        ))
    }

    /// # Errors
    /// Always fails: content conditions are not part of CSS 2.
    pub fn create_content_condition(&self, _data: &str) -> Result<Condition, SelectorError> {
        Err(SelectorError::UnsupportedConditionKind(
            ConditionKind::Content,
        ))
    }
}

/// Builds [`Selector`]s.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectorFactory;

impl SelectorFactory {
    pub fn create_conditional_selector(&self, simple: Selector, condition: Condition) -> Selector {
        Selector::Conditional {
            simple: Box::new(simple),
            condition,
        }
    }

    /// # Errors
    /// Always fails: node selectors are outside the profile.
    pub fn create_any_node_selector(&self) -> Result<Selector, SelectorError> {
        Err(SelectorError::UnsupportedSelectorKind(SelectorKind::AnyNode))
    }

    /// # Errors
    /// Always fails: `:root` is not part of CSS 2.
    pub fn create_root_node_selector(&self) -> Result<Selector, SelectorError> {
        Err(SelectorError::UnsupportedSelectorKind(
            SelectorKind::RootNode,
        ))
    }

    /// # Errors
    /// Always fails: negative selectors are not part of CSS 2.
    pub fn create_negative_selector(&self, _selector: Selector) -> Result<Selector, SelectorError> {
        Err(SelectorError::UnsupportedSelectorKind(
            SelectorKind::Negative,
        ))
    }

    /// `local_name == None` builds the universal selector.
    pub fn create_element_selector(
        &self,
        namespace_uri: Option<&str>,
        local_name: Option<&str>,
    ) -> Selector {
        Selector::Element {
            namespace_uri: namespace_uri.map(ToOwned::to_owned),
            local_name: local_name.map(ToOwned::to_owned),
        }
    }

    /// # Errors
    /// Always fails: text nodes are never styled by selectors.
    pub fn create_text_node_selector(&self, _data: &str) -> Result<Selector, SelectorError> {
        Err(SelectorError::UnsupportedSelectorKind(
            SelectorKind::TextNode,
        ))
    }

    /// # Errors
    /// Always fails: CDATA sections are never styled by selectors.
    pub fn create_cdata_section_selector(&self, _data: &str) -> Result<Selector, SelectorError> {
        Err(SelectorError::UnsupportedSelectorKind(
            SelectorKind::CdataSection,
        ))
    }

    /// # Errors
    /// Always fails: processing instructions are never styled by selectors.
    pub fn create_processing_instruction_selector(
        &self,
        _target: &str,
        _data: &str,
    ) -> Result<Selector, SelectorError> {
        Err(SelectorError::UnsupportedSelectorKind(
            SelectorKind::ProcessingInstruction,
        ))
    }

    /// # Errors
    /// Always fails: comments are never styled by selectors.
    pub fn create_comment_selector(&self, _data: &str) -> Result<Selector, SelectorError> {
        Err(SelectorError::UnsupportedSelectorKind(SelectorKind::Comment))
    }

    pub fn create_pseudo_element_selector(&self, local_name: Option<&str>) -> Selector {
        Selector::PseudoElement {
            local_name: local_name.map(ToOwned::to_owned),
        }
    }

    pub fn create_descendant_selector(&self, ancestor: Selector, target: Selector) -> Selector {
        Selector::Descendant {
            ancestor: Box::new(ancestor),
            target: Box::new(target),
        }
    }

    pub fn create_child_selector(&self, parent: Selector, target: Selector) -> Selector {
        Selector::Child {
            parent: Box::new(parent),
            target: Box::new(target),
        }
    }

    /// # Errors
    /// Fails unless `node_type` is [`ELEMENT_NODE`].
    pub fn create_direct_adjacent_selector(
        &self,
        node_type: u16,
        previous: Selector,
        target: Selector,
    ) -> Result<Selector, SelectorError> {
        if node_type != ELEMENT_NODE {
            return Err(SelectorError::UnsupportedSelectorKind(
                SelectorKind::DirectAdjacent,
            ));
        }
        Ok(Selector::DirectAdjacent {
            node_type,
            previous: Box::new(previous),
            target: Box::new(target),
        })
    }
}
