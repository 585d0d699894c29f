//! Selector matching.
//! See: <https://www.w3.org/TR/CSS2/selector.html#pattern-matching>

use crate::{Condition, ElementAdapter, Selector, XML_NAMESPACE_URI};

/// Match a selector list against an element: true if any selector matches.
pub fn matches_selector_list<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    pseudo_element: Option<&str>,
    list: &[Selector],
) -> bool {
    list.iter()
        .any(|selector_item| matches_selector(adapter, element, pseudo_element, selector_item))
}

/// Match a selector against an element styled for `pseudo_element`.
///
/// Combinators match the subject first, then walk to the related element, which is
/// always matched without a pseudo-element.
pub fn matches_selector<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    pseudo_element: Option<&str>,
    selector: &Selector,
) -> bool {
    match selector {
        Selector::Element { local_name, .. } => local_name
            .as_deref()
            .is_none_or(|name| adapter.local_name(element) == name),
        Selector::PseudoElement { local_name } => match (local_name, pseudo_element) {
            (Some(name), Some(requested)) => name.eq_ignore_ascii_case(requested),
            _ => false,
        },
        Selector::Conditional { simple, condition } => {
            matches_selector(adapter, element, pseudo_element, simple)
                && matches_condition(adapter, element, condition)
        }
        Selector::Descendant { ancestor, target } => {
            if !matches_selector(adapter, element, pseudo_element, target) {
                return false;
            }
            let mut current_parent = adapter.parent(element);
            while let Some(ancestor_element) = current_parent {
                if matches_selector(adapter, ancestor_element, None, ancestor) {
                    return true;
                }
                current_parent = adapter.parent(ancestor_element);
            }
            false
        }
        Selector::Child { parent, target } => {
            if matches!(**target, Selector::PseudoElement { .. }) {
                return matches_selector(adapter, element, pseudo_element, target)
                    && matches_selector(adapter, element, None, parent);
            }
            if !matches_selector(adapter, element, pseudo_element, target) {
                return false;
            }
            adapter
                .parent(element)
                .is_some_and(|parent_el| matches_selector(adapter, parent_el, None, parent))
        }
        Selector::DirectAdjacent {
            previous, target, ..
        } => {
            if !matches_selector(adapter, element, pseudo_element, target) {
                return false;
            }
            adapter
                .previous_sibling_element(element)
                .is_some_and(|prev_el| matches_selector(adapter, prev_el, None, previous))
        }
    }
}

/// Match a condition against an element.
///
/// See: <https://www.w3.org/TR/CSS2/selector.html#attribute-selectors>
pub fn matches_condition<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    condition: &Condition,
) -> bool {
    match condition {
        Condition::Attribute { name, value, .. } => {
            let actual = adapter
                .attribute(element, name.namespace_uri.as_deref(), &name.local_name)
                .unwrap_or("");
            // A bare `[name]` treats an empty attribute as absent.
            value
                .as_deref()
                .map_or(!actual.is_empty(), |expected| actual == expected)
        }
        Condition::Class { value, .. } => contains_word(adapter.css_class(element), value),
        Condition::Id { value, .. } => adapter.xml_id(element) == value,
        Condition::Lang { lang } => {
            let plain = adapter.attribute(element, None, "lang").unwrap_or("");
            if matches_hyphenated(&plain.to_lowercase(), lang) {
                return true;
            }
            let xml = adapter
                .attribute(element, Some(XML_NAMESPACE_URI), "lang")
                .unwrap_or("");
            matches_hyphenated(&xml.to_lowercase(), lang)
        }
        Condition::PseudoClass { value } => adapter.is_pseudo_instance_of(element, value),
        Condition::OneOfAttribute { name, value, .. } => adapter
            .attribute(element, name.namespace_uri.as_deref(), &name.local_name)
            .is_some_and(|actual| contains_word(actual, value)),
        Condition::BeginHyphenAttribute { name, value, .. } => adapter
            .attribute(element, name.namespace_uri.as_deref(), &name.local_name)
            .is_some_and(|actual| matches_hyphenated(actual, value)),
        Condition::And { first, second } => {
            matches_condition(adapter, element, first)
                && matches_condition(adapter, element, second)
        }
    }
}

/// True if `word` occurs in `text` delimited by whitespace or the string ends.
///
/// After a rejected candidate the search resumes past the whole candidate, so
/// `foo bar foobar` contains `bar` but neither `oo` nor `ob`.
pub fn contains_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    let mut search_from = 0;
    while let Some(offset) = text.get(search_from..).and_then(|rest| rest.find(word)) {
        let start = search_from + offset;
        let end = start + word.len();
        let starts_word = text
            .get(..start)
            .and_then(|before| before.chars().next_back())
            .is_none_or(char::is_whitespace);
        let ends_word = text
            .get(end..)
            .and_then(|after| after.chars().next())
            .is_none_or(char::is_whitespace);
        if starts_word && ends_word {
            return true;
        }
        search_from = end;
    }
    false
}

/// True if `text` equals `prefix` or starts with `prefix` followed by `-`.
pub fn matches_hyphenated(text: &str, prefix: &str) -> bool {
    text.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('-'))
}

#[cfg(test)]
mod tests {
    use super::{contains_word, matches_hyphenated};

    #[test]
    fn word_matching_respects_boundaries() {
        assert!(contains_word("foo bar foobar", "bar"));
        assert!(contains_word("foo bar foobar", "foobar"));
        assert!(contains_word("foo\tbar", "foo"));
        assert!(!contains_word("foo bar foobar", "oo"));
        assert!(!contains_word("foo bar foobar", "ob"));
        assert!(!contains_word("foo", ""));
        assert!(!contains_word("", "foo"));
    }

    #[test]
    fn hyphenated_prefix() {
        assert!(matches_hyphenated("en", "en"));
        assert!(matches_hyphenated("en-us", "en"));
        assert!(!matches_hyphenated("english", "en"));
        assert!(!matches_hyphenated("fr", "en"));
    }
}
