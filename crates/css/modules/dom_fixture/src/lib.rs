//! Arena-backed document used to exercise selector matching and the cascade.
//!
//! Elements keep their attributes inline, text nodes sit between elements so that
//! sibling walks have something to skip, and dynamic pseudo-classes are plain flags.

#![forbid(unsafe_code)]

use core::hash::{Hash as _, Hasher as _};
use css_selectors::ElementAdapter;
use indextree::{Arena, Node};
pub use indextree::{NodeError, NodeId};
use smallvec::SmallVec;
use std::collections::hash_map::DefaultHasher;

#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    #[default]
    Document,
    Element {
        local_name: String,
        namespace_uri: Option<String>,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub namespace_uri: Option<String>,
    pub local_name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct DomNode {
    pub kind: NodeKind,
    pub attrs: SmallVec<Attribute, 4>,
    pub pseudo_classes: SmallVec<String, 2>,
}

/// A document tree. The document node itself is never an element.
#[derive(Debug)]
pub struct Document {
    dom: Arena<DomNode>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut dom = Arena::new();
        Self {
            root: dom.new_node(DomNode::default()),
            dom,
        }
    }

    /// The document node.
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached element in no namespace.
    pub fn create_element(&mut self, local_name: &str) -> NodeId {
        self.dom.new_node(DomNode {
            kind: NodeKind::Element {
                local_name: local_name.to_owned(),
                namespace_uri: None,
            },
            ..DomNode::default()
        })
    }

    /// Create a detached element in `namespace_uri`.
    pub fn create_element_ns(&mut self, namespace_uri: &str, local_name: &str) -> NodeId {
        self.dom.new_node(DomNode {
            kind: NodeKind::Element {
                local_name: local_name.to_owned(),
                namespace_uri: Some(namespace_uri.to_owned()),
            },
            ..DomNode::default()
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.dom.new_node(DomNode {
            kind: NodeKind::Text {
                text: text.to_owned(),
            },
            ..DomNode::default()
        })
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// # Errors
    /// Returns the arena's error when the append would create a cycle or reuse a removed node.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), NodeError> {
        parent.checked_append(child, &mut self.dom)
    }

    /// Create an element named `local_name` and append it to `parent`.
    ///
    /// # Errors
    /// See [`Document::append_child`].
    pub fn append_element(&mut self, parent: NodeId, local_name: &str) -> Result<NodeId, NodeError> {
        let element = self.create_element(local_name);
        self.append_child(parent, element)?;
        Ok(element)
    }

    /// Create a text node and append it to `parent`.
    ///
    /// # Errors
    /// See [`Document::append_child`].
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId, NodeError> {
        let node = self.create_text(text);
        self.append_child(parent, node)?;
        Ok(node)
    }

    /// Set or replace an attribute in no namespace.
    pub fn set_attribute(&mut self, element: NodeId, local_name: &str, value: &str) {
        self.set_attribute_ns(element, None, local_name, value);
    }

    /// Set or replace a namespaced attribute.
    pub fn set_attribute_ns(
        &mut self,
        element: NodeId,
        namespace_uri: Option<&str>,
        local_name: &str,
        value: &str,
    ) {
        let Some(node) = self.dom.get_mut(element) else {
            return;
        };
        let data = node.get_mut();
        if let Some(existing) = data.attrs.iter_mut().find(|attr| {
            attr.namespace_uri.as_deref() == namespace_uri && attr.local_name == local_name
        }) {
            value.clone_into(&mut existing.value);
            return;
        }
        data.attrs.push(Attribute {
            namespace_uri: namespace_uri.map(ToOwned::to_owned),
            local_name: local_name.to_owned(),
            value: value.to_owned(),
        });
    }

    /// Remove an attribute in no namespace.
    pub fn remove_attribute(&mut self, element: NodeId, local_name: &str) {
        if let Some(node) = self.dom.get_mut(element) {
            node.get_mut()
                .attrs
                .retain(|attr| attr.namespace_uri.is_some() || attr.local_name != local_name);
        }
    }

    /// Toggle a dynamic pseudo-class such as `hover`.
    pub fn set_pseudo_class(&mut self, element: NodeId, pseudo_class: &str, enabled: bool) {
        let Some(node) = self.dom.get_mut(element) else {
            return;
        };
        let data = node.get_mut();
        data.pseudo_classes.retain(|name| name.as_str() != pseudo_class);
        if enabled {
            data.pseudo_classes.push(pseudo_class.to_owned());
        }
    }

    fn data(&self, node: NodeId) -> Option<&DomNode> {
        self.dom.get(node).map(Node::get)
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.data(node)
            .is_some_and(|data| matches!(data.kind, NodeKind::Element { .. }))
    }
}

impl ElementAdapter for Document {
    type Handle = NodeId;

    fn unique_key(&self, element: NodeId) -> u64 {
        let mut hasher = DefaultHasher::new();
        element.hash(&mut hasher);
        hasher.finish()
    }

    fn parent(&self, element: NodeId) -> Option<NodeId> {
        let parent = self.dom.get(element)?.parent()?;
        self.is_element(parent).then_some(parent)
    }

    fn previous_sibling_element(&self, element: NodeId) -> Option<NodeId> {
        let mut current = self.dom.get(element)?.previous_sibling();
        while let Some(sibling) = current {
            if self.is_element(sibling) {
                return Some(sibling);
            }
            current = self.dom.get(sibling)?.previous_sibling();
        }
        None
    }

    fn local_name(&self, element: NodeId) -> &str {
        match self.data(element).map(|data| &data.kind) {
            Some(NodeKind::Element { local_name, .. }) => local_name,
            _ => "",
        }
    }

    fn namespace_uri(&self, element: NodeId) -> Option<&str> {
        match self.data(element).map(|data| &data.kind) {
            Some(NodeKind::Element { namespace_uri, .. }) => namespace_uri.as_deref(),
            _ => None,
        }
    }

    fn attribute(
        &self,
        element: NodeId,
        namespace_uri: Option<&str>,
        local_name: &str,
    ) -> Option<&str> {
        self.data(element)?
            .attrs
            .iter()
            .find(|attr| {
                attr.namespace_uri.as_deref() == namespace_uri && attr.local_name == local_name
            })
            .map(|attr| attr.value.as_str())
    }

    fn css_class(&self, element: NodeId) -> &str {
        self.attribute(element, None, "class").unwrap_or("")
    }

    fn xml_id(&self, element: NodeId) -> &str {
        self.attribute(element, None, "id").unwrap_or("")
    }

    fn is_pseudo_instance_of(&self, element: NodeId, pseudo_class: &str) -> bool {
        if pseudo_class == "first-child" {
            return self.previous_sibling_element(element).is_none();
        }
        self.data(element).is_some_and(|data| {
            data.pseudo_classes
                .iter()
                .any(|name| name.as_str() == pseudo_class)
        })
    }
}
