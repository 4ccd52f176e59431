//! # Visual Tree
//!
//! A small arena-backed document: elements, text nodes, attributes and inline
//! style declarations. This is the surface the fitter mutates. Layout is not
//! computed here; a [`crate::layout::LayoutEngine`] reads the tree and reports
//! rendered sizes.
//!
//! Nodes are never freed. Removing a node detaches it from its parent, and a
//! detached node can be re-inserted elsewhere, which is exactly what wrapping
//! and unwrapping the line-height correction element needs.

pub mod selector;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use selector::{Selector, SelectorError};

/// Opaque handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node #{}", self.0)
    }
}

/// Markup namespace of an element. Only HTML elements take part in fitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    #[default]
    Html,
    Svg,
    MathMl,
}

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

/// Ordered list of inline style declarations (the `style` attribute).
///
/// Reads of absent properties return `""` and writing `""` removes the
/// declaration, the same contract as `CSSStyleDeclaration`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn get(&self, property: &str) -> &str {
        self.declarations
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    pub fn set(&mut self, property: &str, value: &str) {
        if value.is_empty() {
            self.remove(property);
            return;
        }
        match self.declarations.iter_mut().find(|(name, _)| name == property) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self
                .declarations
                .push((property.to_string(), value.to_string())),
        }
    }

    pub fn remove(&mut self, property: &str) {
        self.declarations.retain(|(name, _)| name != property);
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct ElementData {
    pub tag: String,
    pub namespace: Namespace,
    attributes: Vec<(String, String)>,
    pub style: InlineStyle,
}

impl ElementData {
    fn new(tag: &str, namespace: Namespace) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            namespace,
            attributes: Vec::new(),
            style: InlineStyle::default(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .map(|list| list.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// A visual tree rooted at an `html` element.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    viewport: Viewport,
}

impl Document {
    pub fn new(viewport: Viewport) -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element(ElementData::new("html", Namespace::Html)),
        };
        Document {
            nodes: vec![root],
            root: NodeId(0),
            viewport,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Changes the viewport. Stored resize options are not re-applied here;
    /// hosts follow up with [`crate::resize::refit_on_resize`].
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    // ── Construction ───────────────────────────────────────────────

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.create_element_ns(tag, Namespace::Html)
    }

    pub fn create_element_ns(&mut self, tag: &str, namespace: Namespace) -> NodeId {
        self.push(NodeData::Element(ElementData::new(tag, namespace)))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    // ── Structure ──────────────────────────────────────────────────

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0).map(|n| &n.data)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.data(id)? {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(id.0)?.data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Element children of `id`, in order.
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| self.is_element(child))
    }

    /// Appends `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Inserts `child` immediately before `reference` under `parent`.
    /// Falls back to appending when `reference` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        self.detach(child);
        let siblings = &mut self.nodes[parent.0].children;
        match siblings.iter().position(|&c| c == reference) {
            Some(pos) => siblings.insert(pos, child),
            None => siblings.push(child),
        }
        self.nodes[child.0].parent = Some(parent);
    }

    /// Puts `replacement` at `old`'s position under `parent`; `old` is detached.
    pub fn replace_child(&mut self, parent: NodeId, replacement: NodeId, old: NodeId) {
        if self.parent(old) != Some(parent) {
            return;
        }
        self.insert_before(parent, replacement, old);
        self.detach(old);
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) == Some(parent) {
            self.detach(child);
        }
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Descendants of `id` in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        match self.data(id) {
            Some(NodeData::Text(text)) => text.clone(),
            Some(NodeData::Element(_)) => self
                .descendants(id)
                .into_iter()
                .filter_map(|n| match self.data(n) {
                    Some(NodeData::Text(text)) => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
            None => String::new(),
        }
    }

    // ── Attributes ─────────────────────────────────────────────────

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attribute(name)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(el) = self.element_mut(id) else {
            return;
        };
        match el.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => el.attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(el) = self.element_mut(id) {
            el.attributes.retain(|(n, _)| n != name);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).map(|el| el.has_class(class)).unwrap_or(false)
    }

    // ── Inline style ───────────────────────────────────────────────

    /// Inline value of `property`, or `""` when not declared.
    pub fn style(&self, id: NodeId, property: &str) -> &str {
        self.element(id).map(|el| el.style.get(property)).unwrap_or("")
    }

    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        if let Some(el) = self.element_mut(id) {
            el.style.set(property, value);
        }
    }

    // ── Queries ────────────────────────────────────────────────────

    /// All elements matching `selector`, in document order, root included.
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .filter(|&id| selector.matches(self, id))
            .collect()
    }

    /// First descendant element of `id` carrying `class`.
    pub fn first_descendant_with_class(&self, id: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(id)
            .into_iter()
            .find(|&n| self.has_class(n, class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_box() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new(Viewport::default());
        let container = doc.create_element("div");
        let span = doc.create_element("span");
        let text = doc.create_text("Hello");
        doc.append_child(doc.root(), container);
        doc.append_child(container, span);
        doc.append_child(span, text);
        (doc, container, span)
    }

    #[test]
    fn test_inline_style_empty_value_removes() {
        let mut style = InlineStyle::default();
        style.set("font-size", "12px");
        style.set("line-height", "2");
        assert_eq!(style.get("font-size"), "12px");
        style.set("font-size", "");
        assert_eq!(style.get("font-size"), "");
        assert_eq!(style.iter().count(), 1);
    }

    #[test]
    fn test_inline_style_overwrite_keeps_position() {
        let mut style = InlineStyle::default();
        style.set("a", "1");
        style.set("b", "2");
        style.set("a", "3");
        let order: Vec<_> = style.iter().collect();
        assert_eq!(order, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_replace_and_reparent() {
        let (mut doc, container, span) = doc_with_box();
        let wrapper = doc.create_element("div");
        doc.replace_child(container, wrapper, span);
        doc.append_child(wrapper, span);

        assert_eq!(doc.children(container), &[wrapper]);
        assert_eq!(doc.parent(span), Some(wrapper));
        assert_eq!(doc.text_content(container), "Hello");
    }

    #[test]
    fn test_insert_before_moves_node() {
        let (mut doc, container, span) = doc_with_box();
        let first = doc.create_element("b");
        doc.append_child(container, first);
        doc.insert_before(container, first, span);
        assert_eq!(doc.children(container), &[first, span]);
    }

    #[test]
    fn test_descendants_preorder() {
        let (doc, container, span) = doc_with_box();
        let all = doc.descendants(doc.root());
        assert_eq!(all[0], container);
        assert_eq!(all[1], span);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_class_lookup() {
        let (mut doc, container, span) = doc_with_box();
        doc.set_attribute(span, "class", "title  textfill-clho");
        assert!(doc.has_class(span, "textfill-clho"));
        assert!(!doc.has_class(span, "textfill"));
        assert_eq!(
            doc.first_descendant_with_class(container, "title"),
            Some(span)
        );
        doc.remove_attribute(span, "class");
        assert_eq!(doc.first_descendant_with_class(container, "title"), None);
    }
}
