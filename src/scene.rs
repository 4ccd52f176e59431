//! # Scene Input
//!
//! A self-contained JSON description of a page to fit: viewport, body tree,
//! target selector and options, plus an optional viewport to resize to
//! afterwards. This is what the CLI and the wasm binding consume.
//!
//! ```json
//! {
//!   "viewport": { "width": 800, "height": 600 },
//!   "body": [
//!     { "tag": "div", "attributes": { "class": "headline" },
//!       "style": { "width": "300px", "height": "80px" },
//!       "children": [{ "tag": "span", "children": [{ "text": "Breaking" }] }] }
//!   ],
//!   "target": ".headline",
//!   "options": { "maxFontPixels": 0 }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FitOptions;
use crate::dom::{Document, Namespace, NodeData, NodeId, Viewport};
use crate::error::FitError;
use crate::fit::{fit, FitReport, Target};
use crate::layout::TextLayout;
use crate::resize::{refit_on_resize, ResizeReport};

/// A scene to fit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub body: Vec<SceneNode>,
    pub target: String,
    #[serde(default)]
    pub options: FitOptions,
    /// Resize the viewport after fitting and re-run stored fits.
    #[serde(default)]
    pub resize_to: Option<Viewport>,
}

/// One input node: a text run or an element.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SceneNode {
    Text {
        text: String,
    },
    Element {
        tag: String,
        #[serde(default)]
        namespace: Namespace,
        #[serde(default)]
        attributes: IndexMap<String, String>,
        /// Inline style declarations, property name to value, applied in
        /// the order given.
        #[serde(default)]
        style: IndexMap<String, String>,
        #[serde(default)]
        children: Vec<SceneNode>,
    },
}

/// A node of the fitted tree, with the handle outcomes refer to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RenderedNode {
    Text {
        id: NodeId,
        text: String,
    },
    Element {
        id: NodeId,
        tag: String,
        #[serde(skip_serializing_if = "is_html")]
        namespace: Namespace,
        #[serde(skip_serializing_if = "IndexMap::is_empty")]
        attributes: IndexMap<String, String>,
        /// Inline style as `cssText`, declarations in write order.
        #[serde(skip_serializing_if = "String::is_empty")]
        style: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<RenderedNode>,
    },
}

fn is_html(namespace: &Namespace) -> bool {
    *namespace == Namespace::Html
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneReport {
    pub fit: FitReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize: Option<ResizeReport>,
    /// Body tree after fitting (and resizing).
    pub body: Vec<RenderedNode>,
}

/// Build the document for `scene`: an `html` root holding a `body` element
/// with the scene's nodes. Returns the document and the body.
pub fn build_document(scene: &Scene) -> (Document, NodeId) {
    let mut doc = Document::new(scene.viewport);
    let body = doc.create_element("body");
    doc.append_child(doc.root(), body);
    for node_input in &scene.body {
        let node = build_node(&mut doc, node_input);
        doc.append_child(body, node);
    }
    (doc, body)
}

fn build_node(doc: &mut Document, input: &SceneNode) -> NodeId {
    match input {
        SceneNode::Text { text } => doc.create_text(text),
        SceneNode::Element {
            tag,
            namespace,
            attributes,
            style,
            children,
        } => {
            let element = doc.create_element_ns(tag, *namespace);
            for (name, value) in attributes {
                doc.set_attribute(element, name, value);
            }
            for (property, value) in style {
                doc.set_style(element, property, value);
            }
            for child in children {
                let node = build_node(doc, child);
                doc.append_child(element, node);
            }
            element
        }
    }
}

/// Read the subtree under `id` back out of the document.
pub fn render_node(doc: &Document, id: NodeId) -> Option<RenderedNode> {
    match doc.data(id)? {
        NodeData::Text(text) => Some(RenderedNode::Text {
            id,
            text: text.clone(),
        }),
        NodeData::Element(element) => Some(RenderedNode::Element {
            id,
            tag: element.tag.clone(),
            namespace: element.namespace,
            attributes: element
                .attributes()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            style: element
                .style
                .iter()
                .map(|(property, value)| format!("{property}: {value};"))
                .collect::<Vec<_>>()
                .join(" "),
            children: doc
                .children(id)
                .iter()
                .filter_map(|&child| render_node(doc, child))
                .collect(),
        }),
    }
}

/// Fit a scene on the built-in layout engine.
pub fn fit_scene(scene: &Scene) -> Result<SceneReport, FitError> {
    let (mut doc, body) = build_document(scene);
    let engine = TextLayout::new();
    debug!(target_selector = %scene.target, nodes = doc.descendants(body).len(), "scene built");

    let fit_report = fit(
        &mut doc,
        &engine,
        Target::Selector(&scene.target),
        &scene.options,
        &mut (),
    )?;

    let resize = scene.resize_to.map(|viewport| {
        doc.set_viewport(viewport);
        refit_on_resize(&mut doc, &engine, &mut ())
    });

    Ok(SceneReport {
        fit: fit_report,
        resize,
        body: doc
            .children(body)
            .iter()
            .filter_map(|&child| render_node(&doc, child))
            .collect(),
    })
}
