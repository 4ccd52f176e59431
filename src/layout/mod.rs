//! # Layout
//!
//! The fitter never measures text itself. It asks a [`LayoutEngine`] for the
//! rendered box of an element after every style change, the way a script asks
//! a browser for `offsetWidth`/`offsetHeight`. Hosts with a real rendering
//! surface implement the trait over it.
//!
//! [`TextLayout`] is the built-in engine. It is deterministic and understands
//! just enough CSS (font size, line height, letter spacing, display,
//! white-space, explicit sizes) to make fitting behave like it does in a
//! browser. It backs the CLI, the wasm binding and the integration tests.

pub mod metrics;
pub mod text;

use serde::Serialize;

use crate::dom::{Document, NodeData, NodeId};
use crate::style::{self, Display};
use text::{break_lines, collapse_whitespace};

/// Rendered border-box size in whole pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoxSize {
    pub width: i64,
    pub height: i64,
}

/// Computed typography of an element, in px.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedText {
    pub font_size: f64,
    /// `None` when the computed value is `normal`.
    pub line_height: Option<f64>,
    /// `None` when the computed value is `normal`.
    pub letter_spacing: Option<f64>,
}

/// A rendering surface that can report layout for the current tree state.
///
/// Implementations must not cache across calls: every call reflects the
/// tree exactly as it is now.
pub trait LayoutEngine {
    fn box_size(&self, doc: &Document, node: NodeId) -> BoxSize;
    fn computed_text(&self, doc: &Document, node: NodeId) -> ComputedText;
}

/// Deterministic built-in layout engine.
pub struct TextLayout;

impl Default for TextLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Width available to content inside `node`: the nearest explicit px
    /// width at or above it, else the viewport.
    fn available_width(&self, doc: &Document, node: NodeId) -> f64 {
        let mut current = Some(node);
        while let Some(id) = current {
            if let Some(width) = style::explicit_px(doc, id, style::WIDTH) {
                return width;
            }
            current = doc.parent(id);
        }
        doc.viewport().width
    }

    fn has_block_children(&self, doc: &Document, node: NodeId) -> bool {
        doc.child_elements(node)
            .any(|child| style::display(doc, child) == Display::Block)
    }

    /// Unrounded size of `node`.
    fn layout_box(&self, doc: &Document, node: NodeId) -> (f64, f64) {
        let display = style::display(doc, node);
        if display == Display::None {
            return (0.0, 0.0);
        }
        let explicit_width = style::explicit_px(doc, node, style::WIDTH);
        let explicit_height = style::explicit_px(doc, node, style::HEIGHT);

        if self.has_block_children(doc, node) {
            let width = explicit_width.unwrap_or_else(|| self.available_width(doc, node));
            let height = explicit_height.unwrap_or_else(|| {
                doc.child_elements(node)
                    .map(|child| self.layout_box(doc, child).1)
                    .sum()
            });
            return (width, height);
        }

        let (content_width, content_height) = self.layout_text(doc, node);
        let width = explicit_width.unwrap_or(match display {
            Display::Inline => content_width,
            _ => self.available_width(doc, node),
        });
        (width, explicit_height.unwrap_or(content_height))
    }

    /// Size of the text content of a leaf: widest line by lines × line height.
    fn layout_text(&self, doc: &Document, node: NodeId) -> (f64, f64) {
        let text = collapse_whitespace(&doc.text_content(node));
        let computed = self.computed_text(doc, node);
        let max_width = if style::wraps(doc, node) {
            Some(match doc.parent(node) {
                Some(parent) => self.available_width(doc, parent),
                None => doc.viewport().width,
            })
        } else {
            None
        };
        let lines = break_lines(
            &text,
            computed.font_size,
            computed.letter_spacing.unwrap_or(0.0),
            max_width,
        );
        let line_height = computed
            .line_height
            .unwrap_or(computed.font_size * style::NORMAL_LINE_HEIGHT);
        let width = lines.iter().map(|l| l.width).fold(0.0, f64::max);
        (width, lines.len() as f64 * line_height)
    }
}

impl LayoutEngine for TextLayout {
    fn box_size(&self, doc: &Document, node: NodeId) -> BoxSize {
        let (width, height) = match doc.data(node) {
            Some(NodeData::Element(_)) => self.layout_box(doc, node),
            Some(NodeData::Text(_)) | None => (0.0, 0.0),
        };
        BoxSize {
            width: width.round() as i64,
            height: height.round() as i64,
        }
    }

    fn computed_text(&self, doc: &Document, node: NodeId) -> ComputedText {
        ComputedText {
            font_size: style::font_size(doc, node),
            line_height: style::line_height(doc, node),
            letter_spacing: style::letter_spacing(doc, node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Viewport;

    fn container_with_text(width: &str, height: &str, content: &str) -> (Document, NodeId, NodeId) {
        let mut doc = Document::new(Viewport::default());
        let container = doc.create_element("div");
        doc.set_style(container, style::WIDTH, width);
        doc.set_style(container, style::HEIGHT, height);
        let span = doc.create_element("span");
        let text = doc.create_text(content);
        doc.append_child(doc.root(), container);
        doc.append_child(container, span);
        doc.append_child(span, text);
        (doc, container, span)
    }

    #[test]
    fn test_container_uses_explicit_size() {
        let (doc, container, _) = container_with_text("200px", "50px", "Hi");
        let size = TextLayout::new().box_size(&doc, container);
        assert_eq!(size, BoxSize { width: 200, height: 50 });
    }

    #[test]
    fn test_inline_width_tracks_font_size() {
        let (mut doc, _, span) = container_with_text("1000px", "50px", "Hi");
        let engine = TextLayout::new();
        doc.set_style(span, style::FONT_SIZE, "10px");
        let small = engine.box_size(&doc, span);
        doc.set_style(span, style::FONT_SIZE, "20px");
        let large = engine.box_size(&doc, span);
        assert!(large.width > small.width);
        // normal line height: 1.2 × 20px
        assert_eq!(large.height, 24);
    }

    #[test]
    fn test_block_leaf_takes_available_width() {
        let (mut doc, _, span) = container_with_text("300px", "50px", "Hi");
        doc.set_style(span, style::DISPLAY, "block");
        assert_eq!(TextLayout::new().box_size(&doc, span).width, 300);
    }

    #[test]
    fn test_wrapping_adds_lines_and_nowrap_removes_them() {
        let (mut doc, _, span) = container_with_text("60px", "500px", "one two three four");
        let engine = TextLayout::new();
        doc.set_style(span, style::FONT_SIZE, "10px");
        doc.set_style(span, style::LINE_HEIGHT, "1");
        let wrapped = engine.box_size(&doc, span);
        assert!(wrapped.height >= 20);
        doc.set_style(span, style::WHITE_SPACE, "nowrap");
        let single = engine.box_size(&doc, span);
        assert_eq!(single.height, 10);
        assert!(single.width > 60);
    }

    #[test]
    fn test_container_height_sums_block_children() {
        let mut doc = Document::new(Viewport::default());
        let outer = doc.create_element("div");
        doc.append_child(doc.root(), outer);
        for _ in 0..2 {
            let p = doc.create_element("p");
            doc.set_style(p, style::HEIGHT, "30px");
            doc.append_child(outer, p);
        }
        assert_eq!(TextLayout::new().box_size(&doc, outer).height, 60);
    }

    #[test]
    fn test_display_none_collapses() {
        let (mut doc, _, span) = container_with_text("100px", "100px", "Hi");
        doc.set_style(span, style::DISPLAY, "none");
        assert_eq!(TextLayout::new().box_size(&doc, span), BoxSize::default());
    }

    #[test]
    fn test_computed_text_reports_normal_as_none() {
        let (mut doc, _, span) = container_with_text("100px", "100px", "Hi");
        let engine = TextLayout::new();
        let computed = engine.computed_text(&doc, span);
        assert_eq!(computed.line_height, None);
        assert_eq!(computed.letter_spacing, None);
        doc.set_style(span, style::LINE_HEIGHT, "2");
        doc.set_style(span, style::FONT_SIZE, "12px");
        let computed = engine.computed_text(&doc, span);
        assert!((computed.line_height.unwrap() - 24.0).abs() < 1e-9);
    }
}
