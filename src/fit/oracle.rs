//! The measurement seam between the search and the rendering surface.
//!
//! The sizer and reconciler only ever talk to a [`LayoutOracle`], so they run
//! unchanged against a live tree ([`DomOracle`]) or a synthetic size function
//! in tests.

use serde::Serialize;

use crate::dom::{Document, NodeId};
use crate::layout::LayoutEngine;
use crate::style::{self, format_number, format_px};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    Width,
    Height,
}

/// Line-height and letter-spacing as multiples of the font size, held
/// constant while the font size changes. `None` when the computed value is
/// `normal`, in which case the property is left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ratios {
    pub line_height: Option<f64>,
    pub letter_spacing: Option<f64>,
}

/// Applies candidate sizes to an element and reads back its rendered size.
pub trait LayoutOracle {
    /// Pin the ratios and put the element in inline-level measurement mode,
    /// so its size is not dictated by sibling layout.
    fn begin_measurement(&mut self, element: NodeId, ratios: &Ratios);

    fn apply_font_size(&mut self, element: NodeId, font_px: i64);

    /// Rendered size along `axis` as of the last applied candidate.
    fn measure(&mut self, element: NodeId, axis: Axis) -> i64;

    /// Keep the text on a single line for width measurement.
    fn disable_wrapping(&mut self, element: NodeId);

    /// Leave measurement mode, restoring the inline `display` value.
    fn end_measurement(&mut self, element: NodeId, display: &str);
}

/// [`LayoutOracle`] over a live [`Document`] and its [`LayoutEngine`].
pub struct DomOracle<'a> {
    doc: &'a mut Document,
    engine: &'a dyn LayoutEngine,
}

impl<'a> DomOracle<'a> {
    pub fn new(doc: &'a mut Document, engine: &'a dyn LayoutEngine) -> Self {
        DomOracle { doc, engine }
    }
}

impl LayoutOracle for DomOracle<'_> {
    fn begin_measurement(&mut self, element: NodeId, ratios: &Ratios) {
        if let Some(ratio) = ratios.letter_spacing {
            let value = format!("{}em", format_number(ratio));
            self.doc.set_style(element, style::LETTER_SPACING, &value);
        }
        if let Some(ratio) = ratios.line_height {
            self.doc
                .set_style(element, style::LINE_HEIGHT, &format_number(ratio));
        }
        self.doc.set_style(element, style::DISPLAY, "inline");
    }

    fn apply_font_size(&mut self, element: NodeId, font_px: i64) {
        self.doc
            .set_style(element, style::FONT_SIZE, &format_px(font_px as f64));
    }

    fn measure(&mut self, element: NodeId, axis: Axis) -> i64 {
        let size = self.engine.box_size(self.doc, element);
        match axis {
            Axis::Width => size.width,
            Axis::Height => size.height,
        }
    }

    fn disable_wrapping(&mut self, element: NodeId) {
        self.doc.set_style(element, style::WHITE_SPACE, "nowrap");
    }

    fn end_measurement(&mut self, element: NodeId, display: &str) {
        self.doc.set_style(element, style::DISPLAY, display);
    }
}
