//! Pre-fit style state of the text element.

use super::oracle::Ratios;
use crate::dom::{Document, NodeId};
use crate::layout::{ComputedText, LayoutEngine};
use crate::style;

/// Inline declarations as the caller left them, plus the computed values
/// the ratios are derived from. Restoring writes the inline values back
/// verbatim, so a property that was not declared ends up not declared.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSnapshot {
    pub font_size: String,
    pub line_height: String,
    pub letter_spacing: String,
    pub display: String,
    pub white_space: String,
    pub computed: ComputedText,
}

impl StyleSnapshot {
    pub fn capture(doc: &Document, engine: &dyn LayoutEngine, element: NodeId) -> Self {
        StyleSnapshot {
            font_size: doc.style(element, style::FONT_SIZE).to_string(),
            line_height: doc.style(element, style::LINE_HEIGHT).to_string(),
            letter_spacing: doc.style(element, style::LETTER_SPACING).to_string(),
            display: doc.style(element, style::DISPLAY).to_string(),
            white_space: doc.style(element, style::WHITE_SPACE).to_string(),
            computed: engine.computed_text(doc, element),
        }
    }

    pub fn restore(&self, doc: &mut Document, element: NodeId) {
        doc.set_style(element, style::FONT_SIZE, &self.font_size);
        doc.set_style(element, style::LETTER_SPACING, &self.letter_spacing);
        doc.set_style(element, style::LINE_HEIGHT, &self.line_height);
        doc.set_style(element, style::DISPLAY, &self.display);
        doc.set_style(element, style::WHITE_SPACE, &self.white_space);
    }

    /// Line height and letter spacing relative to the computed font size.
    pub fn ratios(&self) -> Ratios {
        let font_size = self.computed.font_size;
        let ratio = |value: Option<f64>| {
            value
                .map(|v| v / font_size)
                .filter(|r| r.is_finite())
        };
        Ratios {
            line_height: ratio(self.computed.line_height),
            letter_spacing: ratio(self.computed.letter_spacing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Viewport;
    use crate::layout::TextLayout;

    #[test]
    fn test_restore_is_verbatim() {
        let mut doc = Document::new(Viewport::default());
        let span = doc.create_element("span");
        doc.append_child(doc.root(), span);
        doc.set_style(span, style::FONT_SIZE, "1.25em");
        doc.set_style(span, style::LINE_HEIGHT, "normal");

        let snapshot = StyleSnapshot::capture(&doc, &TextLayout::new(), span);
        doc.set_style(span, style::FONT_SIZE, "37px");
        doc.set_style(span, style::LINE_HEIGHT, "2");
        doc.set_style(span, style::LETTER_SPACING, "0.1em");
        doc.set_style(span, style::DISPLAY, "inline");
        doc.set_style(span, style::WHITE_SPACE, "nowrap");
        snapshot.restore(&mut doc, span);

        assert_eq!(doc.style(span, style::FONT_SIZE), "1.25em");
        assert_eq!(doc.style(span, style::LINE_HEIGHT), "normal");
        assert_eq!(doc.style(span, style::LETTER_SPACING), "");
        assert_eq!(doc.style(span, style::DISPLAY), "");
        assert_eq!(doc.style(span, style::WHITE_SPACE), "");
    }

    #[test]
    fn test_ratios_from_computed_values() {
        let snapshot = StyleSnapshot {
            font_size: String::new(),
            line_height: String::new(),
            letter_spacing: String::new(),
            display: String::new(),
            white_space: String::new(),
            computed: ComputedText {
                font_size: 20.0,
                line_height: Some(30.0),
                letter_spacing: None,
            },
        };
        let ratios = snapshot.ratios();
        assert!((ratios.line_height.unwrap() - 1.5).abs() < 1e-9);
        assert_eq!(ratios.letter_spacing, None);
    }

    #[test]
    fn test_zero_font_size_gives_no_ratio() {
        let snapshot = StyleSnapshot {
            font_size: String::new(),
            line_height: String::new(),
            letter_spacing: String::new(),
            display: String::new(),
            white_space: String::new(),
            computed: ComputedText {
                font_size: 0.0,
                line_height: Some(0.0),
                letter_spacing: Some(1.0),
            },
        };
        assert_eq!(snapshot.ratios(), Ratios::default());
    }
}
