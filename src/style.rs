//! # Style Values
//!
//! Parsing and formatting of the handful of CSS values the fitter reads and
//! writes, plus the inheritance rules the built-in layout engine uses to turn
//! inline declarations into computed values.
//!
//! This is deliberately not a cascade: only inline declarations exist, and a
//! property is either declared on the element, inherited from the nearest
//! declaring ancestor, or defaulted.

use crate::dom::{Document, NodeId};

pub const FONT_SIZE: &str = "font-size";
pub const LINE_HEIGHT: &str = "line-height";
pub const LETTER_SPACING: &str = "letter-spacing";
pub const DISPLAY: &str = "display";
pub const WHITE_SPACE: &str = "white-space";
pub const WIDTH: &str = "width";
pub const HEIGHT: &str = "height";
pub const POSITION: &str = "position";
pub const TOP: &str = "top";

/// Font size of the root element when nothing is declared.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
/// Used value of `line-height: normal`, as a multiple of the font size.
pub const NORMAL_LINE_HEIGHT: f64 = 1.2;

const INLINE_TAGS: &[&str] = &[
    "span", "a", "b", "i", "em", "strong", "small", "label", "code", "sub", "sup",
];

/// A parsed CSS length or number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    Em(f64),
    Percent(f64),
    /// Unitless number (meaningful for `line-height`).
    Number(f64),
}

impl Length {
    /// Resolve against `font_size`. Unitless numbers scale the font size.
    pub fn to_px(self, font_size: f64) -> f64 {
        match self {
            Length::Px(v) => v,
            Length::Em(v) | Length::Number(v) => v * font_size,
            Length::Percent(v) => v / 100.0 * font_size,
        }
    }
}

pub fn parse_length(value: &str) -> Option<Length> {
    let value = value.trim();
    let (number, ctor): (&str, fn(f64) -> Length) = if let Some(n) = value.strip_suffix("px") {
        (n, Length::Px)
    } else if let Some(n) = value.strip_suffix("em") {
        (n, Length::Em)
    } else if let Some(n) = value.strip_suffix('%') {
        (n, Length::Percent)
    } else {
        (value, Length::Number)
    };
    let parsed: f64 = number.trim().parse().ok()?;
    parsed.is_finite().then(|| ctor(parsed))
}

/// `12` → `"12px"`, `12.5` → `"12.5px"`.
pub fn format_px(value: f64) -> String {
    format!("{}px", format_number(value))
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Inline,
    Block,
    None,
}

/// Nearest element at or above `id` (text nodes resolve to their parent).
fn element_or_parent(doc: &Document, id: NodeId) -> Option<NodeId> {
    if doc.is_element(id) {
        Some(id)
    } else {
        doc.parent(id)
    }
}

pub fn display(doc: &Document, id: NodeId) -> Display {
    let Some(el) = doc.element(id) else {
        return Display::Inline;
    };
    match el.style.get(DISPLAY).trim() {
        "none" => Display::None,
        "inline" | "inline-block" => Display::Inline,
        "" => {
            if INLINE_TAGS.contains(&el.tag.as_str()) {
                Display::Inline
            } else {
                Display::Block
            }
        }
        _ => Display::Block,
    }
}

/// Whether text in `id` may wrap. `white-space` is inherited.
pub fn wraps(doc: &Document, id: NodeId) -> bool {
    let mut current = element_or_parent(doc, id);
    while let Some(node) = current {
        match doc.style(node, WHITE_SPACE).trim() {
            "nowrap" | "pre" => return false,
            "" => current = doc.parent(node),
            _ => return true,
        }
    }
    true
}

/// Computed font size in px.
pub fn font_size(doc: &Document, id: NodeId) -> f64 {
    let Some(node) = element_or_parent(doc, id) else {
        return DEFAULT_FONT_SIZE;
    };
    let inherited = match doc.parent(node) {
        Some(parent) => font_size(doc, parent),
        None => DEFAULT_FONT_SIZE,
    };
    match parse_length(doc.style(node, FONT_SIZE)) {
        Some(Length::Px(v)) => v,
        Some(Length::Em(v)) => v * inherited,
        Some(Length::Percent(v)) => v / 100.0 * inherited,
        // Unitless font sizes are invalid and ignored.
        Some(Length::Number(_)) | None => inherited,
    }
}

/// Computed line height in px, `None` for `normal`.
///
/// Unitless values inherit as a factor and scale the element's own font size;
/// lengths are resolved where they are declared and inherit as pixels.
pub fn line_height(doc: &Document, id: NodeId) -> Option<f64> {
    let node = element_or_parent(doc, id)?;
    let own_font_size = font_size(doc, node);
    let mut current = Some(node);
    while let Some(declaring) = current {
        let value = doc.style(declaring, LINE_HEIGHT).trim();
        if value == "normal" {
            return None;
        }
        match parse_length(value) {
            Some(Length::Number(factor)) => return Some(factor * own_font_size),
            Some(length) => return Some(length.to_px(font_size(doc, declaring))),
            None => current = doc.parent(declaring),
        }
    }
    None
}

/// Computed letter spacing in px, `None` for `normal`.
pub fn letter_spacing(doc: &Document, id: NodeId) -> Option<f64> {
    let mut current = element_or_parent(doc, id);
    while let Some(declaring) = current {
        let value = doc.style(declaring, LETTER_SPACING).trim();
        if value == "normal" {
            return None;
        }
        match parse_length(value) {
            // Unitless letter spacing is invalid CSS; skip the declaration.
            Some(Length::Number(v)) if v != 0.0 => current = doc.parent(declaring),
            Some(length) => return Some(length.to_px(font_size(doc, declaring))),
            None => current = doc.parent(declaring),
        }
    }
    None
}

/// Explicit `width`/`height` in px, if declared on the element itself.
pub fn explicit_px(doc: &Document, id: NodeId, property: &str) -> Option<f64> {
    let font_size = font_size(doc, id);
    match parse_length(doc.style(id, property))? {
        Length::Px(v) => Some(v),
        Length::Em(v) => Some(v * font_size),
        Length::Number(v) if v == 0.0 => Some(0.0),
        _ => None,
    }
}
