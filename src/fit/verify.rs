//! # Fit Verifier & Rollback
//!
//! After the reconciler commits a size the element is measured once more.
//! Overflow rolls the element back to its snapshot; success optionally adds
//! the line-height correction wrapper and the container line height.
//!
//! The correction wrapper is a `div.textfill-clho` between the container and
//! the text element. It lives in the tree between calls, so every fit starts
//! by unwrapping whatever an earlier fit left behind.

use super::reconcile::Bounds;
use super::snapshot::StyleSnapshot;
use crate::config::FitConfig;
use crate::dom::{Document, NodeId};
use crate::error::TargetFailure;
use crate::layout::LayoutEngine;
use crate::style::{self, format_number, format_px};

/// Marker class of the line-height correction wrapper.
pub const CORRECTION_CLASS: &str = "textfill-clho";

/// Unwrap a correction wrapper left inside `container` by an earlier fit,
/// moving its children back to where it was. Returns whether one was found.
pub fn remove_correction_wrapper(doc: &mut Document, container: NodeId) -> bool {
    let Some(wrapper) = doc.first_descendant_with_class(container, CORRECTION_CLASS) else {
        return false;
    };
    let Some(parent) = doc.parent(wrapper) else {
        return false;
    };
    let children = doc.children(wrapper).to_vec();
    for child in children {
        doc.insert_before(parent, child, wrapper);
    }
    doc.remove_child(parent, wrapper);
    true
}

/// Wrap `text` in a relatively positioned `div` that shifts it up by the
/// half-leading a line height of `line_height_ratio` adds above the glyphs.
pub fn insert_correction_wrapper(
    doc: &mut Document,
    container: NodeId,
    text: NodeId,
    line_height_ratio: f64,
    font_size: i64,
) -> NodeId {
    let wrapper = doc.create_element("div");
    doc.replace_child(container, wrapper, text);
    doc.append_child(wrapper, text);

    doc.set_attribute(wrapper, "class", CORRECTION_CLASS);
    let offset = -(line_height_ratio - 1.0) / 2.0;
    doc.set_style(wrapper, style::TOP, &format!("{}em", format_number(offset)));
    doc.set_style(wrapper, style::FONT_SIZE, &format_px(font_size as f64));
    doc.set_style(wrapper, style::POSITION, "relative");
    wrapper
}

/// Overflow of the committed box, if any and if not allowed.
pub fn check_overflow(
    doc: &Document,
    engine: &dyn LayoutEngine,
    text: NodeId,
    bounds: Bounds,
    config: &FitConfig,
    font_size: i64,
) -> Option<TargetFailure> {
    if config.allow_overflow {
        return None;
    }
    let size = engine.box_size(doc, text);
    let too_wide = size.width > bounds.width;
    let too_tall = !config.width_only && size.height > bounds.height;
    (too_wide || too_tall).then(|| TargetFailure::Overflow {
        font_size,
        width: size.width,
        height: size.height,
        max_width: bounds.width,
        max_height: bounds.height,
    })
}

/// Everything one target's verification needs.
pub struct Committed<'s> {
    pub container: NodeId,
    pub text: NodeId,
    pub bounds: Bounds,
    pub font_size: i64,
    pub snapshot: &'s StyleSnapshot,
}

/// Verify the committed size; roll back on overflow, finish the styling
/// on success.
pub fn settle(
    doc: &mut Document,
    engine: &dyn LayoutEngine,
    config: &FitConfig,
    committed: &Committed<'_>,
) -> Result<(), TargetFailure> {
    let Committed {
        container,
        text,
        bounds,
        font_size,
        snapshot,
    } = *committed;

    if let Some(failure) = check_overflow(doc, engine, text, bounds, config, font_size) {
        snapshot.restore(doc, text);
        remove_correction_wrapper(doc, container);
        return Err(failure);
    }

    let line_height_ratio = snapshot.ratios().line_height;
    if config.correct_line_height_offset {
        if let Some(ratio) = line_height_ratio.filter(|&r| r != 1.0) {
            insert_correction_wrapper(doc, container, text, ratio, font_size);
        }
    }
    if config.change_line_height {
        if let Some(ratio) = line_height_ratio {
            let line_height = format_px(ratio * font_size as f64);
            doc.set_style(container, style::LINE_HEIGHT, &line_height);
        }
    }
    Ok(())
}
