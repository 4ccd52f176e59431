//! # Dual-Axis Reconciler
//!
//! Runs the sizer for height (unless width-only) and then for width, and
//! commits the binding constraint: the smaller of the two sizes.

use serde::Serialize;
use tracing::debug;

use super::oracle::{Axis, LayoutOracle, Ratios};
use super::sizer::{bisect, SizingRequest};
use crate::config::FitConfig;
use crate::dom::NodeId;

/// The box the text has to fit into, in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub width: i64,
    pub height: i64,
}

/// Pick and commit a font size for `element`.
///
/// Leaves the element at the returned size with its original inline
/// `display` restored. In width-only mode wrapping stays disabled.
pub fn reconcile<O: LayoutOracle + ?Sized>(
    oracle: &mut O,
    element: NodeId,
    bounds: Bounds,
    config: &FitConfig,
    ratios: Ratios,
    original_display: &str,
) -> i64 {
    let min_font_pixels = i64::from(config.min_font_pixels);
    let max_font_pixels = config.search_ceiling(bounds.height);
    let request = |axis, bound| SizingRequest {
        axis,
        bound,
        min_font_pixels,
        max_font_pixels,
        ratios,
    };

    let height_size = if config.width_only {
        None
    } else {
        Some(bisect(
            oracle,
            element,
            &request(Axis::Height, bounds.height),
            config.debug,
        ))
    };

    // Wrapped text would report the width of its widest line, not its length.
    if config.width_only {
        oracle.disable_wrapping(element);
    }
    let width_size = bisect(
        oracle,
        element,
        &request(Axis::Width, bounds.width),
        config.debug,
    );

    let final_size = match height_size {
        Some(height_size) => height_size.min(width_size),
        None => width_size,
    };
    if config.debug {
        debug!(
            ?height_size,
            width_size,
            final_size,
            max_font_pixels,
            "reconciled axis sizes"
        );
    }

    oracle.apply_font_size(element, final_size);
    oracle.end_measurement(element, original_display);
    final_size
}
