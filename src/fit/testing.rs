//! Deterministic oracle for unit tests.

use super::oracle::{Axis, LayoutOracle, Ratios};
use crate::dom::NodeId;

type SizeFn = Box<dyn Fn(i64, Axis, bool) -> i64>;

/// Oracle whose rendered size is a pure function of
/// `(font size, axis, wrapping enabled)`.
pub struct FakeOracle {
    size: SizeFn,
    pub font_px: i64,
    pub wrapping: bool,
    pub measurements: usize,
    pub tried_sizes: Vec<i64>,
    pub ratio_applications: Vec<Ratios>,
    pub display: Option<String>,
}

impl FakeOracle {
    pub fn new(size: impl Fn(i64, Axis, bool) -> i64 + 'static) -> Self {
        FakeOracle {
            size: Box::new(size),
            font_px: 0,
            wrapping: true,
            measurements: 0,
            tried_sizes: Vec::new(),
            ratio_applications: Vec::new(),
            display: None,
        }
    }

    /// Width `w` px and height `h` px per pixel of font size.
    pub fn linear(w: f64, h: f64) -> Self {
        Self::new(move |font, axis, _| match axis {
            Axis::Width => (font as f64 * w).round() as i64,
            Axis::Height => (font as f64 * h).round() as i64,
        })
    }
}

impl LayoutOracle for FakeOracle {
    fn begin_measurement(&mut self, _element: NodeId, ratios: &Ratios) {
        self.ratio_applications.push(*ratios);
        self.display = Some("inline".to_string());
    }

    fn apply_font_size(&mut self, _element: NodeId, font_px: i64) {
        self.font_px = font_px;
    }

    fn measure(&mut self, _element: NodeId, axis: Axis) -> i64 {
        self.measurements += 1;
        self.tried_sizes.push(self.font_px);
        (self.size)(self.font_px, axis, self.wrapping)
    }

    fn disable_wrapping(&mut self, _element: NodeId) {
        self.wrapping = false;
    }

    fn end_measurement(&mut self, _element: NodeId, display: &str) {
        self.display = Some(display.to_string());
    }
}
