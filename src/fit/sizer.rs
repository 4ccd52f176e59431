//! # Bisection Sizer
//!
//! Finds the largest whole-pixel font size whose rendered size along one axis
//! stays within a bound. The layout engine is the only source of truth, so
//! every trial size is a real style write followed by a real measurement.
//!
//! Rendered size is assumed to be non-decreasing in font size. Under that
//! assumption the loop keeps `min` fitting and `max` either overflowing or
//! untested, halving the gap until they are adjacent; `max` gets one final
//! measurement so that the larger of two fitting neighbours wins.

use tracing::debug;

use super::oracle::{Axis, LayoutOracle, Ratios};
use crate::dom::NodeId;

/// One axis worth of search input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingRequest {
    pub axis: Axis,
    /// Largest rendered size allowed along `axis`.
    pub bound: i64,
    /// Search floor (font px).
    pub min_font_pixels: i64,
    /// Search ceiling (font px). Not the same thing as `bound`.
    pub max_font_pixels: i64,
    pub ratios: Ratios,
}

/// Run the search and return the chosen font size.
///
/// The result is always within `[min_font_pixels, max_font_pixels]` when
/// `min_font_pixels <= max_font_pixels`. It is not guaranteed to fit: when
/// the floor itself overflows the floor is returned and the caller's
/// verification catches it.
pub fn bisect<O: LayoutOracle + ?Sized>(
    oracle: &mut O,
    element: NodeId,
    request: &SizingRequest,
    trace: bool,
) -> i64 {
    let SizingRequest { axis, bound, .. } = *request;
    let mut min = request.min_font_pixels;
    let mut max = request.max_font_pixels;

    oracle.begin_measurement(element, &request.ratios);

    while min < max - 1 {
        let candidate = (min + max).div_euclid(2);
        oracle.apply_font_size(element, candidate);
        let measured = oracle.measure(element, axis);

        if measured <= bound {
            min = candidate;
            if measured == bound {
                if trace {
                    debug!(?axis, font_size = candidate, measured, bound, "exact fit");
                }
                break;
            }
        } else {
            max = candidate;
        }

        if trace {
            debug!(
                ?axis,
                font_size = candidate,
                measured,
                bound,
                min_font_pixels = min,
                max_font_pixels = max,
                "bisection step"
            );
        }
    }

    oracle.apply_font_size(element, max);
    let measured = oracle.measure(element, axis);
    if measured <= bound {
        min = max;
        if trace {
            debug!(?axis, font_size = max, measured, bound, "ceiling fits");
        }
    }
    min
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::testing::FakeOracle;

    fn element() -> NodeId {
        crate::dom::Document::new(Default::default()).root()
    }

    fn request(axis: Axis, bound: i64, min: i64, max: i64) -> SizingRequest {
        SizingRequest {
            axis,
            bound,
            min_font_pixels: min,
            max_font_pixels: max,
            ratios: Ratios::default(),
        }
    }

    #[test]
    fn test_finds_largest_fitting_size() {
        // width = 10 × font; 205px allows 20px but not 21px
        let mut oracle = FakeOracle::linear(10.0, 1.0);
        let size = bisect(&mut oracle, element(), &request(Axis::Width, 205, 4, 100), false);
        assert_eq!(size, 20);
    }

    #[test]
    fn test_result_stays_within_search_bounds() {
        for bound in [0, 1, 7, 50, 199, 200, 333, 5_000] {
            for (min, max) in [(4, 40), (10, 12), (0, 1), (7, 7), (1, 300)] {
                let mut oracle = FakeOracle::linear(3.7, 1.2);
                let size = bisect(&mut oracle, element(), &request(Axis::Width, bound, min, max), false);
                assert!(
                    (min..=max).contains(&size),
                    "bound {bound}, range [{min}, {max}] gave {size}"
                );
                // maximal under monotonicity: either it is the ceiling or one more overflows
                let next = ((size + 1) as f64 * 3.7).round() as i64;
                assert!(size == max || next > bound);
            }
        }
    }

    #[test]
    fn test_exact_fit_short_circuits() {
        // 520px is hit exactly by the very first candidate, 52
        let mut oracle = FakeOracle::linear(10.0, 1.0);
        let size = bisect(&mut oracle, element(), &request(Axis::Width, 520, 4, 100), false);
        assert_eq!(size, 52);
        // first midpoint plus the ceiling check
        assert_eq!(oracle.tried_sizes, vec![52, 100]);

        let mut inexact = FakeOracle::linear(10.0, 1.0);
        bisect(&mut inexact, element(), &request(Axis::Width, 525, 4, 100), false);
        assert!(inexact.measurements > oracle.measurements);
    }

    #[test]
    fn test_floor_returned_when_nothing_fits() {
        let mut oracle = FakeOracle::linear(10.0, 1.0);
        let size = bisect(&mut oracle, element(), &request(Axis::Width, 5, 10, 12), false);
        assert_eq!(size, 10);
    }

    #[test]
    fn test_ceiling_promoted_when_it_fits() {
        let mut oracle = FakeOracle::linear(1.0, 1.0);
        let size = bisect(&mut oracle, element(), &request(Axis::Height, 10_000, 4, 40), false);
        assert_eq!(size, 40);
        assert_eq!(oracle.font_px, 40);
    }

    #[test]
    fn test_degenerate_range_measures_once() {
        let mut oracle = FakeOracle::linear(1.0, 1.0);
        let size = bisect(&mut oracle, element(), &request(Axis::Width, 100, 7, 7), false);
        assert_eq!(size, 7);
        assert_eq!(oracle.measurements, 1);
    }

    #[test]
    fn test_stepwise_sizes_find_plateau_end() {
        // height jumps one 12px line every 8px of font size; 40px allows 3 lines
        let mut oracle = FakeOracle::new(|font, _, _| ((font + 7) / 8) * 12);
        let size = bisect(&mut oracle, element(), &request(Axis::Height, 40, 4, 64), false);
        assert_eq!(size, 24);
    }

    #[test]
    fn test_exact_fit_on_plateau_stops_early() {
        // 19px already renders at exactly 36px, so the search stops there even
        // though 24px would render the same
        let mut oracle = FakeOracle::new(|font, _, _| ((font + 7) / 8) * 12);
        let size = bisect(&mut oracle, element(), &request(Axis::Height, 36, 4, 64), false);
        assert_eq!(size, 19);
    }

    #[test]
    fn test_ratios_pinned_once_before_search() {
        let mut oracle = FakeOracle::linear(2.0, 1.0);
        let mut req = request(Axis::Width, 50, 4, 40);
        req.ratios = Ratios {
            line_height: Some(1.5),
            letter_spacing: None,
        };
        bisect(&mut oracle, element(), &req, true);
        assert_eq!(oracle.ratio_applications, vec![req.ratios]);
    }
}
