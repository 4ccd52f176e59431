//! # TextFill
//!
//! Grows or shrinks the text inside a container until it fills the box.
//!
//! The fitter never computes glyph metrics. It treats layout as a black-box
//! oracle: set a font size, read back the rendered size, and bisect on
//! integer pixel sizes until the largest size that fits is found. Height and
//! width are searched separately and the smaller answer wins, so text never
//! overflows either axis. A final measurement confirms the fit; if the text
//! still overflows the element is rolled back to exactly how it was.
//!
//! ## Architecture
//!
//! ```text
//! Input (Scene JSON / API)
//!       ↓
//!   [dom]       Visual tree: elements, attributes, inline styles
//!       ↓
//!   [layout]    Rendered box sizes for the current tree state
//!       ↓
//!   [fit]       Bisect, reconcile axes, verify or roll back
//!       ↓
//!   [resize]    Re-run stored fits when the viewport changes
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod fit;
pub mod layout;
pub mod resize;
pub mod scene;
pub mod style;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{FitConfig, FitOptions};
pub use dom::{Document, Namespace, NodeId, Selector, Viewport};
pub use error::{FitError, TargetFailure};
pub use fit::{fit, Callbacks, FitObserver, FitReport, Target, TargetOutcome};
pub use layout::{BoxSize, LayoutEngine, TextLayout};
pub use resize::{refit_on_resize, ResizeReport};
pub use scene::{fit_scene, Scene, SceneReport};

/// Fit a scene described as JSON.
///
/// This is the entry point for the CLI and the wasm binding.
pub fn fit_scene_json(json: &str) -> Result<SceneReport, FitError> {
    let scene: Scene = serde_json::from_str(json)?;
    fit_scene(&scene)
}
