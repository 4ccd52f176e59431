//! # Fit Options
//!
//! Two layers, like the document input model: [`FitOptions`] is what callers
//! pass and what gets stored for resize re-invocation (only the fields that
//! were actually supplied), and [`FitConfig`] is the resolved, immutable
//! configuration one fit call runs with.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_FONT_PIXELS: u32 = 4;
pub const DEFAULT_INNER_TAG: &str = "span";

/// Caller-supplied options. Every field is optional; unset fields take the
/// defaults documented on [`FitConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_font_pixels: Option<u32>,
    /// `<= 0` means "grow as far as the container height allows".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_font_pixels: Option<i32>,
    /// Selector for the text element, matched against direct children only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_line_height: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_line_height_offset: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_overflow: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_resize: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
}

/// Resolved configuration for one fit call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitConfig {
    /// Smallest font size the search may settle on. Default 4.
    pub min_font_pixels: u32,
    /// Largest candidate; `<= 0` derives it from the container height. Default 0.
    pub max_font_pixels: i32,
    /// Default `span`.
    pub inner_tag: String,
    pub width_only: bool,
    /// Overrides the measured container width. Zero counts as unset.
    pub explicit_width: Option<u32>,
    /// Overrides the measured container height. Zero counts as unset.
    pub explicit_height: Option<u32>,
    /// Also set the container's line height to the fitted size.
    pub change_line_height: bool,
    /// Shift text up to cancel the offset of a line height above 1. Default on.
    pub correct_line_height_offset: bool,
    pub allow_overflow: bool,
    pub auto_resize: bool,
    /// Emit bisection steps and outcomes on the `tracing` debug channel.
    pub debug: bool,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self::from_options(&FitOptions::default())
    }
}

impl FitConfig {
    pub fn from_options(options: &FitOptions) -> Self {
        FitConfig {
            min_font_pixels: options.min_font_pixels.unwrap_or(DEFAULT_MIN_FONT_PIXELS),
            max_font_pixels: options.max_font_pixels.unwrap_or(0),
            inner_tag: options
                .inner_tag
                .clone()
                .unwrap_or_else(|| DEFAULT_INNER_TAG.to_string()),
            width_only: options.width_only.unwrap_or(false),
            explicit_width: options.explicit_width.filter(|&w| w > 0),
            explicit_height: options.explicit_height.filter(|&h| h > 0),
            change_line_height: options.change_line_height.unwrap_or(false),
            correct_line_height_offset: options.correct_line_height_offset.unwrap_or(true),
            allow_overflow: options.allow_overflow.unwrap_or(false),
            auto_resize: options.auto_resize.unwrap_or(false),
            debug: options.debug.unwrap_or(false),
        }
    }

    /// Upper bound of the font-size search for a container `container_height`
    /// pixels tall. Never below the configured minimum.
    pub fn search_ceiling(&self, container_height: i64) -> i64 {
        let ceiling = if self.max_font_pixels <= 0 {
            container_height
        } else {
            i64::from(self.max_font_pixels)
        };
        ceiling.max(i64::from(self.min_font_pixels))
    }
}
