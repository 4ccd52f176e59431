//! Structured error types.
//!
//! [`FitError`] aborts a whole fit call and is only produced for input that
//! is invalid before any target is touched. Per-target problems are
//! [`TargetFailure`]s: they are reported to the observer and recorded in the
//! report, and the batch carries on.

use serde::Serialize;
use thiserror::Error;

use crate::dom::{NodeId, SelectorError};

/// The unified error type returned by the public API.
#[derive(Debug, Error)]
pub enum FitError {
    /// The target selector could not be parsed.
    #[error("invalid target selector `{selector}`: {source}")]
    InvalidSelector {
        selector: String,
        #[source]
        source: SelectorError,
    },
    /// The inner-tag selector could not be parsed.
    #[error("invalid inner tag selector `{selector}`: {source}")]
    InvalidInnerTag {
        selector: String,
        #[source]
        source: SelectorError,
    },
    /// A node handle that is not an element of this document.
    #[error("{0} is not an element of this document")]
    InvalidTarget(NodeId),
    /// Scene JSON failed to parse.
    #[error("failed to parse scene: {source}\n  Hint: {hint}")]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
    /// Options could not be serialized for storage.
    #[error("failed to serialize fit options: {0}")]
    Options(#[source] serde_json::Error),
    /// A report could not be serialized.
    #[error("failed to serialize report: {0}")]
    Report(#[source] serde_json::Error),
}

impl From<serde_json::Error> for FitError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters."
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the scene schema. Check field names and types."
            }
            serde_json::error::Category::Eof => "Unexpected end of input. Is the JSON truncated?",
            serde_json::error::Category::Io => "The input could not be read.",
        };
        FitError::Parse {
            source: e,
            hint: hint.to_string(),
        }
    }
}

/// Why one target could not be fitted.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TargetFailure {
    /// The target is not an HTML element (an SVG or MathML node, say).
    #[error("target is not an HTML element")]
    NotHtmlElement,
    /// No direct child of the container matches the inner tag.
    #[error("element has no direct children matching `{inner_tag}`")]
    #[serde(rename_all = "camelCase")]
    NoMatchingChild { inner_tag: String },
    /// Even the committed size overflows the container.
    #[error(
        "text overflows at {font_size}px (width {width}/{max_width}px, height {height}/{max_height}px)"
    )]
    #[serde(rename_all = "camelCase")]
    Overflow {
        font_size: i64,
        width: i64,
        height: i64,
        max_width: i64,
        max_height: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_carries_hint() {
        let err: FitError = serde_json::from_str::<serde_json::Value>("{ \"a\": 1, }")
            .unwrap_err()
            .into();
        let message = err.to_string();
        assert!(message.starts_with("failed to parse scene"));
        assert!(message.contains("trailing commas"));
    }

    #[test]
    fn test_target_failure_serializes_with_kind() {
        let failure = TargetFailure::NoMatchingChild {
            inner_tag: "span".to_string(),
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["kind"], "noMatchingChild");
        assert_eq!(json["innerTag"], "span");
    }
}
