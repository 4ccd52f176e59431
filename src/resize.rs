//! # Auto-Resize
//!
//! With `autoResize`, a fit records the caller's options on the container as
//! JSON. When the environment resizes, [`refit_on_resize`] finds every
//! container carrying stored options and fits it again with exactly those
//! options. A fit without `autoResize` clears the record.

use serde::Serialize;
use tracing::warn;

use crate::config::FitOptions;
use crate::dom::{Document, NodeId};
use crate::error::FitError;
use crate::fit::{fit, FitObserver, FitReport, Target};
use crate::layout::LayoutEngine;

/// Attribute holding a container's stored options.
pub const RESIZE_OPTIONS_ATTRIBUTE: &str = "data-textfill-resize-options";

pub fn encode_options(options: &FitOptions) -> Result<String, FitError> {
    serde_json::to_string(options).map_err(FitError::Options)
}

pub fn remember(doc: &mut Document, container: NodeId, encoded: &str) {
    doc.set_attribute(container, RESIZE_OPTIONS_ATTRIBUTE, encoded);
}

pub fn forget(doc: &mut Document, container: NodeId) {
    doc.remove_attribute(container, RESIZE_OPTIONS_ATTRIBUTE);
}

/// Options stored on `container`, if any.
pub fn stored_options(
    doc: &Document,
    container: NodeId,
) -> Option<Result<FitOptions, serde_json::Error>> {
    doc.attribute(container, RESIZE_OPTIONS_ATTRIBUTE)
        .map(serde_json::from_str)
}

/// A container whose stored options could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRefit {
    pub container: NodeId,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResizeReport {
    /// One report per re-fitted container, in document order.
    pub refits: Vec<FitReport>,
    pub skipped: Vec<SkippedRefit>,
}

/// Re-run every stored fit. Call after the viewport or a container changed
/// size. Malformed stored options are logged and skipped.
pub fn refit_on_resize(
    doc: &mut Document,
    engine: &dyn LayoutEngine,
    observer: &mut dyn FitObserver,
) -> ResizeReport {
    let root = doc.root();
    let containers: Vec<NodeId> = std::iter::once(root)
        .chain(doc.descendants(root))
        .filter(|&node| doc.attribute(node, RESIZE_OPTIONS_ATTRIBUTE).is_some())
        .collect();

    let mut report = ResizeReport::default();
    for container in containers {
        let options = match stored_options(doc, container) {
            Some(Ok(options)) => options,
            Some(Err(e)) => {
                warn!(%container, error = %e, "couldn't parse stored resize options");
                report.skipped.push(SkippedRefit {
                    container,
                    reason: e.to_string(),
                });
                continue;
            }
            None => continue,
        };
        match fit(doc, engine, Target::Node(container), &options, observer) {
            Ok(fit_report) => report.refits.push(fit_report),
            Err(e) => {
                warn!(%container, error = %e, "stored resize options rejected");
                report.skipped.push(SkippedRefit {
                    container,
                    reason: e.to_string(),
                });
            }
        }
    }
    report
}
