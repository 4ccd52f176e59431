//! # Fitting
//!
//! Sizes the text inside each target container so it fills the container
//! without overflowing it.
//!
//! ## Per-target pipeline
//!
//! ```text
//! container ─→ store/clear resize options
//!           ─→ unwrap an earlier correction wrapper
//!           ─→ find the direct child matching `innerTag`
//!           ─→ [snapshot]   inline styles + computed ratios
//!           ─→ [reconcile]  bisect height, bisect width, commit the smaller
//!           ─→ [verify]     overflow? roll back : wrapper + line height
//!           ─→ on_success / on_failure
//! ```
//!
//! Targets are independent and handled in input order. A failing target is
//! rolled back and reported; it never stops the batch. `on_complete` fires
//! once after the last target.

pub mod observer;
pub mod oracle;
pub mod reconcile;
pub mod sizer;
pub mod snapshot;
pub mod verify;

#[cfg(test)]
mod testing;

use tracing::{debug, warn};

use crate::config::{FitConfig, FitOptions};
use crate::dom::{Document, Namespace, NodeId, Selector};
use crate::error::{FitError, TargetFailure};
use crate::layout::LayoutEngine;
use crate::resize;

pub use observer::{Callbacks, FitObserver, FitReport, TargetOutcome};
pub use oracle::{Axis, DomOracle, LayoutOracle, Ratios};
pub use reconcile::Bounds;
pub use snapshot::StyleSnapshot;

use reconcile::reconcile;
use verify::Committed;

/// What to fit: every element matching a selector, or one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'s> {
    Selector(&'s str),
    Node(NodeId),
}

impl<'s> From<&'s str> for Target<'s> {
    fn from(selector: &'s str) -> Self {
        Target::Selector(selector)
    }
}

impl From<NodeId> for Target<'_> {
    fn from(node: NodeId) -> Self {
        Target::Node(node)
    }
}

/// Fit every target container's text element to the container.
///
/// Returns `Err` only for input that is invalid as a whole (an unparsable
/// selector, a handle that is not an element); nothing has been touched in
/// that case. Per-target failures go to `observer` and into the report.
pub fn fit(
    doc: &mut Document,
    engine: &dyn LayoutEngine,
    target: Target<'_>,
    options: &FitOptions,
    observer: &mut dyn FitObserver,
) -> Result<FitReport, FitError> {
    let config = FitConfig::from_options(options);
    let inner = Selector::parse(&config.inner_tag).map_err(|source| FitError::InvalidInnerTag {
        selector: config.inner_tag.clone(),
        source,
    })?;
    let containers = resolve_targets(doc, target)?;
    let stored_options = if config.auto_resize {
        Some(resize::encode_options(options)?)
    } else {
        None
    };

    if config.debug {
        debug!(targets = containers.len(), ?config, "fit started");
    }

    let mut report = FitReport::default();
    for container in containers {
        let result = fit_one(
            doc,
            engine,
            container,
            &config,
            &inner,
            stored_options.as_deref(),
        );
        let outcome = match result {
            Ok(font_size) => {
                observer.on_success(container);
                TargetOutcome::Fitted {
                    container,
                    font_size,
                }
            }
            Err(reason) => {
                observer.on_failure(container, &reason);
                TargetOutcome::Failed { container, reason }
            }
        };
        report.outcomes.push(outcome);
    }

    observer.on_complete();
    if config.debug {
        debug!(
            fitted = report.fitted().count(),
            failed = report.failed().count(),
            "fit finished"
        );
    }
    Ok(report)
}

fn resolve_targets(doc: &Document, target: Target<'_>) -> Result<Vec<NodeId>, FitError> {
    match target {
        Target::Selector(selector) => {
            let parsed = Selector::parse(selector).map_err(|source| FitError::InvalidSelector {
                selector: selector.to_string(),
                source,
            })?;
            Ok(doc.query_selector_all(&parsed))
        }
        Target::Node(node) if doc.is_element(node) => Ok(vec![node]),
        Target::Node(node) => Err(FitError::InvalidTarget(node)),
    }
}

fn fit_one(
    doc: &mut Document,
    engine: &dyn LayoutEngine,
    container: NodeId,
    config: &FitConfig,
    inner: &Selector,
    stored_options: Option<&str>,
) -> Result<i64, TargetFailure> {
    let namespace = doc.element(container).map(|el| el.namespace);
    if namespace != Some(Namespace::Html) {
        warn!(%container, ?namespace, "fit target is not an HTML element");
        return Err(TargetFailure::NotHtmlElement);
    }

    match stored_options {
        Some(json) => resize::remember(doc, container, json),
        None => resize::forget(doc, container),
    }

    verify::remove_correction_wrapper(doc, container);

    let text = {
        let tree: &Document = doc;
        tree.child_elements(container)
            .find(|&child| inner.matches(tree, child))
    };
    let Some(text) = text else {
        warn!(
            %container,
            inner_tag = %config.inner_tag,
            "element has no direct children matching the inner tag"
        );
        return Err(TargetFailure::NoMatchingChild {
            inner_tag: config.inner_tag.clone(),
        });
    };

    let snapshot = StyleSnapshot::capture(doc, engine, text);
    let measured = engine.box_size(doc, container);
    let bounds = Bounds {
        width: config.explicit_width.map_or(measured.width, i64::from),
        height: config.explicit_height.map_or(measured.height, i64::from),
    };
    let ratios = snapshot.ratios();

    if config.debug {
        debug!(
            %container,
            text = %doc.text_content(text),
            max_width = bounds.width,
            max_height = bounds.height,
            old_font_size = snapshot.computed.font_size,
            line_height_ratio = ?ratios.line_height,
            letter_spacing_ratio = ?ratios.letter_spacing,
            "fitting target"
        );
    }

    let font_size = {
        let mut oracle = DomOracle::new(doc, engine);
        reconcile(&mut oracle, text, bounds, config, ratios, &snapshot.display)
    };

    let committed = Committed {
        container,
        text,
        bounds,
        font_size,
        snapshot: &snapshot,
    };
    let result = verify::settle(doc, engine, config, &committed);
    if config.debug {
        match &result {
            Ok(()) => debug!(
                %container,
                old_font_size = snapshot.computed.font_size,
                new_font_size = font_size,
                "target fitted"
            ),
            Err(reason) => debug!(%container, %reason, "target failed, styles restored"),
        }
    }
    result.map(|()| font_size)
}
