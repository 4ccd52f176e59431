//! Per-target notifications and the batch report.

use serde::Serialize;

use crate::dom::NodeId;
use crate::error::TargetFailure;

/// Receives outcomes as targets resolve, then one completion signal.
///
/// All methods default to no-ops.
pub trait FitObserver {
    fn on_success(&mut self, _container: NodeId) {}
    fn on_failure(&mut self, _container: NodeId, _reason: &TargetFailure) {}
    fn on_complete(&mut self) {}
}

/// Observer that ignores everything; the report alone is enough.
impl FitObserver for () {}

type TargetCallback<'a> = Box<dyn FnMut(NodeId) + 'a>;
type FailureCallback<'a> = Box<dyn FnMut(NodeId, &TargetFailure) + 'a>;
type CompleteCallback<'a> = Box<dyn FnMut() + 'a>;

/// Closure-backed observer, one optional closure per notification.
#[derive(Default)]
pub struct Callbacks<'a> {
    success: Option<TargetCallback<'a>>,
    failure: Option<FailureCallback<'a>>,
    complete: Option<CompleteCallback<'a>>,
}

impl<'a> Callbacks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success(mut self, f: impl FnMut(NodeId) + 'a) -> Self {
        self.success = Some(Box::new(f));
        self
    }

    pub fn on_failure(mut self, f: impl FnMut(NodeId, &TargetFailure) + 'a) -> Self {
        self.failure = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl FnMut() + 'a) -> Self {
        self.complete = Some(Box::new(f));
        self
    }
}

impl FitObserver for Callbacks<'_> {
    fn on_success(&mut self, container: NodeId) {
        if let Some(f) = self.success.as_mut() {
            f(container);
        }
    }

    fn on_failure(&mut self, container: NodeId, reason: &TargetFailure) {
        if let Some(f) = self.failure.as_mut() {
            f(container, reason);
        }
    }

    fn on_complete(&mut self) {
        if let Some(f) = self.complete.as_mut() {
            f();
        }
    }
}

/// How one target ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TargetOutcome {
    #[serde(rename_all = "camelCase")]
    Fitted { container: NodeId, font_size: i64 },
    #[serde(rename_all = "camelCase")]
    Failed {
        container: NodeId,
        reason: TargetFailure,
    },
}

impl TargetOutcome {
    pub fn container(&self) -> NodeId {
        match self {
            TargetOutcome::Fitted { container, .. } | TargetOutcome::Failed { container, .. } => {
                *container
            }
        }
    }

    pub fn font_size(&self) -> Option<i64> {
        match self {
            TargetOutcome::Fitted { font_size, .. } => Some(*font_size),
            TargetOutcome::Failed { .. } => None,
        }
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self, TargetOutcome::Fitted { .. })
    }
}

/// Outcomes of one fit call, in notification order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FitReport {
    pub outcomes: Vec<TargetOutcome>,
}

impl FitReport {
    pub fn fitted(&self) -> impl Iterator<Item = &TargetOutcome> {
        self.outcomes.iter().filter(|o| o.is_fitted())
    }

    pub fn failed(&self) -> impl Iterator<Item = &TargetOutcome> {
        self.outcomes.iter().filter(|o| !o.is_fitted())
    }
}
