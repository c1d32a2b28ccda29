//! # Action Cost Estimator
//!
//! Maps an action descriptor to a cost/benefit estimate.
//!
//! This is a pure function apart from logging: it keeps no state about
//! previous queries, so identical inputs yield identical outputs. The one
//! extension point is the hooked-action path, where an externally
//! registered policy may overwrite the baseline estimate without the
//! estimator being recompiled.

extern crate alloc;

use alloc::sync::Arc;

use spin::RwLock;

use crate::action::{Action, ActionKind, CostDelta};

// =============================================================================
// Estimator hook
// =============================================================================

/// An externally supplied policy that may override the baseline estimate
/// for [`ActionKind::Hooked`] actions.
pub trait EstimatorHook: Send + Sync {
    /// Adjust the baseline estimate for `action`. Either field may be
    /// overwritten; returning `baseline` unchanged is valid.
    fn adjust(&self, action: &Action, baseline: CostDelta) -> CostDelta;
}

static HOOK: RwLock<Option<Arc<dyn EstimatorHook>>> = RwLock::new(None);

/// Register the estimator hook, replacing any previous one.
pub fn register_hook(hook: Arc<dyn EstimatorHook>) {
    *HOOK.write() = Some(hook);
    log::info!("mm-econ: estimator hook registered");
}

/// Remove the estimator hook, if any.
pub fn clear_hook() {
    *HOOK.write() = None;
}

// =============================================================================
// Estimation
// =============================================================================

/// Estimate the cost and benefit of taking `action`.
///
/// Baseline policy: every built-in action kind is priced at zero cost and
/// zero benefit, a deliberate "no opinion" that preserves default system
/// behavior until richer estimation is implemented.
pub fn estimate(action: &Action) -> CostDelta {
    match action.kind {
        ActionKind::None
        | ActionKind::PromoteHuge { .. }
        | ActionKind::DemoteHuge { .. }
        | ActionKind::RunDefrag { .. } => CostDelta::ZERO,

        ActionKind::Hooked => {
            let baseline = CostDelta::ZERO;
            let hook = HOOK.read();
            match hook.as_ref() {
                Some(hook) => {
                    let adjusted = hook.adjust(action, baseline);
                    log::info!(
                        "mm-econ: hook adjusted estimate: cost={} benefit={}",
                        adjusted.cost,
                        adjusted.benefit
                    );
                    adjusted
                },
                None => {
                    log::warn!("mm-econ: hooked action at {:#x} with no hook registered", action.address);
                    baseline
                },
            }
        },
    }
}
