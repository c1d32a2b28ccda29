//! # Decision Engine
//!
//! A two-mode state machine over the process-wide policy mode. Disabled
//! means every action is approved, preserving the system's default
//! behavior; cost-benefit means the estimate is evaluated against policy.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::action::CostDelta;
use crate::error::{EconError, EconResult};

// =============================================================================
// Policy mode
// =============================================================================

/// Whether the subsystem applies cost-benefit reasoning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PolicyMode {
    /// Approve every action unconditionally (the default).
    Disabled = 0,
    /// Evaluate each action's cost/benefit estimate.
    CostBenefit = 1,
}

impl PolicyMode {
    /// Decode a raw mode value.
    pub fn from_raw(value: u64) -> EconResult<Self> {
        match value {
            0 => Ok(PolicyMode::Disabled),
            1 => Ok(PolicyMode::CostBenefit),
            _ => Err(EconError::InvalidMode { value }),
        }
    }

    /// The raw value of this mode.
    pub fn as_raw(&self) -> u8 {
        *self as u8
    }
}

static MODE: AtomicU8 = AtomicU8::new(PolicyMode::Disabled as u8);

/// Read the current policy mode.
///
/// A stored value outside the enumeration means mode validation was
/// bypassed. Debug builds assert; release builds log and fall back to
/// `Disabled` rather than corrupt policy semantics.
pub fn mode() -> PolicyMode {
    let raw = MODE.load(Ordering::Relaxed);
    match PolicyMode::from_raw(raw as u64) {
        Ok(mode) => mode,
        Err(_) => {
            debug_assert!(false, "invalid policy mode {} in mode word", raw);
            log::error!("mm-econ: invalid policy mode {}, treating as disabled", raw);
            PolicyMode::Disabled
        },
    }
}

/// Set the policy mode.
pub fn set_mode(mode: PolicyMode) {
    MODE.store(mode.as_raw(), Ordering::Relaxed);
}

// =============================================================================
// Decision
// =============================================================================

/// Decide whether the action behind `cost` should be taken, under `mode`.
pub fn decide_with(mode: PolicyMode, cost: &CostDelta) -> bool {
    match mode {
        PolicyMode::Disabled => true,
        PolicyMode::CostBenefit => {
            // Placeholder policy: approve, but log what a real comparison
            // would have said. The baseline estimator prices everything at
            // zero, so enforcing benefit > cost here would veto every
            // action until estimation lands.
            log::debug!(
                "mm-econ: evaluated cost={} benefit={} favorable={}",
                cost.cost,
                cost.benefit,
                cost.favorable()
            );
            true
        },
    }
}

/// Decide whether the action behind `cost` should be taken, under the
/// current process-wide mode.
pub fn decide(cost: &CostDelta) -> bool {
    decide_with(mode(), cost)
}
