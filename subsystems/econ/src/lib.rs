//! # Memory-Economics Subsystem
//!
//! Decides whether a proposed memory-management action is worth taking.
//! Before promoting or demoting a huge page, or running a defragmentation
//! pass, the memory manager asks this subsystem for a verdict; the answer
//! comes from either a null policy (always approve, the default) or a
//! cost-benefit policy informed by a preloaded, address-range-indexed
//! profile of expected benefits.
//!
//! ## Components
//!
//! - **Profile Store**: ordered, non-overlapping address ranges tagged with
//!   expected benefit; point lookup, overlap-rejecting insert, bulk reload
//! - **Estimator**: maps an action descriptor to a cost/benefit pair, with
//!   a registered-hook extension point
//! - **Decision Engine**: mode-gated approve/reject over an estimate
//! - **Control Interface**: the textual mode and profile surfaces
//!
//! The subsystem only renders verdicts. Actually promoting pages, running
//! the defragmenter, and binding the control surfaces to files are the
//! callers' concern.
//!
//! ## Flow
//!
//! ```text
//! operator write ──▶ Control Interface ──▶ PolicyMode / ProfileStore
//!                                                    │
//! memory manager ──▶ Action ──▶ Estimator ──▶ CostDelta ──▶ decide()
//! ```

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

extern crate alloc;

pub mod action;
pub mod control;
pub mod error;
pub mod estimator;
pub mod policy;
pub mod profile;

pub use action::{Action, ActionKind, CostDelta};
pub use error::{EconError, EconResult};
pub use policy::PolicyMode;
pub use profile::ProfileRange;

/// Initialize the subsystem.
///
/// The store starts empty and the mode starts disabled, so initialization
/// only announces itself. Idempotent.
pub fn init() {
    log::info!(
        "mm-econ: initialized, mode={:?}, {} profile ranges",
        policy::mode(),
        profile::profile().len()
    );
}

/// Tear the subsystem down: drop the profile, disarm the policy, unhook
/// the estimator. Idempotent.
pub fn shutdown() {
    profile::profile().clear();
    policy::set_mode(PolicyMode::Disabled);
    estimator::clear_hook();
    log::info!("mm-econ: shut down");
}
