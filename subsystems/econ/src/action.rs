//! # Action Descriptors
//!
//! The actions the memory manager may propose, and the cost/benefit pair
//! the estimator answers with.
//!
//! Each action kind carries exactly the parameter that kind needs, so an
//! invalid tag/payload combination cannot be constructed. The raw tag
//! constants preserve the wire values of the C ABI this subsystem replaces.

use static_assertions::assert_eq_size;

// =============================================================================
// Raw ABI tags
// =============================================================================

/// Raw tag: no action.
pub const RAW_ACTION_NONE: u32 = 0;
/// Raw tag: promote a region to a huge page.
pub const RAW_ACTION_PROMOTE_HUGE: u32 = 1 << 0;
/// Raw tag: demote a huge page back to base pages.
pub const RAW_ACTION_DEMOTE_HUGE: u32 = 1 << 1;
/// Raw tag: run the defragmenter.
pub const RAW_ACTION_RUN_DEFRAG: u32 = 1 << 2;
/// Raw tag: an externally hooked policy overrides the estimate.
pub const RAW_ACTION_HOOKED: u32 = 1 << 4;

// =============================================================================
// Action
// =============================================================================

/// What kind of action is proposed, with its kind-specific parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// No action.
    None,

    /// Create a huge page of the given order (e.g. 9 for 2 MiB).
    PromoteHuge {
        /// Huge-page order
        order: u64,
    },

    /// Split a huge page of the given order.
    DemoteHuge {
        /// Huge-page order
        order: u64,
    },

    /// Run the defragmenter for the given duration, in cycles.
    RunDefrag {
        /// How long the defragmenter runs
        duration: u64,
    },

    /// Defer to the externally registered estimator hook.
    Hooked,
}

/// A proposed memory-management action awaiting a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    /// Target address the action applies to
    pub address: u64,
    /// Action kind and its parameter
    pub kind: ActionKind,
}

impl ActionKind {
    /// Decode a raw ABI tag and parameter word.
    ///
    /// Returns `None` for a tag outside the defined set; the caller decides
    /// how to recover (see [`Action::from_raw`]).
    pub fn from_raw(tag: u32, param: u64) -> Option<Self> {
        match tag {
            RAW_ACTION_NONE => Some(ActionKind::None),
            RAW_ACTION_PROMOTE_HUGE => Some(ActionKind::PromoteHuge { order: param }),
            RAW_ACTION_DEMOTE_HUGE => Some(ActionKind::DemoteHuge { order: param }),
            RAW_ACTION_RUN_DEFRAG => Some(ActionKind::RunDefrag { duration: param }),
            RAW_ACTION_HOOKED => Some(ActionKind::Hooked),
            _ => None,
        }
    }

    /// The raw ABI tag for this kind.
    pub fn to_raw(&self) -> u32 {
        match self {
            ActionKind::None => RAW_ACTION_NONE,
            ActionKind::PromoteHuge { .. } => RAW_ACTION_PROMOTE_HUGE,
            ActionKind::DemoteHuge { .. } => RAW_ACTION_DEMOTE_HUGE,
            ActionKind::RunDefrag { .. } => RAW_ACTION_RUN_DEFRAG,
            ActionKind::Hooked => RAW_ACTION_HOOKED,
        }
    }
}

impl Action {
    /// Decode a raw ABI action.
    ///
    /// An unrecognized tag is not an error to the caller: it is logged and
    /// decoded as [`ActionKind::None`], which the estimator prices at zero.
    pub fn from_raw(tag: u32, address: u64, param: u64) -> Self {
        let kind = match ActionKind::from_raw(tag, param) {
            Some(kind) => kind,
            None => {
                log::warn!("mm-econ: unknown action tag {}", tag);
                ActionKind::None
            },
        };
        Action { address, kind }
    }
}

// =============================================================================
// Cost delta
// =============================================================================

/// The estimated cost of an action relative to the status quo.
///
/// Both fields are counts in an abstract time unit (cycles). Nothing relates
/// them at construction time; the decision policy interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CostDelta {
    /// Total estimated cost in cycles
    pub cost: u64,
    /// Total estimated benefit in cycles
    pub benefit: u64,
}

// Two bare u64 counters, same layout as the C pair it replaces.
assert_eq_size!(CostDelta, [u64; 2]);

impl CostDelta {
    /// The zero estimate: no opinion either way.
    pub const ZERO: CostDelta = CostDelta {
        cost: 0,
        benefit: 0,
    };

    /// Create a cost/benefit pair.
    pub const fn new(cost: u64, benefit: u64) -> Self {
        CostDelta { cost, benefit }
    }

    /// Whether the estimated benefit strictly exceeds the estimated cost.
    pub const fn favorable(&self) -> bool {
        self.benefit > self.cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_tag_round_trip() {
        let kinds = [
            ActionKind::None,
            ActionKind::PromoteHuge { order: 9 },
            ActionKind::DemoteHuge { order: 9 },
            ActionKind::RunDefrag { duration: 1000 },
            ActionKind::Hooked,
        ];
        for kind in kinds {
            let param = match kind {
                ActionKind::PromoteHuge { order } | ActionKind::DemoteHuge { order } => order,
                ActionKind::RunDefrag { duration } => duration,
                _ => 0,
            };
            assert_eq!(ActionKind::from_raw(kind.to_raw(), param), Some(kind));
        }
    }

    #[test]
    fn test_unknown_tag_decodes_as_none() {
        assert_eq!(ActionKind::from_raw(1 << 3, 0), None);
        let action = Action::from_raw(0xdead, 0x1000, 42);
        assert_eq!(action.kind, ActionKind::None);
        assert_eq!(action.address, 0x1000);
    }

    #[test]
    fn test_favorable() {
        assert!(CostDelta::new(10, 11).favorable());
        assert!(!CostDelta::new(11, 10).favorable());
        assert!(!CostDelta::ZERO.favorable());
    }
}
