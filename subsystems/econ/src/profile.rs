//! # Profile Store
//!
//! An ordered set of non-overlapping `[start, end)` address ranges, each
//! tagged with an expected benefit. The memory manager looks ranges up on
//! its decision path; the operator replaces the whole set through the
//! control interface.
//!
//! The store is keyed by range start in a balanced tree, so point lookup,
//! insertion, and the overlap check are all logarithmic. Lookups hand out
//! owned copies, never references into the tree.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use spin::RwLock;

use crate::error::{EconError, EconResult};

// =============================================================================
// Profile range
// =============================================================================

/// One profiled address range and its expected benefit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileRange {
    /// Start address (inclusive)
    pub start: u64,
    /// End address (exclusive); always greater than `start`
    pub end: u64,
    /// Expected benefit of acting on this range, in cycles
    pub benefit: u64,
    /// Observability counter, bumped by [`ProfileStore::note_miss`]
    pub misses: u64,
}

impl ProfileRange {
    /// Create a range; fails if `start >= end`.
    pub fn new(start: u64, end: u64, benefit: u64) -> EconResult<Self> {
        if start >= end {
            return Err(EconError::EmptyRange { start, end });
        }
        Ok(ProfileRange {
            start,
            end,
            benefit,
            misses: 0,
        })
    }

    /// Size of the range in bytes.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Whether `address` falls inside `[start, end)`.
    pub fn contains(&self, address: u64) -> bool {
        self.start <= address && address < self.end
    }

    /// Whether two ranges share at least one address.
    pub fn overlaps(&self, other: &ProfileRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

// =============================================================================
// Profile store
// =============================================================================

/// The set of currently loaded profile ranges.
///
/// Keys are range starts. Non-overlap means the ranges are also ordered by
/// end, so a single predecessor probe answers both the overlap check and
/// point lookup.
pub struct ProfileStore {
    ranges: RwLock<BTreeMap<u64, ProfileRange>>,
}

impl ProfileStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        ProfileStore {
            ranges: RwLock::new(BTreeMap::new()),
        }
    }

    /// Insert one range, rejecting any overlap with an existing range.
    ///
    /// The overlap check happens before any mutation, so a rejected insert
    /// leaves the store exactly as it was.
    pub fn insert(&self, range: ProfileRange) -> EconResult<()> {
        let mut ranges = self.ranges.write();
        Self::insert_locked(&mut ranges, range)
    }

    fn insert_locked(
        ranges: &mut BTreeMap<u64, ProfileRange>,
        range: ProfileRange,
    ) -> EconResult<()> {
        // The only candidate for overlap is the loaded range with the
        // greatest start below range.end: non-overlap keeps ends ordered
        // with starts, so everything earlier ends no later than it does.
        if let Some((_, neighbor)) = ranges.range(..range.end).next_back() {
            if neighbor.overlaps(&range) {
                log::warn!(
                    "mm-econ: dropping range [{}, {}): overlaps [{}, {})",
                    range.start,
                    range.end,
                    neighbor.start,
                    neighbor.end
                );
                return Err(EconError::Overlap {
                    start: range.start,
                    end: range.end,
                });
            }
        }

        ranges.insert(range.start, range);
        Ok(())
    }

    /// Find the unique range containing `address`, as an owned copy.
    pub fn lookup(&self, address: u64) -> Option<ProfileRange> {
        let ranges = self.ranges.read();
        ranges
            .range(..=address)
            .next_back()
            .map(|(_, r)| *r)
            .filter(|r| address < r.end)
    }

    /// Bump the miss counter of the range covering `address`, if any.
    pub fn note_miss(&self, address: u64) {
        let mut ranges = self.ranges.write();
        if let Some((_, range)) = ranges.range_mut(..=address).next_back() {
            if address < range.end {
                range.misses += 1;
            }
        }
    }

    /// Remove all ranges. Safe on an empty store.
    pub fn clear(&self) {
        self.ranges.write().clear();
    }

    /// Number of loaded ranges.
    pub fn len(&self) -> usize {
        self.ranges.read().len()
    }

    /// Whether the store holds no ranges.
    pub fn is_empty(&self) -> bool {
        self.ranges.read().is_empty()
    }

    /// Replace the whole profile with a pre-parsed batch.
    ///
    /// The batch arrives fully staged (see [`crate::control::parse_profile`]),
    /// so the swap happens under a single write guard: a concurrent lookup
    /// sees either the old profile or the new one, never a half-built one.
    /// Ranges that overlap an earlier range of the same batch are logged and
    /// dropped; the rest of the batch still loads. Returns the number of
    /// ranges retained.
    pub fn bulk_load(&self, batch: Vec<ProfileRange>) -> usize {
        let mut ranges = self.ranges.write();
        ranges.clear();

        let mut retained = 0;
        for range in batch {
            if Self::insert_locked(&mut ranges, range).is_ok() {
                retained += 1;
            }
        }
        retained
    }

    /// Serialize all ranges in ascending start order.
    ///
    /// One line per range: `[start, end) (size bytes) misses=n`.
    pub fn dump(&self) -> String {
        use core::fmt::Write;

        let ranges = self.ranges.read();
        let mut out = String::new();
        for range in ranges.values() {
            // Writing to a String cannot fail.
            let _ = writeln!(
                out,
                "[{}, {}) ({} bytes) misses={}",
                range.start,
                range.end,
                range.len(),
                range.misses
            );
        }
        out
    }

    /// Snapshot of all ranges in ascending start order.
    pub fn snapshot(&self) -> Vec<ProfileRange> {
        self.ranges.read().values().copied().collect()
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Global store
// =============================================================================

static PROFILE: ProfileStore = ProfileStore::new();

/// Get the process-wide profile store.
pub fn profile() -> &'static ProfileStore {
    &PROFILE
}
