//! Approximate reuse-distance engine over logarithmic round-robin pools.
//!
//! Keeps addresses in a cascade of pools, each band twice the size of the
//! previous one, laid out back-to-back in one flat backing array. Within a
//! pool, slots are replaced round-robin. On a reference the address's slot
//! index is looked up and the address is moved to the first pool, pushing
//! one occupant from each pool into the next until the vacated slot is
//! refilled or an occupant falls off the end.
//!
//! This resembles a multi-level exclusive cache hierarchy: the pool an
//! address is found in is close to the log2 of its true reuse distance. It
//! would be exact if each pool replaced its least-recently-used slot;
//! round-robin does not guarantee that, which is the accepted bias in
//! exchange for a hard memory cap and O(log(max distance)) work per
//! reference.
//!
//! ## Architecture
//!
//! ```text
//!   positions: FxHashMap<u64, u64>     slots: Vec<u64> (2^MAX_SIZE_BITS, lazy)
//!   ┌──────────┬────────┐             ┌────────────┬────────────┬─────┬─────────────┐
//!   │ address  │  slot  │             │  pool 10   │  pool 11   │ ... │   pool 23   │
//!   ├──────────┼────────┤             │ [0, 1024)  │[1024, 2048)│     │[2^22, 2^23) │
//!   │  0xA000  │     3  │────────────►└────────────┴────────────┴─────┴─────────────┘
//!   │  0xB000  │  1024  │                   ▲ cursors[bin]: next slot to replace,
//!   └──────────┴────────┘                     advancing modulo the pool's cycle
//!
//!   reference(x):  found at slot s  ─►  bucket = bit_length(s)
//!                  never seen       ─►  bucket = MAX_SIZE_BITS
//! ```
//!
//! ## Notes
//! - Buckets span `[MIN_SIZE_BITS, MAX_SIZE_BITS]`, unlike the exact
//!   engine's `[0, 64]`; the two engines are not interchangeable behind a
//!   shared histogram.
//! - Slot value 0 is the empty marker, so address 0 must not be tracked;
//!   this is a caller contract checked only by a debug assertion.
//! - The backing array is allocated on first use, so idle tracking contexts
//!   cost nothing.

use rustc_hash::FxHashMap;

use crate::bits::bit_length;
#[cfg(debug_assertions)]
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::EstimatorMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::EstimatorMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{EstimatorMetricsRecorder, MetricsSnapshotProvider};
use crate::traits::ReuseDistanceEstimator;

/// Log2 size of the innermost pool; also the smallest reportable bucket.
pub const MIN_SIZE_BITS: u32 = 10;
/// Log2 size of the backing array; also the bucket for untracked addresses.
pub const MAX_SIZE_BITS: u32 = 24;
/// Slot indexes below this are in the innermost pool.
pub const MIN_SIZE: u64 = 1 << MIN_SIZE_BITS;
/// Total number of backing slots once allocated.
pub const MAX_SIZE: u64 = 1 << MAX_SIZE_BITS;

const EMPTY: u64 = 0;

/// Approximate reuse-distance estimator with bounded memory.
///
/// Tracks at most [`MAX_SIZE`] addresses regardless of trace length.
/// Buckets span `[MIN_SIZE_BITS, MAX_SIZE_BITS]`: the log2 band the address
/// was found in, or [`MAX_SIZE_BITS`] for a cold or aged-out reference.
///
/// # Example
///
/// ```
/// use reusekit::estimator::RoundRobinEstimator;
///
/// let mut rd = RoundRobinEstimator::new();
///
/// assert_eq!(rd.reference(0xA000), 24); // cold
/// assert_eq!(rd.reference(0xA000), 10); // now in the innermost pool
/// ```
pub struct RoundRobinEstimator {
    positions: FxHashMap<u64, u64>,
    slots: Vec<u64>,
    cursors: [u64; MAX_SIZE_BITS as usize],
    #[cfg(feature = "metrics")]
    metrics: EstimatorMetrics,
}

impl RoundRobinEstimator {
    /// Creates an empty estimator. The backing array is not allocated until
    /// the first reference.
    pub fn new() -> Self {
        Self {
            positions: FxHashMap::default(),
            slots: Vec::new(),
            cursors: [0; MAX_SIZE_BITS as usize],
            #[cfg(feature = "metrics")]
            metrics: EstimatorMetrics::default(),
        }
    }

    /// Records a reference to `address` and returns its distance bucket.
    ///
    /// The address moves to the innermost pool, displacing one occupant per
    /// pool outward until its vacated slot is refilled; a cold reference
    /// cascades an occupant off the outermost pool instead. Addresses
    /// already in the innermost band return immediately with no movement.
    ///
    /// `address` must not be 0 (reserved as the empty-slot marker).
    pub fn reference(&mut self, address: u64) -> u32 {
        debug_assert_ne!(address, EMPTY, "address 0 is reserved as the empty-slot marker");
        if self.slots.is_empty() {
            self.slots.resize(MAX_SIZE as usize, EMPTY);
        }

        let (position, pos_log2) = match self.positions.get(&address) {
            Some(&position) => {
                if position < MIN_SIZE {
                    #[cfg(feature = "metrics")]
                    self.metrics.record_hit(MIN_SIZE_BITS);
                    return MIN_SIZE_BITS;
                }
                (position, bit_length(position))
            },
            None => (MAX_SIZE, MAX_SIZE_BITS),
        };

        let mut item = address;
        for bin in MIN_SIZE_BITS..pos_log2 {
            let cycle = (1u64 << (bin - 1)) - 1;
            let idx = Self::slot_index(bin, self.cursors[bin as usize]);
            self.cursors[bin as usize] = (self.cursors[bin as usize] + 1) & cycle;
            let displaced = std::mem::replace(&mut self.slots[idx as usize], item);
            self.positions.insert(item, idx);
            item = displaced;
            if item == EMPTY {
                break;
            }
        }

        if pos_log2 < MAX_SIZE_BITS {
            // Refill (or clear) the slot the referenced address vacated. The
            // empty marker is written through but never recorded in the map.
            self.slots[position as usize] = item;
            if item != EMPTY {
                self.positions.insert(item, position);
            }
        } else if item != EMPTY {
            self.positions.remove(&item);
        }

        #[cfg(feature = "metrics")]
        if pos_log2 == MAX_SIZE_BITS {
            self.metrics.record_cold_miss(pos_log2);
        } else {
            self.metrics.record_hit(pos_log2);
        }
        pos_log2
    }

    /// Returns the number of addresses currently tracked.
    pub fn tracked_len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if no address is tracked.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns `true` if `address` is currently tracked.
    pub fn is_tracked(&self, address: u64) -> bool {
        self.positions.contains_key(&address)
    }

    /// Returns the backing array size: 0 before first use, then [`MAX_SIZE`].
    pub fn backing_len(&self) -> usize {
        self.slots.len()
    }

    /// Forgets all history and releases the backing array.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.slots = Vec::new();
        self.cursors = [0; MAX_SIZE_BITS as usize];
    }

    /// Validates map/slot consistency (debug-only).
    #[cfg(debug_assertions)]
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        for (&address, &position) in &self.positions {
            if address == EMPTY {
                return Err(InvariantError::new("empty marker tracked as an address"));
            }
            if position >= MAX_SIZE {
                return Err(InvariantError::new(format!(
                    "address {address:#x} stored at out-of-range slot {position}"
                )));
            }
            let held = self.slots.get(position as usize).copied();
            if held != Some(address) {
                return Err(InvariantError::new(format!(
                    "address {address:#x} mapped to slot {position} holding {held:?}"
                )));
            }
        }
        for bin in MIN_SIZE_BITS..MAX_SIZE_BITS {
            let cycle = 1u64 << (bin - 1);
            if self.cursors[bin as usize] >= cycle {
                return Err(InvariantError::new(format!(
                    "pool {bin} cursor {} exceeds cycle {cycle}",
                    self.cursors[bin as usize]
                )));
            }
        }
        Ok(())
    }

    /// Returns a copy of the per-pool round-robin cursors.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_cursors(&self) -> [u64; MAX_SIZE_BITS as usize] {
        self.cursors
    }

    /// Backing index of a pool's cursor slot. The innermost pool starts at
    /// offset 0; pool `bin` above it starts at `1 << (bin - 1)`.
    fn slot_index(bin: u32, cursor: u64) -> u64 {
        if bin == MIN_SIZE_BITS {
            cursor
        } else {
            (1u64 << (bin - 1)) + cursor
        }
    }
}

impl Default for RoundRobinEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl ReuseDistanceEstimator for RoundRobinEstimator {
    fn reference(&mut self, address: u64) -> u32 {
        Self::reference(self, address)
    }

    fn tracked_len(&self) -> usize {
        Self::tracked_len(self)
    }

    fn clear(&mut self) {
        Self::clear(self)
    }
}

#[cfg(feature = "metrics")]
impl MetricsSnapshotProvider<EstimatorMetricsSnapshot> for RoundRobinEstimator {
    fn snapshot_metrics(&self) -> EstimatorMetricsSnapshot {
        self.metrics.snapshot(self.tracked_len())
    }

    fn reset_metrics(&mut self) {
        self.metrics = EstimatorMetrics::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_allocates_nothing() {
        let rd = RoundRobinEstimator::new();
        assert_eq!(rd.backing_len(), 0);
        assert!(rd.is_empty());
    }

    #[test]
    fn cold_reference_reports_outermost_bucket() {
        let mut rd = RoundRobinEstimator::new();
        assert_eq!(rd.reference(0xA000), MAX_SIZE_BITS);
        assert_eq!(rd.backing_len(), MAX_SIZE as usize);
        assert!(rd.is_tracked(0xA000));
    }

    #[test]
    fn innermost_hit_short_circuits_without_moving_cursors() {
        let mut rd = RoundRobinEstimator::new();
        rd.reference(0xA000);
        let before = rd.debug_cursors();
        assert_eq!(rd.reference(0xA000), MIN_SIZE_BITS);
        assert_eq!(rd.debug_cursors(), before);
    }

    #[test]
    fn displaced_addresses_land_in_outer_pools() {
        let mut rd = RoundRobinEstimator::new();
        rd.reference(1);
        // Cycle the innermost pool until address 1 is displaced outward.
        for address in 2..=513u64 {
            rd.reference(address);
        }
        assert!(rd.is_tracked(1));
        assert_eq!(rd.reference(1), MIN_SIZE_BITS);
        rd.check_invariants().unwrap();
    }

    #[test]
    fn buckets_stay_in_band_under_churn() {
        let mut rd = RoundRobinEstimator::new();
        for step in 0..20_000u64 {
            let address = step % 3_000 + 1;
            let bucket = rd.reference(address);
            assert!((MIN_SIZE_BITS..=MAX_SIZE_BITS).contains(&bucket));
        }
        assert!(rd.tracked_len() as u64 <= MAX_SIZE);
        rd.check_invariants().unwrap();
    }

    #[test]
    fn clear_releases_backing_storage() {
        let mut rd = RoundRobinEstimator::new();
        rd.reference(42);
        rd.clear();
        assert_eq!(rd.backing_len(), 0);
        assert!(rd.is_empty());
        assert_eq!(rd.reference(42), MAX_SIZE_BITS);
    }
}
