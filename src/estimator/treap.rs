//! Exact reuse-distance engine over an order-statistics recency tree.
//!
//! Tracks every distinct address ever referenced, ordered by recency in a
//! [`RecencyTree`], and reports the exact stack distance of each re-reference
//! as a log2 bucket. The map and tree grow without bound with the number of
//! distinct addresses; use [`RoundRobinEstimator`] when a hard memory cap
//! matters more than exactness.
//!
//! ## When to Use
//!
//! Use `TreapEstimator` when:
//! - Exact distances are required (validation, small or medium traces)
//! - The distinct-address working set fits comfortably in memory
//!
//! Use [`RoundRobinEstimator`] when:
//! - The trace can touch more distinct addresses than you want to hold
//! - An order-of-magnitude estimate is enough
//!
//! ## Performance
//!
//! Each reference is O(amortised log n): a rank walk up the parent chain
//! followed by a move-to-root. Even a re-read mutates the tree, since the
//! referenced address becomes the most recent.
//!
//! [`RoundRobinEstimator`]: crate::estimator::RoundRobinEstimator

use rustc_hash::FxHashMap;

use crate::bits::{COLD_BUCKET, bit_length};
use crate::ds::{NodeId, RecencyTree};
#[cfg(debug_assertions)]
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::EstimatorMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::EstimatorMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{EstimatorMetricsRecorder, MetricsSnapshotProvider};
use crate::traits::ReuseDistanceEstimator;

/// Exact reuse-distance estimator.
///
/// Buckets span `[0, 64]`: bucket `bit_length(rank)` for a re-referenced
/// address at stack distance `rank`, and [`COLD_BUCKET`] (64) for an address
/// never seen before.
///
/// # Example
///
/// ```
/// use reusekit::estimator::TreapEstimator;
///
/// let mut rd = TreapEstimator::new();
///
/// assert_eq!(rd.reference(0xA000), 64); // cold
/// assert_eq!(rd.reference(0xB000), 64); // cold
/// assert_eq!(rd.reference(0xA000), 1); // stack distance 2
/// assert_eq!(rd.reference(0xA000), 0); // immediate repeat, distance 1
/// ```
pub struct TreapEstimator {
    map: FxHashMap<u64, NodeId>,
    tree: RecencyTree,
    #[cfg(feature = "metrics")]
    metrics: EstimatorMetrics,
}

impl TreapEstimator {
    /// Creates an empty estimator. No large allocation happens up front.
    pub fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            tree: RecencyTree::new(),
            #[cfg(feature = "metrics")]
            metrics: EstimatorMetrics::default(),
        }
    }

    /// Creates an empty estimator with room for `capacity` distinct addresses.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            tree: RecencyTree::with_capacity(capacity),
            #[cfg(feature = "metrics")]
            metrics: EstimatorMetrics::default(),
        }
    }

    /// Records a reference to `address` and returns its distance bucket.
    ///
    /// For a re-referenced address the bucket is `bit_length(rank)` where
    /// `rank` is one plus the number of distinct addresses referenced since
    /// its previous reference; a first-ever reference reports
    /// [`COLD_BUCKET`]. The address becomes the most recent either way.
    pub fn reference(&mut self, address: u64) -> u32 {
        match self.map.get(&address) {
            Some(&id) => {
                let rank = self.tree.rank(id);
                self.tree.promote(id);
                let bucket = bit_length(rank);
                #[cfg(feature = "metrics")]
                self.metrics.record_hit(bucket);
                bucket
            },
            None => {
                let id = self.tree.push_recent(address);
                self.map.insert(address, id);
                #[cfg(feature = "metrics")]
                self.metrics.record_cold_miss(COLD_BUCKET);
                COLD_BUCKET
            },
        }
    }

    /// Returns the number of distinct addresses tracked so far.
    pub fn tracked_len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if no address has been referenced yet.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns `true` if `address` has been referenced before.
    pub fn is_tracked(&self, address: u64) -> bool {
        self.map.contains_key(&address)
    }

    /// Forgets all history.
    pub fn clear(&mut self) {
        self.map.clear();
        self.tree.clear();
    }

    /// Returns tracked addresses from most- to least-recently referenced.
    pub fn recency_order(&self) -> Vec<u64> {
        self.tree.preorder_addresses()
    }

    /// Validates internal invariants (debug-only).
    #[cfg(debug_assertions)]
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.map.len() != self.tree.len() {
            return Err(InvariantError::new(format!(
                "map tracks {} addresses, tree holds {}",
                self.map.len(),
                self.tree.len()
            )));
        }
        for (&address, &id) in &self.map {
            if self.tree.address(id) != Some(address) {
                return Err(InvariantError::new(format!(
                    "map entry {address:#x} points at node {:?} holding {:?}",
                    id,
                    self.tree.address(id)
                )));
            }
        }
        self.tree.check_invariants()
    }
}

impl Default for TreapEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl ReuseDistanceEstimator for TreapEstimator {
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
impl MetricsSnapshotProvider<EstimatorMetricsSnapshot> for TreapEstimator {
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
    fn cold_reference_reports_cold_bucket() {
        let mut rd = TreapEstimator::new();
        assert_eq!(rd.reference(0x1000), COLD_BUCKET);
        assert_eq!(rd.tracked_len(), 1);
    }

    #[test]
    fn immediate_repeat_is_rank_one() {
        let mut rd = TreapEstimator::new();
        rd.reference(0x1000);
        assert_eq!(rd.reference(0x1000), 0);
    }

    #[test]
    fn rank_counts_distinct_addresses_since_last_touch() {
        let mut rd = TreapEstimator::new();
        rd.reference(0xA);
        rd.reference(0xB);
        rd.reference(0xC);
        // A is at stack distance 3: bit_length(3) == 1.
        assert_eq!(rd.reference(0xA), 1);
        // B slipped to distance 3 as well after A's promotion.
        assert_eq!(rd.reference(0xB), 1);
        rd.check_invariants().unwrap();
    }

    #[test]
    fn never_repeating_stream_is_always_cold() {
        let mut rd = TreapEstimator::new();
        for address in 1..=512u64 {
            assert_eq!(rd.reference(address), COLD_BUCKET);
        }
        assert_eq!(rd.tracked_len(), 512);
        rd.check_invariants().unwrap();
    }

    #[test]
    fn recency_order_tracks_references() {
        let mut rd = TreapEstimator::new();
        rd.reference(1);
        rd.reference(2);
        rd.reference(3);
        rd.reference(1);
        assert_eq!(rd.recency_order(), vec![1, 3, 2]);
    }

    #[test]
    fn clear_forgets_history() {
        let mut rd = TreapEstimator::new();
        rd.reference(7);
        rd.reference(7);
        rd.clear();
        assert!(rd.is_empty());
        assert_eq!(rd.reference(7), COLD_BUCKET);
    }

    #[test]
    fn repeated_promotions_keep_invariants() {
        let mut rd = TreapEstimator::new();
        for address in 0..64u64 {
            rd.reference(address + 1);
        }
        for round in 0..4u64 {
            for step in 1..=64u64 {
                rd.reference((step * 17 + round) % 64 + 1);
            }
            rd.check_invariants().unwrap();
        }
    }
}
