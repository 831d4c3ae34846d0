//! # Estimator Trait
//!
//! This module defines the contract shared by the reuse-distance engines:
//! consume one address at a time, report a log2-scale distance bucket.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌───────────────────────────────────────────┐
//!                 │      ReuseDistanceEstimator               │
//!                 │                                           │
//!                 │  reference(&mut, u64) → u32 (bucket)      │
//!                 │  tracked_len(&) → usize                   │
//!                 │  is_empty(&) → bool                       │
//!                 │  clear(&mut)                              │
//!                 └──────────────────┬────────────────────────┘
//!                                    │
//!                 ┌──────────────────┴────────────────────────┐
//!                 ▼                                           ▼
//!   ┌────────────────────────────┐            ┌────────────────────────────┐
//!   │      TreapEstimator        │            │   RoundRobinEstimator      │
//!   │                            │            │                            │
//!   │  exact stack distance      │            │  pooled approximation      │
//!   │  buckets in [0, 64]        │            │  buckets in [10, 24]       │
//!   │  unbounded memory          │            │  memory capped at 2^24     │
//!   └────────────────────────────┘            └────────────────────────────┘
//! ```
//!
//! ## Bucket Ranges
//!
//! | Engine                | Hit buckets | Cold bucket | Memory        |
//! |-----------------------|-------------|-------------|---------------|
//! | `TreapEstimator`      | `[0, 63]`   | 64          | unbounded     |
//! | `RoundRobinEstimator` | `[10, 22]`  | 24          | `2^24` slots  |
//!
//! The ranges do not line up: the exact engine distinguishes an "infinite"
//! cold bucket from every finite distance, while the pooled engine folds
//! everything at or beyond its outermost pool into bucket 24. A consumer
//! expecting one engine's range must not be handed the other silently.
//!
//! ## Concurrency Model
//!
//! Engines are single-threaded by contract: one instance per logical stream
//! of references, used sequentially, sharing nothing. Parallelism across
//! analyzed threads comes from instance isolation, not locking. A driver
//! that must share an instance anyway can use
//! `builder::ConcurrentEstimator` (feature `concurrency`).

/// A reuse-distance estimation engine.
///
/// One call per observed memory access. The returned bucket is
/// `floor(log2(distance))` for the engine's (exact or approximate) notion
/// of the reuse distance, with an engine-specific value for cold
/// references.
///
/// # Example
///
/// ```
/// use reusekit::estimator::TreapEstimator;
/// use reusekit::traits::ReuseDistanceEstimator;
///
/// fn histogram64(
///     estimator: &mut impl ReuseDistanceEstimator,
///     trace: &[u64],
/// ) -> [u64; 65] {
///     let mut counts = [0u64; 65];
///     for &address in trace {
///         counts[estimator.reference(address) as usize] += 1;
///     }
///     counts
/// }
///
/// let mut rd = TreapEstimator::new();
/// let counts = histogram64(&mut rd, &[0xA, 0xB, 0xA, 0xA]);
/// assert_eq!(counts[64], 2); // two cold references
/// assert_eq!(counts[1], 1); // 0xA at stack distance 2
/// assert_eq!(counts[0], 1); // 0xA repeated immediately
/// ```
pub trait ReuseDistanceEstimator {
    /// Records a reference to `address` and returns its distance bucket.
    ///
    /// Must be called sequentially, never concurrently, on a given
    /// instance. Every call may mutate internal state, including calls
    /// that only re-read an already-tracked address.
    fn reference(&mut self, address: u64) -> u32;

    /// Returns the number of distinct addresses currently tracked.
    ///
    /// Grows without bound for the exact engine; capped for the pooled
    /// engine, whose entries age out.
    fn tracked_len(&self) -> usize;

    /// Returns `true` if no address is currently tracked.
    fn is_empty(&self) -> bool {
        self.tracked_len() == 0
    }

    /// Forgets all history, returning the estimator to its initial state.
    fn clear(&mut self);
}
