//! Unified estimator construction for both engines.
//!
//! Lets a driver pick the exactness/memory tradeoff at runtime while using
//! one concrete type, without boxing or generics at the call site.
//!
//! ## Example
//!
//! ```rust
//! use reusekit::builder::{Estimator, EstimatorKind};
//!
//! let mut rd = Estimator::new(EstimatorKind::Exact);
//! assert_eq!(rd.reference(0xA000), 64);
//! assert_eq!(rd.reference(0xA000), 0);
//! ```

use crate::estimator::round_robin::RoundRobinEstimator;
use crate::estimator::treap::TreapEstimator;
use crate::traits::ReuseDistanceEstimator;

/// Available estimation engines.
///
/// Note the bucket ranges differ (see [`crate::traits`]): `Exact` reports
/// `[0, 64]` with 64 meaning cold, `Pooled` reports `[10, 24]` with 24
/// meaning cold or aged out. Pick one per consumer; the kinds are not
/// interchangeable behind a shared histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorKind {
    /// Exact stack distances from the order-statistics tree. Memory grows
    /// with the number of distinct addresses.
    Exact,
    /// Approximate distances from round-robin pools. Memory capped, mild
    /// bias accepted.
    Pooled,
}

/// Estimator wrapper that provides a consistent API regardless of engine.
pub struct Estimator {
    inner: EstimatorInner,
}

enum EstimatorInner {
    Exact(TreapEstimator),
    Pooled(RoundRobinEstimator),
}

impl Estimator {
    /// Creates an estimator of the requested kind. Construction is cheap
    /// for both kinds; the pooled engine allocates its backing array on
    /// first reference.
    pub fn new(kind: EstimatorKind) -> Self {
        let inner = match kind {
            EstimatorKind::Exact => EstimatorInner::Exact(TreapEstimator::new()),
            EstimatorKind::Pooled => EstimatorInner::Pooled(RoundRobinEstimator::new()),
        };
        Self { inner }
    }

    /// Returns which engine backs this estimator.
    pub fn kind(&self) -> EstimatorKind {
        match &self.inner {
            EstimatorInner::Exact(_) => EstimatorKind::Exact,
            EstimatorInner::Pooled(_) => EstimatorKind::Pooled,
        }
    }

    /// Records a reference and returns its distance bucket.
    pub fn reference(&mut self, address: u64) -> u32 {
        match &mut self.inner {
            EstimatorInner::Exact(rd) => rd.reference(address),
            EstimatorInner::Pooled(rd) => rd.reference(address),
        }
    }

    /// Returns the number of distinct addresses currently tracked.
    pub fn tracked_len(&self) -> usize {
        match &self.inner {
            EstimatorInner::Exact(rd) => rd.tracked_len(),
            EstimatorInner::Pooled(rd) => rd.tracked_len(),
        }
    }

    /// Returns `true` if no address is currently tracked.
    pub fn is_empty(&self) -> bool {
        self.tracked_len() == 0
    }

    /// Forgets all history.
    pub fn clear(&mut self) {
        match &mut self.inner {
            EstimatorInner::Exact(rd) => rd.clear(),
            EstimatorInner::Pooled(rd) => rd.clear(),
        }
    }
}

impl ReuseDistanceEstimator for Estimator {
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

/// Mutex-wrapped estimator for drivers that share one tracking context.
///
/// The engines themselves stay single-threaded; this wrapper serialises
/// access externally. Prefer one estimator per analyzed thread: instance
/// isolation is cheaper than any lock.
#[cfg(feature = "concurrency")]
pub struct ConcurrentEstimator {
    inner: parking_lot::Mutex<Estimator>,
}

#[cfg(feature = "concurrency")]
impl ConcurrentEstimator {
    pub fn new(kind: EstimatorKind) -> Self {
        Self {
            inner: parking_lot::Mutex::new(Estimator::new(kind)),
        }
    }

    pub fn reference(&self, address: u64) -> u32 {
        self.inner.lock().reference(address)
    }

    pub fn tracked_len(&self) -> usize {
        self.inner.lock().tracked_len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_kind_reports_cold_then_exact_buckets() {
        let mut rd = Estimator::new(EstimatorKind::Exact);
        assert_eq!(rd.kind(), EstimatorKind::Exact);
        assert_eq!(rd.reference(1), 64);
        assert_eq!(rd.reference(2), 64);
        assert_eq!(rd.reference(1), 1);
    }

    #[test]
    fn pooled_kind_reports_banded_buckets() {
        let mut rd = Estimator::new(EstimatorKind::Pooled);
        assert_eq!(rd.kind(), EstimatorKind::Pooled);
        assert_eq!(rd.reference(1), 24);
        assert_eq!(rd.reference(1), 10);
    }

    #[test]
    fn clear_resets_either_kind() {
        for kind in [EstimatorKind::Exact, EstimatorKind::Pooled] {
            let mut rd = Estimator::new(kind);
            rd.reference(5);
            rd.clear();
            assert!(rd.is_empty());
        }
    }

    #[cfg(feature = "concurrency")]
    #[test]
    fn concurrent_wrapper_serialises_access() {
        let rd = ConcurrentEstimator::new(EstimatorKind::Exact);
        assert_eq!(rd.reference(9), 64);
        assert_eq!(rd.reference(9), 0);
        assert_eq!(rd.tracked_len(), 1);
    }
}
