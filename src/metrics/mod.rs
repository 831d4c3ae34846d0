//! Estimator observability: counters recorded on the reference path,
//! snapshots for benches, tests, and monitoring.
//!
//! Mirrors the split used across the library: recording is a trait the
//! engines drive internally; consumption goes through
//! [`MetricsSnapshotProvider`](traits::MetricsSnapshotProvider) so readers
//! never couple to the counter layout.

pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use metrics_impl::EstimatorMetrics;
pub use snapshot::EstimatorMetricsSnapshot;
pub use traits::{EstimatorMetricsRecorder, MetricsSnapshotProvider};
