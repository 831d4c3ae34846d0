/// Counters recorded by an estimator on its reference path.
pub trait EstimatorMetricsRecorder {
    /// Records a reference to an already-tracked address and the bucket it
    /// reported.
    fn record_hit(&mut self, bucket: u32);

    /// Records a reference with no prior occurrence and the bucket it
    /// reported (the exact engine's cold sentinel, or the pooled engine's
    /// outermost band).
    fn record_cold_miss(&mut self, bucket: u32);
}

/// Read side: snapshot and reset, decoupled from recording.
pub trait MetricsSnapshotProvider<S> {
    /// Captures current counters plus point-in-time gauges.
    fn snapshot_metrics(&self) -> S;

    /// Resets all counters to zero.
    fn reset_metrics(&mut self);
}
