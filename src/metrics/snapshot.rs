use crate::metrics::metrics_impl::BUCKET_SLOTS;

#[derive(Debug, Clone, Copy)]
pub struct EstimatorMetricsSnapshot {
    pub reference_calls: u64,
    pub hits: u64,
    pub cold_misses: u64,
    pub bucket_counts: [u64; BUCKET_SLOTS],

    // gauge captured at snapshot time
    pub tracked_len: usize,
}

impl EstimatorMetricsSnapshot {
    /// Fraction of references that had a recorded prior occurrence.
    pub fn hit_rate(&self) -> f64 {
        if self.reference_calls == 0 {
            0.0
        } else {
            self.hits as f64 / self.reference_calls as f64
        }
    }
}
