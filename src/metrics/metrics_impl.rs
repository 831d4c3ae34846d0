use crate::metrics::snapshot::EstimatorMetricsSnapshot;
use crate::metrics::traits::EstimatorMetricsRecorder;

/// One histogram slot per possible bucket, 0 through 64 inclusive.
pub const BUCKET_SLOTS: usize = 65;

#[derive(Debug)]
pub struct EstimatorMetrics {
    pub reference_calls: u64,
    pub hits: u64,
    pub cold_misses: u64,
    pub bucket_counts: [u64; BUCKET_SLOTS],
}

impl Default for EstimatorMetrics {
    fn default() -> Self {
        Self {
            reference_calls: 0,
            hits: 0,
            cold_misses: 0,
            bucket_counts: [0; BUCKET_SLOTS],
        }
    }
}

impl EstimatorMetrics {
    pub fn snapshot(&self, tracked_len: usize) -> EstimatorMetricsSnapshot {
        EstimatorMetricsSnapshot {
            reference_calls: self.reference_calls,
            hits: self.hits,
            cold_misses: self.cold_misses,
            bucket_counts: self.bucket_counts,
            tracked_len,
        }
    }
}

impl EstimatorMetricsRecorder for EstimatorMetrics {
    fn record_hit(&mut self, bucket: u32) {
        self.reference_calls += 1;
        self.hits += 1;
        self.bucket_counts[(bucket as usize).min(BUCKET_SLOTS - 1)] += 1;
    }

    fn record_cold_miss(&mut self, bucket: u32) {
        self.reference_calls += 1;
        self.cold_misses += 1;
        self.bucket_counts[(bucket as usize).min(BUCKET_SLOTS - 1)] += 1;
    }
}
