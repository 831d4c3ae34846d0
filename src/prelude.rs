pub use crate::bits::{COLD_BUCKET, bit_length};
pub use crate::builder::{Estimator, EstimatorKind};
pub use crate::ds::{NodeId, RecencyTree};
pub use crate::estimator::{RoundRobinEstimator, TreapEstimator};
pub use crate::traits::ReuseDistanceEstimator;

#[cfg(feature = "concurrency")]
pub use crate::builder::ConcurrentEstimator;
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::EstimatorMetricsSnapshot;
