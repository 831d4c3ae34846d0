pub mod round_robin;
pub mod treap;

pub use round_robin::RoundRobinEstimator;
pub use treap::TreapEstimator;
