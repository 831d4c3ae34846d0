pub mod recency_tree;

pub use recency_tree::{NodeId, RecencyTree};
