//! DHAT heap profiler for reusekit.
//!
//! Run with: cargo run --bin dhat_profile --release --features dhat-heap
//! View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use reusekit::builder::{Estimator, EstimatorKind};

/// Simple XorShift64 RNG for deterministic workloads.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (u64::MAX as f64);
        (self.next_u64() as f64) * SCALE
    }
}

/// 80/20 hot/cold address mix over a wide range, deterministic per seed.
fn run_workload(kind: EstimatorKind, references: usize) {
    let mut rng = XorShift64::new(0xD15_7A4CE);
    let mut rd = Estimator::new(kind);
    let mut histogram = [0u64; 65];
    for _ in 0..references {
        let address = if rng.next_f64() < 0.8 {
            rng.next_u64() % 4_096 + 1
        } else {
            rng.next_u64() % 8_388_608 + 1
        };
        histogram[rd.reference(address) as usize] += 1;
    }
    let populated = histogram
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .count();
    println!(
        "{kind:?}: {references} references, {} tracked, {populated} buckets populated",
        rd.tracked_len()
    );
}

fn main() {
    let _profiler = dhat::Profiler::new_heap();

    // The exact engine grows with every distinct address; the pooled engine
    // pays one lazy 2^24-slot allocation and then stays flat.
    run_workload(EstimatorKind::Exact, 2_000_000);
    run_workload(EstimatorKind::Pooled, 2_000_000);
}
