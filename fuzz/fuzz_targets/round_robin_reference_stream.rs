#![no_main]

use libfuzzer_sys::fuzz_target;
use reusekit::estimator::round_robin::{MAX_SIZE, MAX_SIZE_BITS, MIN_SIZE_BITS};
use reusekit::estimator::RoundRobinEstimator;

// Fuzz arbitrary reference streams through the pooled engine
//
// Checks the hard guarantees that hold regardless of trace shape: buckets
// stay inside the pool band, the backing array never exceeds its cap, and
// the position map stays consistent with the slots.
fuzz_target!(|data: &[u8]| {
    let mut rd = RoundRobinEstimator::new();

    for chunk in data.chunks_exact(2) {
        let address = u64::from(u16::from_le_bytes([chunk[0], chunk[1]])) + 1;
        let bucket = rd.reference(address);
        assert!((MIN_SIZE_BITS..=MAX_SIZE_BITS).contains(&bucket));
        assert!(rd.backing_len() as u64 <= MAX_SIZE);
        assert!(rd.tracked_len() as u64 <= MAX_SIZE);
    }

    #[cfg(debug_assertions)]
    rd.check_invariants().unwrap();
});
