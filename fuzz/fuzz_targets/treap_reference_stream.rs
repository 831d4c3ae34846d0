#![no_main]

use libfuzzer_sys::fuzz_target;
use reusekit::bits::{COLD_BUCKET, bit_length};
use reusekit::estimator::TreapEstimator;

// Fuzz arbitrary reference streams against a naive recency-list oracle
//
// Every pair of input bytes becomes one address from a small space, so
// streams mix cold references with re-references at varied distances. The
// oracle's 1-based position in a most-recent-first list is the exact stack
// distance the engine must bucket.
fuzz_target!(|data: &[u8]| {
    let mut rd = TreapEstimator::new();
    let mut oracle: Vec<u64> = Vec::new();

    for chunk in data.chunks_exact(2) {
        let address = u64::from(u16::from_le_bytes([chunk[0], chunk[1]])) + 1;

        let expected = match oracle.iter().position(|&a| a == address) {
            Some(pos) => {
                oracle.remove(pos);
                bit_length(pos as u64 + 1)
            }
            None => COLD_BUCKET,
        };
        oracle.insert(0, address);

        assert_eq!(rd.reference(address), expected);
        assert_eq!(rd.tracked_len(), oracle.len());
    }

    #[cfg(debug_assertions)]
    rd.check_invariants().unwrap();
});
