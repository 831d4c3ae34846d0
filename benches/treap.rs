use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use reusekit::estimator::TreapEstimator;

fn bench_treap_hot_loop(c: &mut Criterion) {
    c.bench_function("treap_hot_loop", |b| {
        b.iter_batched(
            || {
                let mut rd = TreapEstimator::new();
                for address in 1..=1024u64 {
                    rd.reference(address);
                }
                rd
            },
            |mut rd| {
                for address in 1..=1024u64 {
                    let _ = std::hint::black_box(rd.reference(std::hint::black_box(address)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_treap_cold_stream(c: &mut Criterion) {
    c.bench_function("treap_cold_stream", |b| {
        b.iter_batched(
            TreapEstimator::new,
            |mut rd| {
                for address in 1..=4096u64 {
                    let _ = std::hint::black_box(rd.reference(std::hint::black_box(address)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_treap_strided_reuse(c: &mut Criterion) {
    c.bench_function("treap_strided_reuse", |b| {
        b.iter_batched(
            || {
                let mut rd = TreapEstimator::new();
                for address in 1..=4096u64 {
                    rd.reference(address);
                }
                rd
            },
            |mut rd| {
                for step in 0..4096u64 {
                    let address = (step * 17) % 4096 + 1;
                    let _ = std::hint::black_box(rd.reference(std::hint::black_box(address)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_treap_hot_loop,
    bench_treap_cold_stream,
    bench_treap_strided_reuse
);
criterion_main!(benches);
