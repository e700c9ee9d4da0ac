use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::rc::{self, Rc};
use std::time::Duration;
use weak_collections::{WeakList, WeakSet};

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn targets(seed: u64, n: usize) -> Vec<Rc<u64>> {
    lcg(seed).take(n).map(Rc::new).collect()
}

fn bench_list_add(c: &mut Criterion) {
    let held = targets(1, 10_000);
    c.bench_function("weak_list_add_10k", |b| {
        b.iter_batched(
            WeakList::<rc::Weak<u64>>::new,
            |list| {
                for t in &held {
                    list.add(t);
                }
                black_box(list)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_list_contains(c: &mut Criterion) {
    c.bench_function("weak_list_contains_1k", |b| {
        let held = targets(7, 1_000);
        let list: WeakList<rc::Weak<u64>> = held.iter().collect();
        let mut probe = held.iter().cycle();
        b.iter(|| {
            let t = probe.next().unwrap();
            black_box(list.contains(t));
        })
    });
}

fn bench_set_add_dedup(c: &mut Criterion) {
    // Half of the adds repeat an existing value.
    let held: Vec<Rc<u64>> = lcg(11).take(1_000).map(|x| Rc::new(x % 500)).collect();
    c.bench_function("weak_set_add_1k_dedup", |b| {
        b.iter_batched(
            WeakSet::<rc::Weak<u64>>::new,
            |set| {
                for t in &held {
                    black_box(set.add(t));
                }
                set
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_set_union(c: &mut Criterion) {
    let left = targets(13, 500);
    let right = targets(17, 500);
    c.bench_function("weak_set_union_500", |b| {
        b.iter_batched(
            || left.iter().collect::<WeakSet<rc::Weak<u64>>>(),
            |set| {
                set.union_with(right.iter().cloned());
                black_box(set)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_len_with_sweep(c: &mut Criterion) {
    c.bench_function("weak_list_len_sweep_half_dead", |b| {
        b.iter_batched(
            || {
                let mut held = targets(19, 10_000);
                let list: WeakList<rc::Weak<u64>> = held.iter().collect();
                // Drop every other target so the next len() sweeps half the slots.
                let mut i = 0;
                held.retain(|_| {
                    i += 1;
                    i % 2 == 0
                });
                (list, held)
            },
            |(list, held)| {
                black_box(list.len());
                black_box(held);
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_iterate(c: &mut Criterion) {
    c.bench_function("weak_list_iterate_10k", |b| {
        let held = targets(23, 10_000);
        let list: WeakList<rc::Weak<u64>> = held.iter().collect();
        b.iter(|| {
            let mut sum = 0u64;
            for item in &list {
                if let Ok(Some(x)) = item {
                    sum = sum.wrapping_add(*x);
                }
            }
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_list_add, bench_list_contains, bench_set_add_dedup, bench_set_union,
        bench_len_with_sweep, bench_iterate
}
criterion_main!(benches);
