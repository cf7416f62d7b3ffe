use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use skipidx::{NaturalComparator, Options, SkipList};

fn filled(n: u64) -> SkipList<u64, NaturalComparator<u64>> {
    let opts = Options::with_expected_len(n as usize);
    let mut list = SkipList::with_options(NaturalComparator::default(), StdRng::seed_from_u64(1), opts).unwrap();
    // Pin both extremes first so the rest goes through plain insertion.
    list.add(0).unwrap();
    list.add(n * 2 + 2).unwrap();
    let mut keys: Vec<u64> = (1..=n).map(|k| k * 2).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(2));
    for k in keys {
        list.add(k).unwrap();
    }
    list
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    for n in [1_000u64, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("interior", n), n, |b, &n| {
            b.iter(|| black_box(filled(n)));
        });
    }
    group.bench_function("ascending_rebuilds_500", |b| {
        b.iter(|| {
            let mut list = SkipList::with_rng(NaturalComparator::default(), StdRng::seed_from_u64(3));
            for k in 0..500u64 {
                list.add(k).unwrap();
            }
            black_box(list)
        });
    });
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let list = filled(10_000);
    c.bench_function("search_hit", |b| {
        let mut k = 0;
        b.iter(|| {
            k = (k + 2) % 20_000;
            black_box(list.search(&(k + 2)).is_ok())
        });
    });
    c.bench_function("search_miss", |b| {
        let mut k = 0;
        b.iter(|| {
            k = (k + 2) % 20_000;
            black_box(list.search(&(k + 1)).is_err())
        });
    });
}

fn bench_remove(c: &mut Criterion) {
    c.bench_function("remove_all_1000", |b| {
        b.iter_with_setup(
            || filled(1_000),
            |mut list| {
                for k in 1..=1_000u64 {
                    list.remove(&(k * 2)).unwrap();
                }
                black_box(list)
            },
        );
    });
}

criterion_group!(benches, bench_add, bench_search, bench_remove);
criterion_main!(benches);
