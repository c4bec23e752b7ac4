use std::{hint::black_box, ptr::NonNull};

use bumpalo::Bump;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use tenure::{heap, DropOnly, Own};

fn bench_own(c: &mut Criterion) {
    c.bench_function("Box", |b| {
        b.iter(|| black_box(Box::new(black_box(7usize))));
    });

    c.bench_function("heap", |b| {
        b.iter(|| black_box(heap(black_box(7usize))));
    });

    c.bench_function("heap+erase", |b| {
        b.iter(|| black_box(heap(black_box(7usize)).erase()));
    });

    c.bench_function("DropOnly in bumpalo", |b| {
        b.iter_batched_ref(
            Bump::new,
            |bump| {
                let slot = bump.alloc(black_box(7usize));
                let own = unsafe { DropOnly::own(NonNull::from(slot)) };
                black_box(own);
            },
            BatchSize::LargeInput,
        );
    });

    for count in [1usize, 4, 16] {
        c.bench_with_input(BenchmarkId::new("attach", count), &count, |b, &count| {
            b.iter_batched(
                || (0..count).map(heap).collect::<Vec<_>>(),
                |attachments| {
                    let own: Own<usize> = heap(0usize).attach(attachments);
                    black_box(own);
                },
                BatchSize::SmallInput,
            );
        });
    }
}

criterion_group!(benches, bench_own);
criterion_main!(benches);
