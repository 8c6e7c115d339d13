use collage_core::prelude::*;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

fn generate_photos(count: usize, min_side: u32, max_side: u32) -> Vec<Size> {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let w = rng.gen_range(min_side..=max_side);
            let h = rng.gen_range(min_side..=max_side);
            Size::new(w, h)
        })
        .collect()
}

fn bench_planning(c: &mut Criterion) {
    let mut group = c.benchmark_group("planning");

    let photo_counts = vec![100, 400, 800];

    for count in photo_counts {
        let sizes = generate_photos(count, 1600, 4000);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("adaptive", count), &sizes, |b, sizes| {
            b.iter(|| {
                let cfg = CollageConfig::builder()
                    .with_canvas(3000, 4400)
                    .seed(42)
                    .build();
                black_box(plan_layout_adaptive(sizes, &cfg))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_planning);
criterion_main!(benches);
