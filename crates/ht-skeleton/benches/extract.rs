use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ht_morph::{BinaryMask, ThinConfig, thin_zhang_suen};
use ht_skeleton::{SkeletonConfig, extract, trace_skeleton};

fn synthetic_mask(width: usize, height: usize) -> BinaryMask {
    let mut mask = BinaryMask::new_empty(width, height);

    for y in (16..height.saturating_sub(16)).step_by(40) {
        for yy in y..y + 9 {
            for x in 24..width.saturating_sub(24) {
                mask.set(x, yy, true);
            }
        }
    }

    for x in (48..width.saturating_sub(48)).step_by(64) {
        for y in 32..height.saturating_sub(32) {
            for xx in x..x + 7 {
                mask.set(xx, y, true);
            }
        }
    }

    mask
}

fn bench_extract(c: &mut Criterion) {
    let mask = synthetic_mask(320, 320);
    let cfg = SkeletonConfig::default();

    c.bench_function("ht_skeleton_extract_320", |b| {
        b.iter(|| {
            let set = extract(black_box(&mask), black_box(&cfg));
            black_box((set.num_polylines(), set.num_points()));
        });
    });

    let skeleton = thin_zhang_suen(&mask, &ThinConfig::default());
    c.bench_function("ht_skeleton_trace_320", |b| {
        b.iter(|| {
            let g = trace_skeleton(black_box(&skeleton), black_box(&cfg));
            black_box((g.nodes.len(), g.branches.len()));
        });
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
