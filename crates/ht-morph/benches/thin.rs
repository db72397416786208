use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ht_core::{Image, Rgba8};
use ht_morph::{ThinConfig, preprocess, thin_zhang_suen};

fn synthetic_glyph(size: usize) -> Image<Rgba8> {
    let mut img = Image::new_fill(size, size, Rgba8::WHITE);
    let stroke = size / 16;

    for y in 0..size {
        for x in 0..size {
            let horizontal = (size / 4..size / 4 + stroke).contains(&y)
                || (size / 2..size / 2 + stroke).contains(&y);
            let vertical = (size / 2 - stroke / 2..size / 2 + stroke / 2).contains(&x)
                && y > size / 8
                && y < size - size / 8;
            let diagonal = x.abs_diff(y) < stroke / 2 && x > size / 2;
            if horizontal || vertical || diagonal {
                *img.get_mut(x, y).expect("in bounds") = Rgba8::BLACK;
            }
        }
    }

    img
}

fn bench_preprocess_and_thin(c: &mut Criterion) {
    let glyph = synthetic_glyph(320);
    let cfg = ThinConfig::default();

    c.bench_function("ht_morph_preprocess_320", |b| {
        b.iter(|| {
            let mask = preprocess(black_box(glyph.clone()));
            black_box(mask.count_foreground());
        });
    });

    let mask = preprocess(glyph);
    c.bench_function("ht_morph_zhang_suen_320", |b| {
        b.iter(|| {
            let thin = thin_zhang_suen(black_box(&mask), black_box(&cfg));
            black_box(thin.count_foreground());
        });
    });
}

criterion_group!(benches, bench_preprocess_and_thin);
criterion_main!(benches);
