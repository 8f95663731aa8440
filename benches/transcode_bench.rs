//! Benchmarks for wide buffer transcoding

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use louis_marshal::{CodecRegistry, EncodingFamily, WideCharWidth, WideString};

fn sample_text(len: usize) -> String {
    "The quick brown fox jumps over the lazy dog. "
        .chars()
        .cycle()
        .take(len)
        .collect()
}

fn sample_cells(len: usize) -> String {
    (0..len)
        .map(|i| char::from_u32(0x2800 + (i as u32 % 256)).unwrap_or('\u{2800}'))
        .collect()
}

/// Write then read through the process-wide buffer path
fn bench_buffer_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_round_trip");

    for &size in &[16, 256, 4096] {
        let text = sample_text(size);
        let cells = sample_cells(size);
        group.throughput(Throughput::Elements(size as u64));

        let buffer = WideString::with_capacity(size);
        group.bench_function(format!("text_{}", size), |b| {
            b.iter(|| {
                buffer.write(black_box(&text)).unwrap();
                black_box(buffer.read(size).unwrap())
            })
        });

        group.bench_function(format!("dots_{}", size), |b| {
            b.iter(|| {
                buffer.write_dots(black_box(&cells)).unwrap();
                black_box(buffer.read_dots(size).unwrap())
            })
        });
    }

    group.finish();
}

/// Raw codec cost for both unit widths
fn bench_codecs(c: &mut Criterion) {
    let mut group = c.benchmark_group("codecs");
    let text = sample_text(1024);

    for width in [WideCharWidth::Two, WideCharWidth::Four] {
        let codecs = CodecRegistry::new(width);
        let units = codecs.encoding(EncodingFamily::NativeText).units_for(&text);
        let bytes = codecs
            .encode(EncodingFamily::NativeText, &text, units)
            .unwrap();
        group.throughput(Throughput::Elements(units as u64));

        group.bench_function(format!("encode_{}", width), |b| {
            b.iter(|| black_box(codecs.encode(EncodingFamily::NativeText, &text, units).unwrap()))
        });
        group.bench_function(format!("decode_{}", width), |b| {
            b.iter(|| black_box(codecs.decode(EncodingFamily::NativeText, &bytes, units).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_buffer_round_trip, bench_codecs);
criterion_main!(benches);
