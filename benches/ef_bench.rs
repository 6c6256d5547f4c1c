use criterion::{black_box, criterion_group, criterion_main, Criterion};
use efbits::{EliasFanoEncoder, EliasFanoSequence};

fn build(values: &[u64]) -> EliasFanoSequence {
    let mut enc = EliasFanoEncoder::new(values.len(), *values.last().unwrap());
    for &v in values {
        enc.encode_next(v).unwrap();
    }
    enc.into_sequence().unwrap()
}

fn bench_elias_fano(c: &mut Criterion) {
    let mut group = c.benchmark_group("elias_fano");
    let n = 100_000usize;
    let values: Vec<u64> = (0..n as u64).map(|i| i * 37).collect(); // ~5.2 bits/value
    let seq = build(&values);

    group.bench_function("encode", |b| {
        b.iter(|| black_box(build(&values)))
    });

    group.bench_function("next_value_sweep", |b| {
        b.iter(|| {
            let mut dec = seq.decoder();
            while let Some(v) = dec.next_value() {
                black_box(v);
            }
        })
    });

    group.bench_function("previous_value_sweep", |b| {
        b.iter(|| {
            let mut dec = seq.decoder();
            dec.to_after_sequence();
            while let Some(v) = dec.previous_value() {
                black_box(v);
            }
        })
    });

    group.bench_function("advance_sweep", |b| {
        b.iter(|| {
            let mut dec = seq.decoder();
            let mut target = 0u64;
            while let Some(v) = dec.advance_to_value(target) {
                target = black_box(v) + 500;
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_elias_fano);
criterion_main!(benches);
