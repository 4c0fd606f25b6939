use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

static INPUT: &str = include_str!("../../demos/big.plc");

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("compile", |b| {
        b.iter(|| {
            let java = plc::compile(black_box(INPUT)).unwrap();
            black_box(java);
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
