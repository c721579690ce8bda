use std::io;
use std::num::ParseIntError;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use disclosure::{disclose, CheckedEnvelope, CheckedWrapper, Disclosing, Envelope, WrappedError, Wrapper};

fn bench_ok_path(c: &mut Criterion) {
    let wrapper = Wrapper::<WrappedError>::default();
    let disclosure = disclose::<(io::Error, ParseIntError)>();

    c.bench_function("wrap_disclose_ok", |b| {
        b.iter(|| {
            let parse = wrapper.function(|s: &str| s.parse::<u64>());
            disclosure.get(|| black_box(["1", "2", "3"]).into_iter().map(parse).sum::<u64>())
        })
    });
}

fn bench_unwind_path(c: &mut Criterion) {
    let wrapper = Wrapper::<WrappedError>::default();
    let disclosure = disclose::<(io::Error, ParseIntError)>();

    c.bench_function("wrap_disclose_unwind", |b| {
        b.iter(|| {
            let parse = wrapper.function(|s: &str| s.parse::<u64>());
            disclosure.get(|| black_box(["1", "x"]).into_iter().map(parse).sum::<u64>())
        })
    });
}

fn bench_checked_path(c: &mut Criterion) {
    let wrapper = CheckedWrapper::<CheckedEnvelope>::default();
    let disclosure = Disclosing::<CheckedEnvelope>::new().disclose::<(io::Error, ParseIntError)>();

    c.bench_function("checked_resolve", |b| {
        b.iter(|| {
            let mut parse = wrapper.function(|s: &str| s.parse::<u64>());
            disclosure.resolve(parse(black_box("x")))
        })
    });

    c.bench_function("inspect_fallback", |b| {
        b.iter(|| disclosure.inspect(CheckedEnvelope::from_cause(black_box(std::fmt::Error))))
    });
}

criterion_group!(benches, bench_ok_path, bench_unwind_path, bench_checked_path);
criterion_main!(benches);
