use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use strand_core::{
    bridge::{from_script_type, to_script_type},
    exec::{ExecContext, ExecValue, ExecValueType},
    val::{ArrayValue, StrValue, TypeInfo, Val},
};

// Numeric narrowing never leaves the primitive slots
fn bench_narrowing(c: &mut Criterion) {
    let ctx = ExecContext::default();
    c.bench_function("convert_int_to_double", |b| {
        b.iter(|| black_box(ctx.convert(black_box(ExecValue::Int(42)), ExecValueType::Double).unwrap()))
    });
}

// Same string converted repeatedly: the first parse is cached on the value
fn bench_string_to_number(c: &mut Criterion) {
    let ctx = ExecContext::default();
    let cached = StrValue::new("12345.678");
    c.bench_function("string_to_double_cached", |b| {
        b.iter(|| {
            let from = ExecValue::StringRef(cached.clone());
            black_box(ctx.convert(from, ExecValueType::Double).unwrap())
        })
    });
    c.bench_function("string_to_double_fresh", |b| {
        b.iter(|| {
            let from = ExecValue::string(black_box("12345.678"));
            black_box(ctx.convert(from, ExecValueType::Double).unwrap())
        })
    });
}

fn bench_pivot(c: &mut Criterion) {
    let ctx = ExecContext::default();
    c.bench_function("double_to_string_pivot", |b| {
        b.iter(|| black_box(ctx.convert(ExecValue::Double(black_box(3.25)), ExecValueType::StringRef).unwrap()))
    });
}

fn bench_bridge(c: &mut Criterion) {
    let ctx = ExecContext::default();
    let flat = Val::Array(ArrayValue::from_sequence((0..100).map(Val::int).collect()));
    let nested = Val::list((0..100).map(|i| Val::list(vec![Val::int(i), Val::str("x")])).collect());

    c.bench_function("to_script_unchanged", |b| {
        b.iter(|| black_box(to_script_type(flat.clone()).unwrap()))
    });
    c.bench_function("to_script_nested_lists", |b| {
        b.iter(|| black_box(to_script_type(nested.clone()).unwrap()))
    });
    c.bench_function("from_script_proper_list", |b| {
        b.iter(|| black_box(from_script_type(&ctx, flat.clone(), &TypeInfo::ProperList).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_narrowing,
    bench_string_to_number,
    bench_pivot,
    bench_bridge
);
criterion_main!(benches);
