use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::SmallRng, SeedableRng};
use sizefs_xeger::{Generator, GeneratorKind, GeneratorSpec};

fn build(kind: GeneratorKind, pattern: Option<&str>, size: u64) -> Generator {
    let mut rng = SmallRng::seed_from_u64(42);
    let spec = GeneratorSpec {
        kind,
        size,
        filler: pattern.map(str::to_string),
        ..Default::default()
    };
    Generator::build_with_rng(&spec, &mut rng).unwrap()
}

fn bench_constant_filler(c: &mut Criterion) {
    let mut gen = build(GeneratorKind::Xeger, Some("0"), 1_000_000);
    c.bench_function("xeger constant filler, 64KiB read", |b| {
        b.iter(|| black_box(gen.read(0, 65_535)))
    });
}

fn bench_nested_groups(c: &mut Criterion) {
    let mut gen = build(GeneratorKind::Xeger, Some("(ab(cd){3}){10}"), 1_000_000);
    c.bench_function("xeger nested groups, 64KiB read", |b| {
        b.iter(|| black_box(gen.read(0, 65_535)))
    });
}

fn bench_large_set(c: &mut Criterion) {
    let mut gen = build(GeneratorKind::Xeger, Some("[0-9a-zA-Z]{64}"), 1_000_000);
    c.bench_function("xeger large set, 64KiB read", |b| {
        b.iter(|| black_box(gen.read(0, 65_535)))
    });
}

fn bench_alpha_num(c: &mut Criterion) {
    let mut gen = build(GeneratorKind::AlphaNum, None, 1_000_000);
    c.bench_function("alpha_num, 64KiB read", |b| {
        b.iter(|| black_box(gen.read(0, 65_535)))
    });
}

criterion_group!(
    benches,
    bench_constant_filler,
    bench_nested_groups,
    bench_large_set,
    bench_alpha_num
);
criterion_main!(benches);
