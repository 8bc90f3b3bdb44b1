use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};

use rplink::resources::{ANY_ROLE, Resources};

fn bench_parse_resources(c: &mut Criterion) {
    for count in [10, 1_000] {
        let text = (0..count)
            .map(|i| format!("res{}(role{}):{}.5", i % 7, i % 3, i))
            .collect::<Vec<_>>()
            .join(";");
        c.bench_with_input(
            BenchmarkId::new("parse resources", count),
            &text,
            |b, text| {
                b.iter(|| Resources::parse(black_box(text), ANY_ROLE).unwrap());
            },
        );
    }
}

pub fn benchmark(c: &mut Criterion) {
    bench_parse_resources(c);
}
