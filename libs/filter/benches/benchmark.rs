//! Criterion benchmarks for filter parsing and translation

use arcadex_filter::{criteria_from_sql, parse, CriteriaRow, FilterSet};
use arcadex_schema::builtin;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

const SIMPLE: &str = "Games.year > 1990";
const COMPLEX: &str = "(Games.name LIKE '%pac%' AND Games.year BETWEEN 1980 AND 1989) \
    OR (Manufacturers.name = 'Namco' AND Games.description REGEXP '^Ms') \
    OR (Categories.name LIKE 'Shoot%' AND Inputs.players >= 2 AND Games.clone_of IS NULL)";

fn custom_criterion() -> Criterion {
    Criterion::default()
        .sample_size(20)
        .warm_up_time(Duration::from_millis(100))
        .measurement_time(Duration::from_secs(1))
        .nresamples(1000)
        .noise_threshold(0.05)
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_simple", |b| {
        b.iter(|| parse(black_box(SIMPLE)).unwrap())
    });

    c.bench_function("parse_complex", |b| {
        b.iter(|| parse(black_box(COMPLEX)).unwrap())
    });

    let nested = format!("{}a = 1{}", "(".repeat(100), ")".repeat(100));
    c.bench_function("parse_nested", |b| {
        b.iter(|| parse(black_box(&nested)).unwrap())
    });
}

fn bench_translate(c: &mut Criterion) {
    let schema = builtin::schema().unwrap();

    c.bench_function("sql_to_criteria", |b| {
        b.iter(|| criteria_from_sql(black_box(COMPLEX), schema.columns()).unwrap())
    });

    let set: FilterSet = (0..10)
        .map(|i| {
            let year = format!("{}~{}", 1980 + i, 1990 + i);
            let mut row = CriteriaRow::new();
            row.set("name", "pac");
            row.set("year", year);
            row.set("players", ">=2");
            row
        })
        .collect();
    c.bench_function("criteria_to_sql", |b| {
        b.iter(|| black_box(&set).to_sql_where(schema.columns()))
    });
}

criterion_group! {
    name = benches;
    config = custom_criterion();
    targets =
        bench_parse,
        bench_translate
}
criterion_main!(benches);
