use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use myqb::{Fields, QueryBuilder, Value, escape};

/// `n` columns named col0, col1, ... with integer values.
fn row(n: usize) -> Fields {
    (0..n).map(|i| (format!("col{i}"), i as i64)).collect()
}

fn bench_select_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/select_build");

    for n in [1, 5, 10, 50, 100] {
        let columns: Vec<String> = (0..n).map(|i| format!("col{i}")).collect();
        let filter = row(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let mut qb = QueryBuilder::new("t").unwrap();
                qb.select(&columns)
                    .unwrap()
                    .and_where(filter.clone())
                    .order("col0 DESC")
                    .skip(20)
                    .limit(10);
                black_box(qb.build().unwrap());
            });
        });
    }

    group.finish();
}

fn bench_insert_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/insert_many");

    for rows in [1, 10, 100, 1000] {
        let data: Vec<Fields> = (0..rows).map(|_| row(8)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(rows), &data, |b, data| {
            b.iter(|| {
                let mut qb = QueryBuilder::new("t").unwrap();
                qb.insert_many(data.iter().cloned()).unwrap();
                black_box(qb.build().unwrap());
            });
        });
    }

    group.finish();
}

fn bench_format_positional(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/format_positional");

    for n in [5, 20, 100, 500] {
        let template = vec!["?"; n].join(" AND ");
        let values: Vec<Value> = (0..n).map(|i| Value::from(format!("v'{i}"))).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| black_box(escape::format_positional(&template, values)));
        });
    }

    group.finish();
}

fn bench_custom_placeholders(c: &mut Criterion) {
    let mut qb = QueryBuilder::new("t").unwrap();
    qb.sql("SELECT :$fields FROM t JOIN u ON u.id = t.uid :$orderBy :$limit")
        .unwrap()
        .fields(["t.id", "u.name"])
        .unwrap()
        .order("t.id")
        .limit(50);

    c.bench_function("query_builder/custom_placeholders", |b| {
        b.iter(|| black_box(qb.build().unwrap()));
    });
}

criterion_group!(
    benches,
    bench_select_build,
    bench_insert_many,
    bench_format_positional,
    bench_custom_placeholders
);
criterion_main!(benches);
