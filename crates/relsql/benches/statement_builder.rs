use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use relsql::{
    ColumnDefinition, ColumnValues, Criteria, Dialect, StatementBuilder, TableSchema,
    schema_batch_sql,
};

fn criteria(n: usize) -> Criteria {
    (0..n).map(|i| (format!("col{i}"), i as i64)).collect()
}

fn bench_select_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_builder/select_filter");

    for dialect in [Dialect::Postgres, Dialect::MySql] {
        for n in [1, 5, 10, 50] {
            let criteria = criteria(n);
            let fields: Vec<String> = (0..n).map(|i| format!("col{i}")).collect();
            group.bench_with_input(
                BenchmarkId::new(dialect.as_str(), n),
                &(fields, criteria),
                |b, (fields, criteria)| {
                    b.iter(|| {
                        let mut builder = StatementBuilder::new("t", (), dialect).unwrap();
                        builder.select(fields).filter(criteria);
                        black_box(builder.to_sql());
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_update_set_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_builder/update_set_filter");

    for n in [1, 5, 10, 50] {
        let assignments: ColumnValues = (0..n).map(|i| (format!("col{i}"), i as i64)).collect();
        let criteria = criteria(2);
        group.bench_with_input(BenchmarkId::from_parameter(n), &assignments, |b, set| {
            b.iter(|| {
                let mut builder = StatementBuilder::new("t", (), Dialect::Postgres).unwrap();
                builder.update().set(set).unwrap().filter(&criteria);
                black_box(builder.to_sql());
            });
        });
    }

    group.finish();
}

fn bench_schema_batch_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_builder/schema_batch_sql");

    for n in [1, 10, 50] {
        let schemas: Vec<TableSchema> = (0..n)
            .map(|i| {
                let mut schema = TableSchema::new(format!("table{i}"))
                    .column("id", ColumnDefinition::new("uuid").primary_key())
                    .column("name", ColumnDefinition::new("varchar").length(255).not_null())
                    .column(
                        "kind",
                        ColumnDefinition::new("varchar").length(10).one_of(["a", "b"]),
                    );
                if i > 0 {
                    schema = schema.many_to_one("id", &format!("table{}", i - 1));
                }
                schema
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(n), &schemas, |b, schemas| {
            b.iter(|| black_box(schema_batch_sql(schemas, Dialect::Postgres).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_select_filter,
    bench_update_set_filter,
    bench_schema_batch_sql
);
criterion_main!(benches);
