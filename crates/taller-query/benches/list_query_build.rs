use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use taller_model::RecordDraft;
use taller_query::{build_list_query, RecordFilter, RecordStore, SortDirective};

fn full_filter() -> RecordFilter {
    RecordFilter {
        unit: Some("Truck".to_string()),
        order_type: Some("Prev*".to_string()),
        date: Some("2024-05-01".to_string()),
    }
}

fn seeded_store() -> RecordStore {
    let store = RecordStore::open_in_memory().expect("open store");
    let date = NaiveDate::from_ymd_opt(2024, 5, 1).expect("date");
    for i in 0..500 {
        let draft = RecordDraft {
            unit: format!("Truck-{i}"),
            measure_type: "Kilometraje".to_string(),
            measure_value: format!("{}", i * 100),
            order_type: if i % 2 == 0 { "Preventivo" } else { "Correctivo" }.to_string(),
            comments: None,
            reported_by: "Ana".to_string(),
        };
        store.insert(&draft, date).expect("insert");
    }
    store
}

fn bench_build(c: &mut Criterion) {
    let filter = full_filter();
    let sort = SortDirective::new(Some("date"), Some("desc"));
    c.bench_function("build_list_query_all_filters", |b| {
        b.iter(|| build_list_query(black_box(&filter), black_box(&sort)))
    });
    c.bench_function("build_list_query_empty", |b| {
        b.iter(|| {
            build_list_query(
                black_box(&RecordFilter::default()),
                black_box(&SortDirective::default()),
            )
        })
    });
}

fn bench_list(c: &mut Criterion) {
    let store = seeded_store();
    let filter = RecordFilter {
        unit: Some("Truck-1".to_string()),
        order_type: Some("Preventivo".to_string()),
        date: None,
    };
    let sort = SortDirective::new(Some("unit"), None);
    c.bench_function("store_list_filtered_sorted", |b| {
        b.iter(|| store.list(black_box(&filter), black_box(&sort)).expect("list"))
    });
}

criterion_group!(benches, bench_build, bench_list);
criterion_main!(benches);
