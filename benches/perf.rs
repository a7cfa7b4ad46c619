use std::hint::black_box;

use chrono::NaiveDate;
use criterion::{Criterion, criterion_group, criterion_main};

use skinsales_terminal::catalog::parse_champion_full_json;
use skinsales_terminal::sale_feed::parse_sales_json;
use skinsales_terminal::state::{SaleRecord, filter_sales, pagination_controls};

const SALES_JSON: &str = include_str!("../tests/fixtures/previous_sales.json");
const CHAMPION_JSON: &str = include_str!("../tests/fixtures/champion_full.json");

fn sample_history(len: usize) -> Vec<SaleRecord> {
    let base = parse_sales_json(SALES_JSON).expect("valid fixture json");
    let week = NaiveDate::from_ymd_opt(2025, 8, 4);
    (0..len)
        .map(|i| {
            let mut record = base[i % base.len()].clone();
            record.champion = format!("{}{}", record.champion, i);
            record.week = week;
            record
        })
        .collect()
}

fn bench_sales_parse(c: &mut Criterion) {
    c.bench_function("sales_parse", |b| {
        b.iter(|| {
            let records = parse_sales_json(black_box(SALES_JSON)).unwrap();
            black_box(records.len());
        })
    });
}

fn bench_catalog_parse(c: &mut Criterion) {
    c.bench_function("catalog_parse", |b| {
        b.iter(|| {
            let catalog = parse_champion_full_json(black_box(CHAMPION_JSON)).unwrap();
            black_box(catalog.len());
        })
    });
}

fn bench_filter(c: &mut Criterion) {
    let records = sample_history(2000);
    c.bench_function("filter_2000_rows", |b| {
        b.iter(|| {
            let hits = filter_sales(black_box(&records), black_box("fortune"), None);
            black_box(hits.len());
        })
    });
}

fn bench_pagination_controls(c: &mut Criterion) {
    c.bench_function("pagination_controls", |b| {
        b.iter(|| {
            for page in 1..=67 {
                black_box(pagination_controls(black_box(67), page));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_sales_parse,
    bench_catalog_parse,
    bench_filter,
    bench_pagination_controls
);
criterion_main!(benches);
