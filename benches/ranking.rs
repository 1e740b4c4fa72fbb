//! Criterion benchmarks for the post-fetch pipeline: price filter, ranking
//! and top-N selection over a merged collection.
//!
//! Run: `cargo bench`

#![allow(clippy::unwrap_used, missing_docs)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use product_aggregator::application::services::{
    ProductIdRanking, RankingStrategy, StableRanking, filter_by_price, top_n,
};
use product_aggregator::domain::entities::Product;
use product_aggregator::domain::value_objects::{PriceRange, SortKey, SortOrder};

const COMPANIES: [&str; 5] = ["AMZ", "FLP", "SNP", "MYN", "AZO"];

/// A merged collection of `per_source` products from each default company.
fn merged(per_source: usize) -> Vec<Product> {
    COMPANIES
        .iter()
        .flat_map(|company| {
            (0..per_source).map(move |i| {
                Product::new(
                    format!("{company}-{i}"),
                    format!("{company} item {}", (i * 7919) % per_source),
                    ((i * 37) % 1000) as f64 + 0.99,
                )
                .unwrap()
                .with_company(*company)
                .with_rating(((i * 13) % 50) as f64 / 10.0)
                .with_discount(((i * 17) % 70) as f64)
            })
        })
        .collect()
}

fn bench_rank_by_key(c: &mut Criterion) {
    let products = merged(200);
    let mut group = c.benchmark_group("rank_1000");
    for key in SortKey::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(key.as_str()), &key, |b, key| {
            b.iter(|| {
                black_box(StableRanking::new().rank(
                    black_box(products.clone()),
                    *key,
                    SortOrder::Descending,
                ))
            });
        });
    }
    group.finish();
}

fn bench_tie_break(c: &mut Criterion) {
    let products = merged(200);
    let stable = StableRanking::new();
    let by_id = ProductIdRanking::new();
    c.bench_function("rank_company_stable", |b| {
        b.iter(|| black_box(stable.rank(products.clone(), SortKey::Company, SortOrder::Ascending)));
    });
    c.bench_function("rank_company_product_id", |b| {
        b.iter(|| black_box(by_id.rank(products.clone(), SortKey::Company, SortOrder::Ascending)));
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let products = merged(200);
    let range = PriceRange::new(Some(100.0), Some(600.0)).unwrap();
    let ranking = StableRanking::new();
    c.bench_function("filter_rank_top10_1000", |b| {
        b.iter(|| {
            let filtered = filter_by_price(black_box(products.clone()), &range);
            let ranked = ranking.rank(filtered.retained, SortKey::Price, SortOrder::Ascending);
            black_box(top_n(ranked, 10))
        });
    });
}

criterion_group!(benches, bench_rank_by_key, bench_tie_break, bench_pipeline);
criterion_main!(benches);
