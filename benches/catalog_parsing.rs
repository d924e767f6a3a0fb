use criterion::{criterion_group, criterion_main, Criterion};
use chrono::{TimeZone, Utc};
use epic_free_games_bot::api::{parse_free_offers, Storefront};

fn criterion_benchmark(c: &mut Criterion) {
    let body = include_bytes!("../src/api/fixtures/free_games_promotions.json");
    let now = Utc.with_ymd_and_hms(2024, 5, 20, 0, 0, 0).unwrap();
    let storefront = Storefront::new("en-US", "US");
    
    c.bench_function("parses free games promotions", |b| b.iter(|| {
        parse_free_offers(body, &now, &storefront).ok();
    }));
}

criterion_group!{
    name = benches;
    config = Criterion::default().sample_size(100);
    targets = criterion_benchmark
}

criterion_main!(benches);
