// benches/quota.rs
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use lm_scrape::core::Document;
use lm_scrape::quota::QuotaTable;
use lm_scrape::specs::players::parse_ranking;

/// Two ranking pages' worth of rows.
fn sample_ranking() -> String {
    let mut page = String::from(r#"<html><body><div class="detaildedbody"><div class="toptab">"#);
    for i in 1..=100u64 {
        page.push_str(&format!(
            r#"<div class="toptabrow"><div>{i}</div><div><a href="/en/player/P{i}">P{i}</a></div><div>TAG</div><div>Guild</div><div>{},000,000</div></div>"#,
            1000 - i
        ));
    }
    page.push_str("</div></div></body></html>");
    page
}

fn bench_quota(c: &mut Criterion) {
    let table = QuotaTable::canonical().expect("canonical table");

    c.bench_function("quota_for_1_to_60", |b| {
        b.iter(|| {
            let mut sum = 0u32;
            for rank in 1..=60 {
                sum += table.quota_for(black_box(rank)).unwrap_or(0);
            }
            black_box(sum)
        })
    });
}

fn bench_ranking(c: &mut Criterion) {
    let html = sample_ranking();

    c.bench_function("document_parse", |b| {
        b.iter(|| black_box(Document::parse(black_box(&html))))
    });

    let doc = Document::parse(&html);
    c.bench_function("parse_ranking", |b| {
        b.iter(|| black_box(parse_ranking(black_box(&doc), 12).map(|r| r.len())))
    });
}

criterion_group!(benches, bench_quota, bench_ranking);
criterion_main!(benches);
