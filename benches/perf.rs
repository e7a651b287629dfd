use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use nba_daily::predict;
use nba_daily::records::MatchRecord;
use nba_daily::render;
use nba_daily::schedule_fetch::parse_scoreboard_json;

const SCOREBOARD_JSON: &str = include_str!("../tests/fixtures/espn_scoreboard.json");

fn sample_slate() -> Vec<MatchRecord> {
    let base = parse_scoreboard_json(SCOREBOARD_JSON).expect("valid fixture json");
    // Tile the fixture out to a busy night's worth of games.
    let mut records = Vec::with_capacity(12);
    while records.len() < 12 {
        records.extend(base.iter().cloned());
    }
    predict::annotate(&mut records);
    records
}

fn bench_scoreboard_parse(c: &mut Criterion) {
    c.bench_function("scoreboard_parse", |b| {
        b.iter(|| {
            let records = parse_scoreboard_json(black_box(SCOREBOARD_JSON)).unwrap();
            black_box(records.len());
        })
    });
}

fn bench_annotate(c: &mut Criterion) {
    let records = sample_slate();
    c.bench_function("predict_annotate", |b| {
        b.iter(|| {
            let mut slate = records.clone();
            predict::annotate(black_box(&mut slate));
            black_box(slate.len());
        })
    });
}

fn bench_render_page(c: &mut Criterion) {
    let records = sample_slate();
    c.bench_function("render_page", |b| {
        b.iter(|| {
            let html = render::render_page(black_box(&records), "2026-01-28");
            black_box(html.len());
        })
    });
}

criterion_group!(
    benches,
    bench_scoreboard_parse,
    bench_annotate,
    bench_render_page
);
criterion_main!(benches);
