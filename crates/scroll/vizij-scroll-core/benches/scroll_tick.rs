//! Per-frame cost of the interpolation loop over a long page.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::hint::black_box;
use vizij_scroll_core::{
    Bounds, ElementOptions, Host, ScrollBehavior, ScrollConfig, ScrollEngine, StaticCapabilities,
    StyleUpdate, TimerToken,
};

/// Blocks stacked at fixed heights; style writes are counted, not applied.
#[derive(Debug)]
struct StaticPage {
    heights: Vec<f64>,
    scroll: f64,
    writes: usize,
}

impl Host for StaticPage {
    type Node = usize;

    fn scroll_position(&self) -> f64 {
        self.scroll
    }

    fn viewport_height(&self) -> f64 {
        900.0
    }

    fn bounding_box(&self, node: &usize) -> Option<Bounds> {
        let top: f64 = self.heights.get(..*node)?.iter().sum();
        let height = *self.heights.get(*node)?;
        Some(Bounds::new(top - self.scroll, 0.0, 1280.0, height))
    }

    fn contains(&self, ancestor: &usize, node: &usize) -> bool {
        ancestor == node
    }

    fn find_by_id(&self, _root: &usize, _id: &str) -> Option<usize> {
        None
    }

    fn apply_style(&mut self, _node: &usize, _style: &StyleUpdate) {
        self.writes += 1;
    }

    fn request_scroll(&mut self, position: f64, _behavior: ScrollBehavior) {
        self.scroll = position;
    }

    fn set_ticker(&mut self, _active: bool) {}

    fn schedule_timer(&mut self, _token: TimerToken, _delay_ms: u32) {}
}

fn page(blocks: usize) -> ScrollEngine<StaticPage> {
    let heights = (0..blocks).map(|i| 300.0 + (i % 7) as f64 * 80.0).collect();
    let host = StaticPage {
        heights,
        scroll: 0.0,
        writes: 0,
    };
    let cfg = ScrollConfig {
        is_enabled: Some(true),
        ..ScrollConfig::default()
    };
    let mut engine = ScrollEngine::new(host, usize::MAX, cfg, &StaticCapabilities::default())
        .expect("valid config");
    for i in 0..blocks {
        engine.add_element(i, ElementOptions::default());
    }
    engine
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll_tick");
    for blocks in [16usize, 128] {
        group.bench_function(format!("settle_{blocks}_blocks"), |b| {
            b.iter_batched(
                || {
                    let mut engine = page(blocks);
                    engine.host_mut().scroll = 4000.0;
                    engine.handle_scroll();
                    engine
                },
                |mut engine| {
                    while engine.tick() {}
                    black_box(engine.host().writes)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_invalidate(c: &mut Criterion) {
    let mut engine = page(128);
    c.bench_function("invalidate_128_blocks", |b| {
        b.iter(|| {
            engine.invalidate();
            black_box(engine.host().writes)
        })
    });
}

criterion_group!(benches, bench_tick, bench_invalidate);
criterion_main!(benches);
