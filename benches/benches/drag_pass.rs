// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use understory_dragdrop::{
    ClassList, Draggable, DropZoneOptions, ElementTree, GeometryProbe, PointerButton,
    PointerEvent, Probe, Registry,
};

/// Zones laid out on a grid of 40 px cells; element `i` is cell `i`.
struct Grid {
    cols: u32,
}

impl Grid {
    fn rect(&self, el: u32) -> Rect {
        let x = f64::from(el % self.cols) * 40.0;
        let y = f64::from(el / self.cols) * 40.0;
        Rect::new(x, y, x + 36.0, y + 36.0)
    }
}

impl GeometryProbe<u32> for Grid {
    fn probe(&self, element: &u32) -> Probe {
        Probe::Visible(self.rect(*element))
    }
}

impl ClassList<u32> for Grid {
    fn set_class(&mut self, element: &u32, class: &str, on: bool) {
        black_box((element, class, on));
    }
}

impl ElementTree<u32> for Grid {
    fn closest(&self, element: &u32, _: &str) -> Option<u32> {
        Some(*element)
    }
}

fn registry(zones: u32) -> Registry<u32, u32> {
    let mut registry = Registry::new();
    for el in 0..zones {
        // Every third zone refuses, to exercise the rejected styling.
        let options = DropZoneOptions::new()
            .accepts("bench")
            .with_drag_enter(|_, _, zone: &u32| zone % 3 != 0)
            .with_drop(|dragged: &u32, zone: &u32| {
                black_box((dragged, zone));
            });
        registry.add_drop_zone(el, el, options);
    }
    registry
}

/// A diagonal sweep across the grid.
fn path(grid: &Grid, zones: u32, steps: u32) -> Vec<PointerEvent> {
    let rows = zones.div_ceil(grid.cols);
    let w = f64::from(grid.cols) * 40.0;
    let h = f64::from(rows) * 40.0;
    (0..steps)
        .map(|i| {
            let t = f64::from(i) / f64::from(steps);
            PointerEvent::at(t * w, t * h, PointerButton::Primary)
        })
        .collect()
}

fn bench_drag_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("dragdrop/drag_pass");

    // Every pass re-probes and updates every zone of the channel, so the cost
    // should be linear in the zone count.
    for zones in [16_u32, 256, 4_096] {
        let mut grid = Grid { cols: 64 };
        let events = path(&grid, zones, 64);
        let mut registry = registry(zones);
        let mut drag: Draggable<u32, u32> = Draggable::new("bench", 7, None, None);
        group.throughput(Throughput::Elements(u64::from(zones)));

        group.bench_with_input(BenchmarkId::from_parameter(zones), &events, |b, events| {
            let mut i = 0;
            b.iter(|| {
                let event = &events[i % events.len()];
                i += 1;
                drag.drag(&mut registry, &mut grid, event).unwrap();
                black_box(drag.drop_rejected(&registry).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_drop(c: &mut Criterion) {
    let mut group = c.benchmark_group("dragdrop/drop");

    for zones in [16_u32, 256, 4_096] {
        let mut grid = Grid { cols: 64 };
        let mut registry = registry(zones);
        let mut drag: Draggable<u32, u32> = Draggable::new("bench", 7, None, None);
        let target = zones / 2 + 2;
        let rect = grid.rect(target);
        let event = PointerEvent::at(rect.center().x, rect.center().y, PointerButton::Primary);
        group.throughput(Throughput::Elements(u64::from(zones)));

        group.bench_function(BenchmarkId::from_parameter(zones), |b| {
            b.iter(|| {
                drag.drag(&mut registry, &mut grid, &event).unwrap();
                let winner = drag
                    .drop(&mut registry, &mut grid, &event, Some(&target))
                    .unwrap();
                black_box(winner);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_drag_pass, bench_drop);
criterion_main!(benches);
