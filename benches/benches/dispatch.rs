// Copyright 2025 the Boxdom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatch cost over deep chains, with and without per-node coordinate rebinding.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use boxdom::{Document, Element, Event, Listener, MouseEventInit, RetainedEngine};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};

/// A chain of `depth` nested elements, each offset by one pixel, with one
/// capture and one bubble listener per node. Returns the root and the leaf.
fn chain(doc: &Document, engine: &RefCell<RetainedEngine>, depth: usize) -> (Element, Element) {
    let counter = Rc::new(Cell::new(0_u64));
    let root = doc.create_element("Div");
    let mut leaf = root.clone();
    for _ in 1..depth {
        let child = doc.create_element("Div");
        leaf.append_child(&child).unwrap();
        leaf = child;
    }
    let mut cur = Some(leaf.clone());
    while let Some(el) = cur {
        engine
            .borrow_mut()
            .set_frame(el.box_id(), Rect::new(1.0, 1.0, 1000.0, 1000.0));
        for capture in [true, false] {
            for ty in ["ping", "mousemove"] {
                let counter = counter.clone();
                el.add_event_listener(
                    ty,
                    Listener::from_fn(move |_| counter.set(counter.get() + 1)),
                    capture,
                );
            }
        }
        cur = el.parent_node();
    }
    (root, leaf)
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    for depth in [4_usize, 16, 64] {
        let engine = Rc::new(RefCell::new(RetainedEngine::new()));
        let doc = Document::new(engine.clone());
        let (_root, leaf) = chain(&doc, &engine, depth);

        group.bench_with_input(BenchmarkId::new("basic", depth), &leaf, |b, leaf| {
            b.iter(|| {
                let mut event = Event::custom("ping");
                black_box(leaf.dispatch_event(&mut event).unwrap());
            });
        });

        group.bench_with_input(BenchmarkId::new("mousemove", depth), &leaf, |b, leaf| {
            b.iter(|| {
                let mut event = Event::mouse(
                    "mousemove",
                    MouseEventInit {
                        screen: Point::new(100.0, 100.0),
                        ..Default::default()
                    },
                );
                black_box(leaf.dispatch_event(&mut event).unwrap());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
