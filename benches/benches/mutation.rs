// Copyright 2025 the Boxdom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural mutation cost, including the parity check after each change.

use std::cell::RefCell;
use std::rc::Rc;

use boxdom::{Document, RetainedEngine, StyleObject};
use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");
    for width in [16_usize, 128, 512] {
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            b.iter_batched(
                || {
                    let engine = Rc::new(RefCell::new(RetainedEngine::new()));
                    let doc = Document::new(engine);
                    let parent = doc.create_element("Div");
                    let children: Vec<_> = (0..width).map(|_| doc.create_element("Div")).collect();
                    (doc, parent, children)
                },
                |(_doc, parent, children)| {
                    for child in &children {
                        parent.append_child(child).unwrap();
                    }
                    black_box(parent)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_reorder(c: &mut Criterion) {
    let engine = Rc::new(RefCell::new(RetainedEngine::new()));
    let doc = Document::new(engine);
    let parent = doc.create_element("Div");
    for _ in 0..128 {
        parent.append_child(&doc.create_element("Div")).unwrap();
        parent.append_child(&doc.create_text_node("t")).unwrap();
    }
    c.bench_function("move_last_element_to_front", |b| {
        b.iter(|| {
            let last = parent.children().pop().unwrap();
            parent.insert_child_element(&last, 0).unwrap();
        });
    });
}

fn bench_style(c: &mut Criterion) {
    let engine = Rc::new(RefCell::new(RetainedEngine::new()));
    let doc = Document::new(engine);
    let el = doc.create_element("Div");
    let style = StyleObject::new()
        .with("width", 100)
        .with("backgroundColor", "rgb(10, 20, 30)")
        .with("border", 1)
        .with("transform", "translate(10px, 5px) rotate(15deg) scale(1.5)")
        .with("hover", StyleObject::new().with("backgroundColor", "#336699"));
    c.bench_function("set_style", |b| {
        b.iter(|| el.set_style(black_box(&style)).unwrap());
    });
}

criterion_group!(benches, bench_append, bench_reorder, bench_style);
criterion_main!(benches);
