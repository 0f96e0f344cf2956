//! Notify fan-out benchmark: cost of one write propagating to N watchers.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use weft_reactive::{BindingScope, Store, Value, data};

fn bench_notify_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("notify_fanout");
    for watchers in [1usize, 16, 256] {
        group.bench_function(format!("{watchers}_watchers"), |b| {
            let store = Store::new(data! { n: 0 }).unwrap();
            let mut scope = BindingScope::new();
            for _ in 0..watchers {
                scope
                    .watch(&store, "n", |v| {
                        black_box(v);
                    })
                    .unwrap();
            }
            let mut i = 0i64;
            b.iter(|| {
                i += 1;
                store.set("n", Value::Int(i)).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_suppressed_write(c: &mut Criterion) {
    c.bench_function("suppressed_write", |b| {
        let store = Store::new(data! { n: 0 }).unwrap();
        let mut scope = BindingScope::new();
        for _ in 0..64 {
            scope
                .watch(&store, "n", |v| {
                    black_box(v);
                })
                .unwrap();
        }
        b.iter(|| {
            store.set("n", Value::Int(0)).unwrap();
        });
    });
}

criterion_group!(benches, bench_notify_fanout, bench_suppressed_write);
criterion_main!(benches);
