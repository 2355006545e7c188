use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tessera_buffer::{MemoryBufferPool, MemoryCatalog};
use tessera_core::prelude::*;
use tessera_operators::{Insert, OpIterator, Producer, TupleScan};

fn make_rows(desc: &Arc<TupleDesc>, rows: usize) -> Vec<Tuple> {
    (0..rows)
        .map(|i| {
            Tuple::from_fields(
                Arc::clone(desc),
                vec![Field::Int(i as i32), Field::String(format!("row-{}", i % 16))],
            )
            .unwrap()
        })
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let desc = TupleDesc::new(
        vec![Type::Int, Type::String],
        vec![Some("id"), Some("label")],
    );
    let desc = Arc::new(desc.unwrap());
    let rows = make_rows(&desc, 1024);
    let cfg = EngineConfig {
        buffer_pool_pages: 4096,
        ..Default::default()
    };

    c.bench_function("insert_1024", |b| {
        b.iter_batched(
            || {
                let catalog = Arc::new(MemoryCatalog::new());
                let table = catalog
                    .create_table("bench", "id", (*desc).clone(), &cfg)
                    .unwrap();
                let pool = Arc::new(MemoryBufferPool::new(catalog.clone(), &cfg).unwrap());
                let child = TupleScan::new(Arc::clone(&desc), rows.clone())
                    .unwrap()
                    .boxed();
                let tid = TransactionId::fresh();
                Insert::try_new(tid, child, table, catalog.as_ref(), pool)
                    .unwrap()
                    .into_operator()
            },
            |mut op| {
                op.open().unwrap();
                let _ = op.next().unwrap();
                op.close();
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(inserts, bench_insert);
criterion_main!(inserts);
