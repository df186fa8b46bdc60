#![allow(unused)]
extern crate dotinspect;

#[path = "../src/test/image.rs"]
mod image;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use dotinspect::prelude::*;
use image::{Implementation, ModuleImageBuilder};
use std::hint::black_box;

fn signed_module() -> Vec<u8> {
    let key: Vec<u8> = (0..160u32).map(|i| i as u8).collect();

    (0..64)
        .fold(
            ModuleImageBuilder::new("Widgets.Bench")
                .version(4, 2, 0, 1)
                .public_key(&key, HashAlgorithm::SHA1),
            |builder, i| {
                builder
                    .reference(&format!("Widgets.Dependency{i}"), [1, 0, 0, 0])
                    .exported_type(
                        "Widgets.Bench",
                        &format!("Type{i}"),
                        0x0200_0002 + i,
                        Implementation::AssemblyRef(i + 1),
                    )
            },
        )
        .build()
}

/// Open, extract and close an in-memory module, the way `read_assembly_identity` does for files.
fn bench_extract(c: &mut Criterion) {
    let data = signed_module();

    let mut group = c.benchmark_group("identity");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("open_extract_close", |b| {
        b.iter_batched(
            || data.clone(),
            |data| {
                let scope = FileDispenser::new().open_bytes(data).unwrap();
                let identity = extract(&scope).unwrap();
                scope.close();
                black_box(identity)
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

/// Enumerate and resolve every reference of an already open scope.
fn bench_enumerate(c: &mut Criterion) {
    let scope = FileDispenser::new().open_bytes(signed_module()).unwrap();

    c.bench_function("enumerate_references", |b| {
        b.iter(|| {
            let names: Vec<String> = scope
                .enumerate(EnumKind::References)
                .unwrap()
                .map(|token| scope.get_assembly_ref_properties(token.unwrap()).unwrap().name)
                .collect();
            black_box(names)
        });
    });

    c.bench_function("find_exported_type_by_name", |b| {
        b.iter(|| {
            black_box(
                scope
                    .find_exported_type_by_name(black_box("Widgets.Bench.Type63"), None)
                    .unwrap(),
            )
        });
    });
}

criterion_group!(benches, bench_extract, bench_enumerate);
criterion_main!(benches);
