use amxd_format::patcher::{to_pretty_string, PrettyStyle};
use amxd_format::{assemble, unwrap_container, ChunkScanner, DeviceCode};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};

fn create_patcher(box_count: usize) -> Vec<u8> {
    let boxes: Vec<Value> = (0..box_count)
        .map(|i| {
            json!({
                "box": {
                    "id": format!("obj-{}", i),
                    "maxclass": if i % 2 == 0 { "newobj" } else { "comment" },
                    "numinlets": 2,
                    "numoutlets": 1,
                    "patching_rect": [10.0 + i as f64, 20.0, 80.0, 22.0],
                    "text": format!("live.dial param_{}", i)
                }
            })
        })
        .collect();

    serde_json::to_vec(&json!({
        "patcher": {
            "fileversion": 1,
            "appversion": { "major": 8, "minor": 6 },
            "boxes": boxes,
            "lines": []
        }
    }))
    .unwrap()
}

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");

    for box_count in [10, 1000] {
        let json = create_patcher(box_count);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}boxes", box_count)),
            &json,
            |b, json| b.iter(|| black_box(assemble(black_box(json), DeviceCode::default()).unwrap())),
        );
    }

    group.finish();
}

fn bench_unwrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("unwrap");

    for box_count in [10, 1000] {
        let container = assemble(&create_patcher(box_count), DeviceCode::default()).unwrap();

        group.bench_with_input(
            BenchmarkId::new("scan", format!("{}boxes", box_count)),
            &container,
            |b, container| b.iter(|| black_box(ChunkScanner::new(black_box(container)).count())),
        );

        group.bench_with_input(
            BenchmarkId::new("unwrap_pretty", format!("{}boxes", box_count)),
            &container,
            |b, container| {
                b.iter(|| {
                    let unwrapped = unwrap_container(black_box(container)).unwrap();
                    black_box(to_pretty_string(&unwrapped.patcher, PrettyStyle::Utf8).unwrap())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_assemble, bench_unwrap);
criterion_main!(benches);
