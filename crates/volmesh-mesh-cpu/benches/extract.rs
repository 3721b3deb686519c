use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use volmesh_geom::{IVec3, Region};
use volmesh_mesh_cpu::{ChunkMesh, SurfaceExtractionType, create_context, extract_surface};
use volmesh_volume::{Palette, RawVolume, Voxel};

const SIZE: i32 = 62;

fn make_sphere() -> RawVolume {
    let region = Region::cube(0, SIZE - 1);
    let mut v = RawVolume::new(region);
    let c = SIZE / 2;
    let r2 = (SIZE / 2 - 2) * (SIZE / 2 - 2);
    for y in 0..SIZE {
        for z in 0..SIZE {
            for x in 0..SIZE {
                let d = (x - c) * (x - c) + (y - c) * (y - c) + (z - c) * (z - c);
                if d <= r2 {
                    let color = ((x + y + z) % 8) as u8;
                    v.set_voxel(IVec3::new(x, y, z), Voxel::solid(color));
                }
            }
        }
    }
    v
}

fn make_checker() -> RawVolume {
    let region = Region::cube(0, 31);
    let mut v = RawVolume::new(region);
    for y in 0..32 {
        for z in 0..32 {
            for x in 0..32 {
                if (x + y + z) % 2 == 0 {
                    v.set_voxel(IVec3::new(x, y, z), Voxel::solid(1));
                } else if (x * y) % 5 == 0 {
                    v.set_voxel(IVec3::new(x, y, z), Voxel::glass(2));
                }
            }
        }
    }
    v
}

fn bench_kind(c: &mut Criterion, name: &str, volume: &RawVolume) {
    let mut group = c.benchmark_group(name);
    let pal = Palette::default();
    let region = volume.region();
    for kind in SurfaceExtractionType::ALL {
        group.bench_function(kind.as_str(), |b| {
            b.iter(|| {
                let ctx = create_context(kind, volume, region, &pal, region.lower);
                let mut mesh = ChunkMesh::default();
                extract_surface(&ctx, &mut mesh);
                black_box(mesh);
            })
        });
    }
    group.finish();
}

fn bench_sphere(c: &mut Criterion) {
    let v = make_sphere();
    bench_kind(c, "extract_sphere_62", &v);
}

fn bench_checker(c: &mut Criterion) {
    let v = make_checker();
    bench_kind(c, "extract_checker_32", &v);
}

fn configure() -> Criterion {
    Criterion::default()
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = configure();
    targets = bench_sphere, bench_checker
}
criterion_main!(benches);
