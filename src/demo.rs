use std::sync::Arc;

use fastnoise_lite::{FastNoiseLite, NoiseType};
use volmesh_geom::{IVec3, Region};
use volmesh_volume::{RawVolume, Voxel};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DemoKind {
    Sphere,
    Terrain,
    GlassShell,
}

impl DemoKind {
    const ORDER: [DemoKind; 3] = [DemoKind::Sphere, DemoKind::Terrain, DemoKind::GlassShell];

    pub fn name(self) -> &'static str {
        match self {
            DemoKind::Sphere => "sphere",
            DemoKind::Terrain => "terrain",
            DemoKind::GlassShell => "glass-shell",
        }
    }
}

pub struct DemoVolume {
    pub kind: DemoKind,
    pub volume: Arc<RawVolume>,
}

/// `count` volumes of edge `size`, cycling through the demo kinds.
pub fn build_volumes(count: usize, size: i32, seed: i32) -> Vec<DemoVolume> {
    let size = size.max(4);
    (0..count)
        .map(|i| {
            let kind = DemoKind::ORDER[i % DemoKind::ORDER.len()];
            let volume = match kind {
                DemoKind::Sphere => sphere(size),
                DemoKind::Terrain => terrain(size, seed.wrapping_add(i as i32)),
                DemoKind::GlassShell => glass_shell(size),
            };
            DemoVolume {
                kind,
                volume: Arc::new(volume),
            }
        })
        .collect()
}

fn sphere(size: i32) -> RawVolume {
    let region = Region::cube(0, size - 1);
    let mut v = RawVolume::new(region);
    let c = (size - 1) as f32 * 0.5;
    let r = c - 1.0;
    for y in 0..size {
        for z in 0..size {
            for x in 0..size {
                let (dx, dy, dz) = (x as f32 - c, y as f32 - c, z as f32 - c);
                let d = (dx * dx + dy * dy + dz * dz).sqrt();
                if d <= r {
                    // Concentric color bands
                    let color = 16 + ((d / r * 6.0) as u8).min(5) * 6;
                    v.set_voxel(IVec3::new(x, y, z), Voxel::solid(color));
                }
            }
        }
    }
    v
}

fn terrain(size: i32, seed: i32) -> RawVolume {
    let region = Region::cube(0, size - 1);
    let mut v = RawVolume::new(region);
    let mut noise = FastNoiseLite::with_seed(seed);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(0.025));
    let water = size / 3;
    for z in 0..size {
        for x in 0..size {
            let n = (noise.get_noise_2d(x as f32, z as f32) + 1.0) * 0.5;
            let height = (size as f32 * (0.15 + 0.6 * n)) as i32;
            for y in 0..size {
                let voxel = if y <= height {
                    let depth = height - y;
                    Voxel::solid(match depth {
                        0 if height <= water + 1 => 180,
                        0 => 60,
                        1..=3 => 130,
                        _ => 215,
                    })
                } else if y <= water {
                    Voxel::glass(38)
                } else {
                    continue;
                };
                v.set_voxel(IVec3::new(x, y, z), voxel);
            }
        }
    }
    v
}

fn glass_shell(size: i32) -> RawVolume {
    let region = Region::cube(0, size - 1);
    let mut v = RawVolume::new(region);
    v.fill(&region.grow(-1), Voxel::glass(100));
    v.fill(&region.grow(-3), Voxel::AIR);
    // Opaque core
    let q = size / 4;
    v.fill(&Region::cube(q + 1, size - q - 2), Voxel::solid(200));
    v
}
