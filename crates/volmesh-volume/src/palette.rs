use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use volmesh_geom::Vec3;

pub const PALETTE_MAX_COLORS: usize = 256;

/// 256 RGBA colors addressed by a voxel's color index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: [[u8; 4]; PALETTE_MAX_COLORS],
    hash: u64,
}

impl Default for Palette {
    fn default() -> Self {
        Palette::from_colors(default_colors())
    }
}

fn default_colors() -> [[u8; 4]; PALETTE_MAX_COLORS] {
    // 6x6x6 color cube followed by a 40 step gray ramp
    let mut colors = [[0u8, 0, 0, 255]; PALETTE_MAX_COLORS];
    let mut i = 0usize;
    for r in 0..6u32 {
        for g in 0..6u32 {
            for b in 0..6u32 {
                colors[i] = [(r * 51) as u8, (g * 51) as u8, (b * 51) as u8, 255];
                i += 1;
            }
        }
    }
    let ramp = PALETTE_MAX_COLORS - i;
    for step in 0..ramp {
        let v = (step * 255 / (ramp - 1)) as u8;
        colors[i + step] = [v, v, v, 255];
    }
    colors
}

impl Palette {
    pub fn from_colors(colors: [[u8; 4]; PALETTE_MAX_COLORS]) -> Self {
        let mut hasher = DefaultHasher::new();
        colors.hash(&mut hasher);
        Self {
            colors,
            hash: hasher.finish(),
        }
    }

    #[inline]
    pub fn color(&self, i: u8) -> [u8; 4] {
        self.colors[i as usize]
    }

    pub fn set_color(&mut self, i: u8, rgba: [u8; 4]) {
        self.colors[i as usize] = rgba;
        let mut hasher = DefaultHasher::new();
        self.colors.hash(&mut hasher);
        self.hash = hasher.finish();
    }

    #[inline]
    pub fn colors(&self) -> &[[u8; 4]; PALETTE_MAX_COLORS] {
        &self.colors
    }

    /// Index of the entry closest to `rgba` (squared distance, first match wins).
    pub fn closest_match(&self, rgba: [u8; 4]) -> u8 {
        let mut best = 0usize;
        let mut best_dist = u32::MAX;
        for (i, c) in self.colors.iter().enumerate() {
            let d: u32 = c
                .iter()
                .zip(rgba.iter())
                .map(|(a, b)| {
                    let diff = i32::from(*a) - i32::from(*b);
                    (diff * diff) as u32
                })
                .sum();
            if d < best_dist {
                best_dist = d;
                best = i;
                if d == 0 {
                    break;
                }
            }
        }
        best as u8
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }
}

/// 256 unit normals addressed by a voxel's normal index. Index 0 is unused.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalPalette {
    normals: Vec<Vec3>,
    hash: u64,
}

impl Default for NormalPalette {
    fn default() -> Self {
        // Fibonacci sphere; evenly spread directions
        let n = PALETTE_MAX_COLORS - 1;
        let golden = core::f32::consts::PI * (3.0 - 5.0f32.sqrt());
        let mut normals = Vec::with_capacity(PALETTE_MAX_COLORS);
        normals.push(Vec3::ZERO);
        for i in 0..n {
            let y = 1.0 - (i as f32 / (n - 1) as f32) * 2.0;
            let radius = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden * i as f32;
            normals.push(Vec3::new(theta.cos() * radius, y, theta.sin() * radius));
        }
        NormalPalette::from_normals(normals)
    }
}

impl NormalPalette {
    /// Builds a palette from up to 256 normals; missing entries are zero.
    pub fn from_normals(mut normals: Vec<Vec3>) -> Self {
        normals.resize(PALETTE_MAX_COLORS, Vec3::ZERO);
        let mut hasher = DefaultHasher::new();
        for n in &normals {
            n.x.to_bits().hash(&mut hasher);
            n.y.to_bits().hash(&mut hasher);
            n.z.to_bits().hash(&mut hasher);
        }
        Self {
            normals,
            hash: hasher.finish(),
        }
    }

    #[inline]
    pub fn normal(&self, i: u8) -> Vec3 {
        self.normals[i as usize]
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }
}
