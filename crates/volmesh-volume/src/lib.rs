//! Voxel storage and lookup tables (engine-only, no meshing).
#![forbid(unsafe_code)]

mod palette;
mod voxel;

pub use palette::{NormalPalette, PALETTE_MAX_COLORS, Palette};
pub use voxel::{NO_NORMAL, Voxel, VoxelType};

use volmesh_geom::{IVec3, Region};

/// Dense voxel storage covering an inclusive region.
#[derive(Clone, Debug)]
pub struct RawVolume {
    region: Region,
    sx: usize,
    sy: usize,
    sz: usize,
    voxels: Vec<Voxel>,
}

impl RawVolume {
    /// Creates an all-air volume. An invalid region yields an empty volume.
    pub fn new(region: Region) -> Self {
        let (sx, sy, sz) = if region.is_valid() {
            (
                region.width_in_voxels() as usize,
                region.height_in_voxels() as usize,
                region.depth_in_voxels() as usize,
            )
        } else {
            (0, 0, 0)
        };
        RawVolume {
            region,
            sx,
            sy,
            sz,
            voxels: vec![Voxel::AIR; sx * sy * sz],
        }
    }

    /// Wraps y-major `voxels`; `None` unless there is exactly one per voxel of `region`.
    pub fn from_voxels(region: Region, voxels: Vec<Voxel>) -> Option<Self> {
        let mut v = RawVolume::new(region);
        if voxels.len() != v.voxels.len() {
            return None;
        }
        v.voxels = voxels;
        Some(v)
    }

    #[inline]
    pub fn region(&self) -> Region {
        self.region
    }

    #[inline]
    fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    fn local(&self, pos: IVec3) -> Option<usize> {
        if !self.region.contains_point(pos) {
            return None;
        }
        let l = pos - self.region.lower;
        Some(self.idx(l.x as usize, l.y as usize, l.z as usize))
    }

    /// Voxel at `pos`; positions outside the region read as air.
    #[inline]
    pub fn voxel(&self, pos: IVec3) -> Voxel {
        match self.local(pos) {
            Some(i) => self.voxels[i],
            None => Voxel::AIR,
        }
    }

    #[inline]
    pub fn voxel_at(&self, x: i32, y: i32, z: i32) -> Voxel {
        self.voxel(IVec3::new(x, y, z))
    }

    /// Returns false when `pos` lies outside the volume.
    pub fn set_voxel(&mut self, pos: IVec3, voxel: Voxel) -> bool {
        match self.local(pos) {
            Some(i) => {
                self.voxels[i] = voxel;
                true
            }
            None => false,
        }
    }

    /// Fills the part of `region` that lies inside the volume.
    pub fn fill(&mut self, region: &Region, voxel: Voxel) {
        let r = self.region.intersection(region);
        if !r.is_valid() {
            return;
        }
        for y in r.lower.y..=r.upper.y {
            for z in r.lower.z..=r.upper.z {
                for x in r.lower.x..=r.upper.x {
                    self.set_voxel(IVec3::new(x, y, z), voxel);
                }
            }
        }
    }

    /// Snapshot of `region` as a new volume; positions outside `self` read as air.
    pub fn copy_region(&self, region: &Region) -> RawVolume {
        let mut out = RawVolume::new(*region);
        if !region.is_valid() {
            return out;
        }
        for y in region.lower.y..=region.upper.y {
            for z in region.lower.z..=region.upper.z {
                for x in region.lower.x..=region.upper.x {
                    let p = IVec3::new(x, y, z);
                    out.set_voxel(p, self.voxel(p));
                }
            }
        }
        out
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.voxels.iter().any(|v| !v.is_air())
    }

    #[inline]
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }
}
