//! Binary greedy meshing over 64-bit column masks.
//!
//! The region is tiled into blocks of at most [`CS`] voxels per axis. Each block is
//! copied with a one voxel apron so a column fits into a `u64`, faces fall out of
//! `col & !(col >> 1)` / `col & !(col << 1)`, and rows of equal faces are merged with
//! bit scans.

use hashbrown::HashMap;

use volmesh_geom::{IVec3, Region};
use volmesh_volume::{RawVolume, Voxel};

use crate::cubic::{compose, solid_for};
use crate::emit::{MeshSink, Quad, QuadSink, face_ao};
use crate::face::Face;
use crate::mesh::{AO_NONE, ChunkMesh, MeshType};

/// Interior block size; with the apron a column is 64 bits.
const CS: usize = 62;
const CS_P: usize = CS + 2;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct PlaneKey {
    slice: i32,
    voxel: Voxel,
    ao: [u8; 4],
}

/// Voxels of one block including the apron, x fastest.
struct PaddedBlock {
    lower: IVec3,
    dims: IVec3,
    voxels: Vec<Voxel>,
}

impl PaddedBlock {
    fn copy_from(volume: &RawVolume, block: &Region) -> Self {
        let dims = block.dimensions_in_voxels();
        let (px, py, pz) = (dims.x + 2, dims.y + 2, dims.z + 2);
        let mut voxels = Vec::with_capacity((px * py * pz) as usize);
        for y in 0..py {
            for z in 0..pz {
                for x in 0..px {
                    voxels.push(volume.voxel(block.lower + IVec3::new(x - 1, y - 1, z - 1)));
                }
            }
        }
        PaddedBlock {
            lower: block.lower,
            dims,
            voxels,
        }
    }

    /// Voxel at padded coordinates (0 is the apron below `lower`).
    #[inline]
    fn get(&self, p: IVec3) -> Voxel {
        let (px, pz) = (self.dims.x + 2, self.dims.z + 2);
        self.voxels[((p.y * pz + p.z) * px + p.x) as usize]
    }
}

pub fn extract_binary(
    volume: &RawVolume,
    region: &Region,
    translate: IVec3,
    ambient_occlusion: bool,
    out: &mut ChunkMesh,
) {
    if !region.is_valid() {
        return;
    }
    let shift = translate - region.lower;
    let mut planes = Planes::default();
    let step = CS as i32;
    let mut y = region.lower.y;
    while y <= region.upper.y {
        let mut z = region.lower.z;
        while z <= region.upper.z {
            let mut x = region.lower.x;
            while x <= region.upper.x {
                let lower = IVec3::new(x, y, z);
                let upper = (lower + IVec3::splat(step - 1)).min(region.upper);
                let block = PaddedBlock::copy_from(volume, &Region::new(lower, upper));
                for pass in MeshType::ALL {
                    let mut sink = MeshSink::new(out.get_mut(pass), shift, false);
                    for face in Face::ALL {
                        mesh_block_face(volume, &block, face, pass, ambient_occlusion, &mut planes);
                        planes.emit(&block, face, &mut sink);
                    }
                }
                x += step;
            }
            z += step;
        }
        y += step;
    }
}

/// Face bit-planes grouped by slice and appearance, in first-seen order.
#[derive(Default)]
struct Planes {
    index: HashMap<PlaneKey, usize>,
    rows: Vec<(PlaneKey, [u64; CS])>,
}

impl Planes {
    fn set(&mut self, key: PlaneKey, row: usize, bit: usize) {
        let i = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                self.rows.push((key, [0u64; CS]));
                self.index.insert(key, self.rows.len() - 1);
                self.rows.len() - 1
            }
        };
        self.rows[i].1[row] |= 1u64 << bit;
    }

    fn emit(&mut self, block: &PaddedBlock, face: Face, sink: &mut impl QuadSink) {
        let axis = face.axis();
        let (ua, va) = face.tangent_axes();
        let height = block.dims.axis(va) as usize;
        let plane_offset = if face.is_positive() { 1 } else { 0 };
        for (key, plane) in self.rows.iter_mut() {
            for row in 0..height {
                while plane[row] != 0 {
                    let u0 = plane[row].trailing_zeros();
                    let w = (plane[row] >> u0).trailing_ones();
                    let mask = ((1u64 << w) - 1) << u0;
                    plane[row] &= !mask;
                    let mut h = 1usize;
                    while row + h < height && plane[row + h] & mask == mask {
                        plane[row + h] &= !mask;
                        h += 1;
                    }
                    sink.emit_quad(&Quad {
                        face,
                        plane: block.lower.axis(axis) + key.slice + plane_offset,
                        u0: block.lower.axis(ua) + u0 as i32,
                        v0: block.lower.axis(va) + row as i32,
                        w: w as i32,
                        h: h as i32,
                        ao: key.ao,
                        voxel: key.voxel,
                    });
                }
            }
        }
        self.rows.clear();
        self.index.clear();
    }
}

fn mesh_block_face(
    volume: &RawVolume,
    block: &PaddedBlock,
    face: Face,
    pass: MeshType,
    ambient_occlusion: bool,
    planes: &mut Planes,
) {
    let axis = face.axis();
    let (ua, va) = face.tangent_axes();
    let depth = block.dims.axis(axis) as usize;
    let interior = (1u64 << depth) - 1;
    debug_assert!(depth + 2 <= CS_P);
    for v in 0..block.dims.axis(va) {
        for u in 0..block.dims.axis(ua) {
            let mut col = 0u64;
            for i in 0..(depth + 2) {
                let p = compose(face, i as i32, u + 1, v + 1);
                if solid_for(pass, &block.get(p)) {
                    col |= 1u64 << i;
                }
            }
            let faces = if face.is_positive() {
                col & !(col >> 1)
            } else {
                col & !(col << 1)
            };
            let mut faces = (faces >> 1) & interior;
            while faces != 0 {
                let s = faces.trailing_zeros() as i32;
                faces &= faces - 1;
                let local = compose(face, s, u, v);
                let voxel = block.get(local + IVec3::ONE);
                let ao = if ambient_occlusion {
                    face_ao(volume, block.lower + local, face)
                } else {
                    [AO_NONE; 4]
                };
                planes.set(
                    PlaneKey {
                        slice: s,
                        voxel,
                        ao,
                    },
                    v as usize,
                    u as usize,
                );
            }
        }
    }
}
