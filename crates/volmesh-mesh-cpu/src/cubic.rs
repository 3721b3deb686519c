use volmesh_geom::{IVec3, Region};
use volmesh_volume::{RawVolume, Voxel};

use crate::emit::{MeshSink, Quad, QuadSink, face_ao};
use crate::face::Face;
use crate::mesh::{AO_NONE, ChunkMesh, MeshType};

#[derive(Clone, Copy, Debug)]
pub struct CubicOptions {
    pub merge_quads: bool,
    pub reuse_vertices: bool,
    pub ambient_occlusion: bool,
}

impl Default for CubicOptions {
    fn default() -> Self {
        CubicOptions {
            merge_quads: true,
            reuse_vertices: true,
            ambient_occlusion: true,
        }
    }
}

/// Whether `voxel` counts as filled for the given output mesh.
#[inline]
pub(crate) fn solid_for(pass: MeshType, voxel: &Voxel) -> bool {
    match pass {
        MeshType::Opaque => voxel.is_opaque(),
        MeshType::Transparency => voxel.is_transparent(),
    }
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    voxel: Voxel,
    ao: [u8; 4],
}

#[inline]
pub(crate) fn compose(face: Face, along: i32, u: i32, v: i32) -> IVec3 {
    let (ua, va) = face.tangent_axes();
    let mut p = IVec3::ZERO;
    p.set_axis(face.axis(), along);
    p.set_axis(ua, u);
    p.set_axis(va, v);
    p
}

/// Greedy cubic meshing: one quad per maximal rectangle of equal faces in every slice.
pub fn extract_cubic(
    volume: &RawVolume,
    region: &Region,
    translate: IVec3,
    opts: CubicOptions,
    out: &mut ChunkMesh,
) {
    if !region.is_valid() {
        return;
    }
    let shift = translate - region.lower;
    let mut cells: Vec<Option<Cell>> = Vec::new();
    for pass in MeshType::ALL {
        let mut sink = MeshSink::new(out.get_mut(pass), shift, opts.reuse_vertices);
        for face in Face::ALL {
            emit_face_slices(volume, region, face, pass, opts, &mut cells, &mut sink);
        }
    }
}

fn emit_face_slices(
    volume: &RawVolume,
    region: &Region,
    face: Face,
    pass: MeshType,
    opts: CubicOptions,
    cells: &mut Vec<Option<Cell>>,
    sink: &mut impl QuadSink,
) {
    let axis = face.axis();
    let (ua, va) = face.tangent_axes();
    let dims = region.dimensions_in_voxels();
    let width = dims.axis(ua) as usize;
    let height = dims.axis(va) as usize;
    let u_base = region.lower.axis(ua);
    let v_base = region.lower.axis(va);
    let delta = face.delta();
    let plane_offset = if face.is_positive() { 1 } else { 0 };
    cells.clear();
    cells.resize(width * height, None);

    for s in region.lower.axis(axis)..=region.upper.axis(axis) {
        let mut any = false;
        for v in 0..height {
            for u in 0..width {
                let pos = compose(face, s, u_base + u as i32, v_base + v as i32);
                let back = volume.voxel(pos);
                let cell = if solid_for(pass, &back) && !solid_for(pass, &volume.voxel(pos + delta)) {
                    any = true;
                    let ao = if opts.ambient_occlusion {
                        face_ao(volume, pos, face)
                    } else {
                        [AO_NONE; 4]
                    };
                    Some(Cell { voxel: back, ao })
                } else {
                    None
                };
                cells[v * width + u] = cell;
            }
        }
        if !any {
            continue;
        }

        let idx2d = |u: usize, v: usize| v * width + u;
        let mut v = 0usize;
        while v < height {
            let mut u = 0usize;
            while u < width {
                let Some(cell) = cells[idx2d(u, v)] else {
                    u += 1;
                    continue;
                };
                let mut run_w = 1usize;
                let mut run_h = 1usize;
                if opts.merge_quads {
                    while u + run_w < width && cells[idx2d(u + run_w, v)] == Some(cell) {
                        run_w += 1;
                    }
                    'outer: while v + run_h < height {
                        for uu in u..(u + run_w) {
                            if cells[idx2d(uu, v + run_h)] != Some(cell) {
                                break 'outer;
                            }
                        }
                        run_h += 1;
                    }
                }
                for dv in 0..run_h {
                    for du in 0..run_w {
                        cells[idx2d(u + du, v + dv)] = None;
                    }
                }
                sink.emit_quad(&Quad {
                    face,
                    plane: s + plane_offset,
                    u0: u_base + u as i32,
                    v0: v_base + v as i32,
                    w: run_w as i32,
                    h: run_h as i32,
                    ao: cell.ao,
                    voxel: cell.voxel,
                });
                u += run_w;
            }
            v += 1;
        }
    }
}
