use hashbrown::HashMap;

use volmesh_geom::{IVec3, Region, Vec3};
use volmesh_volume::{Palette, RawVolume, Voxel};

use crate::face::axis_step;
use crate::mesh::{AO_NONE, ChunkMesh, MESH_NORMAL, Mesh, MeshType, VoxelVertex};
use crate::tables::{CORNER_OFFSETS, EDGE_CONNECTIONS, EDGE_TABLE, TRI_TABLE};

const MAX_DENSITY: f32 = 255.0;
const DENSITY_THRESHOLD: f32 = MAX_DENSITY / 2.0;

#[inline]
fn density(voxel: &Voxel) -> f32 {
    if voxel.is_air() { 0.0 } else { MAX_DENSITY }
}

/// Central difference of the density field; points from solid towards air.
fn gradient(volume: &RawVolume, p: IVec3) -> Vec3 {
    let d = |x: i32, y: i32, z: i32| density(&volume.voxel(p + IVec3::new(x, y, z)));
    Vec3::new(
        d(-1, 0, 0) - d(1, 0, 0),
        d(0, -1, 0) - d(0, 1, 0),
        d(0, 0, -1) - d(0, 0, 1),
    )
}

/// Material of a surface vertex between `a` and `b`.
pub(crate) fn blend_materials(palette: &Palette, a: Voxel, b: Voxel, t: f32) -> Voxel {
    if a.is_air() {
        return b;
    }
    if b.is_air() {
        return a;
    }
    let ca = palette.color(a.color);
    let cb = palette.color(b.color);
    let mut mixed = [0u8; 4];
    for i in 0..4 {
        let v = f32::from(ca[i]) + (f32::from(cb[i]) - f32::from(ca[i])) * t;
        mixed[i] = v.round().clamp(0.0, 255.0) as u8;
    }
    let mut out = a;
    out.color = palette.closest_match(mixed);
    out
}

/// Smooth surface at the solid/air boundary. Every cell whose upper corner lies in
/// `region` is polygonized, so adjacent regions partition the surface without overlap.
/// Only the opaque mesh is written.
pub fn extract_marching_cubes(
    volume: &RawVolume,
    region: &Region,
    palette: &Palette,
    translate: IVec3,
    out: &mut ChunkMesh,
) {
    if !region.is_valid() {
        return;
    }
    let shift = translate - region.lower;
    let mesh = out.get_mut(MeshType::Opaque);
    let mut edge_vertices: HashMap<(IVec3, usize), u32> = HashMap::new();
    for z in (region.lower.z - 1)..region.upper.z {
        for y in (region.lower.y - 1)..region.upper.y {
            for x in (region.lower.x - 1)..region.upper.x {
                polygonize_cell(
                    volume,
                    palette,
                    IVec3::new(x, y, z),
                    shift,
                    mesh,
                    &mut edge_vertices,
                );
            }
        }
    }
}

fn polygonize_cell(
    volume: &RawVolume,
    palette: &Palette,
    cell: IVec3,
    shift: IVec3,
    mesh: &mut Mesh,
    edge_vertices: &mut HashMap<(IVec3, usize), u32>,
) {
    let corners = CORNER_OFFSETS.map(|[x, y, z]| cell + IVec3::new(x, y, z));
    let voxels = corners.map(|p| volume.voxel(p));
    let mut cube_index = 0usize;
    for (i, v) in voxels.iter().enumerate() {
        if density(v) < DENSITY_THRESHOLD {
            cube_index |= 1 << i;
        }
    }
    let edges = EDGE_TABLE[cube_index];
    if edges == 0 {
        return;
    }

    let mut ids = [0u32; 12];
    for (e, [c0, c1]) in EDGE_CONNECTIONS.iter().copied().enumerate() {
        if edges & (1 << e) == 0 {
            continue;
        }
        // Orient every edge from its lower to its upper endpoint so neighbours share it
        let (lo, hi) = if corners[c0] <= corners[c1] { (c0, c1) } else { (c1, c0) };
        let (plo, phi) = (corners[lo], corners[hi]);
        let axis = (0..3).find(|&a| plo.axis(a) != phi.axis(a)).unwrap_or(0);
        let key = (plo, axis);
        ids[e] = match edge_vertices.get(&key) {
            Some(&id) => id,
            None => {
                let id = generate_vertex(volume, palette, plo, axis, voxels[lo], voxels[hi], shift, mesh);
                edge_vertices.insert(key, id);
                id
            }
        };
    }

    for tri in TRI_TABLE[cube_index].chunks_exact(3) {
        if tri[0] < 0 {
            break;
        }
        mesh.add_triangle(ids[tri[0] as usize], ids[tri[1] as usize], ids[tri[2] as usize]);
    }
}

#[allow(clippy::too_many_arguments)]
fn generate_vertex(
    volume: &RawVolume,
    palette: &Palette,
    lower: IVec3,
    axis: usize,
    v_lower: Voxel,
    v_upper: Voxel,
    shift: IVec3,
    mesh: &mut Mesh,
) -> u32 {
    let upper = lower + axis_step(axis);
    let d_lower = density(&v_lower);
    let d_upper = density(&v_upper);
    let t = ((DENSITY_THRESHOLD - d_lower) / (d_upper - d_lower)).clamp(0.0, 1.0);

    let normal = gradient(volume, lower).lerp(gradient(volume, upper), t);
    // Zero for e.g. a checkerboard of solid and empty voxels
    let normal = if normal.dot(normal) > 1e-6 { normal.normalized() } else { normal };

    let material = blend_materials(palette, v_lower, v_upper, t);
    let mut position = Vec3::from(lower + shift);
    match axis {
        0 => position.x += t,
        1 => position.y += t,
        _ => position.z += t,
    }
    let id = mesh.add_vertex(VoxelVertex {
        position,
        color_index: material.color,
        normal_index: MESH_NORMAL,
        ambient_occlusion: AO_NONE,
        flags: material.flags,
    });
    mesh.set_normal(id, normal);
    id
}
