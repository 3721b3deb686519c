use hashbrown::HashMap;

use volmesh_geom::{IVec3, Vec3};
use volmesh_volume::{RawVolume, Voxel};

use crate::face::{Face, axis_step};
use crate::mesh::{Mesh, VoxelVertex};

/// Face-aligned rectangle in voxel space. `ao` follows the corner order
/// `(u0,v0) (u0+w,v0) (u0+w,v0+h) (u0,v0+h)`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Quad {
    pub face: Face,
    /// Coordinate of the face plane along the face axis.
    pub plane: i32,
    pub u0: i32,
    pub v0: i32,
    pub w: i32,
    pub h: i32,
    pub ao: [u8; 4],
    pub voxel: Voxel,
}

impl Quad {
    pub fn corners(&self) -> [IVec3; 4] {
        let (ua, va) = self.face.tangent_axes();
        let axis = self.face.axis();
        let plane = self.plane;
        let at = |u: i32, v: i32| {
            let mut p = IVec3::ZERO;
            p.set_axis(axis, plane);
            p.set_axis(ua, u);
            p.set_axis(va, v);
            p
        };
        [
            at(self.u0, self.v0),
            at(self.u0 + self.w, self.v0),
            at(self.u0 + self.w, self.v0 + self.h),
            at(self.u0, self.v0 + self.h),
        ]
    }
}

/// Occlusion level of one quad corner from its two edge neighbors and the diagonal.
#[inline]
pub(crate) fn vertex_ao(side1: bool, side2: bool, corner: bool) -> u8 {
    if side1 && side2 {
        0
    } else {
        3 - (side1 as u8 + side2 as u8 + corner as u8)
    }
}

/// Per-corner occlusion of the `face` of the voxel at `pos`, sampled in the layer in front of it.
pub(crate) fn face_ao(volume: &RawVolume, pos: IVec3, face: Face) -> [u8; 4] {
    let (ua, va) = face.tangent_axes();
    let du = axis_step(ua);
    let dv = axis_step(va);
    let front = pos + face.delta();
    let occ = |p: IVec3| volume.voxel(p).is_opaque();
    let corner = |su: i32, sv: i32| {
        let s1 = occ(front + du * su);
        let s2 = occ(front + dv * sv);
        let c = occ(front + du * su + dv * sv);
        vertex_ao(s1, s2, c)
    };
    [corner(-1, -1), corner(1, -1), corner(1, 1), corner(-1, 1)]
}

pub(crate) trait QuadSink {
    fn emit_quad(&mut self, quad: &Quad);
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct VertexKey {
    pos: IVec3,
    color: u8,
    normal: u8,
    ao: u8,
    flags: u8,
}

/// Writes quads into a mesh, translating voxel positions by `shift`.
/// With vertex reuse enabled, identical corners share one vertex.
pub(crate) struct MeshSink<'a> {
    mesh: &'a mut Mesh,
    shift: IVec3,
    lookup: Option<HashMap<VertexKey, u32>>,
}

impl<'a> MeshSink<'a> {
    pub fn new(mesh: &'a mut Mesh, shift: IVec3, reuse_vertices: bool) -> Self {
        MeshSink {
            mesh,
            shift,
            lookup: reuse_vertices.then(HashMap::new),
        }
    }

    fn vertex(&mut self, pos: IVec3, ao: u8, voxel: &Voxel) -> u32 {
        let vertex = VoxelVertex {
            position: Vec3::from(pos + self.shift),
            color_index: voxel.color,
            normal_index: voxel.normal,
            ambient_occlusion: ao,
            flags: voxel.flags,
        };
        let MeshSink { mesh, lookup, .. } = self;
        match lookup {
            Some(lookup) => {
                let key = VertexKey {
                    pos,
                    color: voxel.color,
                    normal: voxel.normal,
                    ao,
                    flags: voxel.flags,
                };
                *lookup.entry(key).or_insert_with(|| mesh.add_vertex(vertex))
            }
            None => mesh.add_vertex(vertex),
        }
    }
}

impl QuadSink for MeshSink<'_> {
    fn emit_quad(&mut self, quad: &Quad) {
        let corners = quad.corners();
        let p = corners.map(Vec3::from);
        let mut order = [0usize, 1, 2, 3];
        // Counter-clockwise when seen from the side the normal points to
        if (p[1] - p[0]).cross(p[2] - p[0]).dot(quad.face.normal()) < 0.0 {
            order.swap(1, 3);
        }
        let ids = order.map(|i| self.vertex(corners[i], quad.ao[i], &quad.voxel));
        let ao = order.map(|i| u32::from(quad.ao[i]));
        // Split along the brighter diagonal so occlusion interpolates evenly
        if ao[1] + ao[3] > ao[0] + ao[2] {
            self.mesh.add_triangle(ids[0], ids[1], ids[3]);
            self.mesh.add_triangle(ids[1], ids[2], ids[3]);
        } else {
            self.mesh.add_triangle(ids[0], ids[1], ids[2]);
            self.mesh.add_triangle(ids[0], ids[2], ids[3]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volmesh_geom::Region;

    #[test]
    fn ao_levels() {
        assert_eq!(vertex_ao(false, false, false), 3);
        assert_eq!(vertex_ao(false, false, true), 2);
        assert_eq!(vertex_ao(true, false, true), 1);
        assert_eq!(vertex_ao(true, true, false), 0);
    }

    #[test]
    fn face_ao_sees_neighbors_in_front() {
        let mut v = RawVolume::new(Region::cube(-2, 2));
        v.set_voxel(IVec3::ZERO, Voxel::solid(1));
        // Above and to +x of the voxel, touching the top face's +x edge
        v.set_voxel(IVec3::new(1, 1, 0), Voxel::solid(1));
        let ao = face_ao(&v, IVec3::ZERO, Face::PosY);
        // PosY tangents are (x, z): corners at +x get occluded
        assert_eq!(ao, [3, 2, 2, 3]);
        assert_eq!(face_ao(&v, IVec3::ZERO, Face::NegY), [3, 3, 3, 3]);
    }

    #[test]
    fn reused_vertices_are_shared() {
        let mut mesh = Mesh::default();
        let mut sink = MeshSink::new(&mut mesh, IVec3::ZERO, true);
        let quad = Quad {
            face: Face::PosY,
            plane: 1,
            u0: 0,
            v0: 0,
            w: 1,
            h: 1,
            ao: [3; 4],
            voxel: Voxel::solid(5),
        };
        sink.emit_quad(&quad);
        sink.emit_quad(&Quad { u0: 1, ..quad });
        assert_eq!(mesh.no_of_vertices(), 6);
        assert_eq!(mesh.no_of_indices(), 12);
    }
}
