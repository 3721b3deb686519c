use volmesh_geom::{IVec3, Vec3};

/// Fully lit; the value every vertex gets when occlusion is disabled.
pub const AO_NONE: u8 = 3;

/// `normal_index` telling the renderer to use the mesh normal array instead of the palette.
pub const MESH_NORMAL: u8 = 255;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct VoxelVertex {
    pub position: Vec3,
    pub color_index: u8,
    pub normal_index: u8,
    /// 0 (fully occluded) ..= 3 (unoccluded).
    pub ambient_occlusion: u8,
    pub flags: u8,
}

/// Indexed triangle list. `normals` is either empty or parallel to `vertices`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<VoxelVertex>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
    offset: IVec3,
}

impl Mesh {
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Mesh {
            vertices: Vec::with_capacity(vertices),
            normals: Vec::new(),
            indices: Vec::with_capacity(indices),
            offset: IVec3::ZERO,
        }
    }

    #[inline]
    pub fn add_vertex(&mut self, v: VoxelVertex) -> u32 {
        self.vertices.push(v);
        (self.vertices.len() - 1) as u32
    }

    #[inline]
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Sets the normal of vertex `i`, growing the normal array to match the vertices.
    pub fn set_normal(&mut self, i: u32, n: Vec3) {
        if self.normals.len() < self.vertices.len() {
            self.normals.resize(self.vertices.len(), Vec3::ZERO);
        }
        if let Some(slot) = self.normals.get_mut(i as usize) {
            *slot = n;
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[VoxelVertex] {
        &self.vertices
    }

    #[inline]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn no_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn no_of_normals(&self) -> usize {
        self.normals.len()
    }

    #[inline]
    pub fn no_of_indices(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn offset(&self) -> IVec3 {
        self.offset
    }

    #[inline]
    pub fn set_offset(&mut self, offset: IVec3) {
        self.offset = offset;
    }

    /// Clears all arrays but retains capacity.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.normals.clear();
        self.indices.clear();
    }

    /// Drops excess capacity; extraction reserves generously.
    pub fn shrink_to_fit(&mut self) {
        self.vertices.shrink_to_fit();
        self.normals.shrink_to_fit();
        self.indices.shrink_to_fit();
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MeshType {
    Opaque = 0,
    Transparency = 1,
}

impl MeshType {
    pub const ALL: [MeshType; 2] = [MeshType::Opaque, MeshType::Transparency];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Opaque and transparent geometry of one extraction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    pub mesh: [Mesh; 2],
}

impl ChunkMesh {
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        ChunkMesh {
            mesh: [
                Mesh::with_capacity(vertices, indices),
                Mesh::with_capacity(vertices / 4, indices / 4),
            ],
        }
    }

    #[inline]
    pub fn get(&self, kind: MeshType) -> &Mesh {
        &self.mesh[kind.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, kind: MeshType) -> &mut Mesh {
        &mut self.mesh[kind.index()]
    }

    #[inline]
    pub fn opaque(&self) -> &Mesh {
        self.get(MeshType::Opaque)
    }

    #[inline]
    pub fn transparent(&self) -> &Mesh {
        self.get(MeshType::Transparency)
    }

    pub fn set_offset(&mut self, offset: IVec3) {
        for m in &mut self.mesh {
            m.set_offset(offset);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.iter().all(Mesh::is_empty)
    }

    pub fn clear(&mut self) {
        for m in &mut self.mesh {
            m.clear();
        }
    }

    pub fn shrink_to_fit(&mut self) {
        for m in &mut self.mesh {
            m.shrink_to_fit();
        }
    }

    /// Splits into owned `(opaque, transparent)` meshes.
    pub fn into_parts(self) -> (Mesh, Mesh) {
        let [opaque, transparent] = self.mesh;
        (opaque, transparent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_normal_grows_parallel_array() {
        let mut m = Mesh::default();
        let a = m.add_vertex(VoxelVertex::default());
        let b = m.add_vertex(VoxelVertex::default());
        m.set_normal(b, Vec3::UP);
        assert_eq!(m.no_of_normals(), 2);
        assert_eq!(m.normals()[a as usize], Vec3::ZERO);
        assert_eq!(m.normals()[b as usize], Vec3::UP);
    }

    #[test]
    fn chunk_mesh_parts() {
        let mut cm = ChunkMesh::default();
        assert!(cm.is_empty());
        let v = cm.get_mut(MeshType::Transparency).add_vertex(VoxelVertex::default());
        cm.get_mut(MeshType::Transparency).add_triangle(v, v, v);
        cm.set_offset(IVec3::splat(16));
        assert!(!cm.is_empty());
        let (opaque, transparent) = cm.into_parts();
        assert!(opaque.is_empty());
        assert_eq!(transparent.no_of_indices(), 3);
        assert_eq!(transparent.offset(), IVec3::splat(16));
    }
}
