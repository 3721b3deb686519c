use hashbrown::HashMap;
use volmesh_geom::IVec3;
use volmesh_mesh_cpu::{Mesh, MeshType};

use crate::MAX_VOLUMES;

/// One optional mesh per slot, indexed by slot.
pub type Meshes = Vec<Option<Box<Mesh>>>;
/// Chunk minimum corner to the meshes of every slot in that chunk.
pub type MeshesMap = HashMap<IVec3, Meshes>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshCounts {
    pub vertices: usize,
    pub normals: usize,
    pub indices: usize,
}

#[derive(Default)]
pub(crate) struct MeshStore {
    maps: [MeshesMap; 2],
}

impl MeshStore {
    pub(crate) fn meshes(&self, kind: MeshType) -> &MeshesMap {
        &self.maps[kind.index()]
    }

    pub(crate) fn get(&self, kind: MeshType, mins: IVec3, idx: usize) -> Option<&Mesh> {
        self.maps[kind.index()]
            .get(&mins)
            .and_then(|slots| slots.get(idx))
            .and_then(|m| m.as_deref())
    }

    pub(crate) fn replace(&mut self, kind: MeshType, mins: IVec3, idx: usize, mesh: Mesh) {
        let slots = self.maps[kind.index()]
            .entry(mins)
            .or_insert_with(|| vec![None; MAX_VOLUMES]);
        slots[idx] = Some(Box::new(mesh));
    }

    /// Removes the meshes of slot `idx` in chunk `mins` from both maps.
    pub(crate) fn delete_at(&mut self, mins: IVec3, idx: usize) -> bool {
        let mut deleted = false;
        for map in &mut self.maps {
            if let Some(slots) = map.get_mut(&mins) {
                deleted |= slots[idx].take().is_some();
                if slots.iter().all(Option::is_none) {
                    map.remove(&mins);
                }
            }
        }
        deleted
    }

    /// Removes every mesh of slot `idx` from both maps.
    pub(crate) fn delete_slot(&mut self, idx: usize) -> bool {
        let mut deleted = false;
        for map in &mut self.maps {
            map.retain(|_, slots| {
                deleted |= slots[idx].take().is_some();
                slots.iter().any(Option::is_some)
            });
        }
        deleted
    }

    pub(crate) fn clear(&mut self) {
        for map in &mut self.maps {
            map.clear();
        }
    }

    pub(crate) fn count(&self, kind: MeshType, idx: usize) -> MeshCounts {
        let mut counts = MeshCounts::default();
        for slots in self.maps[kind.index()].values() {
            let Some(mesh) = slots.get(idx).and_then(|m| m.as_deref()) else {
                continue;
            };
            if mesh.is_empty() {
                continue;
            }
            counts.vertices += mesh.no_of_vertices();
            counts.normals += mesh.no_of_normals();
            counts.indices += mesh.no_of_indices();
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volmesh_mesh_cpu::VoxelVertex;

    fn triangle() -> Mesh {
        let mut m = Mesh::default();
        let a = m.add_vertex(VoxelVertex::default());
        let b = m.add_vertex(VoxelVertex::default());
        let c = m.add_vertex(VoxelVertex::default());
        m.add_triangle(a, b, c);
        m
    }

    #[test]
    fn replace_then_delete() {
        let mut store = MeshStore::default();
        let mins = IVec3::splat(16);
        store.replace(MeshType::Opaque, mins, 2, triangle());
        store.replace(MeshType::Opaque, mins, 2, triangle());
        store.replace(MeshType::Transparency, mins, 3, triangle());
        assert_eq!(store.count(MeshType::Opaque, 2).indices, 3);
        assert!(store.get(MeshType::Opaque, mins, 3).is_none());
        assert!(store.delete_at(mins, 2));
        assert!(store.meshes(MeshType::Opaque).is_empty());
        assert_eq!(store.meshes(MeshType::Transparency).len(), 1);
        assert!(!store.delete_at(mins, 2));
        assert!(store.delete_slot(3));
        assert!(store.meshes(MeshType::Transparency).is_empty());
    }

    #[test]
    fn empty_meshes_do_not_count() {
        let mut store = MeshStore::default();
        store.replace(MeshType::Opaque, IVec3::ZERO, 0, Mesh::default());
        store.replace(MeshType::Opaque, IVec3::splat(8), 0, triangle());
        assert_eq!(
            store.count(MeshType::Opaque, 0),
            MeshCounts {
                vertices: 3,
                normals: 0,
                indices: 3
            }
        );
    }
}
