use std::sync::Arc;

use proptest::prelude::*;
use volmesh_geom::{IVec3, Region};
use volmesh_mesh_cpu::MeshType;
use volmesh_runtime::{MAX_VOLUMES, MeshState, MeshStateConfig};
use volmesh_volume::{RawVolume, Voxel};

fn state(mesh_size: i32) -> MeshState {
    MeshState::new(MeshStateConfig {
        mesh_size,
        workers: Some(1),
        ..MeshStateConfig::default()
    })
    .unwrap()
}

fn arb_region(lo: i32, hi: i32, max_extent: i32) -> impl Strategy<Value = Region> {
    (
        (lo..hi, lo..hi, lo..hi),
        (0..max_extent, 0..max_extent, 0..max_extent),
    )
        .prop_map(|((x, y, z), (w, h, d))| Region::new(IVec3::new(x, y, z), IVec3::new(x + w, y + h, z + d)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn resolve_is_idempotent(
        links in prop::collection::vec((0usize..16, prop::option::of(0usize..20)), 0..24),
        probe in 0usize..MAX_VOLUMES,
    ) {
        let mut ms = state(16);
        for (idx, target) in links {
            ms.set_reference(idx, target);
        }
        for idx in (0..20).chain(std::iter::once(probe)) {
            let r = ms.resolve_idx(idx);
            prop_assert!(r < MAX_VOLUMES);
            prop_assert_eq!(ms.resolve_idx(r), r);
        }
    }

    #[test]
    fn mesh_keys_are_chunk_aligned(
        volume_region in arb_region(-24, 24, 12),
        modified in arb_region(-30, 30, 20),
        size in 4i32..20,
    ) {
        let mut v = RawVolume::new(volume_region);
        v.fill(&volume_region, Voxel::solid(1));
        let mut ms = state(size);
        ms.set_volume(0, Some(Arc::new(v)), None, None, true);
        ms.schedule_region_extraction(0, &modified);
        ms.extract_all_pending();
        while ms.pop().is_some() {}
        for kind in MeshType::ALL {
            for mins in ms.meshes(kind).keys() {
                prop_assert_eq!(mins.x.rem_euclid(size), 0);
                prop_assert_eq!(mins.y.rem_euclid(size), 0);
                prop_assert_eq!(mins.z.rem_euclid(size), 0);
                let mesh = ms.mesh(kind, *mins, 0);
                prop_assert!(mesh.is_some_and(|m| m.offset() == *mins));
            }
        }
    }

    // The chunk holding a modified voxel always gets a fresh mesh
    #[test]
    fn modified_voxel_chunk_is_extracted(
        p in (-30i32..30, -30i32..30, -30i32..30),
        size in 4i32..20,
    ) {
        let volume_region = Region::cube(-40, 40);
        let mut ms = state(size);
        ms.set_volume(0, Some(Arc::new(RawVolume::new(volume_region))), None, None, true);
        let voxel = IVec3::new(p.0, p.1, p.2);
        ms.schedule_region_extraction(0, &Region::new(voxel, voxel));
        prop_assert!(ms.pending_extractions() >= 1);
        prop_assert!(ms.pending_extractions() <= 8);
        ms.extract_all_pending();
        while ms.pop().is_some() {}
        let chunk = IVec3::new(
            voxel.x.div_euclid(size),
            voxel.y.div_euclid(size),
            voxel.z.div_euclid(size),
        ) * size;
        prop_assert!(ms.mesh(MeshType::Opaque, chunk, 0).is_some());
    }
}
