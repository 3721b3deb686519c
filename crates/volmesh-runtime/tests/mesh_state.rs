use std::sync::Arc;

use volmesh_geom::{IVec3, Region};
use volmesh_mesh_cpu::{MeshType, SurfaceExtractionType};
use volmesh_runtime::{MAX_VOLUMES, MeshState, MeshStateConfig};
use volmesh_volume::{RawVolume, Voxel};

fn state(mesh_size: i32) -> MeshState {
    MeshState::new(MeshStateConfig {
        mesh_size,
        workers: Some(2),
        ..MeshStateConfig::default()
    })
    .unwrap()
}

fn sphere(size: i32) -> Arc<RawVolume> {
    let region = Region::cube(0, size - 1);
    let mut v = RawVolume::new(region);
    let c = size / 2;
    let r2 = (size / 2 - 1) * (size / 2 - 1);
    for y in 0..size {
        for z in 0..size {
            for x in 0..size {
                let d = (x - c) * (x - c) + (y - c) * (y - c) + (z - c) * (z - c);
                if d <= r2 {
                    v.set_voxel(IVec3::new(x, y, z), Voxel::solid(((x + z) % 5) as u8 + 1));
                }
            }
        }
    }
    Arc::new(v)
}

fn drain(ms: &mut MeshState) -> Vec<usize> {
    std::iter::from_fn(|| ms.pop()).collect()
}

fn slot_mesh_count(ms: &MeshState, kind: MeshType, idx: usize) -> usize {
    ms.meshes(kind)
        .values()
        .filter(|slots| slots[idx].is_some())
        .count()
}

#[test]
fn extract_all_pending_is_a_fixed_point() {
    let mut ms = state(16);
    let v = sphere(32);
    ms.set_volume(0, Some(v.clone()), None, None, true);
    ms.schedule_region_extraction(0, &v.region());
    ms.extract_all_pending();
    assert_eq!(ms.pending_extractions(), 0);
    assert_eq!(ms.in_flight_extractions(), 0);
    let popped = drain(&mut ms);
    assert!(!popped.is_empty());
    assert!(popped.iter().all(|&idx| idx == 0));
    assert_eq!(ms.pop(), None);

    let before = ms.count(MeshType::Opaque, 0);
    ms.extract_all_pending();
    assert_eq!(ms.pop(), None);
    assert_eq!(ms.count(MeshType::Opaque, 0), before);
    assert!(before.indices > 0);
}

#[test]
fn rescheduling_keeps_one_mesh_per_chunk() {
    let mut ms = state(16);
    let v = sphere(32);
    ms.set_volume(0, Some(v.clone()), None, None, true);
    ms.schedule_region_extraction(0, &v.region());
    let jobs = ms.pending_extractions();
    ms.schedule_region_extraction(0, &v.region());
    assert_eq!(ms.pending_extractions(), jobs * 2);
    ms.extract_all_pending();
    assert_eq!(drain(&mut ms).len(), jobs * 2);
    for kind in MeshType::ALL {
        assert_eq!(slot_mesh_count(&ms, kind, 0), jobs);
        assert_eq!(ms.meshes(kind).len(), jobs);
    }
}

#[test]
fn mesh_delete_clears_both_maps() {
    let mut ms = state(16);
    let v = sphere(20);
    ms.set_volume(2, Some(v.clone()), None, None, true);
    ms.schedule_region_extraction(2, &v.region());
    ms.extract_all_pending();
    drain(&mut ms);
    assert!(slot_mesh_count(&ms, MeshType::Opaque, 2) > 0);

    let out = ms.set_volume(2, Some(sphere(8)), None, None, true);
    assert!(out.meshes_deleted);
    assert!(Arc::ptr_eq(out.previous.as_ref().unwrap(), &v));
    for kind in MeshType::ALL {
        assert_eq!(slot_mesh_count(&ms, kind, 2), 0);
        assert_eq!(ms.count(kind, 2).indices, 0);
    }
}

#[test]
fn swapping_volume_mid_extraction_drops_old_results() {
    let mut ms = state(8);
    let v = sphere(48);
    ms.set_volume(0, Some(v.clone()), None, None, true);
    ms.schedule_region_extraction(0, &v.region());
    ms.run_scheduled_extractions(64);
    let out = ms.set_volume(0, Some(sphere(4)), None, None, true);
    assert!(out.previous.is_some());
    assert_eq!(ms.pending_extractions(), 0);
    ms.extract_all_pending();
    assert_eq!(ms.pop(), None);
    assert!(ms.meshes(MeshType::Opaque).is_empty());
}

#[test]
fn results_for_cleared_slots_are_skipped() {
    let mut ms = state(16);
    let v = sphere(16);
    ms.set_volume(0, Some(v.clone()), None, None, false);
    ms.set_volume(1, Some(v.clone()), None, None, false);
    ms.schedule_region_extraction(0, &v.region());
    ms.schedule_region_extraction(1, &v.region());
    ms.extract_all_pending();
    ms.set_volume(0, None, None, None, false);
    let popped = drain(&mut ms);
    assert!(!popped.is_empty());
    assert!(popped.iter().all(|&idx| idx == 1));
}

#[test]
fn update_reschedules_on_mode_switch() {
    let mut ms = state(16);
    let v = sphere(24);
    ms.set_volume(0, Some(v.clone()), None, None, true);
    ms.set_volume(4, Some(v.clone()), None, None, true);
    assert!(!ms.update(SurfaceExtractionType::Cubic));
    assert_eq!(ms.pending_extractions(), 0);

    assert!(ms.update(SurfaceExtractionType::MarchingCubes));
    assert_eq!(ms.mesh_mode(), SurfaceExtractionType::MarchingCubes);
    ms.extract_all_pending();
    let popped = drain(&mut ms);
    assert!(popped.contains(&0) && popped.contains(&4));
    // Marching cubes writes normals and no transparent geometry
    assert!(ms.count(MeshType::Opaque, 0).normals > 0);
    assert_eq!(ms.count(MeshType::Transparency, 4).indices, 0);
    assert!(!ms.update(SurfaceExtractionType::MarchingCubes));
}

#[test]
fn clear_pending_drops_everything() {
    let mut ms = state(8);
    let v = sphere(32);
    ms.set_volume(0, Some(v.clone()), None, None, true);
    ms.schedule_region_extraction(0, &v.region());
    ms.run_scheduled_extractions(4);
    ms.clear_pending_extractions();
    assert_eq!(ms.pending_extractions(), 0);
    assert_eq!(ms.in_flight_extractions(), 0);
    assert_eq!(ms.pop(), None);
    // Slot is not left locked
    let out = ms.set_volume(0, None, None, None, true);
    assert!(out.previous.is_some());
}

#[test]
fn shutdown_hands_back_every_slot() {
    let mut ms = state(16);
    let v = sphere(16);
    ms.set_volume(0, Some(v.clone()), None, None, true);
    ms.set_volume(MAX_VOLUMES - 1, Some(v.clone()), None, None, true);
    ms.schedule_region_extraction(0, &v.region());
    ms.extract_all_pending();
    drain(&mut ms);

    let volumes = ms.shutdown();
    assert_eq!(volumes.len(), MAX_VOLUMES);
    assert!(volumes[0].is_some());
    assert!(volumes[MAX_VOLUMES - 1].is_some());
    assert_eq!(volumes.iter().filter(|v| v.is_some()).count(), 2);
    for kind in MeshType::ALL {
        assert!(ms.meshes(kind).is_empty());
    }
    assert!((0..MAX_VOLUMES).all(|idx| ms.volume(idx).is_none()));
}

#[test]
fn meshes_land_in_volume_space() {
    let mut ms = state(16);
    let region = Region::new(IVec3::new(-20, -4, 3), IVec3::new(-9, 4, 9));
    let mut v = RawVolume::new(region);
    v.fill(&region, Voxel::solid(9));
    let v = Arc::new(v);
    ms.set_volume(0, Some(v.clone()), None, None, true);
    ms.schedule_region_extraction(0, &region);
    ms.extract_all_pending();
    drain(&mut ms);
    for (mins, slots) in ms.meshes(MeshType::Opaque) {
        let Some(mesh) = slots[0].as_deref() else {
            continue;
        };
        assert_eq!(mesh.offset(), *mins);
        for vert in mesh.vertices() {
            let p = vert.position;
            assert!(p.x >= -20.5 && p.x <= -7.5, "{p:?}");
            assert!(p.y >= -4.5 && p.y <= 5.5, "{p:?}");
            assert!(p.z >= 2.5 && p.z <= 10.5, "{p:?}");
        }
    }
    // The box spans four chunks, so faces split at chunk borders
    let counts = ms.count(MeshType::Opaque, 0);
    assert!(counts.indices > 36);
    assert_eq!(counts.indices % 6, 0);
    assert_eq!(ms.meshes(MeshType::Opaque).len(), 4);
}
