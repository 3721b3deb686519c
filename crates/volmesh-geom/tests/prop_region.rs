use proptest::prelude::*;
use volmesh_geom::{IVec3, Region, intersects};

fn small_i32() -> impl Strategy<Value = i32> {
    -10_000i32..=10_000
}

fn arb_ivec3() -> impl Strategy<Value = IVec3> {
    (small_i32(), small_i32(), small_i32()).prop_map(|(x, y, z)| IVec3::new(x, y, z))
}

fn arb_valid_region() -> impl Strategy<Value = Region> {
    (arb_ivec3(), 0i32..64, 0i32..64, 0i32..64).prop_map(|(lo, w, h, d)| {
        Region::new(lo, lo + IVec3::new(w, h, d))
    })
}

proptest! {
    // Intersection is symmetric
    #[test]
    fn intersects_symmetric(a in arb_valid_region(), b in arb_valid_region()) {
        prop_assert_eq!(intersects(&a, &b), intersects(&b, &a));
    }

    // A valid region always intersects itself and its grown version
    #[test]
    fn intersects_self_and_grown(a in arb_valid_region(), n in 0i32..8) {
        prop_assert!(intersects(&a, &a));
        prop_assert!(intersects(&a, &a.grow(n)));
    }

    // intersects agrees with validity of the overlap box
    #[test]
    fn intersects_matches_overlap(a in arb_valid_region(), b in arb_valid_region()) {
        prop_assert_eq!(intersects(&a, &b), a.intersection(&b).is_valid());
    }

    // Growing then shrinking returns the original
    #[test]
    fn grow_shrink_identity(a in arb_valid_region(), n in 0i32..16) {
        prop_assert_eq!(a.grow(n).grow(-n), a);
    }

    // Voxel count matches the dimensions
    #[test]
    fn voxel_count_matches_dims(a in arb_valid_region()) {
        let d = a.dimensions_in_voxels();
        prop_assert_eq!(a.voxel_count(), (d.x * d.y * d.z) as usize);
    }
}
