use volmesh_volume::{NormalPalette, PALETTE_MAX_COLORS, Palette, Voxel, VoxelType};

#[test]
fn closest_match_finds_exact_entry() {
    let pal = Palette::default();
    for i in [0u8, 17, 42, 215, 255] {
        let c = pal.color(i);
        assert_eq!(pal.color(pal.closest_match(c)), c);
    }
}

#[test]
fn closest_match_picks_nearest() {
    let mut colors = [[0u8, 0, 0, 255]; PALETTE_MAX_COLORS];
    colors[1] = [255, 0, 0, 255];
    colors[2] = [0, 255, 0, 255];
    let pal = Palette::from_colors(colors);
    assert_eq!(pal.closest_match([250, 10, 5, 255]), 1);
    assert_eq!(pal.closest_match([10, 200, 5, 255]), 2);
    assert_eq!(pal.closest_match([1, 1, 1, 255]), 0);
}

#[test]
fn palette_hash_tracks_content() {
    let a = Palette::default();
    let mut b = Palette::default();
    assert_eq!(a.hash(), b.hash());
    b.set_color(3, [1, 2, 3, 4]);
    assert_ne!(a.hash(), b.hash());
}

#[test]
fn default_normals_are_unit_length() {
    let np = NormalPalette::default();
    for i in 1..=255u8 {
        let len = np.normal(i).length();
        assert!((len - 1.0).abs() < 1e-4, "normal {i} has length {len}");
    }
    assert_eq!(np.hash(), NormalPalette::default().hash());
}

#[test]
fn voxel_classes_order() {
    assert!(VoxelType::Air < VoxelType::Transparent);
    assert!(VoxelType::Transparent < VoxelType::Generic);
    assert!(Voxel::AIR.is_air());
    assert!(Voxel::glass(1).is_transparent());
    assert!(Voxel::solid(1).is_opaque());
    assert!(Voxel::solid(4).same_appearance(&Voxel::glass(4)));
    assert!(!Voxel::solid(4).same_appearance(&Voxel::solid(4).with_flags(1)));
}
