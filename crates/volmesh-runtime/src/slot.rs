use std::sync::Arc;

use volmesh_geom::{Mat4, Vec3};
use volmesh_volume::{NormalPalette, Palette, RawVolume};

/// Which triangle faces the renderer should cull for a slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CullFace {
    None,
    Front,
    #[default]
    Back,
    FrontAndBack,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Slot {
    pub volume: Option<Arc<RawVolume>>,
    pub palette: Option<Palette>,
    pub normal_palette: Option<NormalPalette>,
    pub hidden: bool,
    pub gray: bool,
    pub cull_face: CullFace,
    pub reference: Option<usize>,
    pub model: Mat4,
    pub mins: Vec3,
    pub maxs: Vec3,
}

impl Slot {
    pub(crate) fn center_pos(&self, apply_model: bool) -> Vec3 {
        let center = (self.mins + self.maxs) * 0.5;
        if apply_model {
            self.model.transform_point(center)
        } else {
            center
        }
    }
}
