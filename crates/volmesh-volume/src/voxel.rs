/// Material class of a voxel. Order matters: `Air < Transparent < Generic`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VoxelType {
    #[default]
    Air,
    Transparent,
    Generic,
}

/// Normal palette index meaning "derive the normal from the face".
pub const NO_NORMAL: u8 = 0;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Voxel {
    pub material: VoxelType,
    pub color: u8,
    pub normal: u8,
    pub flags: u8,
}

impl Voxel {
    pub const AIR: Voxel = Voxel {
        material: VoxelType::Air,
        color: 0,
        normal: NO_NORMAL,
        flags: 0,
    };

    #[inline]
    pub const fn new(material: VoxelType, color: u8) -> Self {
        Self {
            material,
            color,
            normal: NO_NORMAL,
            flags: 0,
        }
    }

    #[inline]
    pub const fn solid(color: u8) -> Self {
        Self::new(VoxelType::Generic, color)
    }

    #[inline]
    pub const fn glass(color: u8) -> Self {
        Self::new(VoxelType::Transparent, color)
    }

    #[inline]
    pub fn with_normal(mut self, normal: u8) -> Self {
        self.normal = normal;
        self
    }

    #[inline]
    pub fn with_flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub fn is_air(&self) -> bool {
        self.material == VoxelType::Air
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.material == VoxelType::Transparent
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.material == VoxelType::Generic
    }

    /// Same rendered appearance (the material class is compared separately).
    #[inline]
    pub fn same_appearance(&self, other: &Voxel) -> bool {
        self.color == other.color && self.normal == other.normal && self.flags == other.flags
    }
}
