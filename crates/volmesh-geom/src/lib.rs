//! Minimal geometry types for the meshing crates (integer regions, vectors, transforms).
#![forbid(unsafe_code)]

use core::fmt;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const UP: Vec3 = Vec3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len > 0.0 { self / len } else { self }
    }

    /// Linear interpolation between `self` and `rhs`.
    #[inline]
    pub fn lerp(self, rhs: Vec3, t: f32) -> Vec3 {
        self + (rhs - self) * t
    }
}

impl From<IVec3> for Vec3 {
    #[inline]
    fn from(v: IVec3) -> Self {
        Vec3::new(v.x as f32, v.y as f32, v.z as f32)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn div(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Integer voxel / chunk coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct IVec3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl IVec3 {
    pub const ZERO: IVec3 = IVec3 { x: 0, y: 0, z: 0 };
    pub const ONE: IVec3 = IVec3 { x: 1, y: 1, z: 1 };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn splat(v: i32) -> Self {
        Self { x: v, y: v, z: v }
    }

    #[inline]
    pub fn min(self, rhs: IVec3) -> IVec3 {
        IVec3::new(self.x.min(rhs.x), self.y.min(rhs.y), self.z.min(rhs.z))
    }

    #[inline]
    pub fn max(self, rhs: IVec3) -> IVec3 {
        IVec3::new(self.x.max(rhs.x), self.y.max(rhs.y), self.z.max(rhs.z))
    }

    #[inline]
    pub fn saturating_add(self, rhs: IVec3) -> IVec3 {
        IVec3::new(
            self.x.saturating_add(rhs.x),
            self.y.saturating_add(rhs.y),
            self.z.saturating_add(rhs.z),
        )
    }

    /// Component access by axis index (0 = x, 1 = y, 2 = z).
    #[inline]
    pub fn axis(self, axis: usize) -> i32 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    #[inline]
    pub fn set_axis(&mut self, axis: usize, v: i32) {
        match axis {
            0 => self.x = v,
            1 => self.y = v,
            _ => self.z = v,
        }
    }
}

impl fmt::Display for IVec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.x, self.y, self.z)
    }
}

impl Add for IVec3 {
    type Output = IVec3;
    #[inline]
    fn add(self, rhs: IVec3) -> IVec3 {
        IVec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for IVec3 {
    #[inline]
    fn add_assign(&mut self, rhs: IVec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for IVec3 {
    type Output = IVec3;
    #[inline]
    fn sub(self, rhs: IVec3) -> IVec3 {
        IVec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<i32> for IVec3 {
    type Output = IVec3;
    #[inline]
    fn mul(self, rhs: i32) -> IVec3 {
        IVec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Inclusive integer box: both `lower` and `upper` are part of the region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Region {
    pub lower: IVec3,
    pub upper: IVec3,
}

impl Default for Region {
    /// An invalid region (lower > upper), matching a volume that holds nothing.
    fn default() -> Self {
        Region::INVALID
    }
}

impl Region {
    pub const INVALID: Region = Region {
        lower: IVec3::splat(0),
        upper: IVec3::splat(-1),
    };

    #[inline]
    pub const fn new(lower: IVec3, upper: IVec3) -> Self {
        Self { lower, upper }
    }

    /// Cube region `[lower, upper]` on every axis.
    #[inline]
    pub const fn cube(lower: i32, upper: i32) -> Self {
        Self {
            lower: IVec3::splat(lower),
            upper: IVec3::splat(upper),
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.lower.x <= self.upper.x && self.lower.y <= self.upper.y && self.lower.z <= self.upper.z
    }

    #[inline]
    pub fn width_in_voxels(&self) -> i32 {
        self.upper.x - self.lower.x + 1
    }

    #[inline]
    pub fn height_in_voxels(&self) -> i32 {
        self.upper.y - self.lower.y + 1
    }

    #[inline]
    pub fn depth_in_voxels(&self) -> i32 {
        self.upper.z - self.lower.z + 1
    }

    #[inline]
    pub fn dimensions_in_voxels(&self) -> IVec3 {
        IVec3::new(
            self.width_in_voxels(),
            self.height_in_voxels(),
            self.depth_in_voxels(),
        )
    }

    /// Number of voxels inside; zero for an invalid region.
    pub fn voxel_count(&self) -> usize {
        if !self.is_valid() {
            return 0;
        }
        self.width_in_voxels() as usize
            * self.height_in_voxels() as usize
            * self.depth_in_voxels() as usize
    }

    #[inline]
    pub fn contains_point(&self, p: IVec3) -> bool {
        p.x >= self.lower.x
            && p.y >= self.lower.y
            && p.z >= self.lower.z
            && p.x <= self.upper.x
            && p.y <= self.upper.y
            && p.z <= self.upper.z
    }

    /// Returns a copy grown by `amount` on every side (negative shrinks).
    #[inline]
    pub fn grow(&self, amount: i32) -> Region {
        Region::new(
            self.lower - IVec3::splat(amount),
            self.upper + IVec3::splat(amount),
        )
    }

    /// Moves the upper corner; clamps at the `i32` range.
    #[inline]
    pub fn shift_upper_corner(&mut self, dx: i32, dy: i32, dz: i32) {
        self.upper = self.upper.saturating_add(IVec3::new(dx, dy, dz));
    }

    #[inline]
    pub fn shift(&mut self, d: IVec3) {
        self.lower += d;
        self.upper += d;
    }

    /// Overlap of the two regions; invalid when they don't intersect.
    pub fn intersection(&self, other: &Region) -> Region {
        Region::new(self.lower.max(other.lower), self.upper.min(other.upper))
    }

    /// Center of the region in voxel space (upper corner inclusive).
    pub fn center(&self) -> Vec3 {
        (Vec3::from(self.lower) + Vec3::from(self.upper) + Vec3::new(1.0, 1.0, 1.0)) * 0.5
    }
}

/// Inclusive overlap test on every axis.
#[inline]
pub fn intersects(a: &Region, b: &Region) -> bool {
    a.upper.x >= b.lower.x
        && a.upper.y >= b.lower.y
        && a.upper.z >= b.lower.z
        && b.upper.x >= a.lower.x
        && b.upper.y >= a.lower.y
        && b.upper.z >= a.lower.z
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {}]", self.lower, self.upper)
    }
}

/// Column-major 4x4 transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4 {
    pub cols: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn translation(t: Vec3) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        m.cols[3] = [t.x, t.y, t.z, 1.0];
        m
    }

    pub fn scale(s: Vec3) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        m.cols[0][0] = s.x;
        m.cols[1][1] = s.y;
        m.cols[2][2] = s.z;
        m
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let c = &self.cols;
        let w = c[0][3] * p.x + c[1][3] * p.y + c[2][3] * p.z + c[3][3];
        let out = Vec3::new(
            c[0][0] * p.x + c[1][0] * p.y + c[2][0] * p.z + c[3][0],
            c[0][1] * p.x + c[1][1] * p.y + c[2][1] * p.z + c[3][1],
            c[0][2] * p.x + c[1][2] * p.y + c[2][2] * p.z + c[3][2],
        );
        if w != 0.0 && w != 1.0 { out / w } else { out }
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = [[0.0f32; 4]; 4];
        for (c, col) in out.iter_mut().enumerate() {
            for (r, cell) in col.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.cols[k][r] * rhs.cols[c][k]).sum();
            }
        }
        Mat4 { cols: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Derived regions are only as valid as their corners
        #[test]
        fn validity_matches_corner_order(r in any::<Region>()) {
            let expect = r.lower.x <= r.upper.x && r.lower.y <= r.upper.y && r.lower.z <= r.upper.z;
            prop_assert_eq!(r.is_valid(), expect);
        }
    }

    #[test]
    fn default_region_is_invalid() {
        assert!(!Region::default().is_valid());
        assert_eq!(Region::default().voxel_count(), 0);
    }
}
