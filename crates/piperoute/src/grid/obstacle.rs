//! Axis-aligned cuboidal obstacles.

use super::types::Voxel;

/// Whether an obstacle is a physical body or a reserved access zone.
/// Both block routing identically; the distinction is diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    Physical,
    Logical,
}

/// Axis-aligned cuboid with inclusive voxel corners.
#[derive(Clone, Debug)]
pub struct Obstacle {
    pub name: String,
    pub kind: ObstacleKind,
    pub min_corner: Voxel,
    pub max_corner: Voxel,
}

impl Obstacle {
    pub fn new(name: impl Into<String>, kind: ObstacleKind, min_corner: Voxel, max_corner: Voxel) -> Self {
        debug_assert!(
            min_corner.x <= max_corner.x && min_corner.y <= max_corner.y && min_corner.z <= max_corner.z,
            "inverted obstacle corners"
        );
        Self {
            name: name.into(),
            kind,
            min_corner,
            max_corner,
        }
    }

    /// True iff `v` lies inside the cuboid (corners inclusive).
    #[inline]
    pub fn contains(&self, v: Voxel) -> bool {
        (self.min_corner.x..=self.max_corner.x).contains(&v.x)
            && (self.min_corner.y..=self.max_corner.y).contains(&v.y)
            && (self.min_corner.z..=self.max_corner.z).contains(&v.z)
    }

    /// Every voxel of the cuboid.
    pub fn cells(&self) -> impl Iterator<Item = Voxel> + '_ {
        let (min, max) = (self.min_corner, self.max_corner);
        (min.z..=max.z).flat_map(move |z| {
            (min.y..=max.y)
                .flat_map(move |y| (min.x..=max.x).map(move |x| Voxel::new(x, y, z)))
        })
    }
}
