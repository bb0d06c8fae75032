//! # Parallelepiped Module
//!
//! The axis-aligned box primitive emitted by extraction. A box is stored as an
//! inclusive range of cell coordinates; world-space bounds are derived on demand from
//! the grid it was extracted from.
//!
//! ## Memory Layout
//! The `#[repr(C)]` attribute and the `Pod` derive let a primitive list be viewed as raw
//! bytes (`bytemuck::cast_slice`) when handing it to physics or GPU buffers.

use cgmath::{Point3, Vector3};

use crate::env_state::voxels::grid::VoxelGrid;

/// An axis-aligned box of cells, `min..=max` on every axis.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Parallelepiped {
    /// Inclusive minimum cell coordinate.
    pub min: [u32; 3],
    /// Inclusive maximum cell coordinate.
    pub max: [u32; 3],
}

impl Parallelepiped {
    /// Creates a box spanning `min..=max`.
    ///
    /// Grid dimensions are limited to `i32::MAX`, so every in-range coordinate fits the
    /// `u32` storage.
    pub fn new(min: Point3<usize>, max: Point3<usize>) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y && min.z <= max.z);
        Parallelepiped {
            min: [min.x as u32, min.y as u32, min.z as u32],
            max: [max.x as u32, max.y as u32, max.z as u32],
        }
    }

    /// Creates a box covering exactly one cell.
    pub fn single(cell: Point3<usize>) -> Self {
        Self::new(cell, cell)
    }

    /// The inclusive minimum corner.
    pub fn min_corner(&self) -> Point3<usize> {
        Point3::new(self.min[0] as usize, self.min[1] as usize, self.min[2] as usize)
    }

    /// The inclusive maximum corner.
    pub fn max_corner(&self) -> Point3<usize> {
        Point3::new(self.max[0] as usize, self.max[1] as usize, self.max[2] as usize)
    }

    /// Cell counts along each axis.
    pub fn extents(&self) -> Vector3<usize> {
        self.max_corner() - self.min_corner() + Vector3::new(1, 1, 1)
    }

    /// Number of cells covered.
    pub fn volume(&self) -> usize {
        let extents = self.extents();
        extents.x * extents.y * extents.z
    }

    /// Returns `true` if `cell` lies inside the box.
    pub fn contains(&self, cell: Point3<usize>) -> bool {
        let cell = [cell.x, cell.y, cell.z];
        (0..3).all(|axis| {
            self.min[axis] as usize <= cell[axis] && cell[axis] <= self.max[axis] as usize
        })
    }

    /// Returns `true` if the two boxes share at least one cell.
    pub fn intersects(&self, other: &Parallelepiped) -> bool {
        (0..3).all(|axis| self.min[axis] <= other.max[axis] && other.min[axis] <= self.max[axis])
    }

    /// Iterates over every covered cell, x fastest.
    pub fn cells(&self) -> impl Iterator<Item = Point3<usize>> {
        let (min, max) = (self.min_corner(), self.max_corner());
        (min.z..=max.z).flat_map(move |z| {
            (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| Point3::new(x, y, z)))
        })
    }

    /// World-space bounds of the box in `grid`.
    ///
    /// # Returns
    /// The minimum and maximum corners of the covered volume (outer faces of the boundary
    /// cells, not cell centres).
    pub fn world_bounds<S>(&self, grid: &VoxelGrid<S>) -> (Point3<f32>, Point3<f32>) {
        let origin = grid.origin();
        let resolution = grid.resolution();
        let corner = |cell: [u32; 3]| {
            Point3::new(
                origin.x + cell[0] as f32 * resolution,
                origin.y + cell[1] as f32 * resolution,
                origin.z + cell[2] as f32 * resolution,
            )
        };
        (
            corner(self.min),
            corner([self.max[0] + 1, self.max[1] + 1, self.max[2] + 1]),
        )
    }

    /// Centre and half extents of the box in world space, the shape most physics engines
    /// take for a cuboid collider.
    pub fn center_and_half_extents<S>(&self, grid: &VoxelGrid<S>) -> (Point3<f32>, Vector3<f32>) {
        let (min, max) = self.world_bounds(grid);
        let half_extents = (max - min) * 0.5;
        (min + half_extents, half_extents)
    }
}
