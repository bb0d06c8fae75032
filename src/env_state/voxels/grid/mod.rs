//! # Grid Module
//!
//! This module provides the `VoxelGrid` struct, a dense, fixed-size 3D array of voxel
//! payloads anchored in world space.
//!
//! ## Memory Layout
//!
//! Cells live in a single flat vector, indexed as `x + y * dim.x + z * dim.x * dim.y`
//! (x varies fastest, then y, then z). Lookup is O(1) and a full scan in index order walks
//! memory linearly, which is the order both the population routines and the extraction
//! algorithm use.
//!
//! ## Coordinates
//!
//! Cell coordinates are `Point3<i32>` so that neighbour scans can step below zero without
//! wrapping. Any coordinate with a negative component or a component at or past the
//! corresponding dimension is out of range: reads return `None` and writes return
//! [`VoxelError::OutOfBounds`] without touching the grid.

use cgmath::{Point3, Vector3};
use grid_iteration::GridCellIterator;

use crate::error::VoxelError;

use super::voxel::Solidity;

pub mod grid_iteration;

/// Edge length, in cells, of a default-constructed grid.
pub const DEFAULT_GRID_DIMENSION: usize = 100;
/// Cell edge length, in world units, of a default-constructed grid.
pub const DEFAULT_RESOLUTION: f32 = 1.0;

/// A dense 3D grid of voxels.
///
/// The dimensions are fixed at construction; cells are mutated in place through
/// [`VoxelGrid::set`] and [`VoxelGrid::get_mut`].
///
/// # Examples
///
/// ```
/// use cgmath::{Point3, Vector3};
/// use voxel_env::{Material, VoxelGrid, VoxelState};
///
/// let mut grid = VoxelGrid::<VoxelState>::new(
///     Vector3::new(4, 4, 4),
///     Point3::new(0.0, 0.0, 0.0),
///     1.0,
/// ).unwrap();
///
/// grid.set(Point3::new(1, 2, 3), VoxelState::solid(Material::Wall)).unwrap();
/// assert!(grid.is_solid(Point3::new(1, 2, 3)));
/// assert!(grid.get(Point3::new(-1, 0, 0)).is_none());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelGrid<S> {
    /// Cell counts per axis. Every component is in `1..=i32::MAX`.
    dimensions: Vector3<usize>,
    /// World-space position of the minimum corner of cell (0, 0, 0).
    origin: Point3<f32>,
    /// Edge length of one cell in world units.
    resolution: f32,
    /// The cells, in x-fastest order.
    voxels: Vec<S>,
}

impl<S: Default + Clone> VoxelGrid<S> {
    /// Creates a grid with every cell set to `S::default()`.
    ///
    /// # Arguments
    /// * `dimensions` - Cell counts along x, y and z
    /// * `origin` - World-space position of the minimum corner of cell (0, 0, 0)
    /// * `resolution` - Edge length of one cell in world units
    ///
    /// # Errors
    /// * [`VoxelError::InvalidDimensions`] if any dimension is zero, larger than
    ///   `i32::MAX`, or the cell count overflows `usize`
    /// * [`VoxelError::InvalidResolution`] if `resolution` is not a positive finite number
    pub fn new(
        dimensions: Vector3<usize>,
        origin: Point3<f32>,
        resolution: f32,
    ) -> Result<Self, VoxelError> {
        let invalid_dimensions = VoxelError::InvalidDimensions {
            dimensions: dimensions.into(),
        };
        let addressable = |d: usize| d > 0 && d <= i32::MAX as usize;
        if !(addressable(dimensions.x) && addressable(dimensions.y) && addressable(dimensions.z)) {
            return Err(invalid_dimensions);
        }
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(VoxelError::InvalidResolution { resolution });
        }
        let cell_count = dimensions
            .x
            .checked_mul(dimensions.y)
            .and_then(|plane| plane.checked_mul(dimensions.z))
            .ok_or(invalid_dimensions)?;

        Ok(VoxelGrid {
            dimensions,
            origin,
            resolution,
            voxels: vec![S::default(); cell_count],
        })
    }

    /// Creates a cubic grid with `size` cells along every axis.
    pub fn cube(size: usize, origin: Point3<f32>, resolution: f32) -> Result<Self, VoxelError> {
        Self::new(Vector3::new(size, size, size), origin, resolution)
    }

    /// Resets every cell to `S::default()`. Dimensions, origin and resolution are kept.
    pub fn clear(&mut self) {
        self.voxels.fill(S::default());
    }
}

impl<S: Default + Clone> Default for VoxelGrid<S> {
    /// A `DEFAULT_GRID_DIMENSION`³ grid at the world origin with `DEFAULT_RESOLUTION`.
    fn default() -> Self {
        let cell_count = DEFAULT_GRID_DIMENSION * DEFAULT_GRID_DIMENSION * DEFAULT_GRID_DIMENSION;
        VoxelGrid {
            dimensions: Vector3::new(
                DEFAULT_GRID_DIMENSION,
                DEFAULT_GRID_DIMENSION,
                DEFAULT_GRID_DIMENSION,
            ),
            origin: Point3::new(0.0, 0.0, 0.0),
            resolution: DEFAULT_RESOLUTION,
            voxels: vec![S::default(); cell_count],
        }
    }
}

impl<S> VoxelGrid<S> {
    /// Cell counts per axis.
    pub fn dimensions(&self) -> Vector3<usize> {
        self.dimensions
    }

    /// World-space position of the minimum corner of cell (0, 0, 0).
    pub fn origin(&self) -> Point3<f32> {
        self.origin
    }

    /// Edge length of one cell in world units.
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// Total number of cells in the grid.
    pub fn cell_count(&self) -> usize {
        self.voxels.len()
    }

    /// Returns `true` if `cell` addresses a cell of this grid.
    pub fn contains(&self, cell: Point3<i32>) -> bool {
        self.index_of(cell).is_some()
    }

    /// Maps a cell coordinate to its position in the flat storage.
    ///
    /// # Returns
    /// `None` if the coordinate is out of range.
    pub fn index_of(&self, cell: Point3<i32>) -> Option<usize> {
        let x = usize::try_from(cell.x).ok()?;
        let y = usize::try_from(cell.y).ok()?;
        let z = usize::try_from(cell.z).ok()?;
        if x >= self.dimensions.x || y >= self.dimensions.y || z >= self.dimensions.z {
            return None;
        }
        Some(self.linear_index(x, y, z))
    }

    /// Flat index of an in-range cell. Callers guarantee the coordinate is in range.
    #[inline]
    pub(crate) fn linear_index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.dimensions.x * (y + self.dimensions.y * z)
    }

    /// Gets a reference to the voxel at `cell`.
    ///
    /// # Returns
    /// `None` if the coordinate is out of range. This is an expected outcome for boundary
    /// checks, never a panic.
    pub fn get(&self, cell: Point3<i32>) -> Option<&S> {
        self.index_of(cell).map(|index| &self.voxels[index])
    }

    /// Gets a mutable reference to the voxel at `cell`, or `None` if out of range.
    pub fn get_mut(&mut self, cell: Point3<i32>) -> Option<&mut S> {
        self.index_of(cell).map(move |index| &mut self.voxels[index])
    }

    /// Writes `state` to the voxel at `cell`.
    ///
    /// # Errors
    /// [`VoxelError::OutOfBounds`] if the coordinate is out of range. The grid is not
    /// modified in that case.
    pub fn set(&mut self, cell: Point3<i32>, state: S) -> Result<(), VoxelError> {
        let dimensions = self.dimensions.into();
        let voxel = self.get_mut(cell).ok_or(VoxelError::OutOfBounds {
            cell: cell.into(),
            dimensions,
        })?;
        *voxel = state;
        Ok(())
    }

    /// Reads an in-range cell by unsigned coordinates.
    ///
    /// # Panics
    /// Panics if the coordinate is out of range.
    #[inline]
    pub(crate) fn voxel_at(&self, x: usize, y: usize, z: usize) -> &S {
        &self.voxels[self.linear_index(x, y, z)]
    }

    /// Writes an in-range cell by unsigned coordinates.
    ///
    /// # Panics
    /// Panics if the coordinate is out of range.
    #[inline]
    pub(crate) fn put(&mut self, x: usize, y: usize, z: usize, state: S) {
        let index = self.linear_index(x, y, z);
        self.voxels[index] = state;
    }

    /// Converts a world-space point to the coordinate of the cell containing it.
    ///
    /// The result is not bounds-checked: points outside the grid map to out-of-range
    /// coordinates, which [`VoxelGrid::get`] will reject.
    pub fn world_to_cell(&self, point: Point3<f32>) -> Point3<i32> {
        let to_cell = |p: f32, o: f32| ((p - o) / self.resolution).floor() as i32;
        Point3::new(
            to_cell(point.x, self.origin.x),
            to_cell(point.y, self.origin.y),
            to_cell(point.z, self.origin.z),
        )
    }

    /// Converts a cell coordinate to the world-space position of the cell's centre.
    ///
    /// This is the inverse of [`VoxelGrid::world_to_cell`]: mapping the centre back yields
    /// the same cell.
    pub fn cell_to_world(&self, cell: Point3<i32>) -> Point3<f32> {
        let to_world = |c: i32, o: f32| o + (c as f32 + 0.5) * self.resolution;
        Point3::new(
            to_world(cell.x, self.origin.x),
            to_world(cell.y, self.origin.y),
            to_world(cell.z, self.origin.z),
        )
    }

    /// Iterates over every cell in scan order (z-major, then y, then x).
    pub fn cells(&self) -> GridCellIterator<'_, S> {
        GridCellIterator::new(self)
    }
}

impl<S: Solidity> VoxelGrid<S> {
    /// Checks if the cell at `cell` is solid.
    ///
    /// # Returns
    /// `true` if the cell is in range and solid, `false` if it is empty or out of range.
    pub fn is_solid(&self, cell: Point3<i32>) -> bool {
        self.get(cell).is_some_and(Solidity::is_solid)
    }

    /// Iterates over the coordinates of solid cells in scan order.
    pub fn solid_cells(&self) -> impl Iterator<Item = Point3<usize>> + '_ {
        self.cells()
            .filter(|(_, voxel)| voxel.is_solid())
            .map(|(position, _)| position)
    }

    /// Number of solid cells in the grid.
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|voxel| voxel.is_solid()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env_state::voxels::voxel::{material::Material, VoxelState};

    fn grid(x: usize, y: usize, z: usize) -> VoxelGrid<VoxelState> {
        VoxelGrid::new(Vector3::new(x, y, z), Point3::new(0.0, 0.0, 0.0), 1.0).unwrap()
    }

    #[test]
    fn new_grid_is_empty() {
        let grid = grid(3, 4, 5);
        assert_eq!(grid.cell_count(), 60);
        assert_eq!(grid.solid_count(), 0);
        assert_eq!(grid.dimensions(), Vector3::new(3, 4, 5));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let result =
            VoxelGrid::<VoxelState>::new(Vector3::new(4, 0, 4), Point3::new(0.0, 0.0, 0.0), 1.0);
        assert!(matches!(
            result,
            Err(VoxelError::InvalidDimensions { dimensions: [4, 0, 4] })
        ));
    }

    #[test]
    fn bad_resolution_is_rejected() {
        for resolution in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let result = VoxelGrid::<VoxelState>::cube(2, Point3::new(0.0, 0.0, 0.0), resolution);
            assert!(
                matches!(result, Err(VoxelError::InvalidResolution { .. })),
                "resolution {resolution} should be rejected"
            );
        }
    }

    #[test]
    fn get_out_of_range_returns_none() {
        let grid = grid(2, 3, 4);
        for cell in [
            Point3::new(-1, 0, 0),
            Point3::new(0, -1, 0),
            Point3::new(0, 0, -1),
            Point3::new(2, 0, 0),
            Point3::new(0, 3, 0),
            Point3::new(0, 0, 4),
            Point3::new(i32::MIN, i32::MAX, 0),
        ] {
            assert!(grid.get(cell).is_none(), "{cell:?} should be out of range");
            assert!(!grid.is_solid(cell));
        }
        assert!(grid.get(Point3::new(1, 2, 3)).is_some());
    }

    #[test]
    fn set_out_of_range_reports_and_leaves_grid_unchanged() {
        let mut grid = grid(2, 2, 2);
        let before = grid.clone();
        let result = grid.set(Point3::new(2, 0, 0), VoxelState::solid(Material::Wall));
        assert!(matches!(
            result,
            Err(VoxelError::OutOfBounds { cell: [2, 0, 0], dimensions: [2, 2, 2] })
        ));
        assert_eq!(grid, before);
    }

    #[test]
    fn set_then_get() {
        let mut grid = grid(3, 3, 3);
        grid.set(Point3::new(2, 1, 0), VoxelState::solid(Material::Floor))
            .unwrap();
        let voxel = grid.get(Point3::new(2, 1, 0)).unwrap();
        assert!(voxel.solid);
        assert_eq!(voxel.material, Material::Floor);
        assert_eq!(grid.solid_count(), 1);
        assert_eq!(grid.index_of(Point3::new(2, 1, 0)), Some(2 + 3));
    }

    #[test]
    fn flat_index_is_x_fastest() {
        let grid = grid(4, 5, 6);
        assert_eq!(grid.index_of(Point3::new(1, 0, 0)), Some(1));
        assert_eq!(grid.index_of(Point3::new(0, 1, 0)), Some(4));
        assert_eq!(grid.index_of(Point3::new(0, 0, 1)), Some(20));
        assert_eq!(grid.index_of(Point3::new(3, 4, 5)), Some(119));
    }

    #[test]
    fn world_and_cell_mapping_are_inverse() {
        let grid =
            VoxelGrid::<VoxelState>::new(Vector3::new(7, 5, 3), Point3::new(-2.5, 10.0, 0.25), 0.3)
                .unwrap();
        for (position, _) in grid.cells() {
            let cell = position.cast::<i32>().unwrap();
            assert_eq!(grid.world_to_cell(grid.cell_to_world(cell)), cell);
        }
    }

    #[test]
    fn world_to_cell_floors_below_origin() {
        let grid = grid(2, 2, 2);
        assert_eq!(
            grid.world_to_cell(Point3::new(-0.5, 0.5, 1.999)),
            Point3::new(-1, 0, 1)
        );
    }

    #[test]
    fn clear_resets_every_cell() {
        let mut grid = grid(2, 2, 2);
        grid.set(Point3::new(1, 1, 1), VoxelState::solid(Material::Wall))
            .unwrap();
        grid.clear();
        assert_eq!(grid.solid_count(), 0);
        assert_eq!(grid.dimensions(), Vector3::new(2, 2, 2));
    }

    #[test]
    fn default_grid_is_a_hundred_cube() {
        let grid = VoxelGrid::<VoxelState>::default();
        assert_eq!(grid.dimensions(), Vector3::new(100, 100, 100));
        assert_eq!(grid.resolution(), 1.0);
    }
}
