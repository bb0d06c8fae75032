//! # Grid Iteration Module
//!
//! An iterator over every cell of a `VoxelGrid` in storage order, yielding the unsigned
//! cell coordinate alongside the payload. Coordinates are tracked incrementally so no
//! division is needed per cell.

use cgmath::Point3;

use super::VoxelGrid;

/// Iterates over all cells of a grid in scan order (x fastest, then y, then z).
pub struct GridCellIterator<'a, S> {
    /// Reference to the grid being iterated over
    grid_ref: &'a VoxelGrid<S>,
    /// Position of the next cell in the flat storage
    current_offset: usize,
    /// Current X position within the grid
    local_x: usize,
    /// Current Y position within the grid
    local_y: usize,
    /// Current Z position within the grid
    local_z: usize,
}

impl<'a, S> GridCellIterator<'a, S> {
    /// Creates an iterator positioned at cell (0, 0, 0).
    pub fn new(grid_ref: &'a VoxelGrid<S>) -> Self {
        GridCellIterator {
            grid_ref,
            current_offset: 0,
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }
}

impl<'a, S> Iterator for GridCellIterator<'a, S> {
    type Item = (Point3<usize>, &'a S);

    fn next(&mut self) -> Option<Self::Item> {
        let voxel = self.grid_ref.voxels.get(self.current_offset)?;
        let position = Point3::new(self.local_x, self.local_y, self.local_z);

        self.current_offset += 1;
        self.local_x += 1;
        if self.local_x == self.grid_ref.dimensions.x {
            self.local_x = 0;
            self.local_y += 1;
            if self.local_y == self.grid_ref.dimensions.y {
                self.local_y = 0;
                self.local_z += 1;
            }
        }

        Some((position, voxel))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid_ref.voxels.len() - self.current_offset;
        (remaining, Some(remaining))
    }
}

impl<S> ExactSizeIterator for GridCellIterator<'_, S> {}
