//! Greedy run-merge extraction of box primitives from a voxel grid.
//!
//! The algorithm covers every solid cell with pairwise-disjoint axis-aligned boxes:
//!
//! 1. Cells are scanned z-major, then y, then x. Empty or already consumed cells are
//!    skipped.
//! 2. From a seed cell a run is grown along +x while cells stay solid and unconsumed.
//! 3. The run is extended row by row along +y, accepting a row only if every cell of the
//!    run's x-range is solid and unconsumed there.
//! 4. The resulting rectangle is extended layer by layer along +z under the same rule.
//! 5. Every cell of the box is marked consumed and the box is emitted.
//!
//! The merge priority (x, then y, then z) is fixed, so the output, including its order,
//! is reproducible for identical grid contents. The result is a disjoint covering, not
//! the smallest possible one.
//!
//! The consumed markers live in a bit vector owned by a single extraction call; the grid
//! is only ever read.

use std::ops::Range;

use bitvec::vec::BitVec;
use cgmath::Point3;
use log::{debug, info};
use web_time::Instant;

use crate::env_state::voxels::{grid::VoxelGrid, voxel::Solidity};

use super::parallelepiped::Parallelepiped;

/// Summary of one extraction pass.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ExtractionStats {
    /// Number of boxes emitted.
    pub primitive_count: usize,
    /// Number of solid cells covered by those boxes.
    pub solid_cells: usize,
}

impl ExtractionStats {
    /// Tallies a primitive list.
    pub fn from_primitives(primitives: &[Parallelepiped]) -> Self {
        ExtractionStats {
            primitive_count: primitives.len(),
            solid_cells: primitives.iter().map(Parallelepiped::volume).sum(),
        }
    }

    /// Average number of cells merged into each box. `1.0` means no merging happened;
    /// an empty extraction also reports `1.0`.
    pub fn compression_ratio(&self) -> f32 {
        if self.primitive_count == 0 {
            1.0
        } else {
            self.solid_cells as f32 / self.primitive_count as f32
        }
    }
}

/// Extracts a disjoint box covering of every solid cell in `grid`.
///
/// # Returns
/// Boxes in emission order. An all-empty grid yields an empty vector.
///
/// # Performance
/// Every cell is visited once by the scan and once when consumed; the extension checks
/// re-read at most one row or layer past each box, so running time stays close to linear
/// in the number of cells for typical layouts.
pub fn extract_primitives<S: Solidity>(grid: &VoxelGrid<S>) -> Vec<Parallelepiped> {
    let start = Instant::now();
    let primitives = RunMerger::new(grid, 0..grid.dimensions().z).run();

    let stats = ExtractionStats::from_primitives(&primitives);
    info!(
        "Extracted {} primitives from {} solid cells ({:.2} cells/primitive) in {:?}",
        stats.primitive_count,
        stats.solid_cells,
        stats.compression_ratio(),
        start.elapsed()
    );

    primitives
}

/// Run-merge state for one pass over a contiguous range of z-layers.
///
/// Boxes never extend past `layers.end`, which is what lets slab extraction run one
/// merger per slab independently.
pub(crate) struct RunMerger<'a, S> {
    grid: &'a VoxelGrid<S>,
    layers: Range<usize>,
    /// One bit per cell of `layers`, set once the cell belongs to an emitted box.
    consumed: BitVec,
}

impl<'a, S: Solidity> RunMerger<'a, S> {
    pub(crate) fn new(grid: &'a VoxelGrid<S>, layers: Range<usize>) -> Self {
        let dimensions = grid.dimensions();
        let layer_size = dimensions.x * dimensions.y;
        RunMerger {
            grid,
            consumed: BitVec::repeat(false, layer_size * layers.len()),
            layers,
        }
    }

    pub(crate) fn run(mut self) -> Vec<Parallelepiped> {
        let dimensions = self.grid.dimensions();
        let mut primitives = Vec::new();

        for z in self.layers.clone() {
            for y in 0..dimensions.y {
                for x in 0..dimensions.x {
                    if self.is_available(x, y, z) {
                        let primitive = self.grow_from(x, y, z);
                        self.consume(&primitive);
                        primitives.push(primitive);
                    }
                }
            }
        }

        debug!(
            "Run-merge over layers {:?} emitted {} primitives",
            self.layers,
            primitives.len()
        );
        primitives
    }

    /// Offset of an in-range cell in the `consumed` bits.
    #[inline]
    fn consumed_index(&self, x: usize, y: usize, z: usize) -> usize {
        self.grid.linear_index(x, y, z) - self.grid.linear_index(0, 0, self.layers.start)
    }

    /// A cell can join a box if it is solid and not yet part of another box.
    #[inline]
    fn is_available(&self, x: usize, y: usize, z: usize) -> bool {
        self.grid.voxel_at(x, y, z).is_solid() && !self.consumed[self.consumed_index(x, y, z)]
    }

    fn row_is_available(&self, mut xs: Range<usize>, y: usize, z: usize) -> bool {
        xs.all(|x| self.is_available(x, y, z))
    }

    fn layer_is_available(&self, xs: Range<usize>, mut ys: Range<usize>, z: usize) -> bool {
        ys.all(|y| self.row_is_available(xs.clone(), y, z))
    }

    /// Grows the largest box the x, then y, then z priority allows from a seed cell.
    fn grow_from(&self, x0: usize, y0: usize, z0: usize) -> Parallelepiped {
        let dimensions = self.grid.dimensions();

        let mut x1 = x0;
        while x1 + 1 < dimensions.x && self.is_available(x1 + 1, y0, z0) {
            x1 += 1;
        }

        let mut y1 = y0;
        while y1 + 1 < dimensions.y && self.row_is_available(x0..x1 + 1, y1 + 1, z0) {
            y1 += 1;
        }

        let mut z1 = z0;
        while z1 + 1 < self.layers.end && self.layer_is_available(x0..x1 + 1, y0..y1 + 1, z1 + 1) {
            z1 += 1;
        }

        Parallelepiped::new(Point3::new(x0, y0, z0), Point3::new(x1, y1, z1))
    }

    fn consume(&mut self, primitive: &Parallelepiped) {
        for cell in primitive.cells() {
            let index = self.consumed_index(cell.x, cell.y, cell.z);
            self.consumed.set(index, true);
        }
    }
}
