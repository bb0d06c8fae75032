//! # Slab Extraction
//!
//! Parallel extraction over non-overlapping z-slabs.
//!
//! Each slab is extracted on its own worker thread with its own consumed markers; a box
//! can therefore never leave its slab, and boxes from different slabs can never overlap.
//! A final seam pass fuses a box ending on a slab's top layer with a box starting on the
//! next slab's bottom layer whenever both cover the same x-y rectangle, recovering the
//! tall boxes the partition cut apart.
//!
//! The output covers exactly the solid cells and is deterministic for a given slab
//! count, but it is not required to match the sequential extraction order.

use std::{collections::HashMap, ops::Range, thread};

use log::debug;
use web_time::Instant;

use crate::env_state::voxels::{grid::VoxelGrid, voxel::Solidity};

use super::{
    extraction::{extract_primitives, RunMerger},
    parallelepiped::Parallelepiped,
};

/// Extracts primitives with up to `slab_count` worker threads.
///
/// `slab_count` is clamped to the grid depth; a count of 0 or 1 runs the sequential
/// extraction.
pub fn extract_primitives_slabbed<S: Solidity + Sync>(
    grid: &VoxelGrid<S>,
    slab_count: usize,
) -> Vec<Parallelepiped> {
    let depth = grid.dimensions().z;
    let slab_count = slab_count.min(depth);
    if slab_count <= 1 {
        return extract_primitives(grid);
    }

    let start = Instant::now();
    let slabs = slab_ranges(depth, slab_count);

    let per_slab: Vec<Vec<Parallelepiped>> = thread::scope(|scope| {
        let workers: Vec<_> = slabs
            .iter()
            .cloned()
            .map(|layers| scope.spawn(move || RunMerger::new(grid, layers).run()))
            .collect();

        workers
            .into_iter()
            .map(|worker| match worker.join() {
                Ok(primitives) => primitives,
                Err(payload) => std::panic::resume_unwind(payload),
            })
            .collect()
    });

    let primitives = merge_slab_seams(per_slab, &slabs);
    debug!(
        "Slab extraction over {} slabs emitted {} primitives in {:?}",
        slab_count,
        primitives.len(),
        start.elapsed()
    );
    primitives
}

/// Splits `0..depth` into `count` contiguous ranges whose lengths differ by at most one.
/// The first `depth % count` slabs get the extra layer.
pub(crate) fn slab_ranges(depth: usize, count: usize) -> Vec<Range<usize>> {
    let base = depth / count;
    let remainder = depth % count;

    let mut start = 0;
    (0..count)
        .map(|index| {
            let len = base + usize::from(index < remainder);
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}

/// The x-y footprint of a box, used to match boxes across a seam.
type Footprint = [u32; 4];

fn footprint(primitive: &Parallelepiped) -> Footprint {
    [
        primitive.min[0],
        primitive.min[1],
        primitive.max[0],
        primitive.max[1],
    ]
}

/// Concatenates per-slab outputs, fusing boxes that continue across a seam.
fn merge_slab_seams(
    per_slab: Vec<Vec<Parallelepiped>>,
    slabs: &[Range<usize>],
) -> Vec<Parallelepiped> {
    let mut merged: Vec<Parallelepiped> = Vec::new();

    for (primitives, layers) in per_slab.into_iter().zip(slabs) {
        let seam = layers.start as u32;

        // Boxes reaching the layer just below the seam; footprints are unique among them
        // because those boxes are disjoint on that layer.
        let mut open: HashMap<Footprint, usize> = HashMap::new();
        if seam > 0 {
            for (index, primitive) in merged.iter().enumerate() {
                if primitive.max[2] == seam - 1 {
                    open.insert(footprint(primitive), index);
                }
            }
        }

        for primitive in primitives {
            let continued = if primitive.min[2] == seam {
                open.remove(&footprint(&primitive))
            } else {
                None
            };
            match continued {
                Some(index) => merged[index].max[2] = primitive.max[2],
                None => merged.push(primitive),
            }
        }
    }

    merged
}
