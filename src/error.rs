//! # Error Types
//!
//! Every fallible operation in the crate reports a [`VoxelError`]. Out-of-range reads are
//! not errors (they return `None`), so this enum only covers construction, writes and
//! configuration loading.

use thiserror::Error;

/// Errors that can occur while building or mutating a voxel environment.
#[derive(Error, Debug)]
pub enum VoxelError {
    /// A grid was requested with a zero (or unaddressable) dimension.
    #[error("invalid grid dimensions {dimensions:?}: every axis must be in 1..={max}", max = i32::MAX)]
    InvalidDimensions {
        /// The rejected cell counts per axis.
        dimensions: [usize; 3],
    },

    /// A grid was requested with a non-positive or non-finite cell size.
    #[error("invalid grid resolution {resolution}: must be a positive finite number")]
    InvalidResolution {
        /// The rejected cell edge length.
        resolution: f32,
    },

    /// A write addressed a cell outside the grid. The grid is left unchanged.
    #[error("cell {cell:?} is outside a grid of dimensions {dimensions:?}")]
    OutOfBounds {
        /// The addressed cell.
        cell: [i32; 3],
        /// The dimensions of the grid that rejected the write.
        dimensions: [usize; 3],
    },

    /// The environment configuration could not be parsed.
    #[error("invalid environment configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The environment configuration file could not be read.
    #[error("could not read environment configuration: {0}")]
    Io(#[from] std::io::Error),
}
