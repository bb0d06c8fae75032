//! # Voxel Storage
//!
//! The data side of an environment: what a cell holds and how cells are stored.
//!
//! * **Voxel**: per-cell payloads (`VoxelState`, `Material`) and the `Solidity` /
//!   `Fillable` capabilities the rest of the crate is generic over
//! * **Grid**: a dense, fixed-size 3D array of payloads anchored in world space
//!
//! The layout generator writes into a grid and the extraction algorithm reads from it;
//! neither keeps any state on the grid itself.

pub mod grid;
pub mod voxel;
