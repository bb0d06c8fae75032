//! # Voxel Module
//!
//! Per-cell payloads and the capabilities the rest of the crate needs from them.
//!
//! The grid and the extraction algorithm are generic over the payload: all they need is
//! a solid/empty classification ([`Solidity`]), and the population routines additionally
//! need a way to produce a solid cell ([`Fillable`]). Richer per-cell data only has to
//! implement these two traits to reuse the whole pipeline.

use material::Material;

pub mod material;

/// The underlying integer type used to represent materials in memory.
pub type MaterialSize = u8;

/// A payload that can be classified as solid or empty.
pub trait Solidity {
    /// Returns `true` if the cell is occupied.
    fn is_solid(&self) -> bool;
}

/// A payload the layout generator can write solid cells of.
pub trait Fillable: Solidity + Sized {
    /// Builds a solid cell tagged with `material`.
    ///
    /// Payloads that don't track materials are free to ignore the tag.
    fn filled(material: Material) -> Self;
}

impl Solidity for bool {
    #[inline]
    fn is_solid(&self) -> bool {
        *self
    }
}

impl Fillable for bool {
    fn filled(_material: Material) -> Self {
        true
    }
}

/// The default per-cell payload of an environment grid.
///
/// The default value is an empty air cell, which is what every cell of a freshly
/// constructed grid holds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct VoxelState {
    /// Whether the cell is occupied.
    pub solid: bool,
    /// What placed the cell. Not consulted by extraction.
    pub material: Material,
}

impl VoxelState {
    /// Creates a solid voxel of the given material.
    pub fn solid(material: Material) -> Self {
        VoxelState {
            solid: true,
            material,
        }
    }

    /// Creates an empty voxel.
    pub fn empty() -> Self {
        VoxelState::default()
    }
}

impl Solidity for VoxelState {
    #[inline]
    fn is_solid(&self) -> bool {
        self.solid
    }
}

impl Fillable for VoxelState {
    fn filled(material: Material) -> Self {
        VoxelState::solid(material)
    }
}
