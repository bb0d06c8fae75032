//! # Material Module
//!
//! Tags recording which population routine placed a voxel. Extraction never looks at
//! the material; it only matters to collaborators that want to colour or classify the
//! environment.

use num_derive::FromPrimitive;

use super::MaterialSize;

/// Enumerates the materials a voxel can carry.
///
/// The `FromPrimitive` derive allows conversion from the compact integer form
/// stored by collaborators that flatten a grid into bytes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive)]
pub enum Material {
    /// Empty space.
    #[default]
    Air,

    /// The bottom slab of an arena.
    Floor,

    /// The perimeter wall of an arena.
    Wall,

    /// A pillar placed inside an arena by the seeded obstacle layout.
    Obstacle,

    /// A column of the noise-driven height field.
    Terrain,
}

impl Material {
    /// Converts a `MaterialSize` to a `Material`.
    ///
    /// # Returns
    /// `None` if the value doesn't correspond to a known material.
    pub fn from_int(material: MaterialSize) -> Option<Self> {
        num_traits::FromPrimitive::from_u8(material)
    }

    /// Returns the compact integer form of this material.
    pub fn as_int(self) -> MaterialSize {
        self as MaterialSize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_form_converts_back() {
        for material in [
            Material::Air,
            Material::Floor,
            Material::Wall,
            Material::Obstacle,
            Material::Terrain,
        ] {
            assert_eq!(Material::from_int(material.as_int()), Some(material));
        }
    }

    #[test]
    fn unknown_integer_is_rejected() {
        assert_eq!(Material::from_int(200), None);
    }
}
