//! # Environment Configuration
//!
//! Everything needed to build an [`Env`](super::Env): grid placement, which layout to
//! generate and how to extract primitives. Every field has a default, so a JSON document
//! only needs to name what it changes.

use std::path::Path;

use cgmath::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::{
    env_state::{
        layout::{LayoutKind, DEFAULT_OBSTACLE_COUNT, DEFAULT_TERRAIN_SCALE},
        voxels::grid::{DEFAULT_GRID_DIMENSION, DEFAULT_RESOLUTION},
    },
    error::VoxelError,
};

/// Configuration of an environment.
///
/// # Examples
///
/// ```
/// use voxel_env::{EnvConfig, LayoutKind};
///
/// let config = EnvConfig::from_json_str(r#"{ "dimensions": [16, 16, 4], "layout": "obstacles" }"#).unwrap();
/// assert_eq!(config.layout, LayoutKind::Obstacles);
/// assert_eq!(config.resolution, 1.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Cell counts along x, y and z.
    pub dimensions: [usize; 3],
    /// World-space position of the minimum corner of cell (0, 0, 0).
    pub origin: [f32; 3],
    /// Edge length of one cell in world units.
    pub resolution: f32,
    /// Population strategy used by `Env::generate_layout`.
    pub layout: LayoutKind,
    /// Initial seed of the seeded layouts.
    pub seed: u64,
    /// Worker threads used for extraction; 0 or 1 extracts on the calling thread.
    pub extraction_threads: usize,
    /// Pillars placed by the `obstacles` layout.
    pub obstacle_count: usize,
    /// Noise sampling scale of the `terrain` layout.
    pub terrain_scale: f64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        EnvConfig {
            dimensions: [DEFAULT_GRID_DIMENSION; 3],
            origin: [0.0; 3],
            resolution: DEFAULT_RESOLUTION,
            layout: LayoutKind::default(),
            seed: 0,
            extraction_threads: 1,
            obstacle_count: DEFAULT_OBSTACLE_COUNT,
            terrain_scale: DEFAULT_TERRAIN_SCALE,
        }
    }
}

impl EnvConfig {
    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    /// [`VoxelError::Config`] if the document is malformed or a field has the wrong type.
    /// Value ranges are not checked here; invalid dimensions or resolution are reported
    /// when the grid is built.
    pub fn from_json_str(json: &str) -> Result<Self, VoxelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, VoxelError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The grid dimensions as a vector.
    pub fn dimensions_vec(&self) -> Vector3<usize> {
        self.dimensions.into()
    }

    /// The grid origin as a point.
    pub fn origin_point(&self) -> Point3<f32> {
        self.origin.into()
    }
}
