//! # Environment State Module
//!
//! The composition root of the crate: an [`Env`] owns one voxel grid and the primitive
//! set most recently extracted from it, and hands both to downstream collaborators
//! (physics, rendering).
//!
//! ## Key Components
//!
//! * `voxels` - Voxel payloads and the dense grid that stores them
//! * `layout` - Population routines and box primitive extraction
//! * `config` - Serializable environment configuration
//!
//! ## Pipeline
//!
//! The environment never runs anything implicitly. Callers drive the pipeline:
//!
//! 1. `generate_layout` clears the grid and populates it
//! 2. `extract_primitives` converts the solid cells into boxes and stores them
//! 3. Collaborators read `grid()` and `primitives()`
//!
//! `reset` runs steps 1 and 2 in one call. Mutating the grid through `grid_mut` does not
//! refresh the stored primitives; keeping them current is the caller's responsibility.

use log::{debug, info};

use crate::error::VoxelError;

use config::EnvConfig;
use layout::{extraction::ExtractionStats, parallelepiped::Parallelepiped, LayoutGenerator};
use voxels::{grid::VoxelGrid, voxel::VoxelState};

pub mod config;
pub mod layout;
pub mod voxels;

/// A voxel environment: one grid and its box primitive description.
///
/// # Examples
///
/// ```
/// use voxel_env::{Env, EnvConfig};
///
/// let mut env = Env::new(EnvConfig {
///     dimensions: [10, 10, 3],
///     ..EnvConfig::default()
/// }).unwrap();
///
/// let primitives = env.reset();
/// assert!(!primitives.is_empty());
/// assert!(env.primitives().is_some());
/// ```
#[derive(Clone, Debug)]
pub struct Env {
    /// The configuration the environment was built from
    config: EnvConfig,
    /// The authoritative voxel grid
    grid: VoxelGrid<VoxelState>,
    /// Primitives from the last extraction, if any has run
    primitives: Option<Vec<Parallelepiped>>,
    /// Seed of the seeded layouts; starts at `config.seed`
    seed: u64,
}

impl Env {
    /// Creates an environment with an empty grid described by `config`.
    ///
    /// # Errors
    /// Returns the grid construction error if the configured dimensions or resolution are
    /// invalid.
    pub fn new(config: EnvConfig) -> Result<Self, VoxelError> {
        let grid = VoxelGrid::new(
            config.dimensions_vec(),
            config.origin_point(),
            config.resolution,
        )?;
        debug!("Created environment with {} cells", grid.cell_count());

        Ok(Env {
            seed: config.seed,
            config,
            grid,
            primitives: None,
        })
    }

    /// The configuration the environment was built from.
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// The voxel grid.
    pub fn grid(&self) -> &VoxelGrid<VoxelState> {
        &self.grid
    }

    /// Mutable access to the voxel grid. Stored primitives are not refreshed.
    pub fn grid_mut(&mut self) -> &mut VoxelGrid<VoxelState> {
        &mut self.grid
    }

    /// Primitives from the last extraction, or `None` if none has run.
    pub fn primitives(&self) -> Option<&[Parallelepiped]> {
        self.primitives.as_deref()
    }

    /// Moves the stored primitives out, leaving none.
    pub fn take_primitives(&mut self) -> Option<Vec<Parallelepiped>> {
        self.primitives.take()
    }

    /// Summary of the stored primitives, or `None` if none has run.
    pub fn stats(&self) -> Option<ExtractionStats> {
        self.primitives
            .as_deref()
            .map(ExtractionStats::from_primitives)
    }

    /// The seed used by seeded layouts.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sets the seed used by the next `generate_layout`.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    fn layout_generator(&self) -> LayoutGenerator {
        LayoutGenerator::new(self.seed)
            .with_obstacle_count(self.config.obstacle_count)
            .with_terrain_scale(self.config.terrain_scale)
    }

    /// Clears the grid and populates it with the configured layout.
    pub fn generate_layout(&mut self) {
        self.grid.clear();
        self.layout_generator()
            .generate(&mut self.grid, self.config.layout);
    }

    /// Extracts primitives from the current grid and stores them, replacing any previous
    /// set.
    ///
    /// Runs on `config.extraction_threads` workers when that is greater than one.
    pub fn extract_primitives(&mut self) -> &[Parallelepiped] {
        let generator = self.layout_generator();
        let primitives = if self.config.extraction_threads > 1 {
            generator.extract_primitives_slabbed(&self.grid, self.config.extraction_threads)
        } else {
            generator.extract_primitives(&self.grid)
        };
        self.primitives.insert(primitives)
    }

    /// Regenerates the layout and re-extracts its primitives.
    pub fn reset(&mut self) -> &[Parallelepiped] {
        info!(
            "Resetting environment with {:?} layout, seed {}",
            self.config.layout, self.seed
        );
        self.generate_layout();
        self.extract_primitives()
    }
}

impl Default for Env {
    /// A 100³ grid at the world origin with unit resolution and the floor/walls layout.
    /// Nothing is generated until the caller asks.
    fn default() -> Self {
        let config = EnvConfig::default();
        Env {
            seed: config.seed,
            config,
            grid: VoxelGrid::default(),
            primitives: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Point3, Vector3};

    use super::*;
    use crate::env_state::{layout::LayoutKind, voxels::voxel::material::Material};

    fn small_config(layout: LayoutKind) -> EnvConfig {
        EnvConfig {
            dimensions: [12, 10, 5],
            layout,
            ..EnvConfig::default()
        }
    }

    #[test]
    fn default_env_matches_default_config() {
        let env = Env::default();
        assert_eq!(env.grid().dimensions(), Vector3::new(100, 100, 100));
        assert_eq!(env.config(), &EnvConfig::default());
        assert!(env.primitives().is_none());
        assert_eq!(env.grid().solid_count(), 0);
    }

    #[test]
    fn invalid_config_fails_construction() {
        let result = Env::new(EnvConfig {
            resolution: 0.0,
            ..EnvConfig::default()
        });
        assert!(matches!(result, Err(VoxelError::InvalidResolution { .. })));
    }

    #[test]
    fn primitives_are_stale_until_re_extracted() {
        let mut env = Env::new(small_config(LayoutKind::FloorWalls)).unwrap();
        let before = env.reset().to_vec();

        env.grid_mut()
            .set(Point3::new(5, 5, 3), VoxelState::solid(Material::Obstacle))
            .unwrap();
        assert_eq!(env.primitives().unwrap(), before.as_slice());

        let after = env.extract_primitives().to_vec();
        assert_ne!(after, before);
        assert_eq!(env.stats().unwrap().solid_cells, env.grid().solid_count());
    }

    #[test]
    fn generate_layout_clears_previous_cells() {
        let mut env = Env::new(small_config(LayoutKind::Empty)).unwrap();
        env.grid_mut()
            .set(Point3::new(1, 1, 1), VoxelState::solid(Material::Wall))
            .unwrap();
        env.generate_layout();
        assert_eq!(env.grid().solid_count(), 0);
        assert!(env.extract_primitives().is_empty());
    }

    #[test]
    fn seed_drives_seeded_layouts() {
        let mut a = Env::new(small_config(LayoutKind::Obstacles)).unwrap();
        let mut b = Env::new(small_config(LayoutKind::Obstacles)).unwrap();
        a.set_seed(42);
        b.set_seed(42);
        assert_eq!(a.reset(), b.reset());
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn threaded_extraction_covers_the_same_cells() {
        let mut env = Env::new(EnvConfig {
            extraction_threads: 3,
            ..small_config(LayoutKind::Terrain)
        })
        .unwrap();
        env.reset();
        let stats = env.stats().unwrap();
        assert_eq!(stats.solid_cells, env.grid().solid_count());
    }

    #[test]
    fn take_primitives_empties_the_slot() {
        let mut env = Env::new(small_config(LayoutKind::Solid)).unwrap();
        env.reset();
        let primitives = env.take_primitives().unwrap();
        assert_eq!(primitives.len(), 1);
        assert!(env.primitives().is_none());
    }
}
