//! # Layout Module
//!
//! Procedural population of a voxel grid and extraction of box primitives from it.
//!
//! ## Layout Kinds
//!
//! Multiple population strategies are supported, selected through [`LayoutKind`]:
//! - `FloorWalls`: a one-cell floor slab plus a one-cell perimeter wall (the arena)
//! - `Obstacles`: the arena plus seeded random pillars inside it
//! - `Terrain`: a seeded Perlin height field
//! - `Checkerboard`: alternating solid and empty cells, the worst case for merging
//! - `Solid`: every cell filled
//! - `Empty`: nothing filled
//!
//! Population routines only ever turn cells solid; they never clear. Running one twice
//! produces the same solid set as running it once.
//!
//! ## Extraction
//!
//! [`LayoutGenerator::extract_primitives`] converts the solid cells of a grid into a
//! disjoint set of boxes (see [`extraction`]); [`slabs`] offers a multi-threaded variant.

use log::{debug, info};
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::env_state::voxels::{
    grid::VoxelGrid,
    voxel::{material::Material, Fillable, Solidity},
};

use parallelepiped::Parallelepiped;

pub mod extraction;
pub mod parallelepiped;
pub mod slabs;

/// Default number of pillars placed by the `Obstacles` layout.
pub const DEFAULT_OBSTACLE_COUNT: usize = 16;
/// Default scaling factor applied to cell coordinates when sampling Perlin noise.
pub const DEFAULT_TERRAIN_SCALE: f64 = 0.05;

/// The population strategy used to fill a grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Leaves the grid untouched.
    Empty,
    /// Fills every cell.
    Solid,
    /// A floor slab at z=0 and a perimeter wall on the x/y boundary.
    #[default]
    FloorWalls,
    /// Fills cells whose coordinate sum is even.
    Checkerboard,
    /// The floor and walls plus seeded random pillars standing on the floor.
    Obstacles,
    /// Columns rising from z=0 to a seeded Perlin noise height.
    Terrain,
}

/// Populates grids and extracts box primitives from them.
///
/// The generator itself is stateless apart from the parameters of the seeded layouts:
/// the same generator applied to grids of the same dimensions produces the same cells.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_env::{LayoutGenerator, VoxelGrid, VoxelState};
///
/// let mut grid = VoxelGrid::<VoxelState>::cube(8, Point3::new(0.0, 0.0, 0.0), 1.0).unwrap();
/// let generator = LayoutGenerator::default();
/// generator.generate_floor_walls(&mut grid);
///
/// let primitives = generator.extract_primitives(&grid);
/// assert!(!primitives.is_empty());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayoutGenerator {
    seed: u64,
    obstacle_count: usize,
    terrain_scale: f64,
}

impl Default for LayoutGenerator {
    fn default() -> Self {
        LayoutGenerator::new(0)
    }
}

impl LayoutGenerator {
    /// Creates a generator whose seeded layouts derive from `seed`.
    pub fn new(seed: u64) -> Self {
        LayoutGenerator {
            seed,
            obstacle_count: DEFAULT_OBSTACLE_COUNT,
            terrain_scale: DEFAULT_TERRAIN_SCALE,
        }
    }

    /// Sets how many pillars the `Obstacles` layout places.
    pub fn with_obstacle_count(mut self, obstacle_count: usize) -> Self {
        self.obstacle_count = obstacle_count;
        self
    }

    /// Sets the noise sampling scale of the `Terrain` layout.
    pub fn with_terrain_scale(mut self, terrain_scale: f64) -> Self {
        self.terrain_scale = terrain_scale;
        self
    }

    /// The seed used by the `Obstacles` and `Terrain` layouts.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Runs the population routine selected by `kind`.
    pub fn generate<S: Fillable>(&self, grid: &mut VoxelGrid<S>, kind: LayoutKind) {
        let dimensions: [usize; 3] = grid.dimensions().into();
        info!("Generating {:?} layout on a {:?} grid", kind, dimensions);
        match kind {
            LayoutKind::Empty => {}
            LayoutKind::Solid => self.generate_solid(grid),
            LayoutKind::FloorWalls => self.generate_floor_walls(grid),
            LayoutKind::Checkerboard => self.generate_checkerboard(grid),
            LayoutKind::Obstacles => self.generate_obstacles(grid),
            LayoutKind::Terrain => self.generate_terrain(grid),
        }
    }

    /// Marks a one-cell-thick floor at z=0 and a one-cell-thick perimeter wall around
    /// the x/y boundary as solid.
    ///
    /// Interior cells above the floor are not touched. Degenerate grids are handled
    /// without special cases: a grid of height 1 is all floor, and a grid less than
    /// three cells wide on x or y has no interior, so it ends up entirely solid.
    pub fn generate_floor_walls<S: Fillable>(&self, grid: &mut VoxelGrid<S>) {
        let dimensions = grid.dimensions();
        let (last_x, last_y) = (dimensions.x - 1, dimensions.y - 1);

        for z in 0..dimensions.z {
            for y in 0..dimensions.y {
                for x in 0..dimensions.x {
                    if z == 0 {
                        grid.put(x, y, z, S::filled(Material::Floor));
                    } else if x == 0 || y == 0 || x == last_x || y == last_y {
                        grid.put(x, y, z, S::filled(Material::Wall));
                    }
                }
            }
        }
    }

    /// Fills every cell.
    pub fn generate_solid<S: Fillable>(&self, grid: &mut VoxelGrid<S>) {
        let dimensions = grid.dimensions();
        for z in 0..dimensions.z {
            for y in 0..dimensions.y {
                for x in 0..dimensions.x {
                    grid.put(x, y, z, S::filled(Material::Wall));
                }
            }
        }
    }

    /// Fills every cell whose coordinate sum is even, a 3D checkerboard.
    ///
    /// No two solid cells share a face, so extraction emits one box per solid cell.
    pub fn generate_checkerboard<S: Fillable>(&self, grid: &mut VoxelGrid<S>) {
        let dimensions = grid.dimensions();
        for z in 0..dimensions.z {
            for y in 0..dimensions.y {
                for x in 0..dimensions.x {
                    if (x + y + z) % 2 == 0 {
                        grid.put(x, y, z, S::filled(Material::Obstacle));
                    }
                }
            }
        }
    }

    /// Builds the floor and walls, then stands seeded random pillars on the floor.
    ///
    /// Each pillar occupies one interior column from z=1 up to a random height, at most the
    /// top layer. Grids with no interior (less than 3 cells on x or y, or a single layer)
    /// get only the floor and walls.
    pub fn generate_obstacles<S: Fillable>(&self, grid: &mut VoxelGrid<S>) {
        self.generate_floor_walls(grid);

        let dimensions = grid.dimensions();
        if dimensions.x < 3 || dimensions.y < 3 || dimensions.z < 2 {
            debug!("Grid has no interior, skipping obstacles");
            return;
        }

        let mut rng = fastrand::Rng::with_seed(self.seed);
        for _ in 0..self.obstacle_count {
            let x = rng.usize(1..dimensions.x - 1);
            let y = rng.usize(1..dimensions.y - 1);
            let top = rng.usize(1..dimensions.z);
            for z in 1..=top {
                grid.put(x, y, z, S::filled(Material::Obstacle));
            }
        }
    }

    /// Fills each (x, y) column from z=0 up to a height drawn from seeded 2D Perlin noise.
    ///
    /// The bottom layer is always solid, so the terrain has no holes.
    pub fn generate_terrain<S: Fillable>(&self, grid: &mut VoxelGrid<S>) {
        // Perlin seeds are 32 bits; fold the high half in.
        let perlin = Perlin::new((self.seed ^ (self.seed >> 32)) as u32);
        let dimensions = grid.dimensions();
        let max_height = (dimensions.z - 1) as f64;

        for y in 0..dimensions.y {
            for x in 0..dimensions.x {
                let sample = perlin.get([
                    x as f64 * self.terrain_scale,
                    y as f64 * self.terrain_scale,
                ]);
                let height = (((sample + 1.0) * 0.5).clamp(0.0, 1.0) * max_height).round() as usize;
                for z in 0..=height {
                    grid.put(x, y, z, S::filled(Material::Terrain));
                }
            }
        }
    }

    /// Extracts a disjoint set of boxes covering exactly the solid cells of `grid`.
    ///
    /// See [`extraction::extract_primitives`].
    pub fn extract_primitives<S: Solidity>(&self, grid: &VoxelGrid<S>) -> Vec<Parallelepiped> {
        extraction::extract_primitives(grid)
    }

    /// Extracts primitives on up to `slab_count` threads.
    ///
    /// See [`slabs::extract_primitives_slabbed`].
    pub fn extract_primitives_slabbed<S: Solidity + Sync>(
        &self,
        grid: &VoxelGrid<S>,
        slab_count: usize,
    ) -> Vec<Parallelepiped> {
        slabs::extract_primitives_slabbed(grid, slab_count)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use cgmath::{Point3, Vector3};

    use super::*;
    use crate::env_state::voxels::voxel::VoxelState;

    fn grid(x: usize, y: usize, z: usize) -> VoxelGrid<VoxelState> {
        VoxelGrid::new(Vector3::new(x, y, z), Point3::new(0.0, 0.0, 0.0), 1.0).unwrap()
    }

    fn solid_set<S: Solidity>(grid: &VoxelGrid<S>) -> HashSet<Point3<usize>> {
        grid.solid_cells().collect()
    }

    #[test]
    fn floor_walls_on_small_arena() {
        let mut grid = grid(3, 3, 2);
        LayoutGenerator::default().generate_floor_walls(&mut grid);

        for y in 0..3 {
            for x in 0..3 {
                let floor = grid.get(Point3::new(x, y, 0)).unwrap();
                assert!(floor.solid);
                assert_eq!(floor.material, Material::Floor);
            }
        }
        for y in 0..3 {
            for x in 0..3 {
                let cell = Point3::new(x, y, 1);
                assert_eq!(grid.is_solid(cell), (x, y) != (1, 1), "{cell:?}");
            }
        }
        assert_eq!(
            grid.get(Point3::new(0, 1, 1)).unwrap().material,
            Material::Wall
        );
    }

    #[test]
    fn floor_walls_is_idempotent() {
        let mut once = grid(6, 5, 4);
        let generator = LayoutGenerator::default();
        generator.generate_floor_walls(&mut once);
        let mut twice = once.clone();
        generator.generate_floor_walls(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn floor_walls_degenerates_gracefully() {
        let generator = LayoutGenerator::default();

        let mut flat = grid(4, 4, 1);
        generator.generate_floor_walls(&mut flat);
        assert_eq!(flat.solid_count(), 16);

        let mut narrow = grid(2, 5, 3);
        generator.generate_floor_walls(&mut narrow);
        assert_eq!(narrow.solid_count(), narrow.cell_count());

        let mut single = grid(1, 1, 1);
        generator.generate_floor_walls(&mut single);
        assert!(single.is_solid(Point3::new(0, 0, 0)));
    }

    #[test]
    fn generate_dispatches_by_kind() {
        let generator = LayoutGenerator::default();

        let mut empty = grid(4, 4, 4);
        generator.generate(&mut empty, LayoutKind::Empty);
        assert_eq!(empty.solid_count(), 0);

        let mut solid = grid(4, 4, 4);
        generator.generate(&mut solid, LayoutKind::Solid);
        assert_eq!(solid.solid_count(), 64);

        let mut arena = grid(4, 4, 4);
        generator.generate(&mut arena, LayoutKind::FloorWalls);
        let mut expected = grid(4, 4, 4);
        generator.generate_floor_walls(&mut expected);
        assert_eq!(arena, expected);
    }

    #[test]
    fn checkerboard_never_merges() {
        let mut grid = grid(5, 4, 3);
        let generator = LayoutGenerator::default();
        generator.generate(&mut grid, LayoutKind::Checkerboard);
        assert_eq!(grid.solid_count(), 30);
        assert!(grid.is_solid(Point3::new(0, 0, 0)));
        assert!(!grid.is_solid(Point3::new(1, 0, 0)));

        let primitives = generator.extract_primitives(&grid);
        assert_eq!(primitives.len(), 30);
        assert!(primitives.iter().all(|p| p.volume() == 1));
    }

    #[test]
    fn obstacles_are_seeded_and_inside_the_arena() {
        let mut a = grid(12, 10, 6);
        let mut b = grid(12, 10, 6);
        let generator = LayoutGenerator::new(42).with_obstacle_count(20);
        generator.generate(&mut a, LayoutKind::Obstacles);
        generator.generate(&mut b, LayoutKind::Obstacles);
        assert_eq!(a, b);

        let mut arena = grid(12, 10, 6);
        generator.generate_floor_walls(&mut arena);
        let extra: Vec<_> = solid_set(&a).difference(&solid_set(&arena)).copied().collect();
        assert!(!extra.is_empty());
        for cell in extra {
            assert!((1..11).contains(&cell.x) && (1..9).contains(&cell.y) && cell.z >= 1);
            let voxel = a.get(cell.cast::<i32>().unwrap()).unwrap();
            assert_eq!(voxel.material, Material::Obstacle);
        }
    }

    #[test]
    fn obstacles_without_interior_fall_back_to_arena() {
        let generator = LayoutGenerator::new(3);
        let mut grid_a = grid(2, 8, 4);
        generator.generate_obstacles(&mut grid_a);
        let mut grid_b = grid(2, 8, 4);
        generator.generate_floor_walls(&mut grid_b);
        assert_eq!(grid_a, grid_b);
    }

    #[test]
    fn terrain_is_seeded_and_grounded() {
        let generator = LayoutGenerator::new(9).with_terrain_scale(0.13);
        let mut a = grid(16, 16, 8);
        let mut b = grid(16, 16, 8);
        generator.generate_terrain(&mut a);
        generator.generate_terrain(&mut b);
        assert_eq!(a, b);

        for y in 0..16 {
            for x in 0..16 {
                assert!(a.is_solid(Point3::new(x, y, 0)));
                // Columns are contiguous from the ground up.
                let mut above_top = false;
                for z in 0..8 {
                    let solid = a.is_solid(Point3::new(x, y, z));
                    assert!(!(above_top && solid), "floating cell at ({x}, {y}, {z})");
                    above_top |= !solid;
                }
            }
        }
    }

    #[test]
    fn extraction_covers_generated_layouts() {
        let generator = LayoutGenerator::new(5);
        for kind in [
            LayoutKind::Empty,
            LayoutKind::Solid,
            LayoutKind::FloorWalls,
            LayoutKind::Checkerboard,
            LayoutKind::Obstacles,
            LayoutKind::Terrain,
        ] {
            let mut grid = grid(9, 7, 5);
            generator.generate(&mut grid, kind);
            let primitives = generator.extract_primitives(&grid);
            let covered: HashSet<_> = primitives.iter().flat_map(Parallelepiped::cells).collect();
            assert_eq!(covered, solid_set(&grid), "{kind:?}");
            let volume: usize = primitives.iter().map(Parallelepiped::volume).sum();
            assert_eq!(volume, grid.solid_count(), "{kind:?} boxes overlap");
        }
    }

    #[test]
    fn layout_kind_names_are_snake_case() {
        let kind: LayoutKind = serde_json::from_str("\"floor_walls\"").unwrap();
        assert_eq!(kind, LayoutKind::FloorWalls);
        assert_eq!(
            serde_json::to_string(&LayoutKind::Checkerboard).unwrap(),
            "\"checkerboard\""
        );
    }
}
