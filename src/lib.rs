#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Env
//!
//! Voxelized simulation environments compacted into axis-aligned box primitives.
//!
//! This crate builds a dense voxel grid, populates it procedurally (an arena of floor and
//! walls, seeded obstacles, noise terrain, ...) and converts the solid cells into a small
//! set of disjoint boxes that a physics or rendering layer can consume directly.
//!
//! ## Key Modules
//!
//! * `env_state` - The `Env` composition root, its configuration, voxel storage and the
//!   layout generator
//! * `error` - The crate's error type
//!
//! ## Usage
//!
//! ```rust
//! use voxel_env::{Env, EnvConfig, LayoutKind};
//!
//! let mut env = Env::new(EnvConfig {
//!     dimensions: [32, 32, 8],
//!     layout: LayoutKind::Obstacles,
//!     ..EnvConfig::default()
//! }).unwrap();
//!
//! env.reset();
//! for primitive in env.primitives().unwrap_or_default() {
//!     let (_center, _half_extents) = primitive.center_and_half_extents(env.grid());
//! }
//! ```
//!
//! ## Performance Considerations
//!
//! * Cells live in one flat vector; lookup is O(1) and scans are linear in memory
//! * Extraction keeps its consumed markers in a bit vector, one bit per cell
//! * Large grids can be extracted on several threads, one z-slab per worker

use log::info;

pub mod env_state;
pub mod error;

pub use env_state::{
    config::EnvConfig,
    layout::{
        extraction::{extract_primitives, ExtractionStats},
        parallelepiped::Parallelepiped,
        slabs::extract_primitives_slabbed,
        LayoutGenerator, LayoutKind,
    },
    voxels::{
        grid::VoxelGrid,
        voxel::{material::Material, Fillable, Solidity, VoxelState},
    },
    Env,
};
pub use error::VoxelError;

/// Environment variable naming a JSON configuration file for [`run`].
pub const CONFIG_PATH_VARIABLE: &str = "VOXEL_ENV_CONFIG";

/// Initializes `env_logger` on stdout, filtered by `RUST_LOG`.
///
/// Calling it again after a logger is installed has no effect.
pub fn init_logger() {
    let mut log_builder = env_logger::Builder::new();
    let initialized = log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init();

    if initialized.is_ok() {
        info!("Logger initialized");
    }
}

/// Builds one environment from the configuration named by `VOXEL_ENV_CONFIG` (or the
/// defaults), runs the generation and extraction pipeline once and logs the result.
pub fn run() -> Result<(), VoxelError> {
    init_logger();

    let config = match std::env::var_os(CONFIG_PATH_VARIABLE) {
        Some(path) => {
            info!("Loading configuration from {}", path.to_string_lossy());
            EnvConfig::from_json_file(path)?
        }
        None => EnvConfig::default(),
    };

    let mut env = Env::new(config)?;
    env.reset();

    if let Some(stats) = env.stats() {
        info!(
            "Environment ready: {} solid cells in {} primitives ({:.2} cells/primitive)",
            stats.solid_cells,
            stats.primitive_count,
            stats.compression_ratio()
        );
    }

    Ok(())
}
