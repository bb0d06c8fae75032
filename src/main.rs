//! # Voxel Env Entry Point
//!
//! Builds one environment and reports its primitive count. See `voxel_env::run()`.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info VOXEL_ENV_CONFIG=env.json cargo run --release
//! ```

fn main() {
    if let Err(error) = voxel_env::run() {
        log::error!("{error}");
        std::process::exit(1);
    }
}
